use super::AssignmentService;
use crate::capability::assignment_list_scope;
use crate::errors::Result;
use crate::models::{
    assignments::{
        requests::{AssignmentListParams, AssignmentListQuery},
        responses::AssignmentListResponse,
    },
    users::entities::User,
};

pub async fn list_assignments(
    service: &AssignmentService,
    actor: &User,
    query: AssignmentListParams,
) -> Result<AssignmentListResponse> {
    let scope = assignment_list_scope(actor)?;
    let (page, size) = query.pagination.normalized();

    service
        .storage()
        .list_assignments_with_pagination(AssignmentListQuery {
            page,
            size,
            status: query.status,
            survey_id: query.survey_id,
            involving: scope.involving(),
        })
        .await
}
