use super::SurveyService;
use crate::capability::survey_list_scope;
use crate::errors::Result;
use crate::models::{
    surveys::{
        requests::{SurveyListParams, SurveyListQuery},
        responses::SurveyListResponse,
    },
    users::entities::User,
};

pub async fn list_surveys(
    service: &SurveyService,
    actor: &User,
    query: SurveyListParams,
) -> Result<SurveyListResponse> {
    let scope = survey_list_scope(actor)?;
    let (page, size) = query.pagination.normalized();

    service
        .storage()
        .list_surveys_with_pagination(SurveyListQuery {
            page,
            size,
            status: query.status,
            created_by: query.created_by,
            search: query.search,
            owner_or_public: scope.owner_or_public(),
        })
        .await
}
