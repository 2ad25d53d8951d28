use tracing::info;

use super::AssignmentService;
use crate::capability::{Action, Target, authorize};
use crate::errors::Result;
use crate::lifecycle::prepare_assignment;
use crate::models::{
    assignments::{entities::Assignment, requests::CreateAssignmentRequest},
    users::entities::User,
};
use crate::services::found;

pub async fn create_assignment(
    service: &AssignmentService,
    actor: &User,
    req: CreateAssignmentRequest,
) -> Result<Assignment> {
    authorize(actor, Action::AssignmentCreate, Target::Collection)?;
    let storage = service.storage();

    // 分配权限独立于问卷所有权：协调员可以分配管理员创建的问卷
    let survey = found(
        storage.get_survey_by_id(req.survey_id).await?,
        "Survey",
        req.survey_id,
    )?;

    let evaluator = found(
        storage.get_user_by_id(req.evaluator_id).await?,
        "User",
        req.evaluator_id,
    )?;
    let evaluatee = found(
        storage.get_user_by_id(req.evaluatee_id).await?,
        "User",
        req.evaluatee_id,
    )?;

    let new_assignment = prepare_assignment(&req, &survey, &evaluator, &evaluatee, actor)?;
    let assignment = storage.create_assignment(new_assignment).await?;

    info!(
        "创建分配: id={}, survey={}, evaluator={}, evaluatee={}, type={}",
        assignment.id,
        assignment.survey_id,
        assignment.evaluator_id,
        assignment.evaluatee_id,
        assignment.assignment_type
    );
    Ok(assignment)
}
