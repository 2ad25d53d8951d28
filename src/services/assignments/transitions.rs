use tracing::info;

use super::AssignmentService;
use crate::capability::Action;
use crate::errors::Result;
use crate::lifecycle::{AssignmentEvent, ensure_survey_open, transition};
use crate::models::{
    assignments::{entities::Assignment, responses::AssignmentStartResponse},
    users::entities::User,
};
use crate::services::found;

/// pending → in_progress，同时创建评估记录
pub async fn start_assignment(
    service: &AssignmentService,
    actor: &User,
    assignment_id: i64,
) -> Result<AssignmentStartResponse> {
    let current = service
        .load_authorized(actor, assignment_id, Action::AssignmentStart)
        .await?;
    // 提前给出明确的状态错误；存储层会在事务内再次校验
    transition(current.status, AssignmentEvent::Start)?;
    let survey = found(
        service.storage().get_survey_by_id(current.survey_id).await?,
        "Survey",
        current.survey_id,
    )?;
    ensure_survey_open(&survey)?;

    let (assignment, evaluation) = service.storage().start_assignment(assignment_id).await?;
    info!(
        "开始评估: assignment={}, evaluation={}, evaluator={}",
        assignment.id, evaluation.id, actor.id
    );
    Ok(AssignmentStartResponse {
        assignment,
        evaluation,
    })
}

/// 仅管理员或原分配者可以取消
pub async fn cancel_assignment(
    service: &AssignmentService,
    actor: &User,
    assignment_id: i64,
) -> Result<Assignment> {
    let current = service
        .load_authorized(actor, assignment_id, Action::AssignmentCancel)
        .await?;
    transition(current.status, AssignmentEvent::Cancel)?;

    let assignment = service
        .storage()
        .cancel_assignment(assignment_id, current.status)
        .await?;
    info!("取消分配: id={}, by={}", assignment.id, actor.id);
    Ok(assignment)
}
