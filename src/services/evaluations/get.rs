use super::EvaluationService;
use crate::capability::{Action, Target, authorize};
use crate::errors::{EvalSystemError, Result};
use crate::models::{evaluations::responses::EvaluationDetail, users::entities::User};
use crate::services::found;

pub async fn get_evaluation(
    service: &EvaluationService,
    actor: &User,
    evaluation_id: i64,
) -> Result<EvaluationDetail> {
    let evaluation = service
        .load_authorized(actor, evaluation_id, Action::EvaluationRead)
        .await?;
    let answers = service.storage().list_answers(evaluation.id).await?;
    Ok(EvaluationDetail {
        evaluation,
        answers,
    })
}

pub async fn get_for_assignment(
    service: &EvaluationService,
    actor: &User,
    assignment_id: i64,
) -> Result<EvaluationDetail> {
    let storage = service.storage();
    let assignment = found(
        storage.get_assignment_by_id(assignment_id).await?,
        "Assignment",
        assignment_id,
    )?;
    authorize(actor, Action::AssignmentRead, Target::Assignment(&assignment))?;

    let evaluation = storage
        .get_evaluation_by_assignment(assignment_id)
        .await?
        .ok_or_else(|| {
            EvalSystemError::not_found(format!(
                "Assignment {assignment_id} has not been started"
            ))
        })?;
    authorize(actor, Action::EvaluationRead, Target::Evaluation(&evaluation))?;

    let answers = storage.list_answers(evaluation.id).await?;
    Ok(EvaluationDetail {
        evaluation,
        answers,
    })
}
