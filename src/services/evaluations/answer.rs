use super::EvaluationService;
use crate::capability::Action;
use crate::errors::{EvalSystemError, Result};
use crate::models::{
    evaluations::{requests::SaveAnswersRequest, responses::EvaluationDetail},
    users::entities::User,
};
use crate::scoring::validate_answers;

/// 写入一个或多个答案，同一问题重复作答时覆盖
pub async fn save_answers(
    service: &EvaluationService,
    actor: &User,
    evaluation_id: i64,
    req: SaveAnswersRequest,
) -> Result<EvaluationDetail> {
    let evaluation = service
        .load_authorized(actor, evaluation_id, Action::EvaluationWrite)
        .await?;
    if !evaluation.status.accepts_answers() {
        return Err(EvalSystemError::conflict(format!(
            "Evaluation {} is {} and can no longer be changed",
            evaluation.id, evaluation.status
        )));
    }

    let storage = service.storage();
    let questions = storage.list_questions(evaluation.survey_id).await?;
    let validated = validate_answers(&questions, &req.answers)?;

    let answers = storage.save_answers(evaluation.id, &validated).await?;
    Ok(EvaluationDetail {
        evaluation,
        answers,
    })
}
