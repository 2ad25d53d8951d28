use tracing::info;

use super::EvaluationService;
use crate::capability::Action;
use crate::errors::{EvalSystemError, Result};
use crate::models::{
    evaluations::{entities::Evaluation, requests::SubmitEvaluationRequest},
    users::entities::User,
};
use crate::utils::validate::normalize_optional_text;

/// 评语最大长度
const COMMENTS_MAX_CHARS: usize = 2000;

pub async fn submit_evaluation(
    service: &EvaluationService,
    actor: &User,
    evaluation_id: i64,
    req: SubmitEvaluationRequest,
) -> Result<Evaluation> {
    service
        .load_authorized(actor, evaluation_id, Action::EvaluationWrite)
        .await?;

    let comments = normalize_optional_text(req.comments.as_deref(), COMMENTS_MAX_CHARS, "Comments")
        .map_err(EvalSystemError::validation)?;

    let evaluation = service
        .storage()
        .submit_evaluation(evaluation_id, comments)
        .await?;

    info!(
        "提交评估: id={}, assignment={}, score={:?}",
        evaluation.id, evaluation.assignment_id, evaluation.total_score
    );
    Ok(evaluation)
}
