use super::entities::{Answer, Evaluation};
use serde::Serialize;

// 评估详情（含答案）
#[derive(Debug, Serialize)]
pub struct EvaluationDetail {
    #[serde(flatten)]
    pub evaluation: Evaluation,
    pub answers: Vec<Answer>,
}
