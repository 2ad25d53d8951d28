use serde::Deserialize;

// 单个答案
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AnswerInput {
    pub question_id: i64,
    pub answer_value: Option<i32>,
    pub answer_text: Option<String>,
}

// 批量作答请求（按问题覆盖写入）
#[derive(Debug, Clone, Deserialize)]
pub struct SaveAnswersRequest {
    pub answers: Vec<AnswerInput>,
}

// 提交评估请求
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmitEvaluationRequest {
    pub comments: Option<String>,
}

// 创建对比请求
#[derive(Debug, Clone, Deserialize)]
pub struct CreateComparisonRequest {
    pub evaluatee_id: i64,
    pub survey_id: i64,
}
