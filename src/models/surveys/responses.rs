use super::entities::{Question, Survey};
use crate::models::common::PaginationInfo;
use serde::Serialize;

// 问卷详情（含按顺序排列的问题）
#[derive(Debug, Serialize)]
pub struct SurveyDetail {
    #[serde(flatten)]
    pub survey: Survey,
    pub questions: Vec<Question>,
}

// 问卷列表响应
#[derive(Debug, Serialize)]
pub struct SurveyListResponse {
    pub items: Vec<Survey>,
    pub pagination: PaginationInfo,
}

// 问题列表响应
#[derive(Debug, Serialize)]
pub struct QuestionListResponse {
    pub items: Vec<Question>,
}
