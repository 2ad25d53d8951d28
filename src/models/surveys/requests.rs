use super::entities::{QuestionType, SurveyStatus};
use crate::models::common::{PaginationQuery, pagination::deserialize_optional_i64};
use serde::Deserialize;

fn default_required() -> bool {
    true
}

// 问卷查询参数（来自HTTP请求）
#[derive(Debug, Deserialize)]
pub struct SurveyListParams {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    pub status: Option<SurveyStatus>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub created_by: Option<i64>,
    pub search: Option<String>,
}

// 问卷列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct SurveyListQuery {
    pub page: u64,
    pub size: u64,
    pub status: Option<SurveyStatus>,
    pub created_by: Option<i64>,
    pub search: Option<String>,
    /// 仅返回该用户创建的问卷或公共问卷
    pub owner_or_public: Option<i64>,
}

// 创建问题请求
#[derive(Debug, Clone, Deserialize)]
pub struct CreateQuestionRequest {
    pub question_text: String,
    pub question_type: QuestionType,
    pub order_number: Option<i32>,
    #[serde(default = "default_required")]
    pub is_required: bool,
    pub min_value: Option<i32>,
    pub max_value: Option<i32>,
}

// 创建问卷请求
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSurveyRequest {
    pub title: String,
    pub description: Option<String>,
    pub instructions: Option<String>,
    /// 默认为 active
    pub status: Option<SurveyStatus>,
    #[serde(default)]
    pub questions: Vec<CreateQuestionRequest>,
}

// 更新问卷请求
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSurveyRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub instructions: Option<String>,
}

// 更新问题请求
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateQuestionRequest {
    pub question_text: Option<String>,
    pub question_type: Option<QuestionType>,
    pub order_number: Option<i32>,
    pub is_required: Option<bool>,
    pub min_value: Option<i32>,
    pub max_value: Option<i32>,
}

// 单个问题的新顺序
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct QuestionOrder {
    pub question_id: i64,
    pub order_number: i32,
}

/// 经过校验与归一化的问题字段（存储层直接写入）
#[derive(Debug, Clone, PartialEq)]
pub struct NewQuestion {
    pub question_text: String,
    pub question_type: QuestionType,
    pub order_number: Option<i32>,
    pub is_required: bool,
    pub min_value: Option<i32>,
    pub max_value: Option<i32>,
}

/// 经过校验与归一化的问卷字段
#[derive(Debug, Clone)]
pub struct NewSurvey {
    pub title: String,
    pub description: Option<String>,
    pub instructions: Option<String>,
    pub status: SurveyStatus,
    pub created_by: Option<i64>,
    pub questions: Vec<NewQuestion>,
}
