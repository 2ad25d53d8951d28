use super::entities::{AssignmentStatus, AssignmentType};
use crate::models::common::{PaginationQuery, pagination::deserialize_optional_i64};
use serde::Deserialize;

// 创建分配请求
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAssignmentRequest {
    pub survey_id: i64,
    pub evaluator_id: i64,
    pub evaluatee_id: i64,
    pub assignment_type: AssignmentType,
    pub due_date: Option<chrono::DateTime<chrono::Utc>>,
}

// 分配查询参数（来自HTTP请求）
#[derive(Debug, Deserialize)]
pub struct AssignmentListParams {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    pub status: Option<AssignmentStatus>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub survey_id: Option<i64>,
}

// 分配列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct AssignmentListQuery {
    pub page: u64,
    pub size: u64,
    pub status: Option<AssignmentStatus>,
    pub survey_id: Option<i64>,
    /// 仅返回涉及该用户的分配
    pub involving: Option<i64>,
}

/// 待写入的分配记录
#[derive(Debug, Clone)]
pub struct NewAssignment {
    pub survey_id: i64,
    pub evaluator_id: i64,
    pub evaluatee_id: i64,
    pub assignment_type: AssignmentType,
    pub due_date: Option<chrono::DateTime<chrono::Utc>>,
    pub assigned_by: i64,
}
