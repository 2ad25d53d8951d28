use super::entities::Assignment;
use crate::models::evaluations::entities::Evaluation;
use crate::models::common::PaginationInfo;
use serde::Serialize;

// 分配列表响应
#[derive(Debug, Serialize)]
pub struct AssignmentListResponse {
    pub items: Vec<Assignment>,
    pub pagination: PaginationInfo,
}

// 开始分配的结果：更新后的分配与新建的评估
#[derive(Debug, Serialize)]
pub struct AssignmentStartResponse {
    pub assignment: Assignment,
    pub evaluation: Evaluation,
}
