use super::entities::Department;
use serde::Serialize;

// 部门列表响应
#[derive(Debug, Serialize)]
pub struct DepartmentListResponse {
    pub items: Vec<Department>,
}
