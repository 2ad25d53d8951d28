use super::entities::{User, UserRole};
use crate::models::common::PaginationInfo;
use serde::Serialize;

// 带部门名称的用户详情
#[derive(Debug, Clone, Serialize)]
pub struct UserDetail {
    #[serde(flatten)]
    pub user: User,
    pub full_name: String,
    pub department_name: Option<String>,
}

impl UserDetail {
    pub fn new(user: User, department_name: Option<String>) -> Self {
        Self {
            full_name: user.full_name(),
            user,
            department_name,
        }
    }
}

// 用户列表响应
#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub items: Vec<User>,
    pub pagination: PaginationInfo,
}

// 角色说明
#[derive(Debug, Clone, Serialize)]
pub struct RoleInfo {
    pub role: UserRole,
    pub description: &'static str,
}

impl From<UserRole> for RoleInfo {
    fn from(role: UserRole) -> Self {
        Self {
            role,
            description: role.description(),
        }
    }
}
