use super::entities::{UserRole, UserStatus};
use crate::models::common::{
    PaginationQuery, deserialize_nullable, pagination::deserialize_optional_i64,
};
use serde::Deserialize;

// 用户查询参数（来自HTTP请求）
#[derive(Debug, Deserialize)]
pub struct UserListParams {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub department_id: Option<i64>,
    pub search: Option<String>,
}

// 用户创建请求
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub employee_code: Option<String>,
    pub phone: Option<String>,
    pub role: UserRole,
    pub department_id: Option<i64>,
    /// 默认为 active
    pub status: Option<UserStatus>,
}

// 用户更新请求（未提供的字段保持不变，可空字段传 null 表示清除）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub employee_code: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub phone: Option<Option<String>>,
    pub role: Option<UserRole>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub department_id: Option<Option<i64>>,
    pub status: Option<UserStatus>,
}

// 修改密码请求
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

// 用户列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct UserListQuery {
    pub page: u64,
    pub size: u64,
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
    pub department_id: Option<i64>,
    pub search: Option<String>,
    /// 部门范围限制：`Some(None)` 表示仅无部门的用户
    pub department_scope: Option<Option<i64>>,
}

/// 经过校验与归一化的新用户（密码已哈希）
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub employee_code: Option<String>,
    pub phone: Option<String>,
    pub role: UserRole,
    pub department_id: Option<i64>,
    pub status: UserStatus,
}

/// 经过校验与归一化的用户变更，`None` 表示不修改，`Some(None)` 表示清空
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub employee_code: Option<Option<String>>,
    pub phone: Option<Option<String>>,
    pub role: Option<UserRole>,
    pub department_id: Option<Option<i64>>,
    pub status: Option<UserStatus>,
}
