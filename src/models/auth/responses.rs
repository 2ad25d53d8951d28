use crate::models::users::entities::UserRole;
use serde::Serialize;

// 登录返回的用户基本信息
#[derive(Debug, Clone, Serialize)]
pub struct BasicUserInfo {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    pub department: Option<String>,
}

// 登录响应
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: BasicUserInfo,
}

#[derive(Debug, Serialize)]
pub struct TokenVerificationResponse {
    pub is_valid: bool,
    pub user_id: i64,
    pub role: UserRole,
}
