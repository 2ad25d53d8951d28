pub mod login;
pub mod password;
pub mod token;

use std::sync::Arc;

use crate::errors::Result;
use crate::models::{
    auth::{
        requests::LoginRequest,
        responses::{LoginResponse, TokenVerificationResponse},
    },
    users::{entities::User, requests::ChangePasswordRequest, responses::UserDetail},
};
use crate::storage::Storage;

pub struct AuthService {
    storage: Arc<dyn Storage>,
}

impl AuthService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub(crate) fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    /// 部门名称（无部门或部门不存在时为空）
    pub(crate) async fn department_name(&self, user: &User) -> Result<Option<String>> {
        match user.department_id {
            Some(id) => Ok(self
                .storage
                .get_department_by_id(id)
                .await?
                .map(|department| department.name)),
            None => Ok(None),
        }
    }

    // 登录验证
    pub async fn login(&self, login_request: LoginRequest) -> Result<LoginResponse> {
        login::handle_login(self, login_request).await
    }

    // 解析访问令牌得到活跃用户
    pub async fn authenticate(&self, token: &str) -> Result<User> {
        token::authenticate(self, token).await
    }

    // 当前用户资料
    pub async fn me(&self, actor: &User) -> Result<UserDetail> {
        token::handle_me(self, actor).await
    }

    // 验证令牌
    pub fn verify_token(&self, actor: &User) -> TokenVerificationResponse {
        token::handle_verify_token(actor)
    }

    // 修改密码
    pub async fn change_password(&self, actor: &User, req: ChangePasswordRequest) -> Result<()> {
        password::handle_change_password(self, actor, req).await
    }
}
