use tracing::debug;

use super::AuthService;
use crate::errors::{EvalSystemError, Result};
use crate::models::{
    auth::responses::TokenVerificationResponse,
    users::{entities::User, responses::UserDetail},
};
use crate::utils::jwt::JwtUtils;

pub async fn authenticate(service: &AuthService, token: &str) -> Result<User> {
    let claims = JwtUtils::verify_token(token).map_err(|e| {
        debug!("令牌校验失败: {}", e);
        EvalSystemError::unauthenticated("Invalid or expired token")
    })?;

    let user_id = claims
        .user_id()
        .ok_or_else(|| EvalSystemError::unauthenticated("Invalid token subject"))?;

    match service.storage().get_user_by_id(user_id).await? {
        Some(user) if user.is_active() => Ok(user),
        Some(_) => Err(EvalSystemError::unauthenticated("Account is deactivated")),
        None => Err(EvalSystemError::unauthenticated("User no longer exists")),
    }
}

pub async fn handle_me(service: &AuthService, actor: &User) -> Result<UserDetail> {
    let department_name = service.department_name(actor).await?;
    Ok(UserDetail::new(actor.clone(), department_name))
}

pub fn handle_verify_token(actor: &User) -> TokenVerificationResponse {
    TokenVerificationResponse {
        is_valid: true,
        user_id: actor.id,
        role: actor.role,
    }
}
