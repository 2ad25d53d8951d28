use tracing::info;

use super::AuthService;
use crate::errors::{EvalSystemError, Result};
use crate::models::users::{entities::User, requests::ChangePasswordRequest};
use crate::utils::password::{hash_password, verify_password};
use crate::utils::validate::validate_password;

pub async fn handle_change_password(
    service: &AuthService,
    actor: &User,
    req: ChangePasswordRequest,
) -> Result<()> {
    if !verify_password(&req.current_password, &actor.password_hash) {
        return Err(EvalSystemError::validation("Current password is incorrect"));
    }
    validate_password(&req.new_password).map_err(EvalSystemError::validation)?;

    let password_hash = hash_password(&req.new_password)?;
    if !service
        .storage()
        .update_password(actor.id, &password_hash)
        .await?
    {
        return Err(EvalSystemError::not_found(format!(
            "User {} not found",
            actor.id
        )));
    }

    info!("用户修改密码: user_id={}", actor.id);
    Ok(())
}
