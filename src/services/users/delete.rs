use tracing::info;

use super::UserService;
use crate::capability::{Action, Target, authorize};
use crate::errors::{EvalSystemError, Result};
use crate::models::users::entities::{User, UserStatus};
use crate::services::found;

/// 软删除：将用户置为 deactivated
pub async fn delete_user(service: &UserService, actor: &User, user_id: i64) -> Result<User> {
    let storage = service.storage();
    let target = found(storage.get_user_by_id(user_id).await?, "User", user_id)?;
    authorize(actor, Action::UserDelete, Target::User(&target))?;

    if actor.id == target.id {
        return Err(EvalSystemError::conflict("You cannot delete your own account"));
    }

    let user = found(
        storage
            .set_user_status(user_id, UserStatus::Deactivated)
            .await?,
        "User",
        user_id,
    )?;
    info!("停用用户: id={}, by={}", user.id, actor.id);
    Ok(user)
}

pub async fn toggle_status(service: &UserService, actor: &User, user_id: i64) -> Result<User> {
    let storage = service.storage();
    let target = found(storage.get_user_by_id(user_id).await?, "User", user_id)?;
    authorize(actor, Action::UserToggleStatus, Target::User(&target))?;

    let next = target.status.toggled();
    if actor.id == target.id && next == UserStatus::Deactivated {
        return Err(EvalSystemError::conflict(
            "You cannot deactivate your own account",
        ));
    }

    let user = found(storage.set_user_status(user_id, next).await?, "User", user_id)?;
    info!("切换用户状态: id={}, status={}, by={}", user.id, user.status, actor.id);
    Ok(user)
}
