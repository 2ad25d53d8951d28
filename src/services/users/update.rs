use tracing::info;

use super::UserService;
use super::create::{normalize_code, normalize_email, normalize_phone};
use crate::capability::authorize_user_update;
use crate::errors::{EvalSystemError, Result};
use crate::models::users::{
    entities::{User, UserStatus},
    requests::{UpdateUserRequest, UserChanges},
};
use crate::services::found;
use crate::utils::password::hash_password;
use crate::utils::validate::{normalize_name, validate_password};

pub async fn update_user(
    service: &UserService,
    actor: &User,
    user_id: i64,
    update_data: UpdateUserRequest,
) -> Result<User> {
    let storage = service.storage();
    let target = found(storage.get_user_by_id(user_id).await?, "User", user_id)?;

    // 整体写权限 + 字段级权限
    authorize_user_update(actor, &target, &update_data)?;

    if actor.id == target.id && update_data.status == Some(UserStatus::Deactivated) {
        return Err(EvalSystemError::conflict(
            "You cannot deactivate your own account",
        ));
    }

    let password_hash = match update_data.password.as_deref() {
        Some(password) => {
            validate_password(password).map_err(EvalSystemError::validation)?;
            Some(hash_password(password)?)
        }
        None => None,
    };

    let changes = UserChanges {
        email: update_data.email.as_deref().map(normalize_email).transpose()?,
        password_hash,
        first_name: update_data
            .first_name
            .as_deref()
            .map(normalize_name)
            .transpose()
            .map_err(EvalSystemError::validation)?,
        last_name: update_data
            .last_name
            .as_deref()
            .map(normalize_name)
            .transpose()
            .map_err(EvalSystemError::validation)?,
        // 空白字符串与 null 一样视为清空
        employee_code: update_data
            .employee_code
            .map(|code| normalize_code(code.as_deref()))
            .transpose()?,
        phone: update_data
            .phone
            .map(|phone| normalize_phone(phone.as_deref()))
            .transpose()?,
        role: update_data.role,
        department_id: update_data.department_id,
        status: update_data.status,
    };

    let updated = found(storage.update_user(user_id, changes).await?, "User", user_id)?;
    info!("更新用户: id={}, by={}", updated.id, actor.id);
    Ok(updated)
}
