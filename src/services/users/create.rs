use tracing::info;

use super::UserService;
use crate::capability::{Action, Target, authorize};
use crate::errors::{EvalSystemError, Result};
use crate::models::users::{
    entities::{User, UserStatus},
    requests::{CreateUserRequest, NewUser},
};
use crate::utils::password::hash_password;
use crate::utils::validate::{
    normalize_employee_code, normalize_name, normalize_optional_text, validate_email,
    validate_password,
};

/// 电话号码最大长度
pub(crate) const PHONE_MAX_CHARS: usize = 20;

pub(crate) fn normalize_email(email: &str) -> Result<String> {
    let email = email.trim();
    validate_email(email).map_err(EvalSystemError::validation)?;
    Ok(email.to_string())
}

pub(crate) fn normalize_code(code: Option<&str>) -> Result<Option<String>> {
    match code.map(str::trim).filter(|c| !c.is_empty()) {
        Some(code) => normalize_employee_code(code)
            .map(Some)
            .map_err(EvalSystemError::validation),
        None => Ok(None),
    }
}

pub(crate) fn normalize_phone(phone: Option<&str>) -> Result<Option<String>> {
    normalize_optional_text(phone, PHONE_MAX_CHARS, "Phone").map_err(EvalSystemError::validation)
}

pub async fn create_user(
    service: &UserService,
    actor: &User,
    user_data: CreateUserRequest,
) -> Result<User> {
    authorize(actor, Action::UserCreate, Target::Collection)?;

    let email = normalize_email(&user_data.email)?;
    validate_password(&user_data.password).map_err(EvalSystemError::validation)?;
    let first_name = normalize_name(&user_data.first_name).map_err(EvalSystemError::validation)?;
    let last_name = normalize_name(&user_data.last_name).map_err(EvalSystemError::validation)?;
    let employee_code = normalize_code(user_data.employee_code.as_deref())?;
    let phone = normalize_phone(user_data.phone.as_deref())?;

    let password_hash = hash_password(&user_data.password)?;

    let user = service
        .storage()
        .create_user(NewUser {
            email,
            password_hash,
            first_name,
            last_name,
            employee_code,
            phone,
            role: user_data.role,
            department_id: user_data.department_id,
            status: user_data.status.unwrap_or(UserStatus::Active),
        })
        .await?;

    info!(
        "创建用户: id={}, role={}, by={}",
        user.id, user.role, actor.id
    );
    Ok(user)
}
