use tracing::{debug, info};

use super::AuthService;
use crate::errors::{EvalSystemError, Result};
use crate::models::auth::{
    requests::LoginRequest,
    responses::{BasicUserInfo, LoginResponse},
};
use crate::utils::jwt::JwtUtils;
use crate::utils::password::verify_password;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

pub async fn handle_login(service: &AuthService, login_request: LoginRequest) -> Result<LoginResponse> {
    let storage = service.storage();
    let email = login_request.email.trim();

    // 1. 仅活跃用户可以登录
    let user = match storage.get_user_by_email(email).await? {
        Some(user) if user.is_active() => user,
        Some(_) => {
            debug!("停用账号尝试登录: {}", email);
            return Err(EvalSystemError::unauthenticated(INVALID_CREDENTIALS));
        }
        None => return Err(EvalSystemError::unauthenticated(INVALID_CREDENTIALS)),
    };

    // 2. 验证密码
    if !verify_password(&login_request.password, &user.password_hash) {
        debug!("密码错误: user_id={}", user.id);
        return Err(EvalSystemError::unauthenticated(INVALID_CREDENTIALS));
    }

    // 3. 更新最后登录时间
    storage.update_last_login(user.id).await?;

    // 4. 生成访问令牌
    let access_token = JwtUtils::generate_access_token(user.id, &user.role.to_string())?;
    info!("User {} logged in successfully", user.email);

    let department = service.department_name(&user).await?;
    Ok(LoginResponse {
        access_token,
        token_type: "bearer".to_string(),
        expires_in: JwtUtils::access_token_ttl_seconds(),
        user: BasicUserInfo {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            role: user.role,
            department,
        },
    })
}
