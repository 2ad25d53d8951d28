use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};

use crate::middlewares::RequireJWT;
use crate::models::ApiResponse;
use crate::models::auth::requests::LoginRequest;
use crate::models::users::requests::ChangePasswordRequest;
use crate::services::AuthService;

pub async fn login(
    service: web::Data<AuthService>,
    login_data: web::Json<LoginRequest>,
) -> ActixResult<HttpResponse> {
    let response = service.login(login_data.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Login successful")))
}

pub async fn verify_token(
    req: HttpRequest,
    service: web::Data<AuthService>,
) -> ActixResult<HttpResponse> {
    let actor = RequireJWT::current_user(&req)?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        service.verify_token(&actor),
        "Token is valid",
    )))
}

pub async fn me(req: HttpRequest, service: web::Data<AuthService>) -> ActixResult<HttpResponse> {
    let actor = RequireJWT::current_user(&req)?;
    let detail = service.me(&actor).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(detail, "User profile retrieved")))
}

// 令牌无状态，注销只需客户端丢弃令牌
pub async fn logout(req: HttpRequest) -> ActixResult<HttpResponse> {
    RequireJWT::current_user(&req)?;
    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Logged out")))
}

pub async fn change_password(
    req: HttpRequest,
    service: web::Data<AuthService>,
    password_data: web::Json<ChangePasswordRequest>,
) -> ActixResult<HttpResponse> {
    let actor = RequireJWT::current_user(&req)?;
    service
        .change_password(&actor, password_data.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Password changed successfully")))
}

// 配置路由
pub fn configure_auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/auth")
            .route("/login", web::post().to(login))
            .service(
                web::scope("")
                    .wrap(RequireJWT)
                    .route("/verify-token", web::get().to(verify_token))
                    .route("/me", web::get().to(me))
                    .route("/logout", web::post().to(logout))
                    .route("/change-password", web::post().to(change_password)),
            ),
    );
}
