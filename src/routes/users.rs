use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};

use crate::middlewares::RequireJWT;
use crate::models::ApiResponse;
use crate::models::departments::responses::DepartmentListResponse;
use crate::models::users::requests::{CreateUserRequest, UpdateUserRequest, UserListParams};
use crate::services::UserService;

// HTTP处理程序
pub async fn list_users(
    req: HttpRequest,
    service: web::Data<UserService>,
    query: web::Query<UserListParams>,
) -> ActixResult<HttpResponse> {
    let actor = RequireJWT::current_user(&req)?;
    let response = service.list_users(&actor, query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Users retrieved")))
}

pub async fn create_user(
    req: HttpRequest,
    service: web::Data<UserService>,
    user_data: web::Json<CreateUserRequest>,
) -> ActixResult<HttpResponse> {
    let actor = RequireJWT::current_user(&req)?;
    let user = service.create_user(&actor, user_data.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(user, "User created successfully")))
}

pub async fn get_user(
    req: HttpRequest,
    service: web::Data<UserService>,
    user_id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let actor = RequireJWT::current_user(&req)?;
    let detail = service.get_user(&actor, user_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(detail, "User retrieved")))
}

pub async fn update_user(
    req: HttpRequest,
    service: web::Data<UserService>,
    user_id: web::Path<i64>,
    update_data: web::Json<UpdateUserRequest>,
) -> ActixResult<HttpResponse> {
    let actor = RequireJWT::current_user(&req)?;
    let user = service
        .update_user(&actor, user_id.into_inner(), update_data.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(user, "User updated successfully")))
}

pub async fn delete_user(
    req: HttpRequest,
    service: web::Data<UserService>,
    user_id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let actor = RequireJWT::current_user(&req)?;
    let user = service.delete_user(&actor, user_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(user, "User deactivated successfully")))
}

pub async fn toggle_status(
    req: HttpRequest,
    service: web::Data<UserService>,
    user_id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let actor = RequireJWT::current_user(&req)?;
    let user = service.toggle_status(&actor, user_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(user, "User status updated")))
}

pub async fn list_departments(
    req: HttpRequest,
    service: web::Data<UserService>,
) -> ActixResult<HttpResponse> {
    let actor = RequireJWT::current_user(&req)?;
    let items = service.list_departments(&actor).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        DepartmentListResponse { items },
        "Departments retrieved",
    )))
}

pub async fn list_roles(
    req: HttpRequest,
    service: web::Data<UserService>,
) -> ActixResult<HttpResponse> {
    let actor = RequireJWT::current_user(&req)?;
    let roles = service.list_roles(&actor)?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(roles, "Roles retrieved")))
}

// 配置路由（固定路径需注册在 /{id} 之前）
pub fn configure_user_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/users")
            .wrap(RequireJWT)
            .route("", web::get().to(list_users))
            .route("", web::post().to(create_user))
            .route("/departments", web::get().to(list_departments))
            .route("/roles", web::get().to(list_roles))
            .route("/{id}", web::get().to(get_user))
            .route("/{id}", web::put().to(update_user))
            .route("/{id}", web::delete().to(delete_user))
            .route("/{id}/toggle-status", web::post().to(toggle_status)),
    );
}
