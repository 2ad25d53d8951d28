use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};

use crate::middlewares::RequireJWT;
use crate::models::ApiResponse;
use crate::models::assignments::requests::{AssignmentListParams, CreateAssignmentRequest};
use crate::services::{AssignmentService, EvaluationService};

pub async fn list_assignments(
    req: HttpRequest,
    service: web::Data<AssignmentService>,
    query: web::Query<AssignmentListParams>,
) -> ActixResult<HttpResponse> {
    let actor = RequireJWT::current_user(&req)?;
    let response = service.list_assignments(&actor, query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Assignments retrieved")))
}

pub async fn create_assignment(
    req: HttpRequest,
    service: web::Data<AssignmentService>,
    assignment_data: web::Json<CreateAssignmentRequest>,
) -> ActixResult<HttpResponse> {
    let actor = RequireJWT::current_user(&req)?;
    let assignment = service
        .create_assignment(&actor, assignment_data.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(
        assignment,
        "Assignment created successfully",
    )))
}

pub async fn get_assignment(
    req: HttpRequest,
    service: web::Data<AssignmentService>,
    assignment_id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let actor = RequireJWT::current_user(&req)?;
    let assignment = service
        .get_assignment(&actor, assignment_id.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(assignment, "Assignment retrieved")))
}

pub async fn start_assignment(
    req: HttpRequest,
    service: web::Data<AssignmentService>,
    assignment_id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let actor = RequireJWT::current_user(&req)?;
    let started = service
        .start_assignment(&actor, assignment_id.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(started, "Evaluation started")))
}

pub async fn cancel_assignment(
    req: HttpRequest,
    service: web::Data<AssignmentService>,
    assignment_id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let actor = RequireJWT::current_user(&req)?;
    let assignment = service
        .cancel_assignment(&actor, assignment_id.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(assignment, "Assignment cancelled")))
}

pub async fn get_assignment_evaluation(
    req: HttpRequest,
    service: web::Data<EvaluationService>,
    assignment_id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let actor = RequireJWT::current_user(&req)?;
    let detail = service
        .get_for_assignment(&actor, assignment_id.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(detail, "Evaluation retrieved")))
}

// 配置路由
pub fn configure_assignment_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/assignments")
            .wrap(RequireJWT)
            .route("", web::get().to(list_assignments))
            .route("", web::post().to(create_assignment))
            .route("/{id}", web::get().to(get_assignment))
            .route("/{id}/start", web::post().to(start_assignment))
            .route("/{id}/cancel", web::post().to(cancel_assignment))
            .route("/{id}/evaluation", web::get().to(get_assignment_evaluation)),
    );
}
