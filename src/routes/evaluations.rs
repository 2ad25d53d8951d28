use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};

use crate::middlewares::RequireJWT;
use crate::models::ApiResponse;
use crate::models::evaluations::requests::{
    CreateComparisonRequest, SaveAnswersRequest, SubmitEvaluationRequest,
};
use crate::services::{ComparisonService, EvaluationService};

pub async fn get_evaluation(
    req: HttpRequest,
    service: web::Data<EvaluationService>,
    evaluation_id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let actor = RequireJWT::current_user(&req)?;
    let detail = service
        .get_evaluation(&actor, evaluation_id.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(detail, "Evaluation retrieved")))
}

pub async fn save_answers(
    req: HttpRequest,
    service: web::Data<EvaluationService>,
    evaluation_id: web::Path<i64>,
    answers: web::Json<SaveAnswersRequest>,
) -> ActixResult<HttpResponse> {
    let actor = RequireJWT::current_user(&req)?;
    let detail = service
        .save_answers(&actor, evaluation_id.into_inner(), answers.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(detail, "Answers saved")))
}

pub async fn submit_evaluation(
    req: HttpRequest,
    service: web::Data<EvaluationService>,
    evaluation_id: web::Path<i64>,
    submit_data: web::Json<SubmitEvaluationRequest>,
) -> ActixResult<HttpResponse> {
    let actor = RequireJWT::current_user(&req)?;
    let evaluation = service
        .submit_evaluation(&actor, evaluation_id.into_inner(), submit_data.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(evaluation, "Evaluation submitted")))
}

pub async fn create_comparison(
    req: HttpRequest,
    service: web::Data<ComparisonService>,
    comparison_data: web::Json<CreateComparisonRequest>,
) -> ActixResult<HttpResponse> {
    let actor = RequireJWT::current_user(&req)?;
    let comparison = service
        .create_comparison(&actor, comparison_data.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(comparison, "Comparison generated")))
}

pub async fn get_comparison(
    req: HttpRequest,
    service: web::Data<ComparisonService>,
    comparison_id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let actor = RequireJWT::current_user(&req)?;
    let comparison = service
        .get_comparison(&actor, comparison_id.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(comparison, "Comparison retrieved")))
}

pub async fn list_user_comparisons(
    req: HttpRequest,
    service: web::Data<ComparisonService>,
    evaluatee_id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let actor = RequireJWT::current_user(&req)?;
    let comparisons = service
        .list_for_evaluatee(&actor, evaluatee_id.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(comparisons, "Comparisons retrieved")))
}

pub async fn review_comparison(
    req: HttpRequest,
    service: web::Data<ComparisonService>,
    comparison_id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let actor = RequireJWT::current_user(&req)?;
    let comparison = service
        .review_comparison(&actor, comparison_id.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(comparison, "Comparison reviewed")))
}

// 配置路由
pub fn configure_evaluation_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/evaluations")
            .wrap(RequireJWT)
            .route("/{id}", web::get().to(get_evaluation))
            .route("/{id}/answers", web::put().to(save_answers))
            .route("/{id}/submit", web::post().to(submit_evaluation)),
    )
    .service(
        web::scope("/api/v1/comparisons")
            .wrap(RequireJWT)
            .route("", web::post().to(create_comparison))
            .route("/user/{user_id}", web::get().to(list_user_comparisons))
            .route("/{id}", web::get().to(get_comparison))
            .route("/{id}/review", web::post().to(review_comparison)),
    );
}
