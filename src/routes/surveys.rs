use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};

use crate::middlewares::RequireJWT;
use crate::models::ApiResponse;
use crate::models::surveys::requests::{
    CreateQuestionRequest, CreateSurveyRequest, QuestionOrder, SurveyListParams,
    UpdateQuestionRequest, UpdateSurveyRequest,
};
use crate::models::surveys::responses::QuestionListResponse;
use crate::services::SurveyService;

pub async fn list_surveys(
    req: HttpRequest,
    service: web::Data<SurveyService>,
    query: web::Query<SurveyListParams>,
) -> ActixResult<HttpResponse> {
    let actor = RequireJWT::current_user(&req)?;
    let response = service.list_surveys(&actor, query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Surveys retrieved")))
}

pub async fn create_survey(
    req: HttpRequest,
    service: web::Data<SurveyService>,
    survey_data: web::Json<CreateSurveyRequest>,
) -> ActixResult<HttpResponse> {
    let actor = RequireJWT::current_user(&req)?;
    let detail = service.create_survey(&actor, survey_data.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(detail, "Survey created successfully")))
}

pub async fn get_survey(
    req: HttpRequest,
    service: web::Data<SurveyService>,
    survey_id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let actor = RequireJWT::current_user(&req)?;
    let detail = service.get_survey(&actor, survey_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(detail, "Survey retrieved")))
}

pub async fn update_survey(
    req: HttpRequest,
    service: web::Data<SurveyService>,
    survey_id: web::Path<i64>,
    update_data: web::Json<UpdateSurveyRequest>,
) -> ActixResult<HttpResponse> {
    let actor = RequireJWT::current_user(&req)?;
    let survey = service
        .update_survey(&actor, survey_id.into_inner(), update_data.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(survey, "Survey updated successfully")))
}

pub async fn delete_survey(
    req: HttpRequest,
    service: web::Data<SurveyService>,
    survey_id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let actor = RequireJWT::current_user(&req)?;
    let survey = service.delete_survey(&actor, survey_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(survey, "Survey deactivated successfully")))
}

pub async fn toggle_status(
    req: HttpRequest,
    service: web::Data<SurveyService>,
    survey_id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let actor = RequireJWT::current_user(&req)?;
    let survey = service.toggle_status(&actor, survey_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(survey, "Survey status updated")))
}

pub async fn list_questions(
    req: HttpRequest,
    service: web::Data<SurveyService>,
    survey_id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let actor = RequireJWT::current_user(&req)?;
    let items = service.list_questions(&actor, survey_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        QuestionListResponse { items },
        "Questions retrieved",
    )))
}

pub async fn create_question(
    req: HttpRequest,
    service: web::Data<SurveyService>,
    survey_id: web::Path<i64>,
    question_data: web::Json<CreateQuestionRequest>,
) -> ActixResult<HttpResponse> {
    let actor = RequireJWT::current_user(&req)?;
    let question = service
        .create_question(&actor, survey_id.into_inner(), question_data.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(question, "Question created successfully")))
}

pub async fn update_question(
    req: HttpRequest,
    service: web::Data<SurveyService>,
    path: web::Path<(i64, i64)>,
    update_data: web::Json<UpdateQuestionRequest>,
) -> ActixResult<HttpResponse> {
    let actor = RequireJWT::current_user(&req)?;
    let (survey_id, question_id) = path.into_inner();
    let question = service
        .update_question(&actor, survey_id, question_id, update_data.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(question, "Question updated successfully")))
}

pub async fn delete_question(
    req: HttpRequest,
    service: web::Data<SurveyService>,
    path: web::Path<(i64, i64)>,
) -> ActixResult<HttpResponse> {
    let actor = RequireJWT::current_user(&req)?;
    let (survey_id, question_id) = path.into_inner();
    service
        .delete_question(&actor, survey_id, question_id)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Question deleted successfully")))
}

pub async fn reorder_questions(
    req: HttpRequest,
    service: web::Data<SurveyService>,
    survey_id: web::Path<i64>,
    orders: web::Json<Vec<QuestionOrder>>,
) -> ActixResult<HttpResponse> {
    let actor = RequireJWT::current_user(&req)?;
    let items = service
        .reorder_questions(&actor, survey_id.into_inner(), orders.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        QuestionListResponse { items },
        "Questions reordered",
    )))
}

// 配置路由（/questions/reorder 需注册在 /questions/{question_id} 之前）
pub fn configure_survey_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/surveys")
            .wrap(RequireJWT)
            .route("", web::get().to(list_surveys))
            .route("", web::post().to(create_survey))
            .route("/{id}", web::get().to(get_survey))
            .route("/{id}", web::put().to(update_survey))
            .route("/{id}", web::delete().to(delete_survey))
            .route("/{id}/toggle-status", web::post().to(toggle_status))
            .route("/{id}/questions", web::get().to(list_questions))
            .route("/{id}/questions", web::post().to(create_question))
            .route("/{id}/questions/reorder", web::put().to(reorder_questions))
            .route(
                "/{id}/questions/{question_id}",
                web::put().to(update_question),
            )
            .route(
                "/{id}/questions/{question_id}",
                web::delete().to(delete_question),
            ),
    );
}
