use super::SurveyService;
use crate::capability::Action;
use crate::catalog::{merge_question_update, prepare_question};
use crate::errors::Result;
use crate::models::{
    surveys::{
        entities::Question,
        requests::{CreateQuestionRequest, QuestionOrder, UpdateQuestionRequest},
    },
    users::entities::User,
};
use crate::services::found;

// 问题的所有操作都继承所属问卷的写权限

pub async fn list_questions(
    service: &SurveyService,
    actor: &User,
    survey_id: i64,
) -> Result<Vec<Question>> {
    service
        .load_authorized(actor, survey_id, Action::QuestionWrite)
        .await?;
    service.storage().list_questions(survey_id).await
}

pub async fn create_question(
    service: &SurveyService,
    actor: &User,
    survey_id: i64,
    req: CreateQuestionRequest,
) -> Result<Question> {
    service
        .load_authorized(actor, survey_id, Action::QuestionWrite)
        .await?;
    let question = prepare_question(req)?;
    service.storage().create_question(survey_id, question).await
}

pub async fn update_question(
    service: &SurveyService,
    actor: &User,
    survey_id: i64,
    question_id: i64,
    req: UpdateQuestionRequest,
) -> Result<Question> {
    service
        .load_authorized(actor, survey_id, Action::QuestionWrite)
        .await?;
    let storage = service.storage();

    let existing = found(
        storage.get_question(survey_id, question_id).await?,
        "Question",
        question_id,
    )?;
    let merged = merge_question_update(&existing, &req)?;

    found(
        storage
            .update_question(survey_id, question_id, merged)
            .await?,
        "Question",
        question_id,
    )
}

pub async fn delete_question(
    service: &SurveyService,
    actor: &User,
    survey_id: i64,
    question_id: i64,
) -> Result<()> {
    service
        .load_authorized(actor, survey_id, Action::QuestionWrite)
        .await?;

    let deleted = service
        .storage()
        .delete_question(survey_id, question_id)
        .await?;
    found(deleted.then_some(()), "Question", question_id)
}

/// 批量调整顺序，未知的问题ID被忽略
pub async fn reorder_questions(
    service: &SurveyService,
    actor: &User,
    survey_id: i64,
    orders: Vec<QuestionOrder>,
) -> Result<Vec<Question>> {
    service
        .load_authorized(actor, survey_id, Action::QuestionWrite)
        .await?;
    service.storage().reorder_questions(survey_id, &orders).await
}
