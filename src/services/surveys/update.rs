use tracing::info;

use super::SurveyService;
use crate::capability::Action;
use crate::catalog::prepare_survey_update;
use crate::errors::Result;
use crate::models::{
    surveys::{
        entities::{Survey, SurveyStatus},
        requests::UpdateSurveyRequest,
    },
    users::entities::User,
};
use crate::services::found;

pub async fn update_survey(
    service: &SurveyService,
    actor: &User,
    survey_id: i64,
    req: UpdateSurveyRequest,
) -> Result<Survey> {
    service
        .load_authorized(actor, survey_id, Action::SurveyWrite)
        .await?;

    let changes = prepare_survey_update(&req)?;
    found(
        service.storage().update_survey(survey_id, changes).await?,
        "Survey",
        survey_id,
    )
}

/// 软删除：问卷置为 deactivated，已有分配与评估保留
pub async fn delete_survey(service: &SurveyService, actor: &User, survey_id: i64) -> Result<Survey> {
    service
        .load_authorized(actor, survey_id, Action::SurveyDelete)
        .await?;

    let survey = found(
        service
            .storage()
            .set_survey_status(survey_id, SurveyStatus::Deactivated)
            .await?,
        "Survey",
        survey_id,
    )?;
    info!("停用问卷: id={}, by={}", survey.id, actor.id);
    Ok(survey)
}

pub async fn toggle_status(service: &SurveyService, actor: &User, survey_id: i64) -> Result<Survey> {
    let current = service
        .load_authorized(actor, survey_id, Action::SurveyToggleStatus)
        .await?;

    let survey = found(
        service
            .storage()
            .set_survey_status(survey_id, current.status.toggled())
            .await?,
        "Survey",
        survey_id,
    )?;
    info!("切换问卷状态: id={}, status={}", survey.id, survey.status);
    Ok(survey)
}
