use super::SurveyService;
use crate::capability::Action;
use crate::errors::Result;
use crate::models::{surveys::responses::SurveyDetail, users::entities::User};

pub async fn get_survey(service: &SurveyService, actor: &User, survey_id: i64) -> Result<SurveyDetail> {
    let survey = service
        .load_authorized(actor, survey_id, Action::SurveyRead)
        .await?;
    let questions = service.storage().list_questions(survey.id).await?;
    Ok(SurveyDetail { survey, questions })
}
