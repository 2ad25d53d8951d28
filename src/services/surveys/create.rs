use tracing::info;

use super::SurveyService;
use crate::capability::{Action, Target, authorize};
use crate::catalog::prepare_survey;
use crate::errors::Result;
use crate::models::{
    surveys::{requests::CreateSurveyRequest, responses::SurveyDetail},
    users::entities::User,
};

pub async fn create_survey(
    service: &SurveyService,
    actor: &User,
    req: CreateSurveyRequest,
) -> Result<SurveyDetail> {
    authorize(actor, Action::SurveyCreate, Target::Collection)?;

    let new_survey = prepare_survey(req, Some(actor.id))?;
    let detail = service.storage().create_survey(new_survey).await?;

    info!(
        "创建问卷: id={}, questions={}, by={}",
        detail.survey.id,
        detail.questions.len(),
        actor.id
    );
    Ok(detail)
}
