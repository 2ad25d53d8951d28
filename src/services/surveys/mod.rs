pub mod create;
pub mod get;
pub mod list;
pub mod questions;
pub mod update;

use std::sync::Arc;

use crate::capability::{Action, Target, authorize};
use crate::errors::Result;
use crate::models::{
    surveys::{
        entities::{Question, Survey},
        requests::{
            CreateQuestionRequest, CreateSurveyRequest, QuestionOrder, SurveyListParams,
            UpdateQuestionRequest, UpdateSurveyRequest,
        },
        responses::{SurveyDetail, SurveyListResponse},
    },
    users::entities::User,
};
use crate::services::found;
use crate::storage::Storage;

pub struct SurveyService {
    storage: Arc<dyn Storage>,
}

impl SurveyService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub(crate) fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    /// 加载问卷并校验操作权限
    pub(crate) async fn load_authorized(
        &self,
        actor: &User,
        survey_id: i64,
        action: Action,
    ) -> Result<Survey> {
        let survey = found(
            self.storage.get_survey_by_id(survey_id).await?,
            "Survey",
            survey_id,
        )?;
        authorize(actor, action, Target::Survey(&survey))?;
        Ok(survey)
    }

    // 获取问卷列表
    pub async fn list_surveys(
        &self,
        actor: &User,
        query: SurveyListParams,
    ) -> Result<SurveyListResponse> {
        list::list_surveys(self, actor, query).await
    }

    // 获取问卷详情（含问题）
    pub async fn get_survey(&self, actor: &User, survey_id: i64) -> Result<SurveyDetail> {
        get::get_survey(self, actor, survey_id).await
    }

    // 创建问卷
    pub async fn create_survey(&self, actor: &User, req: CreateSurveyRequest) -> Result<SurveyDetail> {
        create::create_survey(self, actor, req).await
    }

    // 更新问卷
    pub async fn update_survey(
        &self,
        actor: &User,
        survey_id: i64,
        req: UpdateSurveyRequest,
    ) -> Result<Survey> {
        update::update_survey(self, actor, survey_id, req).await
    }

    // 删除问卷（软删除）
    pub async fn delete_survey(&self, actor: &User, survey_id: i64) -> Result<Survey> {
        update::delete_survey(self, actor, survey_id).await
    }

    // 切换问卷状态
    pub async fn toggle_status(&self, actor: &User, survey_id: i64) -> Result<Survey> {
        update::toggle_status(self, actor, survey_id).await
    }

    // 问题列表
    pub async fn list_questions(&self, actor: &User, survey_id: i64) -> Result<Vec<Question>> {
        questions::list_questions(self, actor, survey_id).await
    }

    // 添加问题
    pub async fn create_question(
        &self,
        actor: &User,
        survey_id: i64,
        req: CreateQuestionRequest,
    ) -> Result<Question> {
        questions::create_question(self, actor, survey_id, req).await
    }

    // 更新问题
    pub async fn update_question(
        &self,
        actor: &User,
        survey_id: i64,
        question_id: i64,
        req: UpdateQuestionRequest,
    ) -> Result<Question> {
        questions::update_question(self, actor, survey_id, question_id, req).await
    }

    // 删除问题
    pub async fn delete_question(&self, actor: &User, survey_id: i64, question_id: i64) -> Result<()> {
        questions::delete_question(self, actor, survey_id, question_id).await
    }

    // 调整问题顺序
    pub async fn reorder_questions(
        &self,
        actor: &User,
        survey_id: i64,
        orders: Vec<QuestionOrder>,
    ) -> Result<Vec<Question>> {
        questions::reorder_questions(self, actor, survey_id, orders).await
    }
}
