pub mod answer;
pub mod get;
pub mod submit;

use std::sync::Arc;

use crate::capability::{Action, Target, authorize};
use crate::errors::Result;
use crate::models::{
    evaluations::{
        entities::Evaluation,
        requests::{SaveAnswersRequest, SubmitEvaluationRequest},
        responses::EvaluationDetail,
    },
    users::entities::User,
};
use crate::services::found;
use crate::storage::Storage;

pub struct EvaluationService {
    storage: Arc<dyn Storage>,
}

impl EvaluationService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub(crate) fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    pub(crate) async fn load_authorized(
        &self,
        actor: &User,
        evaluation_id: i64,
        action: Action,
    ) -> Result<Evaluation> {
        let evaluation = found(
            self.storage.get_evaluation_by_id(evaluation_id).await?,
            "Evaluation",
            evaluation_id,
        )?;
        authorize(actor, action, Target::Evaluation(&evaluation))?;
        Ok(evaluation)
    }

    // 评估详情（含答案）
    pub async fn get_evaluation(&self, actor: &User, evaluation_id: i64) -> Result<EvaluationDetail> {
        get::get_evaluation(self, actor, evaluation_id).await
    }

    // 通过分配获取评估详情
    pub async fn get_for_assignment(
        &self,
        actor: &User,
        assignment_id: i64,
    ) -> Result<EvaluationDetail> {
        get::get_for_assignment(self, actor, assignment_id).await
    }

    // 保存答案
    pub async fn save_answers(
        &self,
        actor: &User,
        evaluation_id: i64,
        req: SaveAnswersRequest,
    ) -> Result<EvaluationDetail> {
        answer::save_answers(self, actor, evaluation_id, req).await
    }

    // 提交评估
    pub async fn submit_evaluation(
        &self,
        actor: &User,
        evaluation_id: i64,
        req: SubmitEvaluationRequest,
    ) -> Result<Evaluation> {
        submit::submit_evaluation(self, actor, evaluation_id, req).await
    }
}
