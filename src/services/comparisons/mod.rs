//! 自评与协调员评估对比

use std::sync::Arc;

use tracing::info;

use crate::capability::{Action, Target, authorize};
use crate::errors::{EvalSystemError, Result};
use crate::models::{
    assignments::entities::AssignmentType,
    evaluations::{
        entities::{Evaluation, EvaluationComparison},
        requests::CreateComparisonRequest,
    },
    users::entities::User,
};
use crate::scoring::average_difference;
use crate::services::found;
use crate::storage::Storage;

pub struct ComparisonService {
    storage: Arc<dyn Storage>,
}

impl ComparisonService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    async fn load_evaluatee(&self, evaluatee_id: i64) -> Result<User> {
        found(
            self.storage.get_user_by_id(evaluatee_id).await?,
            "User",
            evaluatee_id,
        )
    }

    async fn latest(
        &self,
        evaluatee_id: i64,
        survey_id: i64,
        assignment_type: AssignmentType,
    ) -> Result<Evaluation> {
        self.storage
            .latest_completed_evaluation(evaluatee_id, survey_id, assignment_type)
            .await?
            .ok_or_else(|| {
                EvalSystemError::validation(format!(
                    "No completed {assignment_type} evaluation for user {evaluatee_id} on survey {survey_id}"
                ))
            })
    }

    /// 以最近完成的自评与协调员评估生成对比，同一对评估只保存一次
    pub async fn create_comparison(
        &self,
        actor: &User,
        req: CreateComparisonRequest,
    ) -> Result<EvaluationComparison> {
        let evaluatee = self.load_evaluatee(req.evaluatee_id).await?;
        authorize(actor, Action::ComparisonWrite, Target::User(&evaluatee))?;
        found(
            self.storage.get_survey_by_id(req.survey_id).await?,
            "Survey",
            req.survey_id,
        )?;

        let own = self
            .latest(evaluatee.id, req.survey_id, AssignmentType::SelfEvaluation)
            .await?;
        let coordinator = self
            .latest(evaluatee.id, req.survey_id, AssignmentType::Coordinator)
            .await?;

        let questions = self.storage.list_questions(req.survey_id).await?;
        let own_answers = self.storage.list_answers(own.id).await?;
        let coordinator_answers = self.storage.list_answers(coordinator.id).await?;
        let difference = average_difference(&questions, &own_answers, &coordinator_answers)?;

        let comparison = self
            .storage
            .create_comparison(&own, &coordinator, difference)
            .await?;
        info!(
            "生成评估对比: id={}, evaluatee={}, difference={:.2}",
            comparison.id, evaluatee.id, comparison.average_difference
        );
        Ok(comparison)
    }

    pub async fn get_comparison(&self, actor: &User, comparison_id: i64) -> Result<EvaluationComparison> {
        let comparison = found(
            self.storage.get_comparison_by_id(comparison_id).await?,
            "Comparison",
            comparison_id,
        )?;
        let evaluatee = self.load_evaluatee(comparison.evaluatee_id).await?;
        authorize(actor, Action::ComparisonRead, Target::User(&evaluatee))?;
        Ok(comparison)
    }

    pub async fn list_for_evaluatee(
        &self,
        actor: &User,
        evaluatee_id: i64,
    ) -> Result<Vec<EvaluationComparison>> {
        let evaluatee = self.load_evaluatee(evaluatee_id).await?;
        authorize(actor, Action::ComparisonRead, Target::User(&evaluatee))?;
        self.storage.list_comparisons_for_evaluatee(evaluatee_id).await
    }

    /// pending → reviewed
    pub async fn review_comparison(
        &self,
        actor: &User,
        comparison_id: i64,
    ) -> Result<EvaluationComparison> {
        let comparison = found(
            self.storage.get_comparison_by_id(comparison_id).await?,
            "Comparison",
            comparison_id,
        )?;
        let evaluatee = self.load_evaluatee(comparison.evaluatee_id).await?;
        authorize(actor, Action::ComparisonWrite, Target::User(&evaluatee))?;

        let reviewed = self.storage.mark_comparison_reviewed(comparison_id).await?;
        info!("审阅评估对比: id={}, by={}", reviewed.id, actor.id);
        Ok(reviewed)
    }
}
