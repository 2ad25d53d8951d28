//! 评估对比实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "evaluation_comparisons")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub evaluatee_id: i64,
    pub survey_id: i64,
    pub self_evaluation_id: i64,
    pub coordinator_evaluation_id: i64,
    #[sea_orm(column_type = "Double")]
    pub average_difference: f64,
    pub status: String,
    pub comparison_date: i64,
    pub reviewed_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_comparison(self) -> crate::models::evaluations::entities::EvaluationComparison {
        use crate::models::evaluations::entities::{ComparisonStatus, EvaluationComparison};

        EvaluationComparison {
            id: self.id,
            evaluatee_id: self.evaluatee_id,
            survey_id: self.survey_id,
            self_evaluation_id: self.self_evaluation_id,
            coordinator_evaluation_id: self.coordinator_evaluation_id,
            average_difference: self.average_difference,
            status: self
                .status
                .parse::<ComparisonStatus>()
                .unwrap_or(ComparisonStatus::Pending),
            comparison_date: super::to_datetime(self.comparison_date),
            reviewed_at: self.reviewed_at.map(super::to_datetime),
        }
    }
}
