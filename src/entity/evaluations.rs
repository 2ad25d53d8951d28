//! 评估实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "evaluations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub assignment_id: i64,
    pub evaluator_id: i64,
    pub evaluatee_id: i64,
    pub survey_id: i64,
    pub assignment_type: String,
    pub status: String,
    pub started_at: i64,
    pub completed_at: Option<i64>,
    #[sea_orm(column_type = "Double", nullable)]
    pub total_score: Option<f64>,
    #[sea_orm(column_type = "Text", nullable)]
    pub comments: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::survey_assignments::Entity",
        from = "Column::AssignmentId",
        to = "super::survey_assignments::Column::Id"
    )]
    Assignment,
    #[sea_orm(has_many = "super::answers::Entity")]
    Answers,
}

impl Related<super::survey_assignments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignment.def()
    }
}

impl Related<super::answers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Answers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_evaluation(self) -> crate::models::evaluations::entities::Evaluation {
        use crate::models::assignments::entities::AssignmentType;
        use crate::models::evaluations::entities::{Evaluation, EvaluationStatus};

        Evaluation {
            id: self.id,
            assignment_id: self.assignment_id,
            evaluator_id: self.evaluator_id,
            evaluatee_id: self.evaluatee_id,
            survey_id: self.survey_id,
            assignment_type: self
                .assignment_type
                .parse::<AssignmentType>()
                .unwrap_or(AssignmentType::Coordinator),
            status: self
                .status
                .parse::<EvaluationStatus>()
                .unwrap_or(EvaluationStatus::Cancelled),
            started_at: super::to_datetime(self.started_at),
            completed_at: self.completed_at.map(super::to_datetime),
            total_score: self.total_score,
            comments: self.comments,
        }
    }
}
