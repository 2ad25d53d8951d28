//! 问卷分配实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "survey_assignments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub survey_id: i64,
    pub evaluator_id: i64,
    pub evaluatee_id: i64,
    pub assignment_type: String,
    pub status: String,
    pub due_date: Option<i64>,
    pub assigned_by: i64,
    pub assigned_at: i64,
    pub started_at: Option<i64>,
    pub completed_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::surveys::Entity",
        from = "Column::SurveyId",
        to = "super::surveys::Column::Id"
    )]
    Survey,
    #[sea_orm(has_one = "super::evaluations::Entity")]
    Evaluation,
}

impl Related<super::surveys::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Survey.def()
    }
}

impl Related<super::evaluations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Evaluation.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_assignment(self) -> crate::models::assignments::entities::Assignment {
        use crate::models::assignments::entities::{
            Assignment, AssignmentStatus, AssignmentType,
        };

        Assignment {
            id: self.id,
            survey_id: self.survey_id,
            evaluator_id: self.evaluator_id,
            evaluatee_id: self.evaluatee_id,
            assignment_type: self
                .assignment_type
                .parse::<AssignmentType>()
                .unwrap_or(AssignmentType::Coordinator),
            status: self
                .status
                .parse::<AssignmentStatus>()
                .unwrap_or(AssignmentStatus::Cancelled),
            due_date: self.due_date.map(super::to_datetime),
            assigned_by: self.assigned_by,
            assigned_at: super::to_datetime(self.assigned_at),
            started_at: self.started_at.map(super::to_datetime),
            completed_at: self.completed_at.map(super::to_datetime),
        }
    }
}
