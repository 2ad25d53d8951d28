//! 问题实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "questions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub survey_id: i64,
    #[sea_orm(column_type = "Text")]
    pub question_text: String,
    pub question_type: String,
    pub order_number: i32,
    pub is_required: bool,
    pub min_value: Option<i32>,
    pub max_value: Option<i32>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::surveys::Entity",
        from = "Column::SurveyId",
        to = "super::surveys::Column::Id"
    )]
    Survey,
}

impl Related<super::surveys::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Survey.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_question(self) -> crate::models::surveys::entities::Question {
        use crate::models::surveys::entities::{Question, QuestionType};

        Question {
            id: self.id,
            survey_id: self.survey_id,
            question_text: self.question_text,
            question_type: self
                .question_type
                .parse::<QuestionType>()
                .unwrap_or(QuestionType::Text),
            order_number: self.order_number,
            is_required: self.is_required,
            min_value: self.min_value,
            max_value: self.max_value,
            created_at: super::to_datetime(self.created_at),
        }
    }
}
