//! 预导入模块，方便使用

pub use super::answers::{ActiveModel as AnswerActiveModel, Entity as Answers, Model as AnswerModel};
pub use super::departments::{
    ActiveModel as DepartmentActiveModel, Entity as Departments, Model as DepartmentModel,
};
pub use super::evaluation_comparisons::{
    ActiveModel as ComparisonActiveModel, Entity as EvaluationComparisons,
    Model as ComparisonModel,
};
pub use super::evaluations::{
    ActiveModel as EvaluationActiveModel, Entity as Evaluations, Model as EvaluationModel,
};
pub use super::questions::{
    ActiveModel as QuestionActiveModel, Entity as Questions, Model as QuestionModel,
};
pub use super::survey_assignments::{
    ActiveModel as AssignmentActiveModel, Entity as SurveyAssignments, Model as AssignmentModel,
};
pub use super::surveys::{ActiveModel as SurveyActiveModel, Entity as Surveys, Model as SurveyModel};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
