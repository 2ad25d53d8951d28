use std::sync::Arc;

use crate::catalog::SurveyChanges;
use crate::models::{
    assignments::{
        entities::{Assignment, AssignmentStatus, AssignmentType},
        requests::{AssignmentListQuery, NewAssignment},
        responses::AssignmentListResponse,
    },
    departments::entities::Department,
    evaluations::entities::{Answer, Evaluation, EvaluationComparison},
    surveys::{
        entities::{Question, Survey, SurveyStatus},
        requests::{NewQuestion, NewSurvey, QuestionOrder, SurveyListQuery},
        responses::{SurveyDetail, SurveyListResponse},
    },
    users::{
        entities::{User, UserStatus},
        requests::{NewUser, UserChanges, UserListQuery},
        responses::UserListResponse,
    },
};
use crate::scoring::ValidatedAnswer;

use crate::errors::Result;

pub mod sea_orm_storage;

/// 持久化接口
///
/// 所有“先读后写”的方法（唯一性检查、顺序号分配、状态迁移）都在单个事务内完成，
/// 违反约束时返回 `Conflict`。
#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 部门管理方法
    // 列出部门
    async fn list_departments(&self, active_only: bool) -> Result<Vec<Department>>;
    // 通过ID获取部门
    async fn get_department_by_id(&self, id: i64) -> Result<Option<Department>>;
    // 创建部门
    async fn create_department(&self, name: &str, description: Option<&str>) -> Result<Department>;
    // 统计部门数量
    async fn count_departments(&self) -> Result<u64>;

    /// 用户管理方法
    // 创建用户（邮箱、工号唯一）
    async fn create_user(&self, user: NewUser) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过邮箱获取用户信息
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    // 列出用户
    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse>;
    // 更新用户信息（不允许使系统失去最后一个活跃管理员）
    async fn update_user(&self, id: i64, changes: UserChanges) -> Result<Option<User>>;
    // 设置用户状态
    async fn set_user_status(&self, id: i64, status: UserStatus) -> Result<Option<User>>;
    // 更新密码哈希
    async fn update_password(&self, id: i64, password_hash: &str) -> Result<bool>;
    // 更新用户最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    // 统计用户数量
    async fn count_users(&self) -> Result<u64>;

    /// 问卷管理方法
    // 创建问卷及内联问题（同一创建者下标题唯一）
    async fn create_survey(&self, survey: NewSurvey) -> Result<SurveyDetail>;
    // 通过ID获取问卷
    async fn get_survey_by_id(&self, id: i64) -> Result<Option<Survey>>;
    // 列出问卷
    async fn list_surveys_with_pagination(
        &self,
        query: SurveyListQuery,
    ) -> Result<SurveyListResponse>;
    // 更新问卷
    async fn update_survey(&self, id: i64, changes: SurveyChanges) -> Result<Option<Survey>>;
    // 设置问卷状态
    async fn set_survey_status(&self, id: i64, status: SurveyStatus) -> Result<Option<Survey>>;
    // 统计问卷数量
    async fn count_surveys(&self) -> Result<u64>;

    /// 问题管理方法
    // 按顺序列出问卷的问题
    async fn list_questions(&self, survey_id: i64) -> Result<Vec<Question>>;
    // 获取问卷内的问题
    async fn get_question(&self, survey_id: i64, question_id: i64) -> Result<Option<Question>>;
    // 创建问题（未指定顺序时追加到末尾）
    async fn create_question(&self, survey_id: i64, question: NewQuestion) -> Result<Question>;
    // 更新问题
    async fn update_question(
        &self,
        survey_id: i64,
        question_id: i64,
        question: NewQuestion,
    ) -> Result<Option<Question>>;
    // 删除问题（问卷已有开始的分配时拒绝）
    async fn delete_question(&self, survey_id: i64, question_id: i64) -> Result<bool>;
    // 批量重排问题
    async fn reorder_questions(
        &self,
        survey_id: i64,
        orders: &[QuestionOrder],
    ) -> Result<Vec<Question>>;

    /// 分配管理方法
    // 创建分配
    async fn create_assignment(&self, assignment: NewAssignment) -> Result<Assignment>;
    // 通过ID获取分配
    async fn get_assignment_by_id(&self, id: i64) -> Result<Option<Assignment>>;
    // 列出分配
    async fn list_assignments_with_pagination(
        &self,
        query: AssignmentListQuery,
    ) -> Result<AssignmentListResponse>;
    // 开始分配并创建评估记录
    async fn start_assignment(&self, id: i64) -> Result<(Assignment, Evaluation)>;
    // 取消分配（仅当状态仍为 expected 时）
    async fn cancel_assignment(&self, id: i64, expected: AssignmentStatus) -> Result<Assignment>;

    /// 评估管理方法
    // 通过ID获取评估
    async fn get_evaluation_by_id(&self, id: i64) -> Result<Option<Evaluation>>;
    // 通过分配ID获取评估
    async fn get_evaluation_by_assignment(&self, assignment_id: i64)
    -> Result<Option<Evaluation>>;
    // 列出评估的答案
    async fn list_answers(&self, evaluation_id: i64) -> Result<Vec<Answer>>;
    // 写入答案（按问题覆盖）
    async fn save_answers(
        &self,
        evaluation_id: i64,
        answers: &[ValidatedAnswer],
    ) -> Result<Vec<Answer>>;
    // 提交评估：检查必答题、计算总分并完成分配
    async fn submit_evaluation(
        &self,
        evaluation_id: i64,
        comments: Option<String>,
    ) -> Result<Evaluation>;
    // 最近一次完成的指定类型评估
    async fn latest_completed_evaluation(
        &self,
        evaluatee_id: i64,
        survey_id: i64,
        assignment_type: AssignmentType,
    ) -> Result<Option<Evaluation>>;

    /// 评估对比方法
    // 创建对比（同一对评估只保存一次）
    async fn create_comparison(
        &self,
        self_evaluation: &Evaluation,
        coordinator_evaluation: &Evaluation,
        average_difference: f64,
    ) -> Result<EvaluationComparison>;
    // 通过ID获取对比
    async fn get_comparison_by_id(&self, id: i64) -> Result<Option<EvaluationComparison>>;
    // 列出被评估者的对比
    async fn list_comparisons_for_evaluatee(
        &self,
        evaluatee_id: i64,
    ) -> Result<Vec<EvaluationComparison>>;
    // 标记对比为已审阅
    async fn mark_comparison_reviewed(&self, id: i64) -> Result<EvaluationComparison>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
