//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod assignments;
mod comparisons;
mod departments;
mod evaluations;
mod questions;
mod surveys;
mod users;

use crate::config::AppConfig;
use crate::errors::{EvalSystemError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr, SqlErr};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite:") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        Self::migrate(&db).await?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// 单连接内存数据库（测试用）
    #[cfg(test)]
    pub async fn in_memory() -> Result<Self> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| EvalSystemError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .foreign_keys(true);

        // 内存库每个连接互相独立，必须只保留一个连接
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(opt)
            .await
            .map_err(|e| EvalSystemError::database_connection(format!("SQLite 连接失败: {e}")))?;

        let db = SqlxSqliteConnector::from_sqlx_sqlite_pool(pool);
        Self::migrate(&db).await?;
        Ok(Self { db })
    }

    async fn migrate(db: &DatabaseConnection) -> Result<()> {
        Migrator::up(db, None)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("数据库迁移失败: {e}")))
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| EvalSystemError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| EvalSystemError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(2)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false);

        Database::connect(opt)
            .await
            .map_err(|e| EvalSystemError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(EvalSystemError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

/// 写入失败时区分唯一约束冲突与其它数据库错误
pub(crate) fn write_error(err: DbErr, conflict_message: &str, context: &str) -> EvalSystemError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => EvalSystemError::conflict(conflict_message),
        _ => EvalSystemError::database_operation(format!("{context}: {err}")),
    }
}

pub(crate) fn now_ts() -> i64 {
    chrono::Utc::now().timestamp()
}

// Storage trait 实现
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
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 部门模块
    async fn list_departments(&self, active_only: bool) -> Result<Vec<Department>> {
        self.list_departments_impl(active_only).await
    }

    async fn get_department_by_id(&self, id: i64) -> Result<Option<Department>> {
        self.get_department_by_id_impl(id).await
    }

    async fn create_department(&self, name: &str, description: Option<&str>) -> Result<Department> {
        self.create_department_impl(name, description).await
    }

    async fn count_departments(&self) -> Result<u64> {
        self.count_departments_impl().await
    }

    // 用户模块
    async fn create_user(&self, user: NewUser) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_email_impl(email).await
    }

    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse> {
        self.list_users_with_pagination_impl(query).await
    }

    async fn update_user(&self, id: i64, changes: UserChanges) -> Result<Option<User>> {
        self.update_user_impl(id, changes).await
    }

    async fn set_user_status(&self, id: i64, status: UserStatus) -> Result<Option<User>> {
        self.update_user_impl(
            id,
            UserChanges {
                status: Some(status),
                ..Default::default()
            },
        )
        .await
    }

    async fn update_password(&self, id: i64, password_hash: &str) -> Result<bool> {
        self.update_password_impl(id, password_hash).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    async fn count_users(&self) -> Result<u64> {
        self.count_users_impl().await
    }

    // 问卷模块
    async fn create_survey(&self, survey: NewSurvey) -> Result<SurveyDetail> {
        self.create_survey_impl(survey).await
    }

    async fn get_survey_by_id(&self, id: i64) -> Result<Option<Survey>> {
        self.get_survey_by_id_impl(id).await
    }

    async fn list_surveys_with_pagination(
        &self,
        query: SurveyListQuery,
    ) -> Result<SurveyListResponse> {
        self.list_surveys_with_pagination_impl(query).await
    }

    async fn update_survey(&self, id: i64, changes: SurveyChanges) -> Result<Option<Survey>> {
        self.update_survey_impl(id, changes).await
    }

    async fn set_survey_status(&self, id: i64, status: SurveyStatus) -> Result<Option<Survey>> {
        self.set_survey_status_impl(id, status).await
    }

    async fn count_surveys(&self) -> Result<u64> {
        self.count_surveys_impl().await
    }

    // 问题模块
    async fn list_questions(&self, survey_id: i64) -> Result<Vec<Question>> {
        self.list_questions_impl(survey_id).await
    }

    async fn get_question(&self, survey_id: i64, question_id: i64) -> Result<Option<Question>> {
        self.get_question_impl(survey_id, question_id).await
    }

    async fn create_question(&self, survey_id: i64, question: NewQuestion) -> Result<Question> {
        self.create_question_impl(survey_id, question).await
    }

    async fn update_question(
        &self,
        survey_id: i64,
        question_id: i64,
        question: NewQuestion,
    ) -> Result<Option<Question>> {
        self.update_question_impl(survey_id, question_id, question)
            .await
    }

    async fn delete_question(&self, survey_id: i64, question_id: i64) -> Result<bool> {
        self.delete_question_impl(survey_id, question_id).await
    }

    async fn reorder_questions(
        &self,
        survey_id: i64,
        orders: &[QuestionOrder],
    ) -> Result<Vec<Question>> {
        self.reorder_questions_impl(survey_id, orders).await
    }

    // 分配模块
    async fn create_assignment(&self, assignment: NewAssignment) -> Result<Assignment> {
        self.create_assignment_impl(assignment).await
    }

    async fn get_assignment_by_id(&self, id: i64) -> Result<Option<Assignment>> {
        self.get_assignment_by_id_impl(id).await
    }

    async fn list_assignments_with_pagination(
        &self,
        query: AssignmentListQuery,
    ) -> Result<AssignmentListResponse> {
        self.list_assignments_with_pagination_impl(query).await
    }

    async fn start_assignment(&self, id: i64) -> Result<(Assignment, Evaluation)> {
        self.start_assignment_impl(id).await
    }

    async fn cancel_assignment(&self, id: i64, expected: AssignmentStatus) -> Result<Assignment> {
        self.cancel_assignment_impl(id, expected).await
    }

    // 评估模块
    async fn get_evaluation_by_id(&self, id: i64) -> Result<Option<Evaluation>> {
        self.get_evaluation_by_id_impl(id).await
    }

    async fn get_evaluation_by_assignment(
        &self,
        assignment_id: i64,
    ) -> Result<Option<Evaluation>> {
        self.get_evaluation_by_assignment_impl(assignment_id).await
    }

    async fn list_answers(&self, evaluation_id: i64) -> Result<Vec<Answer>> {
        self.list_answers_impl(evaluation_id).await
    }

    async fn save_answers(
        &self,
        evaluation_id: i64,
        answers: &[ValidatedAnswer],
    ) -> Result<Vec<Answer>> {
        self.save_answers_impl(evaluation_id, answers).await
    }

    async fn submit_evaluation(
        &self,
        evaluation_id: i64,
        comments: Option<String>,
    ) -> Result<Evaluation> {
        self.submit_evaluation_impl(evaluation_id, comments).await
    }

    async fn latest_completed_evaluation(
        &self,
        evaluatee_id: i64,
        survey_id: i64,
        assignment_type: AssignmentType,
    ) -> Result<Option<Evaluation>> {
        self.latest_completed_evaluation_impl(evaluatee_id, survey_id, assignment_type)
            .await
    }

    // 对比模块
    async fn create_comparison(
        &self,
        self_evaluation: &Evaluation,
        coordinator_evaluation: &Evaluation,
        average_difference: f64,
    ) -> Result<EvaluationComparison> {
        self.create_comparison_impl(self_evaluation, coordinator_evaluation, average_difference)
            .await
    }

    async fn get_comparison_by_id(&self, id: i64) -> Result<Option<EvaluationComparison>> {
        self.get_comparison_by_id_impl(id).await
    }

    async fn list_comparisons_for_evaluatee(
        &self,
        evaluatee_id: i64,
    ) -> Result<Vec<EvaluationComparison>> {
        self.list_comparisons_for_evaluatee_impl(evaluatee_id).await
    }

    async fn mark_comparison_reviewed(&self, id: i64) -> Result<EvaluationComparison> {
        self.mark_comparison_reviewed_impl(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_database_url() {
        assert_eq!(
            SeaOrmStorage::build_database_url("evalsystem.db").unwrap(),
            "sqlite://evalsystem.db?mode=rwc"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url("postgres://u:p@localhost/eval").unwrap(),
            "postgres://u:p@localhost/eval"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url("redis://localhost")
                .unwrap_err()
                .code(),
            "E006"
        );
    }
}
