use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::catalog::prepare_survey;
use crate::config::AppConfig;
use crate::errors::Result;
use crate::models::departments::entities::DEFAULT_DEPARTMENTS;
use crate::models::surveys::entities::QuestionType;
use crate::models::surveys::requests::{CreateQuestionRequest, CreateSurveyRequest};
use crate::models::users::entities::{UserRole, UserStatus};
use crate::models::users::requests::NewUser;
use crate::storage::Storage;
use crate::utils::password::{generate_password, hash_password};

const GENERATED_PASSWORD_LEN: usize = 16;

const STANDARD_SURVEY_TITLE: &str = "Standard Teaching Evaluation";

const STANDARD_SURVEY_QUESTIONS: [&str; 10] = [
    "Command of the subject matter",
    "Clarity when explaining concepts",
    "Punctuality and attendance",
    "Lesson preparation",
    "Use of teaching resources",
    "Attention to students",
    "Fair and objective assessment",
    "Encouraging student participation",
    "Ongoing professional development",
    "Teamwork with colleagues",
];

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
}

/// 写入默认部门（仅在部门表为空时）
async fn seed_departments(storage: &dyn Storage) -> Result<()> {
    let count = storage.count_departments().await?;
    if count > 0 {
        debug!("Database already has {} department(s), skipping seed", count);
        return Ok(());
    }
    for (name, description) in DEFAULT_DEPARTMENTS {
        storage.create_department(name, Some(description)).await?;
    }
    info!("Seeded {} default departments", DEFAULT_DEPARTMENTS.len());
    Ok(())
}

/// 初始化默认管理员账号
/// 如果数据库中没有任何用户，则按配置创建管理员
async fn seed_admin(storage: &dyn Storage, config: &AppConfig) -> Result<()> {
    let count = storage.count_users().await?;
    if count > 0 {
        debug!("Database already has {} user(s), skipping admin seed", count);
        return Ok(());
    }

    // 优先使用 ADMIN_PASSWORD，否则生成随机密码并只输出一次
    let seed = &config.seed;
    let password = match seed.admin_password.as_deref().filter(|p| !p.is_empty()) {
        Some(password) => password.to_string(),
        None => {
            let password = generate_password(GENERATED_PASSWORD_LEN);
            warn!("==========================================================");
            warn!("  ADMIN PASSWORD NOT SET - USING GENERATED PASSWORD");
            warn!("  Generated admin password: {}", password);
            warn!("  Please save this password or set ADMIN_PASSWORD env var");
            warn!("==========================================================");
            password
        }
    };

    let admin = storage
        .create_user(NewUser {
            email: seed.admin_email.trim().to_lowercase(),
            password_hash: hash_password(&password)?,
            first_name: seed.admin_first_name.clone(),
            last_name: seed.admin_last_name.clone(),
            employee_code: None,
            phone: None,
            role: UserRole::Admin,
            department_id: None,
            status: UserStatus::Active,
        })
        .await?;
    info!(
        "Default admin account created (ID: {}, email: {})",
        admin.id, admin.email
    );
    Ok(())
}

/// 写入公共的标准评估问卷（仅在问卷表为空时）
async fn seed_standard_survey(storage: &dyn Storage) -> Result<()> {
    if storage.count_surveys().await? > 0 {
        return Ok(());
    }

    let questions = STANDARD_SURVEY_QUESTIONS
        .iter()
        .map(|text| CreateQuestionRequest {
            question_text: text.to_string(),
            question_type: QuestionType::Scale,
            order_number: None,
            is_required: true,
            min_value: None,
            max_value: None,
        })
        .collect();
    let request = CreateSurveyRequest {
        title: STANDARD_SURVEY_TITLE.to_string(),
        description: Some("Comprehensive evaluation of teaching performance".to_string()),
        instructions: Some(
            "Rate each aspect from 1 to 10, where 1 is poor and 10 is excellent".to_string(),
        ),
        status: None,
        questions,
    };

    let detail = storage.create_survey(prepare_survey(request, None)?).await?;
    info!(
        "Seeded public survey '{}' with {} questions",
        detail.survey.title,
        detail.questions.len()
    );
    Ok(())
}

/// 写入全部初始数据
pub async fn seed_initial_data(storage: &dyn Storage, config: &AppConfig) -> Result<()> {
    seed_departments(storage).await?;
    seed_admin(storage, config).await?;
    seed_standard_survey(storage).await?;
    Ok(())
}

/// 准备服务器启动的上下文
/// 包括存储初始化、迁移与初始数据
pub async fn prepare_server_startup() -> Result<StartupContext> {
    let storage = crate::storage::create_storage().await?;
    warn!("Storage backend initialized and migrations completed");

    seed_initial_data(storage.as_ref(), AppConfig::get()).await?;

    Ok(StartupContext { storage })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::SeaOrmStorage;

    #[tokio::test]
    async fn test_seed_is_applied_once() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let mut config = AppConfig::default();
        config.seed.admin_password = Some("initial-secret".to_string());

        seed_initial_data(&storage, &config).await.unwrap();
        seed_initial_data(&storage, &config).await.unwrap();

        assert_eq!(
            storage.count_departments().await.unwrap(),
            DEFAULT_DEPARTMENTS.len() as u64
        );
        assert_eq!(storage.count_users().await.unwrap(), 1);
        assert_eq!(storage.count_surveys().await.unwrap(), 1);

        let admin = storage
            .get_user_by_email("admin@school.local")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(admin.role, UserRole::Admin);
        assert!(crate::utils::password::verify_password(
            "initial-secret",
            &admin.password_hash
        ));
    }

    #[tokio::test]
    async fn test_standard_survey_is_public_with_ten_scale_questions() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        seed_standard_survey(&storage).await.unwrap();

        let page = storage
            .list_surveys_with_pagination(Default::default())
            .await
            .unwrap();
        let survey = &page.items[0];
        assert!(survey.is_public());
        assert!(survey.is_active());

        let questions = storage.list_questions(survey.id).await.unwrap();
        assert_eq!(questions.len(), 10);
        assert!(questions.iter().all(|q| q.question_type == QuestionType::Scale));
        let orders: Vec<i32> = questions.iter().map(|q| q.order_number).collect();
        assert_eq!(orders, (1..=10).collect::<Vec<_>>());
    }
}
