//! 端到端业务场景（内存 SQLite）

use std::sync::Arc;

use super::*;
use crate::models::{
    PaginationQuery,
    assignments::{
        entities::{AssignmentStatus, AssignmentType},
        requests::{AssignmentListParams, CreateAssignmentRequest},
    },
    auth::requests::LoginRequest,
    evaluations::{
        entities::{ComparisonStatus, EvaluationStatus},
        requests::{AnswerInput, CreateComparisonRequest, SaveAnswersRequest, SubmitEvaluationRequest},
    },
    surveys::{
        entities::QuestionType,
        requests::{
            CreateQuestionRequest, CreateSurveyRequest, QuestionOrder, SurveyListParams,
            UpdateQuestionRequest, UpdateSurveyRequest,
        },
    },
    users::{
        entities::{User, UserRole, UserStatus},
        requests::{NewUser, UpdateUserRequest, UserListParams},
    },
};
use crate::storage::{Storage, sea_orm_storage::SeaOrmStorage};
use crate::utils::password::hash_password;

const PASSWORD: &str = "secret1";

struct World {
    storage: Arc<dyn Storage>,
    admin: User,
    coordinator: User,
    teacher: User,
    math: i64,
}

impl World {
    async fn new() -> Self {
        let storage: Arc<dyn Storage> = Arc::new(SeaOrmStorage::in_memory().await.unwrap());
        let math = storage
            .create_department("Mathematics", Some("Algebra and geometry"))
            .await
            .unwrap()
            .id;

        let admin = add_user(&storage, "admin@school.local", UserRole::Admin, None).await;
        let coordinator =
            add_user(&storage, "coord@school.local", UserRole::Coordinator, Some(math)).await;
        let teacher = add_user(&storage, "teacher@school.local", UserRole::Teacher, Some(math)).await;

        Self {
            storage,
            admin,
            coordinator,
            teacher,
            math,
        }
    }

    fn users(&self) -> UserService {
        UserService::new(self.storage.clone())
    }

    fn surveys(&self) -> SurveyService {
        SurveyService::new(self.storage.clone())
    }

    fn assignments(&self) -> AssignmentService {
        AssignmentService::new(self.storage.clone())
    }

    fn evaluations(&self) -> EvaluationService {
        EvaluationService::new(self.storage.clone())
    }

    fn comparisons(&self) -> ComparisonService {
        ComparisonService::new(self.storage.clone())
    }
}

async fn add_user(
    storage: &Arc<dyn Storage>,
    email: &str,
    role: UserRole,
    department_id: Option<i64>,
) -> User {
    storage
        .create_user(NewUser {
            email: email.to_string(),
            password_hash: hash_password(PASSWORD).unwrap(),
            first_name: "Test".to_string(),
            last_name: role.to_string(),
            employee_code: None,
            phone: None,
            role,
            department_id,
            status: UserStatus::Active,
        })
        .await
        .unwrap()
}

fn scale(text: &str) -> CreateQuestionRequest {
    CreateQuestionRequest {
        question_text: text.to_string(),
        question_type: QuestionType::Scale,
        order_number: None,
        is_required: true,
        min_value: None,
        max_value: None,
    }
}

fn survey_request(title: &str, questions: Vec<CreateQuestionRequest>) -> CreateSurveyRequest {
    CreateSurveyRequest {
        title: title.to_string(),
        description: None,
        instructions: None,
        status: None,
        questions,
    }
}

fn numeric(question_id: i64, value: i32) -> AnswerInput {
    AnswerInput {
        question_id,
        answer_value: Some(value),
        answer_text: None,
    }
}

fn page() -> PaginationQuery {
    PaginationQuery { page: 1, size: 20 }
}

/// 创建分配、开始并完成评估，返回评估ID
async fn complete_evaluation(
    world: &World,
    evaluator: &User,
    evaluatee: &User,
    assignment_type: AssignmentType,
    survey_id: i64,
    values: &[(i64, i32)],
) -> i64 {
    let assignment = world
        .assignments()
        .create_assignment(
            &world.admin,
            CreateAssignmentRequest {
                survey_id,
                evaluator_id: evaluator.id,
                evaluatee_id: evaluatee.id,
                assignment_type,
                due_date: None,
            },
        )
        .await
        .unwrap();
    let started = world
        .assignments()
        .start_assignment(evaluator, assignment.id)
        .await
        .unwrap();
    let answers = values.iter().map(|(q, v)| numeric(*q, *v)).collect();
    world
        .evaluations()
        .save_answers(evaluator, started.evaluation.id, SaveAnswersRequest { answers })
        .await
        .unwrap();
    world
        .evaluations()
        .submit_evaluation(evaluator, started.evaluation.id, SubmitEvaluationRequest::default())
        .await
        .unwrap();
    started.evaluation.id
}

#[tokio::test]
async fn test_evaluation_flow_from_assignment_to_score() {
    let world = World::new().await;

    // 管理员创建问卷
    let mut comment = scale("Additional comments");
    comment.question_type = QuestionType::Text;
    comment.is_required = false;
    let detail = world
        .surveys()
        .create_survey(
            &world.admin,
            survey_request(
                "Eval 2025",
                vec![scale("Lesson planning quality"), scale("Classroom management"), comment],
            ),
        )
        .await
        .unwrap();
    let orders: Vec<i32> = detail.questions.iter().map(|q| q.order_number).collect();
    assert_eq!(orders, vec![1, 2, 3]);

    // 协调员分配给本部门教师
    let assignment = world
        .assignments()
        .create_assignment(
            &world.coordinator,
            CreateAssignmentRequest {
                survey_id: detail.survey.id,
                evaluator_id: world.coordinator.id,
                evaluatee_id: world.teacher.id,
                assignment_type: AssignmentType::Coordinator,
                due_date: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(assignment.status, AssignmentStatus::Pending);

    // 只有评估者本人可以开始
    let err = world
        .assignments()
        .start_assignment(&world.teacher, assignment.id)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E002");

    let started = world
        .assignments()
        .start_assignment(&world.coordinator, assignment.id)
        .await
        .unwrap();
    assert_eq!(started.assignment.status, AssignmentStatus::InProgress);
    assert!(started.assignment.started_at.is_some());
    assert_eq!(started.evaluation.status, EvaluationStatus::InProgress);

    let q1 = detail.questions[0].id;
    let q2 = detail.questions[1].id;

    // 必答题未答完时不能提交
    world
        .evaluations()
        .save_answers(
            &world.coordinator,
            started.evaluation.id,
            SaveAnswersRequest {
                answers: vec![numeric(q1, 6)],
            },
        )
        .await
        .unwrap();
    let err = world
        .evaluations()
        .submit_evaluation(
            &world.coordinator,
            started.evaluation.id,
            SubmitEvaluationRequest::default(),
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E005");

    // 覆盖已有答案并补齐
    let saved = world
        .evaluations()
        .save_answers(
            &world.coordinator,
            started.evaluation.id,
            SaveAnswersRequest {
                answers: vec![numeric(q1, 8), numeric(q2, 7)],
            },
        )
        .await
        .unwrap();
    assert_eq!(saved.answers.len(), 2);

    let submitted = world
        .evaluations()
        .submit_evaluation(
            &world.coordinator,
            started.evaluation.id,
            SubmitEvaluationRequest {
                comments: Some("  Solid year  ".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(submitted.status, EvaluationStatus::Completed);
    assert_eq!(submitted.total_score, Some(7.5));
    assert_eq!(submitted.comments.as_deref(), Some("Solid year"));

    let finished = world
        .assignments()
        .get_assignment(&world.teacher, assignment.id)
        .await
        .unwrap();
    assert_eq!(finished.status, AssignmentStatus::Completed);
    assert!(finished.completed_at.is_some());

    // 完成后不可再开始、取消或修改答案
    let err = world
        .assignments()
        .start_assignment(&world.coordinator, assignment.id)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E004");
    let err = world
        .assignments()
        .cancel_assignment(&world.admin, assignment.id)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E004");
    let err = world
        .evaluations()
        .save_answers(
            &world.coordinator,
            started.evaluation.id,
            SaveAnswersRequest {
                answers: vec![numeric(q1, 1)],
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E004");

    // 被评估者可以查看自己的评估
    let seen = world
        .evaluations()
        .get_for_assignment(&world.teacher, assignment.id)
        .await
        .unwrap();
    assert_eq!(seen.answers.len(), 2);
}

#[tokio::test]
async fn test_cancel_in_progress_assignment_cancels_evaluation() {
    let world = World::new().await;
    let detail = world
        .surveys()
        .create_survey(
            &world.coordinator,
            survey_request("Mid-year check", vec![scale("Lesson planning quality")]),
        )
        .await
        .unwrap();
    let assignment = world
        .assignments()
        .create_assignment(
            &world.coordinator,
            CreateAssignmentRequest {
                survey_id: detail.survey.id,
                evaluator_id: world.teacher.id,
                evaluatee_id: world.teacher.id,
                assignment_type: AssignmentType::SelfEvaluation,
                due_date: None,
            },
        )
        .await
        .unwrap();
    let started = world
        .assignments()
        .start_assignment(&world.teacher, assignment.id)
        .await
        .unwrap();

    // 教师不是分配者，不能取消
    let err = world
        .assignments()
        .cancel_assignment(&world.teacher, assignment.id)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E002");

    let cancelled = world
        .assignments()
        .cancel_assignment(&world.coordinator, assignment.id)
        .await
        .unwrap();
    assert_eq!(cancelled.status, AssignmentStatus::Cancelled);

    let evaluation = world
        .storage
        .get_evaluation_by_id(started.evaluation.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(evaluation.status, EvaluationStatus::Cancelled);

    let err = world
        .evaluations()
        .submit_evaluation(
            &world.teacher,
            started.evaluation.id,
            SubmitEvaluationRequest::default(),
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E004");
}

#[tokio::test]
async fn test_admin_cannot_deactivate_or_delete_self() {
    let world = World::new().await;
    let users = world.users();

    let err = users
        .toggle_status(&world.admin, world.admin.id)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E004");

    let err = users
        .delete_user(&world.admin, world.admin.id)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E004");

    let err = users
        .update_user(
            &world.admin,
            world.admin.id,
            UpdateUserRequest {
                status: Some(UserStatus::Deactivated),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E004");

    // 唯一的管理员也不能降级自己
    let err = users
        .update_user(
            &world.admin,
            world.admin.id,
            UpdateUserRequest {
                role: Some(UserRole::Teacher),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E004");

    // 停用他人是允许的（软删除）
    let removed = users
        .delete_user(&world.admin, world.teacher.id)
        .await
        .unwrap();
    assert_eq!(removed.status, UserStatus::Deactivated);
}

#[tokio::test]
async fn test_user_listing_is_role_scoped() {
    let world = World::new().await;
    let other = world
        .storage
        .create_department("Sciences", None)
        .await
        .unwrap()
        .id;
    add_user(&world.storage, "chem@school.local", UserRole::Teacher, Some(other)).await;

    let params = || UserListParams {
        pagination: page(),
        role: None,
        status: None,
        department_id: None,
        search: None,
    };

    let err = world
        .users()
        .list_users(&world.teacher, params())
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E002");

    let all = world.users().list_users(&world.admin, params()).await.unwrap();
    assert_eq!(all.pagination.total, 4);

    let scoped = world
        .users()
        .list_users(&world.coordinator, params())
        .await
        .unwrap();
    assert_eq!(scoped.pagination.total, 2);
    assert!(
        scoped
            .items
            .iter()
            .all(|u| u.department_id == Some(world.math))
    );

    let mut search = params();
    search.search = Some("chem@".to_string());
    let found = world.users().list_users(&world.admin, search).await.unwrap();
    assert_eq!(found.items.len(), 1);
}

#[tokio::test]
async fn test_user_update_field_policy() {
    let world = World::new().await;
    let users = world.users();

    // 协调员可以修改本部门教师的姓名，但不能修改角色
    let renamed = users
        .update_user(
            &world.coordinator,
            world.teacher.id,
            UpdateUserRequest {
                first_name: Some("  maria  ".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.first_name, "Maria");

    let err = users
        .update_user(
            &world.coordinator,
            world.teacher.id,
            UpdateUserRequest {
                role: Some(UserRole::Coordinator),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E002");

    // 教师不能修改自己的部门
    let err = users
        .update_user(
            &world.teacher,
            world.teacher.id,
            UpdateUserRequest {
                department_id: Some(Some(world.math)),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E002");

    // 邮箱冲突
    let err = users
        .update_user(
            &world.teacher,
            world.teacher.id,
            UpdateUserRequest {
                email: Some("coord@school.local".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E004");
}

#[tokio::test]
async fn test_coordinator_can_change_own_department() {
    let world = World::new().await;
    let sciences = world
        .storage
        .create_department("Sciences", None)
        .await
        .unwrap()
        .id;

    let moved = world
        .users()
        .update_user(
            &world.coordinator,
            world.coordinator.id,
            UpdateUserRequest {
                department_id: Some(Some(sciences)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(moved.department_id, Some(sciences));
}

#[tokio::test]
async fn test_optional_user_fields_can_be_cleared() {
    let world = World::new().await;
    let users = world.users();

    let updated = users
        .update_user(
            &world.coordinator,
            world.teacher.id,
            UpdateUserRequest {
                employee_code: Some(Some("t-042".to_string())),
                phone: Some(Some("555-0100".to_string())),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.employee_code.as_deref(), Some("T-042"));
    assert_eq!(updated.phone.as_deref(), Some("555-0100"));

    // 未提供的字段保持不变
    let renamed = users
        .update_user(
            &world.teacher,
            world.teacher.id,
            UpdateUserRequest {
                last_name: Some("Lopez".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.employee_code.as_deref(), Some("T-042"));
    assert_eq!(renamed.department_id, Some(world.math));

    // null 与空白字符串都表示清空
    let cleared = users
        .update_user(
            &world.teacher,
            world.teacher.id,
            UpdateUserRequest {
                employee_code: Some(None),
                phone: Some(Some("   ".to_string())),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(cleared.employee_code, None);
    assert_eq!(cleared.phone, None);

    let detached = users
        .update_user(
            &world.admin,
            world.teacher.id,
            UpdateUserRequest {
                department_id: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(detached.department_id, None);
    assert_eq!(detached.last_name, "Lopez");
}

#[tokio::test]
async fn test_survey_title_unique_per_creator() {
    let world = World::new().await;
    let surveys = world.surveys();

    surveys
        .create_survey(&world.coordinator, survey_request("Eval 2025", vec![]))
        .await
        .unwrap();
    let err = surveys
        .create_survey(&world.coordinator, survey_request("  Eval 2025 ", vec![]))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E004");

    // 其他创建者可以使用相同标题
    let other = surveys
        .create_survey(&world.admin, survey_request("Eval 2025", vec![]))
        .await
        .unwrap();

    // 重命名也检查唯一性
    surveys
        .create_survey(&world.admin, survey_request("Eval 2026", vec![]))
        .await
        .unwrap();
    let err = surveys
        .update_survey(
            &world.admin,
            other.survey.id,
            UpdateSurveyRequest {
                title: Some("Eval 2026".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E004");

    // 协调员不能修改管理员的问卷
    let err = surveys
        .toggle_status(&world.coordinator, other.survey.id)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E002");
}

#[tokio::test]
async fn test_survey_search_treats_wildcards_literally() {
    let world = World::new().await;
    let surveys = world.surveys();
    for title in ["Raise 50% participation", "Raise 500 participation"] {
        surveys
            .create_survey(&world.admin, survey_request(title, vec![]))
            .await
            .unwrap();
    }

    let search = |text: &str| SurveyListParams {
        pagination: page(),
        status: None,
        created_by: None,
        search: Some(text.to_string()),
    };

    let hits = surveys
        .list_surveys(&world.admin, search("50%"))
        .await
        .unwrap();
    assert_eq!(hits.items.len(), 1);
    assert_eq!(hits.items[0].title, "Raise 50% participation");

    let hits = surveys
        .list_surveys(&world.admin, search("5_0"))
        .await
        .unwrap();
    assert!(hits.items.is_empty());

    let hits = surveys
        .list_surveys(&world.admin, search("raise"))
        .await
        .unwrap();
    assert_eq!(hits.items.len(), 2);
}

#[tokio::test]
async fn test_question_order_stays_unique() {
    let world = World::new().await;
    let surveys = world.surveys();
    let survey_id = surveys
        .create_survey(
            &world.coordinator,
            survey_request(
                "Ordering",
                vec![scale("First question"), scale("Second question")],
            ),
        )
        .await
        .unwrap()
        .survey
        .id;

    // 未指定顺序时追加到末尾
    let third = surveys
        .create_question(&world.coordinator, survey_id, scale("Third question"))
        .await
        .unwrap();
    assert_eq!(third.order_number, 3);

    // 显式使用已占用的序号
    let mut clash = scale("Clashing question");
    clash.order_number = Some(2);
    let err = surveys
        .create_question(&world.coordinator, survey_id, clash)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E004");

    let questions = surveys
        .list_questions(&world.coordinator, survey_id)
        .await
        .unwrap();
    let (first, second) = (questions[0].id, questions[1].id);

    // 交换顺序，未知ID被忽略
    let reordered = surveys
        .reorder_questions(
            &world.coordinator,
            survey_id,
            vec![
                QuestionOrder {
                    question_id: first,
                    order_number: 2,
                },
                QuestionOrder {
                    question_id: second,
                    order_number: 1,
                },
                QuestionOrder {
                    question_id: 9999,
                    order_number: 7,
                },
            ],
        )
        .await
        .unwrap();
    let ids: Vec<i64> = reordered.iter().map(|q| q.id).collect();
    assert_eq!(ids, vec![second, first, third.id]);

    // 产生重复序号的批次被拒绝，原顺序不变
    let err = surveys
        .reorder_questions(
            &world.coordinator,
            survey_id,
            vec![QuestionOrder {
                question_id: first,
                order_number: 3,
            }],
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E004");
    let unchanged = surveys
        .list_questions(&world.coordinator, survey_id)
        .await
        .unwrap();
    let orders: Vec<i32> = unchanged.iter().map(|q| q.order_number).collect();
    assert_eq!(orders, vec![1, 2, 3]);

    // 教师不能修改问题
    let err = surveys
        .list_questions(&world.teacher, survey_id)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E002");
}

#[tokio::test]
async fn test_questions_locked_after_evaluation_starts() {
    let world = World::new().await;
    let detail = world
        .surveys()
        .create_survey(
            &world.admin,
            survey_request("Locked", vec![scale("Lesson planning quality")]),
        )
        .await
        .unwrap();
    let question_id = detail.questions[0].id;

    let assignment = world
        .assignments()
        .create_assignment(
            &world.admin,
            CreateAssignmentRequest {
                survey_id: detail.survey.id,
                evaluator_id: world.teacher.id,
                evaluatee_id: world.teacher.id,
                assignment_type: AssignmentType::SelfEvaluation,
                due_date: None,
            },
        )
        .await
        .unwrap();
    world
        .assignments()
        .start_assignment(&world.teacher, assignment.id)
        .await
        .unwrap();

    let err = world
        .surveys()
        .delete_question(&world.admin, detail.survey.id, question_id)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E004");
}

#[tokio::test]
async fn test_question_range_locked_after_evaluation_starts() {
    let world = World::new().await;
    let detail = world
        .surveys()
        .create_survey(
            &world.admin,
            survey_request("Range lock", vec![scale("Lesson planning quality")]),
        )
        .await
        .unwrap();
    let survey_id = detail.survey.id;
    let question_id = detail.questions[0].id;

    // 开始前可以自由调整取值范围
    let narrowed = world
        .surveys()
        .update_question(
            &world.admin,
            survey_id,
            question_id,
            UpdateQuestionRequest {
                min_value: Some(2),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!((narrowed.min_value, narrowed.max_value), (Some(2), Some(10)));

    let assignment = world
        .assignments()
        .create_assignment(
            &world.admin,
            CreateAssignmentRequest {
                survey_id,
                evaluator_id: world.teacher.id,
                evaluatee_id: world.teacher.id,
                assignment_type: AssignmentType::SelfEvaluation,
                due_date: None,
            },
        )
        .await
        .unwrap();
    let started = world
        .assignments()
        .start_assignment(&world.teacher, assignment.id)
        .await
        .unwrap();
    world
        .evaluations()
        .save_answers(
            &world.teacher,
            started.evaluation.id,
            SaveAnswersRequest {
                answers: vec![numeric(question_id, 9)],
            },
        )
        .await
        .unwrap();

    let err = world
        .surveys()
        .update_question(
            &world.admin,
            survey_id,
            question_id,
            UpdateQuestionRequest {
                max_value: Some(5),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E004");

    let err = world
        .surveys()
        .update_question(
            &world.admin,
            survey_id,
            question_id,
            UpdateQuestionRequest {
                question_type: Some(QuestionType::Text),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E004");

    // 措辞修改不影响已作答的值
    let reworded = world
        .surveys()
        .update_question(
            &world.admin,
            survey_id,
            question_id,
            UpdateQuestionRequest {
                question_text: Some("Quality of lesson planning".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(reworded.question_text, "Quality of lesson planning");
    assert_eq!(reworded.max_value, Some(10));

    let submitted = world
        .evaluations()
        .submit_evaluation(
            &world.teacher,
            started.evaluation.id,
            SubmitEvaluationRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(submitted.total_score, Some(9.0));
}

#[tokio::test]
async fn test_pending_assignment_of_deactivated_survey_cannot_start() {
    let world = World::new().await;
    let survey_id = world
        .surveys()
        .create_survey(
            &world.admin,
            survey_request("Retired", vec![scale("Lesson planning quality")]),
        )
        .await
        .unwrap()
        .survey
        .id;
    let assignment = world
        .assignments()
        .create_assignment(
            &world.admin,
            CreateAssignmentRequest {
                survey_id,
                evaluator_id: world.teacher.id,
                evaluatee_id: world.teacher.id,
                assignment_type: AssignmentType::SelfEvaluation,
                due_date: None,
            },
        )
        .await
        .unwrap();

    world
        .surveys()
        .delete_survey(&world.admin, survey_id)
        .await
        .unwrap();

    let err = world
        .assignments()
        .start_assignment(&world.teacher, assignment.id)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E004");

    let unchanged = world
        .assignments()
        .get_assignment(&world.teacher, assignment.id)
        .await
        .unwrap();
    assert_eq!(unchanged.status, AssignmentStatus::Pending);
    assert!(unchanged.started_at.is_none());
}

#[tokio::test]
async fn test_assignment_visibility() {
    let world = World::new().await;
    let detail = world
        .surveys()
        .create_survey(&world.admin, survey_request("Visibility", vec![scale("Question one")]))
        .await
        .unwrap();
    let outsider = add_user(&world.storage, "other@school.local", UserRole::Teacher, None).await;

    let assignment = world
        .assignments()
        .create_assignment(
            &world.coordinator,
            CreateAssignmentRequest {
                survey_id: detail.survey.id,
                evaluator_id: world.coordinator.id,
                evaluatee_id: world.teacher.id,
                assignment_type: AssignmentType::Coordinator,
                due_date: None,
            },
        )
        .await
        .unwrap();

    let params = || AssignmentListParams {
        pagination: page(),
        status: None,
        survey_id: None,
    };
    let mine = world
        .assignments()
        .list_assignments(&world.teacher, params())
        .await
        .unwrap();
    assert_eq!(mine.items.len(), 1);
    let none = world
        .assignments()
        .list_assignments(&outsider, params())
        .await
        .unwrap();
    assert!(none.items.is_empty());

    let err = world
        .assignments()
        .get_assignment(&outsider, assignment.id)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E002");

    // 教师不能创建分配
    let err = world
        .assignments()
        .create_assignment(
            &world.teacher,
            CreateAssignmentRequest {
                survey_id: detail.survey.id,
                evaluator_id: world.teacher.id,
                evaluatee_id: world.teacher.id,
                assignment_type: AssignmentType::SelfEvaluation,
                due_date: None,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E002");
}

#[tokio::test]
async fn test_comparison_between_self_and_coordinator() {
    let world = World::new().await;
    let detail = world
        .surveys()
        .create_survey(
            &world.admin,
            survey_request("Comparison", vec![scale("Question one"), scale("Question two")]),
        )
        .await
        .unwrap();
    let (q1, q2) = (detail.questions[0].id, detail.questions[1].id);
    let request = || CreateComparisonRequest {
        evaluatee_id: world.teacher.id,
        survey_id: detail.survey.id,
    };

    // 缺少评估时无法生成
    let err = world
        .comparisons()
        .create_comparison(&world.coordinator, request())
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E005");

    complete_evaluation(
        &world,
        &world.teacher,
        &world.teacher,
        AssignmentType::SelfEvaluation,
        detail.survey.id,
        &[(q1, 9), (q2, 6)],
    )
    .await;
    complete_evaluation(
        &world,
        &world.coordinator,
        &world.teacher,
        AssignmentType::Coordinator,
        detail.survey.id,
        &[(q1, 7), (q2, 7)],
    )
    .await;

    // 教师不能生成对比
    let err = world
        .comparisons()
        .create_comparison(&world.teacher, request())
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E002");

    let comparison = world
        .comparisons()
        .create_comparison(&world.coordinator, request())
        .await
        .unwrap();
    assert_eq!(comparison.average_difference, 1.5);
    assert_eq!(comparison.status, ComparisonStatus::Pending);

    let again = world
        .comparisons()
        .create_comparison(&world.admin, request())
        .await
        .unwrap();
    assert_eq!(again.id, comparison.id);

    // 被评估者可以查看
    let listed = world
        .comparisons()
        .list_for_evaluatee(&world.teacher, world.teacher.id)
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);

    let reviewed = world
        .comparisons()
        .review_comparison(&world.coordinator, comparison.id)
        .await
        .unwrap();
    assert_eq!(reviewed.status, ComparisonStatus::Reviewed);
    assert!(reviewed.reviewed_at.is_some());

    let err = world
        .comparisons()
        .review_comparison(&world.coordinator, comparison.id)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E004");
}

#[tokio::test]
async fn test_login_and_token_resolution() {
    let world = World::new().await;
    let auth = AuthService::new(world.storage.clone());

    let response = auth
        .login(LoginRequest {
            email: "teacher@school.local".to_string(),
            password: PASSWORD.to_string(),
        })
        .await
        .unwrap();
    assert_eq!(response.token_type, "bearer");
    assert_eq!(response.user.department.as_deref(), Some("Mathematics"));

    let user = auth.authenticate(&response.access_token).await.unwrap();
    assert_eq!(user.id, world.teacher.id);
    assert!(user.last_login.is_some());

    let err = auth
        .login(LoginRequest {
            email: "teacher@school.local".to_string(),
            password: "wrong-password".to_string(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E001");

    // 停用后令牌失效
    world
        .storage
        .set_user_status(world.teacher.id, UserStatus::Deactivated)
        .await
        .unwrap();
    let err = auth.authenticate(&response.access_token).await.unwrap_err();
    assert_eq!(err.code(), "E001");

    assert_eq!(auth.authenticate("garbage").await.unwrap_err().code(), "E001");
}
