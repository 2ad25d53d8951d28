//! 权限判定
//!
//! 所有访问控制规则集中在此处：给定（操作者, 动作, 目标实体）返回允许或拒绝。
//! 判定过程是纯函数，不访问存储，调用方需传入已完整加载的实体。
//! 列表查询不在此处拒绝单行数据，而是通过 `*Scope` 返回过滤范围。

use tracing::info;

use crate::errors::{EvalSystemError, Result};
use crate::models::{
    assignments::entities::Assignment,
    evaluations::entities::Evaluation,
    surveys::entities::Survey,
    users::{
        entities::{User, UserRole},
        requests::UpdateUserRequest,
    },
};

/// 受控动作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    SurveyRead,
    SurveyWrite,
    SurveyDelete,
    SurveyToggleStatus,
    SurveyCreate,
    SurveyList,
    QuestionWrite,
    UserRead,
    UserWrite,
    UserCreate,
    UserDelete,
    UserToggleStatus,
    UserList,
    AssignmentCreate,
    AssignmentRead,
    AssignmentStart,
    AssignmentCancel,
    EvaluationRead,
    EvaluationWrite,
    ComparisonRead,
    ComparisonWrite,
}

impl Action {
    /// 稳定的动作标签，用于日志与错误信息
    pub fn tag(self) -> &'static str {
        match self {
            Action::SurveyRead => "survey.read",
            Action::SurveyWrite => "survey.write",
            Action::SurveyDelete => "survey.delete",
            Action::SurveyToggleStatus => "survey.toggle_status",
            Action::SurveyCreate => "survey.create",
            Action::SurveyList => "survey.list",
            Action::QuestionWrite => "question.write",
            Action::UserRead => "user.read",
            Action::UserWrite => "user.write",
            Action::UserCreate => "user.create",
            Action::UserDelete => "user.delete",
            Action::UserToggleStatus => "user.toggle_status",
            Action::UserList => "user.list",
            Action::AssignmentCreate => "assignment.create",
            Action::AssignmentRead => "assignment.read",
            Action::AssignmentStart => "assignment.start",
            Action::AssignmentCancel => "assignment.cancel",
            Action::EvaluationRead => "evaluation.read",
            Action::EvaluationWrite => "evaluation.write",
            Action::ComparisonRead => "comparison.read",
            Action::ComparisonWrite => "comparison.write",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// 判定目标
///
/// 对比相关动作以被评估者作为目标。
#[derive(Debug, Clone, Copy)]
pub enum Target<'a> {
    /// 无具体实体（创建、列表）
    Collection,
    Survey(&'a Survey),
    User(&'a User),
    Assignment(&'a Assignment),
    Evaluation(&'a Evaluation),
}

/// 判定操作是否被允许
///
/// 动作与目标类型不匹配时一律拒绝。
pub fn is_allowed(actor: &User, action: Action, target: Target<'_>) -> bool {
    if !actor.is_active() {
        return false;
    }

    match (action, target) {
        (Action::SurveyRead, Target::Survey(survey)) => match actor.role {
            UserRole::Admin => true,
            UserRole::Coordinator => survey.is_owned_by(actor.id) || survey.is_public(),
            UserRole::Teacher => survey.is_active(),
        },
        (
            Action::SurveyWrite
            | Action::SurveyDelete
            | Action::SurveyToggleStatus
            | Action::QuestionWrite,
            Target::Survey(survey),
        ) => match actor.role {
            UserRole::Admin => true,
            UserRole::Coordinator => survey.is_owned_by(actor.id),
            UserRole::Teacher => false,
        },
        (
            Action::SurveyCreate | Action::SurveyList | Action::UserList | Action::AssignmentCreate,
            Target::Collection,
        ) => actor.is_admin() || actor.is_coordinator(),

        (Action::UserRead, Target::User(user)) => match actor.role {
            UserRole::Admin => true,
            UserRole::Coordinator => actor.same_department(user),
            UserRole::Teacher => actor.id == user.id,
        },
        (Action::UserWrite, Target::User(user)) => {
            actor.is_admin()
                || actor.id == user.id
                || (actor.is_coordinator() && actor.same_department(user))
        }
        (Action::UserCreate, Target::Collection) => actor.is_admin(),
        (Action::UserDelete | Action::UserToggleStatus, Target::User(_)) => actor.is_admin(),

        (Action::AssignmentRead, Target::Assignment(assignment)) => {
            actor.is_admin() || assignment.involves(actor.id)
        }
        (Action::AssignmentStart, Target::Assignment(assignment)) => {
            assignment.evaluator_id == actor.id
        }
        (Action::AssignmentCancel, Target::Assignment(assignment)) => {
            actor.is_admin() || assignment.assigned_by == actor.id
        }

        (Action::EvaluationRead, Target::Evaluation(evaluation)) => {
            actor.is_admin()
                || evaluation.evaluator_id == actor.id
                || evaluation.evaluatee_id == actor.id
        }
        (Action::EvaluationWrite, Target::Evaluation(evaluation)) => {
            evaluation.evaluator_id == actor.id
        }

        (Action::ComparisonWrite, Target::User(evaluatee)) => manages_user(actor, evaluatee),
        (Action::ComparisonRead, Target::User(evaluatee)) => {
            actor.id == evaluatee.id || manages_user(actor, evaluatee)
        }

        _ => false,
    }
}

/// 判定操作，拒绝时返回 `PermissionDenied`
pub fn authorize(actor: &User, action: Action, target: Target<'_>) -> Result<()> {
    if is_allowed(actor, action, target) {
        return Ok(());
    }
    info!(
        "拒绝访问: user_id={}, role={}, action={}",
        actor.id, actor.role, action
    );
    Err(EvalSystemError::permission_denied(format!(
        "Not allowed to perform {action}"
    )))
}

fn manages_user(actor: &User, user: &User) -> bool {
    actor.is_admin()
        || (actor.is_coordinator()
            && user
                .department_id
                .is_some_and(|department_id| actor.can_manage_department(department_id)))
}

/// 用户资料中受字段级限制的字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserField {
    Email,
    Password,
    FirstName,
    LastName,
    EmployeeCode,
    Phone,
    Role,
    Department,
    Status,
}

impl UserField {
    pub fn name(self) -> &'static str {
        match self {
            UserField::Email => "email",
            UserField::Password => "password",
            UserField::FirstName => "first_name",
            UserField::LastName => "last_name",
            UserField::EmployeeCode => "employee_code",
            UserField::Phone => "phone",
            UserField::Role => "role",
            UserField::Department => "department_id",
            UserField::Status => "status",
        }
    }

    /// 更新请求中实际提供的字段
    pub fn present_in(update: &UpdateUserRequest) -> Vec<UserField> {
        let mut fields = Vec::new();
        if update.email.is_some() {
            fields.push(UserField::Email);
        }
        if update.password.is_some() {
            fields.push(UserField::Password);
        }
        if update.first_name.is_some() {
            fields.push(UserField::FirstName);
        }
        if update.last_name.is_some() {
            fields.push(UserField::LastName);
        }
        if update.employee_code.is_some() {
            fields.push(UserField::EmployeeCode);
        }
        if update.phone.is_some() {
            fields.push(UserField::Phone);
        }
        if update.role.is_some() {
            fields.push(UserField::Role);
        }
        if update.department_id.is_some() {
            fields.push(UserField::Department);
        }
        if update.status.is_some() {
            fields.push(UserField::Status);
        }
        fields
    }
}

/// 字段是否允许由操作者修改
///
/// 管理员不受限制；本人修改自己时不能改角色与状态，部门仅协调员可改；
/// 协调员修改本部门用户时不能改角色与状态。
pub fn can_write_user_field(actor: &User, target: &User, field: UserField) -> bool {
    if actor.is_admin() {
        return true;
    }
    if actor.id == target.id {
        return match field {
            UserField::Role | UserField::Status => false,
            UserField::Department => actor.is_coordinator(),
            _ => true,
        };
    }
    actor.is_coordinator()
        && actor.same_department(target)
        && !matches!(field, UserField::Role | UserField::Status)
}

/// 校验一次用户更新：先检查整体写权限，再逐字段检查
pub fn authorize_user_update(
    actor: &User,
    target: &User,
    update: &UpdateUserRequest,
) -> Result<()> {
    authorize(actor, Action::UserWrite, Target::User(target))?;

    let denied: Vec<&str> = UserField::present_in(update)
        .into_iter()
        .filter(|field| !can_write_user_field(actor, target, *field))
        .map(UserField::name)
        .collect();

    if denied.is_empty() {
        Ok(())
    } else {
        info!(
            "拒绝字段更新: user_id={}, target_id={}, fields={:?}",
            actor.id, target.id, denied
        );
        Err(EvalSystemError::permission_denied(format!(
            "Not allowed to change: {}",
            denied.join(", ")
        )))
    }
}

/// 问卷列表可见范围
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurveyScope {
    All,
    /// 自己创建的问卷与公共问卷
    OwnedOrPublic(i64),
}

impl SurveyScope {
    pub fn owner_or_public(self) -> Option<i64> {
        match self {
            SurveyScope::All => None,
            SurveyScope::OwnedOrPublic(user_id) => Some(user_id),
        }
    }
}

pub fn survey_list_scope(actor: &User) -> Result<SurveyScope> {
    authorize(actor, Action::SurveyList, Target::Collection)?;
    Ok(if actor.is_admin() {
        SurveyScope::All
    } else {
        SurveyScope::OwnedOrPublic(actor.id)
    })
}

/// 用户列表可见范围
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserScope {
    All,
    Department(Option<i64>),
}

impl UserScope {
    pub fn department_scope(self) -> Option<Option<i64>> {
        match self {
            UserScope::All => None,
            UserScope::Department(department_id) => Some(department_id),
        }
    }
}

pub fn user_list_scope(actor: &User) -> Result<UserScope> {
    authorize(actor, Action::UserList, Target::Collection)?;
    Ok(if actor.is_admin() {
        UserScope::All
    } else {
        UserScope::Department(actor.department_id)
    })
}

/// 分配列表可见范围
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentScope {
    All,
    Involving(i64),
}

impl AssignmentScope {
    pub fn involving(self) -> Option<i64> {
        match self {
            AssignmentScope::All => None,
            AssignmentScope::Involving(user_id) => Some(user_id),
        }
    }
}

pub fn assignment_list_scope(actor: &User) -> Result<AssignmentScope> {
    if !actor.is_active() {
        return Err(EvalSystemError::permission_denied("Account is deactivated"));
    }
    Ok(if actor.is_admin() {
        AssignmentScope::All
    } else {
        AssignmentScope::Involving(actor.id)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::assignments::entities::{AssignmentStatus, AssignmentType};
    use crate::models::evaluations::entities::EvaluationStatus;
    use crate::models::surveys::entities::{SurveyStatus, fixtures::survey};
    use crate::models::users::entities::{UserStatus, fixtures::user};

    fn admin() -> User {
        user(1, UserRole::Admin, None)
    }

    fn coordinator() -> User {
        user(2, UserRole::Coordinator, Some(10))
    }

    fn teacher() -> User {
        user(3, UserRole::Teacher, Some(10))
    }

    fn assignment(evaluator: i64, evaluatee: i64, assigned_by: i64) -> Assignment {
        Assignment {
            id: 1,
            survey_id: 1,
            evaluator_id: evaluator,
            evaluatee_id: evaluatee,
            assignment_type: AssignmentType::Coordinator,
            status: AssignmentStatus::Pending,
            due_date: None,
            assigned_by,
            assigned_at: chrono::Utc::now(),
            started_at: None,
            completed_at: None,
        }
    }

    fn evaluation(evaluator: i64, evaluatee: i64) -> Evaluation {
        Evaluation {
            id: 1,
            assignment_id: 1,
            evaluator_id: evaluator,
            evaluatee_id: evaluatee,
            survey_id: 1,
            assignment_type: AssignmentType::Coordinator,
            status: EvaluationStatus::InProgress,
            started_at: chrono::Utc::now(),
            completed_at: None,
            total_score: None,
            comments: None,
        }
    }

    #[test]
    fn test_action_tags() {
        assert_eq!(Action::SurveyRead.tag(), "survey.read");
        assert_eq!(Action::UserDelete.to_string(), "user.delete");
    }

    #[test]
    fn test_survey_read_rules() {
        let own = survey(1, Some(2), SurveyStatus::Deactivated);
        let public = survey(2, None, SurveyStatus::Active);
        let foreign_active = survey(3, Some(99), SurveyStatus::Active);
        let foreign_inactive = survey(4, Some(99), SurveyStatus::Deactivated);

        for s in [&own, &public, &foreign_active, &foreign_inactive] {
            assert!(is_allowed(&admin(), Action::SurveyRead, Target::Survey(s)));
        }

        let c = coordinator();
        assert!(is_allowed(&c, Action::SurveyRead, Target::Survey(&own)));
        assert!(is_allowed(&c, Action::SurveyRead, Target::Survey(&public)));
        assert!(!is_allowed(&c, Action::SurveyRead, Target::Survey(&foreign_active)));

        let t = teacher();
        assert!(!is_allowed(&t, Action::SurveyRead, Target::Survey(&own)));
        assert!(is_allowed(&t, Action::SurveyRead, Target::Survey(&public)));
        assert!(is_allowed(&t, Action::SurveyRead, Target::Survey(&foreign_active)));
        assert!(!is_allowed(&t, Action::SurveyRead, Target::Survey(&foreign_inactive)));
    }

    #[test]
    fn test_survey_write_rules() {
        let own = survey(1, Some(2), SurveyStatus::Active);
        let public = survey(2, None, SurveyStatus::Active);

        for action in [
            Action::SurveyWrite,
            Action::SurveyDelete,
            Action::SurveyToggleStatus,
            Action::QuestionWrite,
        ] {
            assert!(is_allowed(&admin(), action, Target::Survey(&public)));
            assert!(is_allowed(&coordinator(), action, Target::Survey(&own)));
            assert!(!is_allowed(&coordinator(), action, Target::Survey(&public)));
            assert!(!is_allowed(&teacher(), action, Target::Survey(&public)));
        }
    }

    #[test]
    fn test_collection_actions_need_coordinator() {
        for action in [
            Action::SurveyCreate,
            Action::SurveyList,
            Action::UserList,
            Action::AssignmentCreate,
        ] {
            assert!(is_allowed(&admin(), action, Target::Collection));
            assert!(is_allowed(&coordinator(), action, Target::Collection));
            assert!(!is_allowed(&teacher(), action, Target::Collection));
        }
        assert!(is_allowed(&admin(), Action::UserCreate, Target::Collection));
        assert!(!is_allowed(&coordinator(), Action::UserCreate, Target::Collection));
    }

    #[test]
    fn test_user_read_rules() {
        let same_dept = user(4, UserRole::Teacher, Some(10));
        let other_dept = user(5, UserRole::Teacher, Some(11));

        assert!(is_allowed(&admin(), Action::UserRead, Target::User(&other_dept)));
        assert!(is_allowed(&coordinator(), Action::UserRead, Target::User(&same_dept)));
        assert!(!is_allowed(&coordinator(), Action::UserRead, Target::User(&other_dept)));

        let t = teacher();
        assert!(is_allowed(&t, Action::UserRead, Target::User(&t)));
        assert!(!is_allowed(&t, Action::UserRead, Target::User(&same_dept)));
    }

    #[test]
    fn test_user_delete_and_toggle_admin_only() {
        let target = user(4, UserRole::Teacher, Some(10));
        for action in [Action::UserDelete, Action::UserToggleStatus] {
            assert!(is_allowed(&admin(), action, Target::User(&target)));
            assert!(!is_allowed(&coordinator(), action, Target::User(&target)));
            assert!(!is_allowed(&teacher(), action, Target::User(&target)));
        }
    }

    #[test]
    fn test_inactive_actor_is_always_denied() {
        let mut a = admin();
        a.status = UserStatus::Deactivated;
        let s = survey(1, None, SurveyStatus::Active);
        assert!(!is_allowed(&a, Action::SurveyRead, Target::Survey(&s)));
        assert!(!is_allowed(&a, Action::UserList, Target::Collection));
        assert!(assignment_list_scope(&a).is_err());
    }

    #[test]
    fn test_mismatched_target_is_denied() {
        let s = survey(1, None, SurveyStatus::Active);
        assert!(!is_allowed(&admin(), Action::UserRead, Target::Survey(&s)));
        assert!(!is_allowed(&admin(), Action::SurveyRead, Target::Collection));
    }

    #[test]
    fn test_user_field_policy() {
        let t = teacher();
        let update = UpdateUserRequest {
            first_name: Some("Ana".to_string()),
            phone: Some(Some("555".to_string())),
            ..Default::default()
        };
        assert!(authorize_user_update(&t, &t, &update).is_ok());

        let update = UpdateUserRequest {
            department_id: Some(Some(11)),
            ..Default::default()
        };
        let err = authorize_user_update(&t, &t, &update).unwrap_err();
        assert_eq!(err.code(), "E002");
        assert!(err.message().contains("department_id"));

        let c = coordinator();
        let member = user(4, UserRole::Teacher, Some(10));
        let update = UpdateUserRequest {
            department_id: Some(Some(11)),
            email: Some("x@school.local".to_string()),
            ..Default::default()
        };
        assert!(authorize_user_update(&c, &member, &update).is_ok());

        let update = UpdateUserRequest {
            role: Some(UserRole::Coordinator),
            ..Default::default()
        };
        assert!(authorize_user_update(&c, &member, &update).is_err());
        assert!(authorize_user_update(&admin(), &member, &update).is_ok());

        let outsider = user(5, UserRole::Teacher, Some(11));
        let update = UpdateUserRequest {
            phone: Some(Some("555".to_string())),
            ..Default::default()
        };
        assert!(authorize_user_update(&c, &outsider, &update).is_err());
    }

    #[test]
    fn test_coordinator_can_move_itself_to_another_department() {
        let c = coordinator();
        let update = UpdateUserRequest {
            department_id: Some(Some(11)),
            ..Default::default()
        };
        assert!(authorize_user_update(&c, &c, &update).is_ok());

        let t = teacher();
        assert!(authorize_user_update(&t, &t, &update).is_err());

        let update = UpdateUserRequest {
            role: Some(UserRole::Admin),
            ..Default::default()
        };
        assert!(authorize_user_update(&c, &c, &update).is_err());
    }

    #[test]
    fn test_assignment_rules() {
        let a = assignment(3, 3, 2);
        assert!(is_allowed(&teacher(), Action::AssignmentRead, Target::Assignment(&a)));
        assert!(is_allowed(&teacher(), Action::AssignmentStart, Target::Assignment(&a)));
        assert!(!is_allowed(&teacher(), Action::AssignmentCancel, Target::Assignment(&a)));
        assert!(is_allowed(&coordinator(), Action::AssignmentCancel, Target::Assignment(&a)));
        assert!(!is_allowed(&coordinator(), Action::AssignmentStart, Target::Assignment(&a)));
        assert!(is_allowed(&admin(), Action::AssignmentCancel, Target::Assignment(&a)));
        assert!(!is_allowed(&admin(), Action::AssignmentStart, Target::Assignment(&a)));

        let stranger = user(8, UserRole::Teacher, Some(10));
        assert!(!is_allowed(&stranger, Action::AssignmentRead, Target::Assignment(&a)));
    }

    #[test]
    fn test_evaluation_rules() {
        let e = evaluation(2, 3);
        assert!(is_allowed(&coordinator(), Action::EvaluationWrite, Target::Evaluation(&e)));
        assert!(!is_allowed(&teacher(), Action::EvaluationWrite, Target::Evaluation(&e)));
        assert!(is_allowed(&teacher(), Action::EvaluationRead, Target::Evaluation(&e)));
        assert!(!is_allowed(&admin(), Action::EvaluationWrite, Target::Evaluation(&e)));
        assert!(is_allowed(&admin(), Action::EvaluationRead, Target::Evaluation(&e)));
    }

    #[test]
    fn test_comparison_rules() {
        let t = teacher();
        assert!(is_allowed(&coordinator(), Action::ComparisonWrite, Target::User(&t)));
        assert!(is_allowed(&t, Action::ComparisonRead, Target::User(&t)));
        assert!(!is_allowed(&t, Action::ComparisonWrite, Target::User(&t)));

        let outsider = user(5, UserRole::Teacher, Some(11));
        assert!(!is_allowed(&coordinator(), Action::ComparisonRead, Target::User(&outsider)));

        let unassigned = user(6, UserRole::Teacher, None);
        let c = user(7, UserRole::Coordinator, None);
        assert!(!is_allowed(&c, Action::ComparisonWrite, Target::User(&unassigned)));
        assert!(is_allowed(&admin(), Action::ComparisonWrite, Target::User(&unassigned)));
    }

    #[test]
    fn test_list_scopes() {
        assert_eq!(survey_list_scope(&admin()), Ok(SurveyScope::All));
        assert_eq!(
            survey_list_scope(&coordinator()),
            Ok(SurveyScope::OwnedOrPublic(2))
        );
        assert_eq!(
            user_list_scope(&teacher()).unwrap_err().code(),
            "E002"
        );
        assert_eq!(
            user_list_scope(&coordinator()).map(UserScope::department_scope),
            Ok(Some(Some(10)))
        );
        assert_eq!(
            assignment_list_scope(&teacher()).map(AssignmentScope::involving),
            Ok(Some(3))
        );
        assert_eq!(assignment_list_scope(&admin()), Ok(AssignmentScope::All));
    }
}
