//! 分配生命周期
//!
//! ```text
//! pending ──start──▶ in_progress ──complete──▶ completed
//!    │                    │
//!    └──────cancel────────┴──────────▶ cancelled
//! ```
//!
//! completed 与 cancelled 为终态。非法迁移返回 `Conflict`。

use crate::errors::{EvalSystemError, Result};
use crate::models::{
    assignments::{
        entities::{AssignmentStatus, AssignmentType},
        requests::{CreateAssignmentRequest, NewAssignment},
    },
    evaluations::entities::EvaluationStatus,
    surveys::entities::Survey,
    users::entities::User,
};

/// 触发状态迁移的事件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentEvent {
    Start,
    Complete,
    Cancel,
}

impl AssignmentEvent {
    pub fn verb(self) -> &'static str {
        match self {
            AssignmentEvent::Start => "start",
            AssignmentEvent::Complete => "complete",
            AssignmentEvent::Cancel => "cancel",
        }
    }
}

/// 计算迁移后的状态
pub fn transition(current: AssignmentStatus, event: AssignmentEvent) -> Result<AssignmentStatus> {
    use AssignmentEvent::*;
    use AssignmentStatus::*;

    match (current, event) {
        (Pending, Start) => Ok(InProgress),
        (InProgress, Complete) => Ok(Completed),
        (Pending | InProgress, Cancel) => Ok(Cancelled),
        _ => Err(EvalSystemError::conflict(format!(
            "Cannot {} an assignment that is {current}",
            event.verb()
        ))),
    }
}

/// 分配迁移后对应评估记录应处于的状态（评估在 start 时才创建）
pub fn evaluation_status_for(status: AssignmentStatus) -> Option<EvaluationStatus> {
    match status {
        AssignmentStatus::Pending => None,
        AssignmentStatus::InProgress => Some(EvaluationStatus::InProgress),
        AssignmentStatus::Completed => Some(EvaluationStatus::Completed),
        AssignmentStatus::Cancelled => Some(EvaluationStatus::Cancelled),
    }
}

/// 问卷停用后，尚未开始的分配不能再开始
pub fn ensure_survey_open(survey: &Survey) -> Result<()> {
    if survey.is_active() {
        Ok(())
    } else {
        Err(EvalSystemError::conflict(
            "Cannot start an evaluation of a deactivated survey",
        ))
    }
}

/// 校验新分配
///
/// 不检查评估者能否评估被评估者：分配权限与评估资格相互独立。
pub fn prepare_assignment(
    req: &CreateAssignmentRequest,
    survey: &Survey,
    evaluator: &User,
    evaluatee: &User,
    assigned_by: &User,
) -> Result<NewAssignment> {
    if !survey.is_active() {
        return Err(EvalSystemError::validation(
            "Cannot assign a deactivated survey",
        ));
    }
    if !evaluator.is_active() || !evaluatee.is_active() {
        return Err(EvalSystemError::validation(
            "Evaluator and evaluatee must be active users",
        ));
    }

    let same_person = evaluator.id == evaluatee.id;
    match req.assignment_type {
        AssignmentType::SelfEvaluation if !same_person => {
            return Err(EvalSystemError::validation(
                "A self evaluation requires evaluator and evaluatee to be the same user",
            ));
        }
        AssignmentType::Coordinator if same_person => {
            return Err(EvalSystemError::validation(
                "A coordinator evaluation requires different evaluator and evaluatee",
            ));
        }
        _ => {}
    }

    Ok(NewAssignment {
        survey_id: survey.id,
        evaluator_id: evaluator.id,
        evaluatee_id: evaluatee.id,
        assignment_type: req.assignment_type,
        due_date: req.due_date,
        assigned_by: assigned_by.id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::surveys::entities::{SurveyStatus, fixtures::survey};
    use crate::models::users::entities::{UserRole, UserStatus, fixtures::user};

    #[test]
    fn test_happy_path() {
        let started = transition(AssignmentStatus::Pending, AssignmentEvent::Start).unwrap();
        assert_eq!(started, AssignmentStatus::InProgress);
        let done = transition(started, AssignmentEvent::Complete).unwrap();
        assert_eq!(done, AssignmentStatus::Completed);
    }

    #[test]
    fn test_cancel_from_live_states_only() {
        assert_eq!(
            transition(AssignmentStatus::Pending, AssignmentEvent::Cancel),
            Ok(AssignmentStatus::Cancelled)
        );
        assert_eq!(
            transition(AssignmentStatus::InProgress, AssignmentEvent::Cancel),
            Ok(AssignmentStatus::Cancelled)
        );
        assert!(transition(AssignmentStatus::Completed, AssignmentEvent::Cancel).is_err());
        assert!(transition(AssignmentStatus::Cancelled, AssignmentEvent::Cancel).is_err());
    }

    #[test]
    fn test_terminal_states_accept_no_event() {
        for status in AssignmentStatus::all().iter().filter(|s| s.is_terminal()) {
            for event in [
                AssignmentEvent::Start,
                AssignmentEvent::Complete,
                AssignmentEvent::Cancel,
            ] {
                let err = transition(*status, event).unwrap_err();
                assert_eq!(err.code(), "E004");
            }
        }
    }

    #[test]
    fn test_cannot_skip_or_repeat_start() {
        assert!(transition(AssignmentStatus::Pending, AssignmentEvent::Complete).is_err());
        assert!(transition(AssignmentStatus::InProgress, AssignmentEvent::Start).is_err());
    }

    #[test]
    fn test_evaluation_status_mapping() {
        assert_eq!(evaluation_status_for(AssignmentStatus::Pending), None);
        assert_eq!(
            evaluation_status_for(AssignmentStatus::Completed),
            Some(EvaluationStatus::Completed)
        );
    }

    fn request(assignment_type: AssignmentType) -> CreateAssignmentRequest {
        CreateAssignmentRequest {
            survey_id: 1,
            evaluator_id: 0,
            evaluatee_id: 0,
            assignment_type,
            due_date: None,
        }
    }

    #[test]
    fn test_prepare_assignment_type_rules() {
        let s = survey(1, None, SurveyStatus::Active);
        let coordinator = user(2, UserRole::Coordinator, Some(1));
        let teacher = user(3, UserRole::Teacher, Some(1));

        let created = prepare_assignment(
            &request(AssignmentType::Coordinator),
            &s,
            &coordinator,
            &teacher,
            &coordinator,
        )
        .unwrap();
        assert_eq!(created.evaluator_id, 2);
        assert_eq!(created.assigned_by, 2);

        assert!(
            prepare_assignment(
                &request(AssignmentType::SelfEvaluation),
                &s,
                &coordinator,
                &teacher,
                &coordinator,
            )
            .is_err()
        );
        assert!(
            prepare_assignment(
                &request(AssignmentType::SelfEvaluation),
                &s,
                &teacher,
                &teacher,
                &coordinator,
            )
            .is_ok()
        );
        assert!(
            prepare_assignment(
                &request(AssignmentType::Coordinator),
                &s,
                &teacher,
                &teacher,
                &coordinator,
            )
            .is_err()
        );
    }

    #[test]
    fn test_assignment_does_not_require_can_evaluate() {
        let s = survey(1, None, SurveyStatus::Active);
        let coordinator = user(2, UserRole::Coordinator, Some(1));
        let other_teacher = user(4, UserRole::Teacher, Some(9));
        assert!(!coordinator.can_evaluate(&other_teacher));
        assert!(
            prepare_assignment(
                &request(AssignmentType::Coordinator),
                &s,
                &coordinator,
                &other_teacher,
                &coordinator,
            )
            .is_ok()
        );
    }

    #[test]
    fn test_inactive_survey_or_user_is_rejected() {
        let inactive = survey(1, None, SurveyStatus::Deactivated);
        let coordinator = user(2, UserRole::Coordinator, Some(1));
        let mut teacher = user(3, UserRole::Teacher, Some(1));
        let req = request(AssignmentType::Coordinator);
        assert!(prepare_assignment(&req, &inactive, &coordinator, &teacher, &coordinator).is_err());

        let active = survey(1, None, SurveyStatus::Active);
        teacher.status = UserStatus::Deactivated;
        assert!(prepare_assignment(&req, &active, &coordinator, &teacher, &coordinator).is_err());
    }

    #[test]
    fn test_deactivated_survey_cannot_be_started() {
        let inactive = survey(1, None, SurveyStatus::Deactivated);
        assert_eq!(ensure_survey_open(&inactive).unwrap_err().code(), "E004");
        assert!(ensure_survey_open(&survey(1, None, SurveyStatus::Active)).is_ok());
    }
}
