use crate::models::assignments::entities::AssignmentType;
use serde::{Deserialize, Serialize};

// 评估状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationStatus {
    InProgress,
    Completed,
    Cancelled,
}

impl EvaluationStatus {
    /// 已结束的评估不再接受作答
    pub fn accepts_answers(self) -> bool {
        self == EvaluationStatus::InProgress
    }
}

impl std::fmt::Display for EvaluationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EvaluationStatus::InProgress => write!(f, "in_progress"),
            EvaluationStatus::Completed => write!(f, "completed"),
            EvaluationStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for EvaluationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in_progress" => Ok(EvaluationStatus::InProgress),
            "completed" => Ok(EvaluationStatus::Completed),
            "cancelled" => Ok(EvaluationStatus::Cancelled),
            _ => Err(format!("Invalid evaluation status: {s}")),
        }
    }
}

// 评估实体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evaluation {
    pub id: i64,
    pub assignment_id: i64,
    pub evaluator_id: i64,
    pub evaluatee_id: i64,
    pub survey_id: i64,
    pub assignment_type: AssignmentType,
    pub status: EvaluationStatus,
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub total_score: Option<f64>,
    pub comments: Option<String>,
}

// 答案实体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    pub id: i64,
    pub evaluation_id: i64,
    pub question_id: i64,
    pub answer_value: Option<i32>,
    pub answer_text: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 对比状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonStatus {
    Pending,
    Reviewed,
}

impl std::fmt::Display for ComparisonStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComparisonStatus::Pending => write!(f, "pending"),
            ComparisonStatus::Reviewed => write!(f, "reviewed"),
        }
    }
}

impl std::str::FromStr for ComparisonStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ComparisonStatus::Pending),
            "reviewed" => Ok(ComparisonStatus::Reviewed),
            _ => Err(format!("Invalid comparison status: {s}")),
        }
    }
}

// 自评与协调员评估的对比
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationComparison {
    pub id: i64,
    pub evaluatee_id: i64,
    pub survey_id: i64,
    pub self_evaluation_id: i64,
    pub coordinator_evaluation_id: i64,
    pub average_difference: f64,
    pub status: ComparisonStatus,
    pub comparison_date: chrono::DateTime<chrono::Utc>,
    pub reviewed_at: Option<chrono::DateTime<chrono::Utc>>,
}
