use serde::{Deserialize, Serialize};

// 分配类型
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum AssignmentType {
    #[serde(rename = "self")]
    SelfEvaluation, // 自评
    #[serde(rename = "coordinator")]
    Coordinator, // 协调员评估
}

impl AssignmentType {
    pub const SELF: &'static str = "self";
    pub const COORDINATOR: &'static str = "coordinator";
}

impl<'de> Deserialize<'de> for AssignmentType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<AssignmentType>().map_err(|_| {
            serde::de::Error::custom(format!(
                "Invalid assignment type: '{s}'. Supported types: self, coordinator"
            ))
        })
    }
}

impl std::fmt::Display for AssignmentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssignmentType::SelfEvaluation => write!(f, "{}", AssignmentType::SELF),
            AssignmentType::Coordinator => write!(f, "{}", AssignmentType::COORDINATOR),
        }
    }
}

impl std::str::FromStr for AssignmentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            AssignmentType::SELF => Ok(AssignmentType::SelfEvaluation),
            AssignmentType::COORDINATOR => Ok(AssignmentType::Coordinator),
            _ => Err(format!("Invalid assignment type: {s}")),
        }
    }
}

// 分配状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    Pending,    // 待开始
    InProgress, // 进行中
    Completed,  // 已完成
    Cancelled,  // 已取消
}

impl AssignmentStatus {
    pub fn all() -> &'static [AssignmentStatus] {
        &[
            AssignmentStatus::Pending,
            AssignmentStatus::InProgress,
            AssignmentStatus::Completed,
            AssignmentStatus::Cancelled,
        ]
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, AssignmentStatus::Completed | AssignmentStatus::Cancelled)
    }
}

impl std::fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssignmentStatus::Pending => write!(f, "pending"),
            AssignmentStatus::InProgress => write!(f, "in_progress"),
            AssignmentStatus::Completed => write!(f, "completed"),
            AssignmentStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for AssignmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(AssignmentStatus::Pending),
            "in_progress" => Ok(AssignmentStatus::InProgress),
            "completed" => Ok(AssignmentStatus::Completed),
            "cancelled" => Ok(AssignmentStatus::Cancelled),
            _ => Err(format!("Invalid assignment status: {s}")),
        }
    }
}

// 问卷分配实体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    pub id: i64,
    pub survey_id: i64,
    pub evaluator_id: i64,
    pub evaluatee_id: i64,
    pub assignment_type: AssignmentType,
    pub status: AssignmentStatus,
    pub due_date: Option<chrono::DateTime<chrono::Utc>>,
    pub assigned_by: i64,
    pub assigned_at: chrono::DateTime<chrono::Utc>,
    pub started_at: Option<chrono::DateTime<chrono::Utc>>,
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Assignment {
    /// 是否涉及该用户（评估者、被评估者或分配者）
    pub fn involves(&self, user_id: i64) -> bool {
        self.evaluator_id == user_id || self.evaluatee_id == user_id || self.assigned_by == user_id
    }

    pub fn has_started(&self) -> bool {
        self.started_at.is_some()
    }
}
