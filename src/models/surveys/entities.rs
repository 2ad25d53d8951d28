use serde::{Deserialize, Serialize};

// 问卷状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SurveyStatus {
    Active,
    Deactivated,
}

impl SurveyStatus {
    pub fn toggled(self) -> Self {
        match self {
            SurveyStatus::Active => SurveyStatus::Deactivated,
            SurveyStatus::Deactivated => SurveyStatus::Active,
        }
    }
}

impl std::fmt::Display for SurveyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SurveyStatus::Active => write!(f, "active"),
            SurveyStatus::Deactivated => write!(f, "deactivated"),
        }
    }
}

impl std::str::FromStr for SurveyStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(SurveyStatus::Active),
            "deactivated" => Ok(SurveyStatus::Deactivated),
            _ => Err(format!("Invalid survey status: {s}")),
        }
    }
}

// 问题类型
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    Scale,          // 量表
    Text,           // 文本
    MultipleChoice, // 多选
    YesNo,          // 是/否
    Rating,         // 评分
}

impl QuestionType {
    pub const SCALE: &'static str = "scale";
    pub const TEXT: &'static str = "text";
    pub const MULTIPLE_CHOICE: &'static str = "multiple_choice";
    pub const YES_NO: &'static str = "yes_no";
    pub const RATING: &'static str = "rating";

    /// 量表与评分题计入总分
    pub fn is_numeric(self) -> bool {
        matches!(self, QuestionType::Scale | QuestionType::Rating)
    }
}

impl<'de> Deserialize<'de> for QuestionType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<QuestionType>().map_err(|_| {
            serde::de::Error::custom(format!(
                "Invalid question type: '{s}'. Supported types: scale, text, multiple_choice, yes_no, rating"
            ))
        })
    }
}

impl std::fmt::Display for QuestionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            QuestionType::Scale => QuestionType::SCALE,
            QuestionType::Text => QuestionType::TEXT,
            QuestionType::MultipleChoice => QuestionType::MULTIPLE_CHOICE,
            QuestionType::YesNo => QuestionType::YES_NO,
            QuestionType::Rating => QuestionType::RATING,
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            QuestionType::SCALE => Ok(QuestionType::Scale),
            QuestionType::TEXT => Ok(QuestionType::Text),
            QuestionType::MULTIPLE_CHOICE => Ok(QuestionType::MultipleChoice),
            QuestionType::YES_NO => Ok(QuestionType::YesNo),
            QuestionType::RATING => Ok(QuestionType::Rating),
            _ => Err(format!("Invalid question type: {s}")),
        }
    }
}

// 问卷实体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Survey {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub instructions: Option<String>,
    pub status: SurveyStatus,
    /// 为空表示系统/公共问卷
    pub created_by: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Survey {
    pub fn is_active(&self) -> bool {
        self.status == SurveyStatus::Active
    }

    pub fn is_public(&self) -> bool {
        self.created_by.is_none()
    }

    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.created_by == Some(user_id)
    }
}

// 问题实体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,
    pub survey_id: i64,
    pub question_text: String,
    pub question_type: QuestionType,
    pub order_number: i32,
    pub is_required: bool,
    pub min_value: Option<i32>,
    pub max_value: Option<i32>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn survey(id: i64, created_by: Option<i64>, status: SurveyStatus) -> Survey {
        let now = chrono::Utc::now();
        Survey {
            id,
            title: format!("Survey {id}"),
            description: None,
            instructions: None,
            status,
            created_by,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn question(id: i64, question_type: QuestionType, order_number: i32) -> Question {
        let (min_value, max_value) = if question_type.is_numeric() {
            (Some(1), Some(10))
        } else {
            (None, None)
        };
        Question {
            id,
            survey_id: 1,
            question_text: format!("Question number {id}"),
            question_type,
            order_number,
            is_required: true,
            min_value,
            max_value,
            created_at: chrono::Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_type_parsing() {
        assert_eq!("yes_no".parse::<QuestionType>(), Ok(QuestionType::YesNo));
        assert!("essay".parse::<QuestionType>().is_err());

        let err = serde_json::from_str::<QuestionType>(r#""essay""#).unwrap_err();
        assert!(err.to_string().contains("Invalid question type"));
    }

    #[test]
    fn test_only_scale_and_rating_are_numeric() {
        assert!(QuestionType::Scale.is_numeric());
        assert!(QuestionType::Rating.is_numeric());
        assert!(!QuestionType::Text.is_numeric());
        assert!(!QuestionType::MultipleChoice.is_numeric());
        assert!(!QuestionType::YesNo.is_numeric());
    }
}
