//! 作答校验与计分

use std::collections::HashMap;

use crate::catalog::{SCALE_LOWER_BOUND, SCALE_UPPER_BOUND};
use crate::errors::{EvalSystemError, Result};
use crate::models::{
    evaluations::{entities::Answer, requests::AnswerInput},
    surveys::entities::{Question, QuestionType},
};

/// 校验后的答案
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedAnswer {
    pub question_id: i64,
    pub answer_value: Option<i32>,
    pub answer_text: Option<String>,
}

/// 按题型校验单个答案
///
/// 量表/评分题必须给出范围内的数值，可附带文字说明；
/// 其余题型必须给出文字且不能给数值，是否题只接受 yes / no。
pub fn validate_answer(question: &Question, input: &AnswerInput) -> Result<ValidatedAnswer> {
    let text = input
        .answer_text
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty());

    if question.question_type.is_numeric() {
        let value = input.answer_value.ok_or_else(|| {
            EvalSystemError::validation(format!(
                "Question {} requires a numeric answer",
                question.id
            ))
        })?;
        let min = question.min_value.unwrap_or(SCALE_LOWER_BOUND);
        let max = question.max_value.unwrap_or(SCALE_UPPER_BOUND);
        if value < min || value > max {
            return Err(EvalSystemError::validation(format!(
                "Answer for question {} must be between {min} and {max}",
                question.id
            )));
        }
        return Ok(ValidatedAnswer {
            question_id: question.id,
            answer_value: Some(value),
            answer_text: text.map(str::to_string),
        });
    }

    if input.answer_value.is_some() {
        return Err(EvalSystemError::validation(format!(
            "Question {} does not accept a numeric answer",
            question.id
        )));
    }
    let text = text.ok_or_else(|| {
        EvalSystemError::validation(format!("Question {} requires a text answer", question.id))
    })?;

    let text = if question.question_type == QuestionType::YesNo {
        let normalized = text.to_lowercase();
        if normalized != "yes" && normalized != "no" {
            return Err(EvalSystemError::validation(format!(
                "Answer for question {} must be 'yes' or 'no'",
                question.id
            )));
        }
        normalized
    } else {
        text.to_string()
    };

    Ok(ValidatedAnswer {
        question_id: question.id,
        answer_value: None,
        answer_text: Some(text),
    })
}

/// 校验一批答案；问题必须属于该问卷，同一问题不能出现两次
pub fn validate_answers(questions: &[Question], inputs: &[AnswerInput]) -> Result<Vec<ValidatedAnswer>> {
    if inputs.is_empty() {
        return Err(EvalSystemError::validation("No answers provided"));
    }
    let by_id: HashMap<i64, &Question> = questions.iter().map(|q| (q.id, q)).collect();

    let mut validated: Vec<ValidatedAnswer> = Vec::with_capacity(inputs.len());
    for input in inputs {
        let question = by_id.get(&input.question_id).ok_or_else(|| {
            EvalSystemError::validation(format!(
                "Question {} does not belong to this survey",
                input.question_id
            ))
        })?;
        if validated.iter().any(|a| a.question_id == input.question_id) {
            return Err(EvalSystemError::validation(format!(
                "Question {} is answered more than once",
                input.question_id
            )));
        }
        validated.push(validate_answer(question, input)?);
    }
    Ok(validated)
}

/// 尚未作答的必答题ID
pub fn missing_required(questions: &[Question], answers: &[Answer]) -> Vec<i64> {
    questions
        .iter()
        .filter(|q| q.is_required)
        .filter(|q| !answers.iter().any(|a| a.question_id == q.id))
        .map(|q| q.id)
        .collect()
}

/// 数值题答案，按问题ID索引
fn numeric_answers(questions: &[Question], answers: &[Answer]) -> HashMap<i64, i32> {
    let numeric: HashMap<i64, bool> = questions
        .iter()
        .map(|q| (q.id, q.question_type.is_numeric()))
        .collect();

    answers
        .iter()
        .filter(|a| numeric.get(&a.question_id).copied().unwrap_or(false))
        .filter_map(|a| a.answer_value.map(|v| (a.question_id, v)))
        .collect()
}

/// 总分：量表/评分题数值答案的算术平均，没有数值答案时为空
pub fn total_score(questions: &[Question], answers: &[Answer]) -> Option<f64> {
    let values = numeric_answers(questions, answers);
    if values.is_empty() {
        return None;
    }
    let sum: f64 = values.values().map(|v| f64::from(*v)).sum();
    Some(sum / values.len() as f64)
}

/// 自评与协调员评估在相同数值题上的平均绝对差
pub fn average_difference(
    questions: &[Question],
    self_answers: &[Answer],
    coordinator_answers: &[Answer],
) -> Result<f64> {
    let own = numeric_answers(questions, self_answers);
    let other = numeric_answers(questions, coordinator_answers);

    let diffs: Vec<f64> = own
        .iter()
        .filter_map(|(id, v)| other.get(id).map(|w| f64::from((v - w).abs())))
        .collect();

    if diffs.is_empty() {
        return Err(EvalSystemError::validation(
            "The evaluations share no numeric answers to compare",
        ));
    }
    Ok(diffs.iter().sum::<f64>() / diffs.len() as f64)
}
