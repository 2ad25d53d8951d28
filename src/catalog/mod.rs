//! 问卷目录规则
//!
//! 问卷字段校验、问题字段校验以及题目顺序的计算。
//! 这里只做纯计算；需要读取现有数据的检查由存储层在同一事务内调用这些函数完成。

use std::collections::{HashMap, HashSet};

use crate::errors::{EvalSystemError, Result};
use crate::models::surveys::{
    entities::{Question, QuestionType, SurveyStatus},
    requests::{
        CreateQuestionRequest, CreateSurveyRequest, NewQuestion, NewSurvey, QuestionOrder,
        UpdateQuestionRequest, UpdateSurveyRequest,
    },
};
use crate::utils::validate::normalize_optional_text;

pub const TITLE_MIN_CHARS: usize = 3;
pub const TITLE_MAX_CHARS: usize = 255;
pub const DESCRIPTION_MAX_CHARS: usize = 1000;
pub const INSTRUCTIONS_MAX_CHARS: usize = 2000;
pub const QUESTION_TEXT_MIN_CHARS: usize = 5;

/// 量表题取值边界
pub const SCALE_LOWER_BOUND: i32 = 1;
pub const SCALE_UPPER_BOUND: i32 = 10;

/// 标题：去除首尾空白后长度 3..=255，唯一性按精确字符串比较
pub fn normalize_title(title: &str) -> Result<String> {
    let trimmed = title.trim();
    let len = trimmed.chars().count();
    if len < TITLE_MIN_CHARS {
        return Err(EvalSystemError::validation(
            "Title must be at least 3 characters long",
        ));
    }
    if len > TITLE_MAX_CHARS {
        return Err(EvalSystemError::validation(
            "Title cannot exceed 255 characters",
        ));
    }
    Ok(trimmed.to_string())
}

fn normalize_description(value: Option<&str>) -> Result<Option<String>> {
    normalize_optional_text(value, DESCRIPTION_MAX_CHARS, "Description")
        .map_err(EvalSystemError::validation)
}

fn normalize_instructions(value: Option<&str>) -> Result<Option<String>> {
    normalize_optional_text(value, INSTRUCTIONS_MAX_CHARS, "Instructions")
        .map_err(EvalSystemError::validation)
}

/// 校验创建请求；内联问题按提交顺序编号为 1..n
pub fn prepare_survey(req: CreateSurveyRequest, created_by: Option<i64>) -> Result<NewSurvey> {
    let title = normalize_title(&req.title)?;
    let description = normalize_description(req.description.as_deref())?;
    let instructions = normalize_instructions(req.instructions.as_deref())?;

    let mut questions = Vec::with_capacity(req.questions.len());
    for (index, question) in req.questions.into_iter().enumerate() {
        let mut prepared = prepare_question(question)?;
        prepared.order_number = Some(index as i32 + 1);
        questions.push(prepared);
    }

    Ok(NewSurvey {
        title,
        description,
        instructions,
        status: req.status.unwrap_or(SurveyStatus::Active),
        created_by,
        questions,
    })
}

/// 经过校验的问卷更新字段
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurveyChanges {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub instructions: Option<Option<String>>,
}

pub fn prepare_survey_update(req: &UpdateSurveyRequest) -> Result<SurveyChanges> {
    Ok(SurveyChanges {
        title: req.title.as_deref().map(normalize_title).transpose()?,
        description: req
            .description
            .as_deref()
            .map(|value| normalize_description(Some(value)))
            .transpose()?,
        instructions: req
            .instructions
            .as_deref()
            .map(|value| normalize_instructions(Some(value)))
            .transpose()?,
    })
}

fn normalize_question_text(text: &str) -> Result<String> {
    let trimmed = text.trim();
    if trimmed.chars().count() < QUESTION_TEXT_MIN_CHARS {
        return Err(EvalSystemError::validation(
            "Question text must be at least 5 characters long",
        ));
    }
    Ok(trimmed.to_string())
}

/// 校验取值范围；非数值题型不保存范围
fn normalize_range(
    question_type: QuestionType,
    min_value: Option<i32>,
    max_value: Option<i32>,
) -> Result<(Option<i32>, Option<i32>)> {
    if !question_type.is_numeric() {
        return Ok((None, None));
    }

    let min = min_value.unwrap_or(SCALE_LOWER_BOUND);
    let max = max_value.unwrap_or(SCALE_UPPER_BOUND);

    if question_type == QuestionType::Scale {
        let in_bounds = |v: i32| (SCALE_LOWER_BOUND..=SCALE_UPPER_BOUND).contains(&v);
        if !in_bounds(min) || !in_bounds(max) {
            return Err(EvalSystemError::validation(
                "Scale values must be between 1 and 10",
            ));
        }
    }
    if min >= max {
        return Err(EvalSystemError::validation(
            "min_value must be lower than max_value",
        ));
    }
    Ok((Some(min), Some(max)))
}

fn check_order_number(order_number: Option<i32>) -> Result<()> {
    match order_number {
        Some(order) if order < 1 => Err(EvalSystemError::validation(
            "order_number must be at least 1",
        )),
        _ => Ok(()),
    }
}

pub fn prepare_question(req: CreateQuestionRequest) -> Result<NewQuestion> {
    let question_text = normalize_question_text(&req.question_text)?;
    let (min_value, max_value) = normalize_range(req.question_type, req.min_value, req.max_value)?;
    check_order_number(req.order_number)?;

    Ok(NewQuestion {
        question_text,
        question_type: req.question_type,
        order_number: req.order_number,
        is_required: req.is_required,
        min_value,
        max_value,
    })
}

/// 将部分更新合并到现有问题上并重新校验
pub fn merge_question_update(existing: &Question, req: &UpdateQuestionRequest) -> Result<NewQuestion> {
    let question_text = match req.question_text.as_deref() {
        Some(text) => normalize_question_text(text)?,
        None => existing.question_text.clone(),
    };
    let question_type = req.question_type.unwrap_or(existing.question_type);
    let (min_value, max_value) = normalize_range(
        question_type,
        req.min_value.or(existing.min_value),
        req.max_value.or(existing.max_value),
    )?;
    check_order_number(req.order_number)?;

    Ok(NewQuestion {
        question_text,
        question_type,
        order_number: Some(req.order_number.unwrap_or(existing.order_number)),
        is_required: req.is_required.unwrap_or(existing.is_required),
        min_value,
        max_value,
    })
}

/// 下一个顺序号：现有最大值 + 1，没有问题时为 1
pub fn next_order_number(existing: &[i32]) -> i32 {
    existing.iter().copied().max().map_or(1, |max| max + 1)
}

/// 检查顺序号在问卷内未被其它问题占用
pub fn ensure_order_available(
    existing: &[(i64, i32)],
    order_number: i32,
    exclude_question: Option<i64>,
) -> Result<()> {
    let taken = existing
        .iter()
        .any(|(id, order)| *order == order_number && Some(*id) != exclude_question);
    if taken {
        return Err(EvalSystemError::conflict(format!(
            "Order number {order_number} is already used in this survey"
        )));
    }
    Ok(())
}

/// 计算批量重排结果
///
/// `existing` 为问卷内全部 (问题ID, 当前顺序号)。未知的问题ID被忽略；
/// 同一问题出现多次时以最后一次为准。返回需要变更的 (问题ID, 新顺序号)，
/// 按问题ID排序。重排后的顺序号必须仍然唯一。
pub fn plan_reorder(existing: &[(i64, i32)], requested: &[QuestionOrder]) -> Result<Vec<(i64, i32)>> {
    let mut final_orders: HashMap<i64, i32> = existing.iter().copied().collect();

    for item in requested {
        if !final_orders.contains_key(&item.question_id) {
            continue;
        }
        if item.order_number < 1 {
            return Err(EvalSystemError::validation(
                "order_number must be at least 1",
            ));
        }
        final_orders.insert(item.question_id, item.order_number);
    }

    let mut seen = HashSet::with_capacity(final_orders.len());
    for order in final_orders.values() {
        if !seen.insert(*order) {
            return Err(EvalSystemError::conflict(format!(
                "Reordering would assign order number {order} to more than one question"
            )));
        }
    }

    let mut changes: Vec<(i64, i32)> = existing
        .iter()
        .filter_map(|(id, current)| {
            let target = final_orders[id];
            (target != *current).then_some((*id, target))
        })
        .collect();
    changes.sort_unstable();
    Ok(changes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::surveys::entities::fixtures::question;

    fn create_question(question_type: QuestionType) -> CreateQuestionRequest {
        CreateQuestionRequest {
            question_text: "How clear are the explanations?".to_string(),
            question_type,
            order_number: None,
            is_required: true,
            min_value: None,
            max_value: None,
        }
    }

    #[test]
    fn test_title_bounds() {
        assert_eq!(normalize_title("  Eval 2025  ").unwrap(), "Eval 2025");
        assert_eq!(normalize_title(" ab ").unwrap_err().code(), "E005");
        assert!(normalize_title(&"x".repeat(255)).is_ok());
        assert!(normalize_title(&"x".repeat(256)).is_err());
    }

    #[test]
    fn test_prepare_survey_numbers_inline_questions() {
        let req = CreateSurveyRequest {
            title: " Eval 2025 ".to_string(),
            description: Some("   ".to_string()),
            instructions: Some("Rate 1 to 10".to_string()),
            status: None,
            questions: vec![
                create_question(QuestionType::Scale),
                create_question(QuestionType::Text),
            ],
        };
        let survey = prepare_survey(req, Some(4)).unwrap();
        assert_eq!(survey.title, "Eval 2025");
        assert_eq!(survey.description, None);
        assert_eq!(survey.status, SurveyStatus::Active);
        let orders: Vec<_> = survey.questions.iter().map(|q| q.order_number).collect();
        assert_eq!(orders, vec![Some(1), Some(2)]);
    }

    #[test]
    fn test_long_description_is_rejected() {
        let req = UpdateSurveyRequest {
            description: Some("d".repeat(1001)),
            ..Default::default()
        };
        assert!(prepare_survey_update(&req).is_err());

        let req = UpdateSurveyRequest {
            instructions: Some("i".repeat(2000)),
            ..Default::default()
        };
        assert!(prepare_survey_update(&req).is_ok());
    }

    #[test]
    fn test_question_text_minimum() {
        let mut req = create_question(QuestionType::Text);
        req.question_text = " Why ".to_string();
        assert_eq!(prepare_question(req).unwrap_err().code(), "E005");
    }

    #[test]
    fn test_scale_range_defaults_and_bounds() {
        let prepared = prepare_question(create_question(QuestionType::Scale)).unwrap();
        assert_eq!((prepared.min_value, prepared.max_value), (Some(1), Some(10)));

        let mut req = create_question(QuestionType::Scale);
        req.max_value = Some(11);
        assert!(prepare_question(req).is_err());

        let mut req = create_question(QuestionType::Scale);
        req.min_value = Some(5);
        req.max_value = Some(5);
        assert!(prepare_question(req).is_err());
    }

    #[test]
    fn test_rating_allows_wider_range() {
        let mut req = create_question(QuestionType::Rating);
        req.min_value = Some(0);
        req.max_value = Some(100);
        let prepared = prepare_question(req).unwrap();
        assert_eq!((prepared.min_value, prepared.max_value), (Some(0), Some(100)));
    }

    #[test]
    fn test_text_question_drops_range() {
        let mut req = create_question(QuestionType::YesNo);
        req.min_value = Some(3);
        let prepared = prepare_question(req).unwrap();
        assert_eq!((prepared.min_value, prepared.max_value), (None, None));
    }

    #[test]
    fn test_merge_question_update_keeps_unchanged_fields() {
        let existing = question(7, QuestionType::Scale, 3);
        let req = UpdateQuestionRequest {
            is_required: Some(false),
            ..Default::default()
        };
        let merged = merge_question_update(&existing, &req).unwrap();
        assert_eq!(merged.order_number, Some(3));
        assert!(!merged.is_required);
        assert_eq!(merged.question_text, existing.question_text);

        let req = UpdateQuestionRequest {
            question_type: Some(QuestionType::Text),
            ..Default::default()
        };
        let merged = merge_question_update(&existing, &req).unwrap();
        assert_eq!(merged.min_value, None);
    }

    #[test]
    fn test_next_order_number() {
        assert_eq!(next_order_number(&[]), 1);
        assert_eq!(next_order_number(&[1, 4, 2]), 5);
    }

    #[test]
    fn test_order_availability() {
        let existing = [(1, 1), (2, 2)];
        assert!(ensure_order_available(&existing, 3, None).is_ok());
        assert_eq!(
            ensure_order_available(&existing, 2, None).unwrap_err().code(),
            "E004"
        );
        assert!(ensure_order_available(&existing, 2, Some(2)).is_ok());
    }

    #[test]
    fn test_reorder_swaps_and_skips_unknown_ids() {
        let existing = [(1, 1), (2, 2), (3, 3)];
        let requested = [
            QuestionOrder { question_id: 1, order_number: 2 },
            QuestionOrder { question_id: 2, order_number: 1 },
            QuestionOrder { question_id: 99, order_number: 7 },
        ];
        assert_eq!(
            plan_reorder(&existing, &requested).unwrap(),
            vec![(1, 2), (2, 1)]
        );
    }

    #[test]
    fn test_reorder_rejects_duplicates_and_non_positive() {
        let existing = [(1, 1), (2, 2), (3, 3)];
        let duplicate = [QuestionOrder { question_id: 1, order_number: 3 }];
        assert_eq!(plan_reorder(&existing, &duplicate).unwrap_err().code(), "E004");

        let zero = [QuestionOrder { question_id: 1, order_number: 0 }];
        assert_eq!(plan_reorder(&existing, &zero).unwrap_err().code(), "E005");
    }

    #[test]
    fn test_reorder_result_keeps_orders_unique() {
        let existing = [(1, 1), (2, 2), (3, 3), (4, 4)];
        let requested = [
            QuestionOrder { question_id: 4, order_number: 1 },
            QuestionOrder { question_id: 1, order_number: 10 },
            QuestionOrder { question_id: 3, order_number: 3 },
        ];
        let changes = plan_reorder(&existing, &requested).unwrap();
        let mut orders: HashMap<i64, i32> = existing.iter().copied().collect();
        for (id, order) in changes {
            orders.insert(id, order);
        }
        let unique: HashSet<i32> = orders.values().copied().collect();
        assert_eq!(unique.len(), orders.len());
    }
}
