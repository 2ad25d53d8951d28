use super::{SeaOrmStorage, now_ts, write_error};
use crate::catalog::{ensure_order_available, next_order_number, plan_reorder};
use crate::entity::questions::{ActiveModel, Column, Entity as Questions};
use crate::entity::survey_assignments::{Column as AssignmentColumn, Entity as SurveyAssignments};
use crate::errors::{EvalSystemError, Result};
use crate::models::surveys::{
    entities::Question,
    requests::{NewQuestion, QuestionOrder},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};

const DUPLICATE_ORDER: &str = "Order number is already used in this survey";

/// 问卷是否已有开始过的分配（此后题目的结构不可变）
async fn has_started_assignment<C: ConnectionTrait>(conn: &C, survey_id: i64) -> Result<bool> {
    let started = SurveyAssignments::find()
        .filter(AssignmentColumn::SurveyId.eq(survey_id))
        .filter(AssignmentColumn::StartedAt.is_not_null())
        .count(conn)
        .await
        .map_err(|e| EvalSystemError::database_operation(format!("查询分配失败: {e}")))?;
    Ok(started > 0)
}

/// 问卷内现有题目的 (ID, 序号)
async fn existing_orders<C: ConnectionTrait>(conn: &C, survey_id: i64) -> Result<Vec<(i64, i32)>> {
    Questions::find()
        .select_only()
        .column(Column::Id)
        .column(Column::OrderNumber)
        .filter(Column::SurveyId.eq(survey_id))
        .into_tuple::<(i64, i32)>()
        .all(conn)
        .await
        .map_err(|e| EvalSystemError::database_operation(format!("查询题目序号失败: {e}")))
}

pub(super) async fn load_questions<C: ConnectionTrait>(
    conn: &C,
    survey_id: i64,
) -> Result<Vec<Question>> {
    let questions = Questions::find()
        .filter(Column::SurveyId.eq(survey_id))
        .order_by_asc(Column::OrderNumber)
        .all(conn)
        .await
        .map_err(|e| EvalSystemError::database_operation(format!("查询题目列表失败: {e}")))?;

    Ok(questions.into_iter().map(|m| m.into_question()).collect())
}

/// 插入题目；未指定序号时取当前最大序号 + 1
///
/// 必须在事务内调用，序号的读取与写入才是原子的。
pub(super) async fn insert_question<C: ConnectionTrait>(
    conn: &C,
    survey_id: i64,
    question: NewQuestion,
) -> Result<Question> {
    let existing = existing_orders(conn, survey_id).await?;
    let order_number = match question.order_number {
        Some(order) => {
            ensure_order_available(&existing, order, None)?;
            order
        }
        None => {
            let orders: Vec<i32> = existing.iter().map(|(_, order)| *order).collect();
            next_order_number(&orders)
        }
    };

    let model = ActiveModel {
        survey_id: Set(survey_id),
        question_text: Set(question.question_text),
        question_type: Set(question.question_type.to_string()),
        order_number: Set(order_number),
        is_required: Set(question.is_required),
        min_value: Set(question.min_value),
        max_value: Set(question.max_value),
        created_at: Set(now_ts()),
        ..Default::default()
    };

    let created = model
        .insert(conn)
        .await
        .map_err(|e| write_error(e, DUPLICATE_ORDER, "创建题目失败"))?;

    Ok(created.into_question())
}

impl SeaOrmStorage {
    pub async fn list_questions_impl(&self, survey_id: i64) -> Result<Vec<Question>> {
        load_questions(&self.db, survey_id).await
    }

    pub async fn get_question_impl(
        &self,
        survey_id: i64,
        question_id: i64,
    ) -> Result<Option<Question>> {
        let result = Questions::find_by_id(question_id)
            .filter(Column::SurveyId.eq(survey_id))
            .one(&self.db)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询题目失败: {e}")))?;

        Ok(result.map(|m| m.into_question()))
    }

    pub async fn create_question_impl(
        &self,
        survey_id: i64,
        question: NewQuestion,
    ) -> Result<Question> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("开启事务失败: {e}")))?;

        let created = insert_question(&txn, survey_id, question).await?;

        txn.commit()
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(created)
    }

    /// 整体替换题目内容（调用方已合并更新字段）
    pub async fn update_question_impl(
        &self,
        survey_id: i64,
        question_id: i64,
        question: NewQuestion,
    ) -> Result<Option<Question>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("开启事务失败: {e}")))?;

        let Some(current) = Questions::find_by_id(question_id)
            .filter(Column::SurveyId.eq(survey_id))
            .one(&txn)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询题目失败: {e}")))?
        else {
            return Ok(None);
        };

        // 已作答的值须始终落在题目的取值范围内
        let reshaped = question.question_type.to_string() != current.question_type
            || question.min_value != current.min_value
            || question.max_value != current.max_value;
        if reshaped && has_started_assignment(&txn, survey_id).await? {
            return Err(EvalSystemError::conflict(
                "Question type and range cannot change once an evaluation of the survey has started",
            ));
        }

        let order_number = question.order_number.unwrap_or(current.order_number);
        if order_number != current.order_number {
            let existing = existing_orders(&txn, survey_id).await?;
            ensure_order_available(&existing, order_number, Some(question_id))?;
        }

        let mut model: ActiveModel = current.into();
        model.question_text = Set(question.question_text);
        model.question_type = Set(question.question_type.to_string());
        model.order_number = Set(order_number);
        model.is_required = Set(question.is_required);
        model.min_value = Set(question.min_value);
        model.max_value = Set(question.max_value);

        let updated = model
            .update(&txn)
            .await
            .map_err(|e| write_error(e, DUPLICATE_ORDER, "更新题目失败"))?;

        txn.commit()
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(Some(updated.into_question()))
    }

    /// 删除题目；问卷已有开始过的分配时拒绝
    pub async fn delete_question_impl(&self, survey_id: i64, question_id: i64) -> Result<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("开启事务失败: {e}")))?;

        if has_started_assignment(&txn, survey_id).await? {
            return Err(EvalSystemError::conflict(
                "Questions cannot be deleted once an evaluation of the survey has started",
            ));
        }

        let result = Questions::delete_many()
            .filter(Column::Id.eq(question_id))
            .filter(Column::SurveyId.eq(survey_id))
            .exec(&txn)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("删除题目失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 批量调整题目顺序
    ///
    /// 受影响的题目先移到临时负序号，再写入目标序号，
    /// 因此 (survey_id, order_number) 唯一索引在批处理过程中始终成立。
    pub async fn reorder_questions_impl(
        &self,
        survey_id: i64,
        orders: &[QuestionOrder],
    ) -> Result<Vec<Question>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("开启事务失败: {e}")))?;

        let existing = existing_orders(&txn, survey_id).await?;
        let changes = plan_reorder(&existing, orders)?;

        for (index, (question_id, _)) in changes.iter().enumerate() {
            let placeholder = -(index as i32) - 1;
            Questions::update_many()
                .col_expr(Column::OrderNumber, sea_orm::sea_query::Expr::value(placeholder))
                .filter(Column::Id.eq(*question_id))
                .exec(&txn)
                .await
                .map_err(|e| EvalSystemError::database_operation(format!("调整题目顺序失败: {e}")))?;
        }

        for (question_id, order_number) in &changes {
            Questions::update_many()
                .col_expr(Column::OrderNumber, sea_orm::sea_query::Expr::value(*order_number))
                .filter(Column::Id.eq(*question_id))
                .exec(&txn)
                .await
                .map_err(|e| write_error(e, DUPLICATE_ORDER, "调整题目顺序失败"))?;
        }

        let questions = load_questions(&txn, survey_id).await?;

        txn.commit()
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(questions)
    }
}
