use super::assignments::advance_assignment;
use super::questions::load_questions;
use super::{SeaOrmStorage, now_ts, write_error};
use crate::entity::answers::{
    ActiveModel as AnswerActiveModel, Column as AnswerColumn, Entity as Answers,
};
use crate::entity::evaluations::{Column, Entity as Evaluations};
use crate::errors::{EvalSystemError, Result};
use crate::lifecycle::AssignmentEvent;
use crate::models::{
    assignments::entities::{AssignmentStatus, AssignmentType},
    evaluations::entities::{Answer, Evaluation, EvaluationStatus},
};
use crate::scoring::{ValidatedAnswer, missing_required, total_score};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

async fn find_evaluation<C: ConnectionTrait>(conn: &C, id: i64) -> Result<Evaluation> {
    Evaluations::find_by_id(id)
        .one(conn)
        .await
        .map_err(|e| EvalSystemError::database_operation(format!("查询评估失败: {e}")))?
        .map(|m| m.into_evaluation())
        .ok_or_else(|| EvalSystemError::not_found(format!("Evaluation {id} not found")))
}

async fn load_answers<C: ConnectionTrait>(conn: &C, evaluation_id: i64) -> Result<Vec<Answer>> {
    let answers = Answers::find()
        .filter(AnswerColumn::EvaluationId.eq(evaluation_id))
        .order_by_asc(AnswerColumn::QuestionId)
        .all(conn)
        .await
        .map_err(|e| EvalSystemError::database_operation(format!("查询答案失败: {e}")))?;

    Ok(answers.into_iter().map(|m| m.into_answer()).collect())
}

fn ensure_in_progress(evaluation: &Evaluation) -> Result<()> {
    if !evaluation.status.accepts_answers() {
        return Err(EvalSystemError::conflict(format!(
            "Evaluation {} is {} and can no longer be changed",
            evaluation.id, evaluation.status
        )));
    }
    Ok(())
}

impl SeaOrmStorage {
    pub async fn get_evaluation_by_id_impl(&self, id: i64) -> Result<Option<Evaluation>> {
        let result = Evaluations::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询评估失败: {e}")))?;

        Ok(result.map(|m| m.into_evaluation()))
    }

    pub async fn get_evaluation_by_assignment_impl(
        &self,
        assignment_id: i64,
    ) -> Result<Option<Evaluation>> {
        let result = Evaluations::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .one(&self.db)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询评估失败: {e}")))?;

        Ok(result.map(|m| m.into_evaluation()))
    }

    pub async fn list_answers_impl(&self, evaluation_id: i64) -> Result<Vec<Answer>> {
        load_answers(&self.db, evaluation_id).await
    }

    /// 保存答案：同一问题已有答案时覆盖
    pub async fn save_answers_impl(
        &self,
        evaluation_id: i64,
        answers: &[ValidatedAnswer],
    ) -> Result<Vec<Answer>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("开启事务失败: {e}")))?;

        let evaluation = find_evaluation(&txn, evaluation_id).await?;
        ensure_in_progress(&evaluation)?;

        let now = now_ts();
        for answer in answers {
            let existing = Answers::find()
                .filter(AnswerColumn::EvaluationId.eq(evaluation_id))
                .filter(AnswerColumn::QuestionId.eq(answer.question_id))
                .one(&txn)
                .await
                .map_err(|e| EvalSystemError::database_operation(format!("查询答案失败: {e}")))?;

            match existing {
                Some(model) => {
                    let mut model: AnswerActiveModel = model.into();
                    model.answer_value = Set(answer.answer_value);
                    model.answer_text = Set(answer.answer_text.clone());
                    model.updated_at = Set(now);
                    model.update(&txn).await.map_err(|e| {
                        EvalSystemError::database_operation(format!("更新答案失败: {e}"))
                    })?;
                }
                None => {
                    AnswerActiveModel {
                        evaluation_id: Set(evaluation_id),
                        question_id: Set(answer.question_id),
                        answer_value: Set(answer.answer_value),
                        answer_text: Set(answer.answer_text.clone()),
                        created_at: Set(now),
                        updated_at: Set(now),
                        ..Default::default()
                    }
                    .insert(&txn)
                    .await
                    .map_err(|e| {
                        write_error(e, "The question was answered concurrently", "保存答案失败")
                    })?;
                }
            }
        }

        let saved = load_answers(&txn, evaluation_id).await?;

        txn.commit()
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(saved)
    }

    /// 提交评估
    ///
    /// 所有必答题都必须已作答；计算总分后评估与分配同时进入 completed。
    pub async fn submit_evaluation_impl(
        &self,
        evaluation_id: i64,
        comments: Option<String>,
    ) -> Result<Evaluation> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("开启事务失败: {e}")))?;

        let evaluation = find_evaluation(&txn, evaluation_id).await?;
        ensure_in_progress(&evaluation)?;

        let questions = load_questions(&txn, evaluation.survey_id).await?;
        let answers = load_answers(&txn, evaluation_id).await?;

        let missing = missing_required(&questions, &answers);
        if !missing.is_empty() {
            let ids: Vec<String> = missing.iter().map(|id| id.to_string()).collect();
            return Err(EvalSystemError::validation(format!(
                "Required questions are unanswered: {}",
                ids.join(", ")
            )));
        }

        let score = total_score(&questions, &answers);
        let now = now_ts();

        let result = Evaluations::update_many()
            .col_expr(
                Column::Status,
                sea_orm::sea_query::Expr::value(EvaluationStatus::Completed.to_string()),
            )
            .col_expr(Column::CompletedAt, sea_orm::sea_query::Expr::value(now))
            .col_expr(Column::TotalScore, sea_orm::sea_query::Expr::value(score))
            .col_expr(Column::Comments, sea_orm::sea_query::Expr::value(comments))
            .filter(Column::Id.eq(evaluation_id))
            .filter(Column::Status.eq(EvaluationStatus::InProgress.to_string()))
            .exec(&txn)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("提交评估失败: {e}")))?;
        if result.rows_affected == 0 {
            return Err(EvalSystemError::conflict(
                "Evaluation was changed concurrently",
            ));
        }

        advance_assignment(
            &txn,
            evaluation.assignment_id,
            AssignmentStatus::InProgress,
            AssignmentEvent::Complete,
        )
        .await?;

        let completed = find_evaluation(&txn, evaluation_id).await?;

        txn.commit()
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(completed)
    }

    /// 被评估者在某问卷上最近一次完成的指定类型评估
    pub async fn latest_completed_evaluation_impl(
        &self,
        evaluatee_id: i64,
        survey_id: i64,
        assignment_type: AssignmentType,
    ) -> Result<Option<Evaluation>> {
        let result = Evaluations::find()
            .filter(Column::EvaluateeId.eq(evaluatee_id))
            .filter(Column::SurveyId.eq(survey_id))
            .filter(Column::AssignmentType.eq(assignment_type.to_string()))
            .filter(Column::Status.eq(EvaluationStatus::Completed.to_string()))
            .order_by_desc(Column::CompletedAt)
            .order_by_desc(Column::Id)
            .one(&self.db)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询评估失败: {e}")))?;

        Ok(result.map(|m| m.into_evaluation()))
    }
}
