use super::{SeaOrmStorage, now_ts};
use crate::entity::evaluation_comparisons::{ActiveModel, Column, Entity as EvaluationComparisons};
use crate::errors::{EvalSystemError, Result};
use crate::models::evaluations::entities::{ComparisonStatus, Evaluation, EvaluationComparison};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建对比记录；同一对评估已有对比时直接返回已有记录
    pub async fn create_comparison_impl(
        &self,
        self_evaluation: &Evaluation,
        coordinator_evaluation: &Evaluation,
        average_difference: f64,
    ) -> Result<EvaluationComparison> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("开启事务失败: {e}")))?;

        let existing = EvaluationComparisons::find()
            .filter(Column::SelfEvaluationId.eq(self_evaluation.id))
            .filter(Column::CoordinatorEvaluationId.eq(coordinator_evaluation.id))
            .one(&txn)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询对比记录失败: {e}")))?;
        if let Some(existing) = existing {
            return Ok(existing.into_comparison());
        }

        let created = ActiveModel {
            evaluatee_id: Set(self_evaluation.evaluatee_id),
            survey_id: Set(self_evaluation.survey_id),
            self_evaluation_id: Set(self_evaluation.id),
            coordinator_evaluation_id: Set(coordinator_evaluation.id),
            average_difference: Set(average_difference),
            status: Set(ComparisonStatus::Pending.to_string()),
            comparison_date: Set(now_ts()),
            reviewed_at: Set(None),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| {
            super::write_error(e, "A comparison for these evaluations already exists", "创建对比记录失败")
        })?;

        txn.commit()
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(created.into_comparison())
    }

    pub async fn get_comparison_by_id_impl(&self, id: i64) -> Result<Option<EvaluationComparison>> {
        let result = EvaluationComparisons::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询对比记录失败: {e}")))?;

        Ok(result.map(|m| m.into_comparison()))
    }

    pub async fn list_comparisons_for_evaluatee_impl(
        &self,
        evaluatee_id: i64,
    ) -> Result<Vec<EvaluationComparison>> {
        let result = EvaluationComparisons::find()
            .filter(Column::EvaluateeId.eq(evaluatee_id))
            .order_by_desc(Column::ComparisonDate)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询对比记录失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_comparison()).collect())
    }

    /// 标记对比已审阅（pending → reviewed）
    pub async fn mark_comparison_reviewed_impl(&self, id: i64) -> Result<EvaluationComparison> {
        let result = EvaluationComparisons::update_many()
            .col_expr(
                Column::Status,
                sea_orm::sea_query::Expr::value(ComparisonStatus::Reviewed.to_string()),
            )
            .col_expr(Column::ReviewedAt, sea_orm::sea_query::Expr::value(now_ts()))
            .filter(Column::Id.eq(id))
            .filter(Column::Status.eq(ComparisonStatus::Pending.to_string()))
            .exec(&self.db)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("更新对比记录失败: {e}")))?;

        let current = self
            .get_comparison_by_id_impl(id)
            .await?
            .ok_or_else(|| EvalSystemError::not_found(format!("Comparison {id} not found")))?;

        if result.rows_affected == 0 {
            return Err(EvalSystemError::conflict(format!(
                "Comparison {id} has already been reviewed"
            )));
        }
        Ok(current)
    }
}
