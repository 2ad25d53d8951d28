use super::{SeaOrmStorage, now_ts};
use crate::entity::evaluations::{
    ActiveModel as EvaluationActiveModel, Column as EvaluationColumn, Entity as Evaluations,
};
use crate::entity::survey_assignments::{ActiveModel, Column, Entity as SurveyAssignments};
use crate::errors::{EvalSystemError, Result};
use crate::lifecycle::{AssignmentEvent, evaluation_status_for, transition};
use crate::models::{
    PaginationInfo,
    assignments::{
        entities::{Assignment, AssignmentStatus},
        requests::{AssignmentListQuery, NewAssignment},
        responses::AssignmentListResponse,
    },
    evaluations::entities::{Evaluation, EvaluationStatus},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

async fn find_assignment<C: ConnectionTrait>(conn: &C, id: i64) -> Result<Assignment> {
    SurveyAssignments::find_by_id(id)
        .one(conn)
        .await
        .map_err(|e| EvalSystemError::database_operation(format!("查询分配失败: {e}")))?
        .map(|m| m.into_assignment())
        .ok_or_else(|| EvalSystemError::not_found(format!("Assignment {id} not found")))
}

/// 仅当当前状态仍为 `from` 时才写入 `to`，返回是否命中
async fn compare_and_set_status<C: ConnectionTrait>(
    conn: &C,
    id: i64,
    from: AssignmentStatus,
    to: AssignmentStatus,
) -> Result<bool> {
    let now = now_ts();
    let mut update = SurveyAssignments::update_many()
        .col_expr(Column::Status, sea_orm::sea_query::Expr::value(to.to_string()));
    update = match to {
        AssignmentStatus::InProgress => {
            update.col_expr(Column::StartedAt, sea_orm::sea_query::Expr::value(now))
        }
        AssignmentStatus::Completed => {
            update.col_expr(Column::CompletedAt, sea_orm::sea_query::Expr::value(now))
        }
        _ => update,
    };

    let result = update
        .filter(Column::Id.eq(id))
        .filter(Column::Status.eq(from.to_string()))
        .exec(conn)
        .await
        .map_err(|e| EvalSystemError::database_operation(format!("更新分配状态失败: {e}")))?;

    Ok(result.rows_affected > 0)
}

/// 在事务内推进分配状态；并发修改导致状态不符时返回 `Conflict`
pub(super) async fn advance_assignment<C: ConnectionTrait>(
    conn: &C,
    id: i64,
    expected: AssignmentStatus,
    event: AssignmentEvent,
) -> Result<AssignmentStatus> {
    let next = transition(expected, event)?;
    if !compare_and_set_status(conn, id, expected, next).await? {
        return Err(EvalSystemError::conflict(format!(
            "Cannot {} the assignment: its status has changed",
            event.verb()
        )));
    }
    Ok(next)
}

impl SeaOrmStorage {
    /// 创建分配（初始状态 pending）
    pub async fn create_assignment_impl(&self, assignment: NewAssignment) -> Result<Assignment> {
        let model = ActiveModel {
            survey_id: Set(assignment.survey_id),
            evaluator_id: Set(assignment.evaluator_id),
            evaluatee_id: Set(assignment.evaluatee_id),
            assignment_type: Set(assignment.assignment_type.to_string()),
            status: Set(AssignmentStatus::Pending.to_string()),
            due_date: Set(assignment.due_date.map(|d| d.timestamp())),
            assigned_by: Set(assignment.assigned_by),
            assigned_at: Set(now_ts()),
            started_at: Set(None),
            completed_at: Set(None),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("创建分配失败: {e}")))?;

        Ok(result.into_assignment())
    }

    pub async fn get_assignment_by_id_impl(&self, id: i64) -> Result<Option<Assignment>> {
        let result = SurveyAssignments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询分配失败: {e}")))?;

        Ok(result.map(|m| m.into_assignment()))
    }

    /// 分页列出分配
    pub async fn list_assignments_with_pagination_impl(
        &self,
        query: AssignmentListQuery,
    ) -> Result<AssignmentListResponse> {
        let page = query.page.max(1);
        let size = query.size.max(1);

        let mut select = SurveyAssignments::find();

        // 非管理员只能看到与自己相关的分配
        if let Some(user_id) = query.involving {
            select = select.filter(
                Condition::any()
                    .add(Column::EvaluatorId.eq(user_id))
                    .add(Column::EvaluateeId.eq(user_id))
                    .add(Column::AssignedBy.eq(user_id)),
            );
        }

        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        if let Some(survey_id) = query.survey_id {
            select = select.filter(Column::SurveyId.eq(survey_id));
        }

        select = select
            .order_by_desc(Column::AssignedAt)
            .order_by_desc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询分配总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询分配页数失败: {e}")))?;

        let assignments = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询分配列表失败: {e}")))?;

        Ok(AssignmentListResponse {
            items: assignments
                .into_iter()
                .map(|m| m.into_assignment())
                .collect(),
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    /// 开始分配：pending → in_progress，并创建对应的评估记录
    pub async fn start_assignment_impl(&self, id: i64) -> Result<(Assignment, Evaluation)> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("开启事务失败: {e}")))?;

        let current = find_assignment(&txn, id).await?;
        advance_assignment(&txn, id, current.status, AssignmentEvent::Start).await?;

        let evaluation = EvaluationActiveModel {
            assignment_id: Set(current.id),
            evaluator_id: Set(current.evaluator_id),
            evaluatee_id: Set(current.evaluatee_id),
            survey_id: Set(current.survey_id),
            assignment_type: Set(current.assignment_type.to_string()),
            status: Set(EvaluationStatus::InProgress.to_string()),
            started_at: Set(now_ts()),
            completed_at: Set(None),
            total_score: Set(None),
            comments: Set(None),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| {
            super::write_error(e, "The assignment has already been started", "创建评估失败")
        })?;

        let assignment = find_assignment(&txn, id).await?;

        txn.commit()
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("提交事务失败: {e}")))?;

        Ok((assignment, evaluation.into_evaluation()))
    }

    /// 取消分配；如已有评估记录则一并取消
    pub async fn cancel_assignment_impl(
        &self,
        id: i64,
        expected: AssignmentStatus,
    ) -> Result<Assignment> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("开启事务失败: {e}")))?;

        let next = advance_assignment(&txn, id, expected, AssignmentEvent::Cancel).await?;

        if let Some(status) = evaluation_status_for(next) {
            Evaluations::update_many()
                .col_expr(
                    EvaluationColumn::Status,
                    sea_orm::sea_query::Expr::value(status.to_string()),
                )
                .filter(EvaluationColumn::AssignmentId.eq(id))
                .exec(&txn)
                .await
                .map_err(|e| EvalSystemError::database_operation(format!("取消评估失败: {e}")))?;
        }

        let assignment = find_assignment(&txn, id).await?;

        txn.commit()
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(assignment)
    }
}
