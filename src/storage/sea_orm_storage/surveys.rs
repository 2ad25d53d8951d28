use super::questions::insert_question;
use super::{SeaOrmStorage, now_ts, write_error};
use crate::catalog::SurveyChanges;
use crate::entity::surveys::{ActiveModel, Column, Entity as Surveys};
use crate::errors::{EvalSystemError, Result};
use crate::models::{
    PaginationInfo,
    surveys::{
        entities::{Survey, SurveyStatus},
        requests::{NewSurvey, SurveyListQuery},
        responses::{SurveyDetail, SurveyListResponse},
    },
};
use crate::utils::contains_literal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

const DUPLICATE_TITLE: &str = "A survey with this title already exists for this creator";

/// 同一创建者（含系统问卷）下标题唯一
async fn ensure_title_free<C: ConnectionTrait>(
    conn: &C,
    title: &str,
    created_by: Option<i64>,
    exclude_id: Option<i64>,
) -> Result<()> {
    let mut select = Surveys::find().filter(Column::Title.eq(title));
    select = match created_by {
        Some(user_id) => select.filter(Column::CreatedBy.eq(user_id)),
        None => select.filter(Column::CreatedBy.is_null()),
    };
    if let Some(id) = exclude_id {
        select = select.filter(Column::Id.ne(id));
    }

    let taken = select
        .count(conn)
        .await
        .map_err(|e| EvalSystemError::database_operation(format!("查询问卷失败: {e}")))?;
    if taken > 0 {
        return Err(EvalSystemError::conflict(DUPLICATE_TITLE));
    }
    Ok(())
}

impl SeaOrmStorage {
    /// 创建问卷及其内联问题
    pub async fn create_survey_impl(&self, survey: NewSurvey) -> Result<SurveyDetail> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("开启事务失败: {e}")))?;

        ensure_title_free(&txn, &survey.title, survey.created_by, None).await?;

        let now = now_ts();
        let model = ActiveModel {
            title: Set(survey.title),
            description: Set(survey.description),
            instructions: Set(survey.instructions),
            status: Set(survey.status.to_string()),
            created_by: Set(survey.created_by),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let created = model
            .insert(&txn)
            .await
            .map_err(|e| write_error(e, DUPLICATE_TITLE, "创建问卷失败"))?;

        let mut questions = Vec::with_capacity(survey.questions.len());
        for question in survey.questions {
            questions.push(insert_question(&txn, created.id, question).await?);
        }

        txn.commit()
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(SurveyDetail {
            survey: created.into_survey(),
            questions,
        })
    }

    pub async fn get_survey_by_id_impl(&self, id: i64) -> Result<Option<Survey>> {
        let result = Surveys::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询问卷失败: {e}")))?;

        Ok(result.map(|m| m.into_survey()))
    }

    /// 分页列出问卷
    pub async fn list_surveys_with_pagination_impl(
        &self,
        query: SurveyListQuery,
    ) -> Result<SurveyListResponse> {
        let page = query.page.max(1);
        let size = query.size.max(1);

        let mut select = Surveys::find();

        // 非管理员只能看到自己创建的问卷和公共问卷
        if let Some(user_id) = query.owner_or_public {
            select = select.filter(
                Condition::any()
                    .add(Column::CreatedBy.eq(user_id))
                    .add(Column::CreatedBy.is_null()),
            );
        }

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let search = search.trim();
            select = select.filter(
                Condition::any()
                    .add(contains_literal(Column::Title, search))
                    .add(contains_literal(Column::Description, search))
                    .add(contains_literal(Column::Instructions, search)),
            );
        }

        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        if let Some(created_by) = query.created_by {
            select = select.filter(Column::CreatedBy.eq(created_by));
        }

        select = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询问卷总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询问卷页数失败: {e}")))?;

        let surveys = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询问卷列表失败: {e}")))?;

        Ok(SurveyListResponse {
            items: surveys.into_iter().map(|m| m.into_survey()).collect(),
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    /// 更新问卷基本信息（重命名时重新检查标题唯一性）
    pub async fn update_survey_impl(
        &self,
        id: i64,
        changes: SurveyChanges,
    ) -> Result<Option<Survey>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("开启事务失败: {e}")))?;

        let Some(existing) = Surveys::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询问卷失败: {e}")))?
        else {
            return Ok(None);
        };

        if let Some(ref title) = changes.title {
            ensure_title_free(&txn, title, existing.created_by, Some(id)).await?;
        }

        let mut model: ActiveModel = existing.into();
        if let Some(title) = changes.title {
            model.title = Set(title);
        }
        if let Some(description) = changes.description {
            model.description = Set(description);
        }
        if let Some(instructions) = changes.instructions {
            model.instructions = Set(instructions);
        }
        model.updated_at = Set(now_ts());

        let updated = model
            .update(&txn)
            .await
            .map_err(|e| write_error(e, DUPLICATE_TITLE, "更新问卷失败"))?;

        txn.commit()
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(Some(updated.into_survey()))
    }

    pub async fn set_survey_status_impl(
        &self,
        id: i64,
        status: SurveyStatus,
    ) -> Result<Option<Survey>> {
        let result = Surveys::update_many()
            .col_expr(Column::Status, sea_orm::sea_query::Expr::value(status.to_string()))
            .col_expr(Column::UpdatedAt, sea_orm::sea_query::Expr::value(now_ts()))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("更新问卷状态失败: {e}")))?;

        if result.rows_affected == 0 {
            return Ok(None);
        }
        self.get_survey_by_id_impl(id).await
    }

    pub async fn count_surveys_impl(&self) -> Result<u64> {
        Surveys::find()
            .count(&self.db)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("统计问卷数量失败: {e}")))
    }
}
