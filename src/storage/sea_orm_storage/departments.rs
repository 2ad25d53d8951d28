use super::{SeaOrmStorage, now_ts, write_error};
use crate::entity::departments::{ActiveModel, Column, Entity as Departments};
use crate::errors::{EvalSystemError, Result};
use crate::models::departments::entities::Department;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 列出部门（按名称排序）
    pub async fn list_departments_impl(&self, active_only: bool) -> Result<Vec<Department>> {
        let mut select = Departments::find();
        if active_only {
            select = select.filter(Column::IsActive.eq(true));
        }

        let departments = select
            .order_by_asc(Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询部门列表失败: {e}")))?;

        Ok(departments.into_iter().map(|m| m.into_department()).collect())
    }

    pub async fn get_department_by_id_impl(&self, id: i64) -> Result<Option<Department>> {
        let result = Departments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询部门失败: {e}")))?;

        Ok(result.map(|m| m.into_department()))
    }

    pub async fn create_department_impl(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<Department> {
        let now = now_ts();
        let model = ActiveModel {
            name: Set(name.to_string()),
            description: Set(description.map(str::to_string)),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(|e| {
            write_error(e, &format!("Department '{name}' already exists"), "创建部门失败")
        })?;

        Ok(result.into_department())
    }

    pub async fn count_departments_impl(&self) -> Result<u64> {
        Departments::find()
            .count(&self.db)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("统计部门数量失败: {e}")))
    }
}
