use super::{SeaOrmStorage, now_ts, write_error};
use crate::entity::departments::Entity as Departments;
use crate::entity::users::{ActiveModel, Column, Entity as Users};
use crate::errors::{EvalSystemError, Result};
use crate::models::{
    PaginationInfo,
    users::{
        entities::{User, UserRole, UserStatus},
        requests::{NewUser, UserChanges, UserListQuery},
        responses::UserListResponse,
    },
};
use crate::utils::contains_literal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

/// 检查邮箱与工号未被其他用户占用
async fn ensure_identity_free<C: ConnectionTrait>(
    conn: &C,
    email: Option<&str>,
    employee_code: Option<&str>,
    exclude_id: Option<i64>,
) -> Result<()> {
    let mut exclude = Condition::all();
    if let Some(id) = exclude_id {
        exclude = exclude.add(Column::Id.ne(id));
    }

    if let Some(email) = email {
        let taken = Users::find()
            .filter(Column::Email.eq(email))
            .filter(exclude.clone())
            .count(conn)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询用户失败: {e}")))?;
        if taken > 0 {
            return Err(EvalSystemError::conflict(format!(
                "Email '{email}' is already in use"
            )));
        }
    }

    if let Some(code) = employee_code {
        let taken = Users::find()
            .filter(Column::EmployeeCode.eq(code))
            .filter(exclude)
            .count(conn)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询用户失败: {e}")))?;
        if taken > 0 {
            return Err(EvalSystemError::conflict(format!(
                "Employee code '{code}' is already in use"
            )));
        }
    }

    Ok(())
}

async fn ensure_department_exists<C: ConnectionTrait>(conn: &C, department_id: i64) -> Result<()> {
    let found = Departments::find_by_id(department_id)
        .one(conn)
        .await
        .map_err(|e| EvalSystemError::database_operation(format!("查询部门失败: {e}")))?;
    match found {
        Some(_) => Ok(()),
        None => Err(EvalSystemError::validation(format!(
            "Department {department_id} does not exist"
        ))),
    }
}

impl SeaOrmStorage {
    /// 创建用户
    pub async fn create_user_impl(&self, user: NewUser) -> Result<User> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("开启事务失败: {e}")))?;

        ensure_identity_free(
            &txn,
            Some(&user.email),
            user.employee_code.as_deref(),
            None,
        )
        .await?;
        if let Some(department_id) = user.department_id {
            ensure_department_exists(&txn, department_id).await?;
        }

        let now = now_ts();
        let model = ActiveModel {
            email: Set(user.email),
            password_hash: Set(user.password_hash),
            first_name: Set(user.first_name),
            last_name: Set(user.last_name),
            employee_code: Set(user.employee_code),
            phone: Set(user.phone),
            role: Set(user.role.to_string()),
            department_id: Set(user.department_id),
            status: Set(user.status.to_string()),
            last_login: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&txn)
            .await
            .map_err(|e| write_error(e, "Email or employee code is already in use", "创建用户失败"))?;

        txn.commit()
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(result.into_user())
    }

    /// 通过 ID 获取用户
    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        let result = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过邮箱获取用户
    pub async fn get_user_by_email_impl(&self, email: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 分页列出用户
    pub async fn list_users_with_pagination_impl(
        &self,
        query: UserListQuery,
    ) -> Result<UserListResponse> {
        let page = query.page.max(1);
        let size = query.size.max(1);

        let mut select = Users::find();

        // 部门范围（协调员只能看到本部门）
        if let Some(scope) = query.department_scope {
            select = match scope {
                Some(department_id) => select.filter(Column::DepartmentId.eq(department_id)),
                None => select.filter(Column::DepartmentId.is_null()),
            };
        }

        // 搜索条件
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let search = search.trim();
            select = select.filter(
                Condition::any()
                    .add(contains_literal(Column::Email, search))
                    .add(contains_literal(Column::FirstName, search))
                    .add(contains_literal(Column::LastName, search))
                    .add(contains_literal(Column::EmployeeCode, search)),
            );
        }

        if let Some(role) = query.role {
            select = select.filter(Column::Role.eq(role.to_string()));
        }

        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        if let Some(department_id) = query.department_id {
            select = select.filter(Column::DepartmentId.eq(department_id));
        }

        select = select
            .order_by_asc(Column::LastName)
            .order_by_asc(Column::FirstName)
            .order_by_asc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询用户总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询用户页数失败: {e}")))?;

        let users = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询用户列表失败: {e}")))?;

        Ok(UserListResponse {
            items: users.into_iter().map(|m| m.into_user()).collect(),
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    /// 更新用户信息
    ///
    /// 在同一事务内检查邮箱/工号唯一性，并保证至少保留一个活跃管理员。
    pub async fn update_user_impl(&self, id: i64, changes: UserChanges) -> Result<Option<User>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("开启事务失败: {e}")))?;

        let Some(existing) = Users::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询用户失败: {e}")))?
        else {
            return Ok(None);
        };
        let current = existing.into_user();

        ensure_identity_free(
            &txn,
            changes.email.as_deref(),
            changes.employee_code.as_ref().and_then(|code| code.as_deref()),
            Some(id),
        )
        .await?;
        if let Some(Some(department_id)) = changes.department_id {
            ensure_department_exists(&txn, department_id).await?;
        }

        // 最后一个活跃管理员不能被降级或停用
        let next_role = changes.role.unwrap_or(current.role);
        let next_status = changes.status.unwrap_or(current.status);
        let loses_admin = current.is_admin()
            && current.is_active()
            && (next_role != UserRole::Admin || next_status != UserStatus::Active);
        if loses_admin {
            let other_admins = Users::find()
                .filter(Column::Role.eq(UserRole::ADMIN))
                .filter(Column::Status.eq(UserStatus::Active.to_string()))
                .filter(Column::Id.ne(id))
                .count(&txn)
                .await
                .map_err(|e| {
                    EvalSystemError::database_operation(format!("统计管理员数量失败: {e}"))
                })?;
            if other_admins == 0 {
                return Err(EvalSystemError::conflict(
                    "Cannot remove the last active administrator",
                ));
            }
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now_ts()),
            ..Default::default()
        };
        if let Some(email) = changes.email {
            model.email = Set(email);
        }
        if let Some(password_hash) = changes.password_hash {
            model.password_hash = Set(password_hash);
        }
        if let Some(first_name) = changes.first_name {
            model.first_name = Set(first_name);
        }
        if let Some(last_name) = changes.last_name {
            model.last_name = Set(last_name);
        }
        if let Some(employee_code) = changes.employee_code {
            model.employee_code = Set(employee_code);
        }
        if let Some(phone) = changes.phone {
            model.phone = Set(phone);
        }
        if let Some(role) = changes.role {
            model.role = Set(role.to_string());
        }
        if let Some(department_id) = changes.department_id {
            model.department_id = Set(department_id);
        }
        if let Some(status) = changes.status {
            model.status = Set(status.to_string());
        }

        let updated = model
            .update(&txn)
            .await
            .map_err(|e| write_error(e, "Email or employee code is already in use", "更新用户失败"))?;

        txn.commit()
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(Some(updated.into_user()))
    }

    /// 更新密码哈希
    pub async fn update_password_impl(&self, id: i64, password_hash: &str) -> Result<bool> {
        let result = Users::update_many()
            .col_expr(
                Column::PasswordHash,
                sea_orm::sea_query::Expr::value(password_hash.to_string()),
            )
            .col_expr(Column::UpdatedAt, sea_orm::sea_query::Expr::value(now_ts()))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("更新密码失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 更新用户最后登录时间
    pub async fn update_last_login_impl(&self, id: i64) -> Result<bool> {
        let result = Users::update_many()
            .col_expr(Column::LastLogin, sea_orm::sea_query::Expr::value(now_ts()))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("更新最后登录时间失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn count_users_impl(&self) -> Result<u64> {
        Users::find()
            .count(&self.db)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("统计用户数量失败: {e}")))
    }
}
