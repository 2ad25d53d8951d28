use super::UserService;
use crate::capability::{Action, Target, authorize, user_list_scope};
use crate::errors::{EvalSystemError, Result};
use crate::models::{
    departments::entities::Department,
    users::{
        entities::{User, UserRole},
        requests::{UserListParams, UserListQuery},
        responses::{RoleInfo, UserListResponse},
    },
};

pub async fn list_users(
    service: &UserService,
    actor: &User,
    query: UserListParams,
) -> Result<UserListResponse> {
    // 协调员只能看到本部门用户，教师无权列出
    let scope = user_list_scope(actor)?;
    let (page, size) = query.pagination.normalized();

    let list_query = UserListQuery {
        page,
        size,
        role: query.role,
        status: query.status,
        department_id: query.department_id,
        search: query.search,
        department_scope: scope.department_scope(),
    };

    service.storage().list_users_with_pagination(list_query).await
}

pub async fn list_departments(service: &UserService, actor: &User) -> Result<Vec<Department>> {
    if !actor.is_active() {
        return Err(EvalSystemError::permission_denied("Account is deactivated"));
    }
    service.storage().list_departments(true).await
}

pub fn list_roles(actor: &User) -> Result<Vec<RoleInfo>> {
    // 与列出用户的权限一致
    authorize(actor, Action::UserList, Target::Collection)?;
    Ok(UserRole::all_roles()
        .iter()
        .copied()
        .map(RoleInfo::from)
        .collect())
}
