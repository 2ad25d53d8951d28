pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use std::sync::Arc;

use crate::errors::Result;
use crate::models::{
    departments::entities::Department,
    users::{
        entities::User,
        requests::{CreateUserRequest, UpdateUserRequest, UserListParams},
        responses::{RoleInfo, UserDetail, UserListResponse},
    },
};
use crate::storage::Storage;

pub struct UserService {
    storage: Arc<dyn Storage>,
}

impl UserService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub(crate) fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    // 获取用户列表
    pub async fn list_users(&self, actor: &User, query: UserListParams) -> Result<UserListResponse> {
        list::list_users(self, actor, query).await
    }

    // 创建用户
    pub async fn create_user(&self, actor: &User, user_data: CreateUserRequest) -> Result<User> {
        create::create_user(self, actor, user_data).await
    }

    // 根据ID获取用户
    pub async fn get_user(&self, actor: &User, user_id: i64) -> Result<UserDetail> {
        get::get_user(self, actor, user_id).await
    }

    // 更新用户信息
    pub async fn update_user(
        &self,
        actor: &User,
        user_id: i64,
        update_data: UpdateUserRequest,
    ) -> Result<User> {
        update::update_user(self, actor, user_id, update_data).await
    }

    // 删除用户（软删除）
    pub async fn delete_user(&self, actor: &User, user_id: i64) -> Result<User> {
        delete::delete_user(self, actor, user_id).await
    }

    // 切换用户状态
    pub async fn toggle_status(&self, actor: &User, user_id: i64) -> Result<User> {
        delete::toggle_status(self, actor, user_id).await
    }

    // 活跃部门列表
    pub async fn list_departments(&self, actor: &User) -> Result<Vec<Department>> {
        list::list_departments(self, actor).await
    }

    // 角色列表
    pub fn list_roles(&self, actor: &User) -> Result<Vec<RoleInfo>> {
        list::list_roles(actor)
    }
}
