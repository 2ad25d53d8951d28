pub mod create;
pub mod list;
pub mod transitions;

use std::sync::Arc;

use crate::capability::{Action, Target, authorize};
use crate::errors::Result;
use crate::models::{
    assignments::{
        entities::Assignment,
        requests::{AssignmentListParams, CreateAssignmentRequest},
        responses::{AssignmentListResponse, AssignmentStartResponse},
    },
    users::entities::User,
};
use crate::services::found;
use crate::storage::Storage;

pub struct AssignmentService {
    storage: Arc<dyn Storage>,
}

impl AssignmentService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub(crate) fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    pub(crate) async fn load_authorized(
        &self,
        actor: &User,
        assignment_id: i64,
        action: Action,
    ) -> Result<Assignment> {
        let assignment = found(
            self.storage.get_assignment_by_id(assignment_id).await?,
            "Assignment",
            assignment_id,
        )?;
        authorize(actor, action, Target::Assignment(&assignment))?;
        Ok(assignment)
    }

    // 创建分配
    pub async fn create_assignment(
        &self,
        actor: &User,
        req: CreateAssignmentRequest,
    ) -> Result<Assignment> {
        create::create_assignment(self, actor, req).await
    }

    // 获取分配
    pub async fn get_assignment(&self, actor: &User, assignment_id: i64) -> Result<Assignment> {
        self.load_authorized(actor, assignment_id, Action::AssignmentRead)
            .await
    }

    // 分配列表
    pub async fn list_assignments(
        &self,
        actor: &User,
        query: AssignmentListParams,
    ) -> Result<AssignmentListResponse> {
        list::list_assignments(self, actor, query).await
    }

    // 开始评估
    pub async fn start_assignment(
        &self,
        actor: &User,
        assignment_id: i64,
    ) -> Result<AssignmentStartResponse> {
        transitions::start_assignment(self, actor, assignment_id).await
    }

    // 取消分配
    pub async fn cancel_assignment(&self, actor: &User, assignment_id: i64) -> Result<Assignment> {
        transitions::cancel_assignment(self, actor, assignment_id).await
    }
}
