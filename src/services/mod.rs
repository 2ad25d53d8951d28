//! 业务服务层
//!
//! 每个服务持有 `Arc<dyn Storage>`，以已认证的操作者为参数：
//! 先做权限判定，再调用存储层，返回领域结果。服务不依赖 HTTP。

pub mod assignments;
pub mod auth;
pub mod comparisons;
pub mod evaluations;
pub mod surveys;
pub mod users;

#[cfg(test)]
mod scenarios;

pub use assignments::AssignmentService;
pub use auth::AuthService;
pub use comparisons::ComparisonService;
pub use evaluations::EvaluationService;
pub use surveys::SurveyService;
pub use users::UserService;

use crate::errors::{EvalSystemError, Result};

/// 实体不存在时转换为 `NotFound`
pub(crate) fn found<T>(value: Option<T>, what: &str, id: i64) -> Result<T> {
    value.ok_or_else(|| EvalSystemError::not_found(format!("{what} {id} not found")))
}
