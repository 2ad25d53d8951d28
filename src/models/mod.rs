pub mod assignments;
pub mod auth;
pub mod common;
pub mod departments;
pub mod evaluations;
pub mod surveys;
pub mod users;

pub use common::{ApiResponse, PaginationInfo, PaginationQuery};

// 程序启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}
