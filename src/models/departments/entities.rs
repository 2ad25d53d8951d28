use serde::{Deserialize, Serialize};

/// 系统初始化时写入的默认部门
pub const DEFAULT_DEPARTMENTS: &[(&str, &str)] = &[
    ("Mathematics", "Department of Mathematical Sciences"),
    ("Sciences", "Department of Natural Sciences"),
    ("Humanities", "Department of Humanities and Letters"),
    ("English", "Department of English Language"),
    ("Physical Education", "Department of Physical Education and Sports"),
    ("Arts", "Department of Arts and Culture"),
    ("Technology", "Department of Technology and Computing"),
    ("Administration", "Administrative Department"),
];

// 部门实体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Department {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
