use serde::{Deserialize, Serialize};

// 用户角色（封闭枚举，调用方不得比较原始字符串）
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,       // 管理员
    Coordinator, // 协调员
    Teacher,     // 教师
}

impl UserRole {
    pub const ADMIN: &'static str = "admin";
    pub const COORDINATOR: &'static str = "coordinator";
    pub const TEACHER: &'static str = "teacher";

    pub fn all_roles() -> &'static [UserRole] {
        &[UserRole::Admin, UserRole::Coordinator, UserRole::Teacher]
    }

    pub fn description(self) -> &'static str {
        match self {
            UserRole::Admin => "Full access to users, surveys and evaluations",
            UserRole::Coordinator => "Manages surveys and evaluates teachers of their department",
            UserRole::Teacher => "Completes self evaluations and reviews own results",
        }
    }
}

impl<'de> Deserialize<'de> for UserRole {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<UserRole>().map_err(|_| {
            serde::de::Error::custom(format!(
                "Invalid user role: '{s}'. Supported roles: admin, coordinator, teacher"
            ))
        })
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Admin => write!(f, "{}", UserRole::ADMIN),
            UserRole::Coordinator => write!(f, "{}", UserRole::COORDINATOR),
            UserRole::Teacher => write!(f, "{}", UserRole::TEACHER),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            UserRole::ADMIN => Ok(UserRole::Admin),
            UserRole::COORDINATOR => Ok(UserRole::Coordinator),
            UserRole::TEACHER => Ok(UserRole::Teacher),
            _ => Err(format!("Invalid user role: {s}")),
        }
    }
}

// 用户生命周期状态（软删除即切换为 deactivated）
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    Active,      // 活跃
    Deactivated, // 已停用
}

impl UserStatus {
    pub fn toggled(self) -> Self {
        match self {
            UserStatus::Active => UserStatus::Deactivated,
            UserStatus::Deactivated => UserStatus::Active,
        }
    }
}

impl<'de> Deserialize<'de> for UserStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<UserStatus>().map_err(|_| {
            serde::de::Error::custom(format!(
                "Invalid user status: '{s}'. Supported statuses: active, deactivated"
            ))
        })
    }
}

impl std::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserStatus::Active => write!(f, "active"),
            UserStatus::Deactivated => write!(f, "deactivated"),
        }
    }
}

impl std::str::FromStr for UserStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(UserStatus::Active),
            "deactivated" => Ok(UserStatus::Deactivated),
            _ => Err(format!("Invalid user status: {s}")),
        }
    }
}

// 用户实体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing, default)] // 不序列化到JSON响应中
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub employee_code: Option<String>,
    pub phone: Option<String>,
    pub role: UserRole,
    pub department_id: Option<i64>,
    pub status: UserStatus,
    pub last_login: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// 协调员不隐含管理员身份
    pub fn is_coordinator(&self) -> bool {
        self.role == UserRole::Coordinator
    }

    pub fn is_teacher(&self) -> bool {
        self.role == UserRole::Teacher
    }

    /// 是否与另一用户处于同一部门（两者均无部门时视为相同）
    pub fn same_department(&self, other: &User) -> bool {
        self.department_id == other.department_id
    }

    /// 判断当前用户能否评估另一用户
    ///
    /// - 管理员：可评估任何人
    /// - 协调员：仅可评估本部门的教师
    /// - 教师：仅可自评
    pub fn can_evaluate(&self, other: &User) -> bool {
        match self.role {
            UserRole::Admin => true,
            UserRole::Coordinator => other.is_teacher() && self.same_department(other),
            UserRole::Teacher => self.id == other.id,
        }
    }

    /// 判断当前用户能否管理指定部门
    pub fn can_manage_department(&self, department_id: i64) -> bool {
        match self.role {
            UserRole::Admin => true,
            UserRole::Coordinator => self.department_id == Some(department_id),
            UserRole::Teacher => false,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::user;
    use super::*;

    const DEPARTMENTS: [Option<i64>; 3] = [None, Some(1), Some(2)];

    #[test]
    fn test_role_round_trips_through_strings() {
        for role in UserRole::all_roles() {
            assert_eq!(role.to_string().parse::<UserRole>(), Ok(*role));
        }
        assert!("coordinador".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_teacher_can_only_evaluate_self() {
        for dept in DEPARTMENTS {
            let teacher = user(1, UserRole::Teacher, dept);
            for role in UserRole::all_roles() {
                for other_dept in DEPARTMENTS {
                    let other = user(2, *role, other_dept);
                    assert!(!teacher.can_evaluate(&other));
                }
            }
            assert!(teacher.can_evaluate(&teacher.clone()));
        }
    }

    #[test]
    fn test_coordinator_evaluates_teachers_in_same_department() {
        for dept in DEPARTMENTS {
            let coordinator = user(1, UserRole::Coordinator, dept);
            for other_dept in DEPARTMENTS {
                let teacher = user(2, UserRole::Teacher, other_dept);
                assert_eq!(coordinator.can_evaluate(&teacher), dept == other_dept);
            }
            let peer = user(3, UserRole::Coordinator, dept);
            assert!(!coordinator.can_evaluate(&peer));
        }
    }

    #[test]
    fn test_admin_can_evaluate_anyone() {
        let admin = user(1, UserRole::Admin, None);
        for role in UserRole::all_roles() {
            assert!(admin.can_evaluate(&user(9, *role, Some(2))));
        }
    }

    #[test]
    fn test_can_manage_department() {
        assert!(user(1, UserRole::Admin, None).can_manage_department(5));
        assert!(user(1, UserRole::Coordinator, Some(5)).can_manage_department(5));
        assert!(!user(1, UserRole::Coordinator, Some(4)).can_manage_department(5));
        assert!(!user(1, UserRole::Coordinator, None).can_manage_department(5));
        assert!(!user(1, UserRole::Teacher, Some(5)).can_manage_department(5));
    }

    #[test]
    fn test_status_toggle() {
        assert_eq!(UserStatus::Active.toggled(), UserStatus::Deactivated);
        assert_eq!(UserStatus::Deactivated.toggled(), UserStatus::Active);
    }
}
