//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码、类型名称和 HTTP 状态码。
//! 领域错误（认证、权限、冲突、校验）与基础设施错误共用同一个枚举，
//! 调用方通过 `code()` 获得稳定的错误种类。

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use std::fmt;

use crate::models::ApiResponse;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - status() 方法 - 返回对应的 HTTP 状态码
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_evalsystem_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal, $status:ident)
    ),* $(,)?) => {
        #[derive(Debug, Clone, PartialEq)]
        pub enum EvalSystemError {
            $($variant(String),)*
        }

        impl EvalSystemError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(EvalSystemError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(EvalSystemError::$variant(_) => $type_name,)*
                }
            }

            /// 获取 HTTP 状态码
            pub fn status(&self) -> StatusCode {
                match self {
                    $(EvalSystemError::$variant(_) => StatusCode::$status,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(EvalSystemError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl EvalSystemError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        EvalSystemError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_evalsystem_errors! {
    Unauthenticated("E001", "Unauthenticated", UNAUTHORIZED),
    PermissionDenied("E002", "Permission Denied", FORBIDDEN),
    NotFound("E003", "Resource Not Found", NOT_FOUND),
    Conflict("E004", "Conflict", CONFLICT),
    Validation("E005", "Validation Failed", BAD_REQUEST),
    DatabaseConfig("E006", "Database Configuration Error", INTERNAL_SERVER_ERROR),
    DatabaseConnection("E007", "Database Connection Error", INTERNAL_SERVER_ERROR),
    DatabaseOperation("E008", "Database Operation Error", INTERNAL_SERVER_ERROR),
    Serialization("E009", "Serialization Error", INTERNAL_SERVER_ERROR),
    Credential("E010", "Credential Error", INTERNAL_SERVER_ERROR),
    Configuration("E011", "Configuration Error", INTERNAL_SERVER_ERROR),
}

impl EvalSystemError {
    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }

    /// 是否属于调用方可见的领域错误（而非内部故障）
    pub fn is_client_error(&self) -> bool {
        self.status().is_client_error()
    }
}

impl fmt::Display for EvalSystemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for EvalSystemError {}

impl ResponseError for EvalSystemError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        // 内部错误不向客户端暴露细节
        let message = if self.is_client_error() {
            self.message().to_string()
        } else {
            tracing::error!("{}", self.format_simple());
            self.error_type().to_string()
        };
        HttpResponse::build(self.status()).json(ApiResponse::error_empty(self.code(), message))
    }
}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for EvalSystemError {
    fn from(err: sea_orm::DbErr) -> Self {
        EvalSystemError::DatabaseOperation(err.to_string())
    }
}

impl From<serde_json::Error> for EvalSystemError {
    fn from(err: serde_json::Error) -> Self {
        EvalSystemError::Serialization(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for EvalSystemError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        EvalSystemError::Credential(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, EvalSystemError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(EvalSystemError::unauthenticated("test").code(), "E001");
        assert_eq!(EvalSystemError::permission_denied("test").code(), "E002");
        assert_eq!(EvalSystemError::conflict("test").code(), "E004");
        assert_eq!(EvalSystemError::validation("test").code(), "E005");
    }

    #[test]
    fn test_error_status() {
        assert_eq!(
            EvalSystemError::unauthenticated("x").status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            EvalSystemError::permission_denied("x").status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(EvalSystemError::conflict("x").status(), StatusCode::CONFLICT);
        assert_eq!(
            EvalSystemError::database_operation("x").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_client_error_classification() {
        assert!(EvalSystemError::not_found("x").is_client_error());
        assert!(!EvalSystemError::serialization("x").is_client_error());
    }

    #[test]
    fn test_format_simple() {
        let err = EvalSystemError::validation("Title too short");
        let formatted = err.format_simple();
        assert!(formatted.contains("Validation Failed"));
        assert!(formatted.contains("Title too short"));
    }
}
