use actix_web::{HttpRequest, error};

use crate::errors::EvalSystemError;

/// JSON 请求体解析失败时返回统一的校验错误
pub fn json_error_handler(err: error::JsonPayloadError, _req: &HttpRequest) -> error::Error {
    EvalSystemError::validation(format!("Invalid request body: {err}")).into()
}

/// 查询参数解析失败时返回统一的校验错误
pub fn query_error_handler(err: error::QueryPayloadError, _req: &HttpRequest) -> error::Error {
    EvalSystemError::validation(format!("Invalid query parameters: {err}")).into()
}

/// 路径参数解析失败时返回统一的校验错误
pub fn path_error_handler(err: error::PathError, _req: &HttpRequest) -> error::Error {
    EvalSystemError::validation(format!("Invalid path parameter: {err}")).into()
}
