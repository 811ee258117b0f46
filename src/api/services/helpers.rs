//! API 帮助函数

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::Serialize;

use crate::errors::AffilinkError;

use super::error_code::ErrorCode;
use super::types::ApiResponse;

/// 构建 JSON 响应
pub fn json_response<T: Serialize>(
    status: StatusCode,
    code: ErrorCode,
    message: impl Into<String>,
    data: Option<T>,
) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(ApiResponse {
            code: code as i32,
            message: message.into(),
            data,
        })
}

/// 构建成功响应
pub fn success_response<T: Serialize>(data: T) -> HttpResponse {
    json_response(StatusCode::OK, ErrorCode::Success, "OK", Some(data))
}

/// 带自定义 message 的成功响应
pub fn success_with_message<T: Serialize>(
    status: StatusCode,
    message: &str,
    data: Option<T>,
) -> HttpResponse {
    json_response(status, ErrorCode::Success, message, data)
}

/// 构建错误响应
pub fn error_response(status: StatusCode, error_code: ErrorCode, message: &str) -> HttpResponse {
    json_response::<()>(status, error_code, message, None)
}

/// 从 AffilinkError 构建错误响应（自动映射 HTTP 状态码和 ErrorCode）
pub fn error_from_affilink(err: &AffilinkError) -> HttpResponse {
    error_response(err.http_status(), ErrorCode::from(err), err.message())
}

/// 同上，但用调用方指定的业务错误码
pub fn error_with_code(err: &AffilinkError, code: ErrorCode) -> HttpResponse {
    error_response(err.http_status(), code, err.message())
}

/// 统一 Result → HttpResponse 转换
///
/// 成功时返回 200 OK + JSON 数据，失败时自动映射 AffilinkError。
pub fn api_result<T, E>(result: Result<T, E>) -> HttpResponse
where
    T: Serialize,
    E: Into<AffilinkError>,
{
    match result {
        Ok(data) => success_response(data),
        Err(e) => {
            let err: AffilinkError = e.into();
            error_from_affilink(&err)
        }
    }
}
