//! 统一 API 错误码定义

use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::errors::AffilinkError;

/// API 错误码枚举
///
/// 使用 serde_repr 序列化为数字。按千位分域：
/// - 0: 成功
/// - 1000-1099: 通用错误
/// - 2000-2099: 认证错误
/// - 3000-3099: 商品目录错误
/// - 4000-4099: 购物车 / 收藏错误
/// - 5000-5099: 邮件订阅错误
/// - 6000-6099: 联盟统计错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(i32)]
pub enum ErrorCode {
    // 成功
    Success = 0,

    // 通用错误 1000-1099
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    InternalServerError = 1005,
    Conflict = 1009,
    ServiceUnavailable = 1030,

    // 商品目录错误 3000-3099
    ProductNotFound = 3000,
    ProductInvalid = 3001,

    // 购物车 / 收藏错误 4000-4099
    CartItemNotFound = 4000,
    InvalidQuantity = 4001,

    // 邮件订阅错误 5000-5099
    InvalidEmail = 5000,
    AlreadySubscribed = 5001,
    SubscriberNotFound = 5002,

    // 联盟统计错误 6000-6099
    ClickNotFound = 6000,
    InvalidRevenue = 6001,
    InvalidTimezone = 6002,
    ConversionFailed = 6003,
}

impl From<&AffilinkError> for ErrorCode {
    fn from(err: &AffilinkError) -> Self {
        match err {
            AffilinkError::Validation(_) => ErrorCode::BadRequest,
            AffilinkError::NotFound(_) => ErrorCode::NotFound,
            AffilinkError::Conflict(_) => ErrorCode::Conflict,
            AffilinkError::Unauthorized(_) => ErrorCode::Unauthorized,
            AffilinkError::Forbidden(_) => ErrorCode::Forbidden,
            AffilinkError::DatabaseConnection(_) => ErrorCode::ServiceUnavailable,
            AffilinkError::DatabaseConfig(_)
            | AffilinkError::DatabaseOperation(_)
            | AffilinkError::FileOperation(_)
            | AffilinkError::Serialization(_) => ErrorCode::InternalServerError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_number() {
        assert_eq!(serde_json::to_string(&ErrorCode::Success).unwrap(), "0");
        assert_eq!(
            serde_json::to_string(&ErrorCode::ClickNotFound).unwrap(),
            "6000"
        );
    }

    #[test]
    fn test_from_affilink_error() {
        assert_eq!(
            ErrorCode::from(&AffilinkError::not_found("x")),
            ErrorCode::NotFound
        );
        assert_eq!(
            ErrorCode::from(&AffilinkError::database_operation("x")),
            ErrorCode::InternalServerError
        );
        assert_eq!(
            ErrorCode::from(&AffilinkError::conflict("x")),
            ErrorCode::Conflict
        );
    }
}
