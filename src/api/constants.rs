//! API 模块常量定义

/// 公共 / 登录用户接口前缀
pub const API_PREFIX: &str = "/api/v1";

/// 后台接口前缀
pub const ADMIN_PREFIX: &str = "/admin/v1";

/// 健康检查前缀
pub const HEALTH_PREFIX: &str = "/health";

pub const BEARER_PREFIX: &str = "Bearer ";

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// JSON 请求体上限（字节）
pub const MAX_JSON_PAYLOAD: usize = 256 * 1024;
