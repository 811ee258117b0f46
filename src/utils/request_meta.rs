//! 请求来源信息
//!
//! 点击记录需要的 IP 和 User-Agent 原样取自请求头，不解析、不校验。

use actix_web::HttpRequest;
use actix_web::http::header::HeaderMap;

/// 请求头缺失时的占位值
pub const UNKNOWN: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestMeta {
    pub ip_address: String,
    pub user_agent: String,
}

impl RequestMeta {
    pub fn from_request(req: &HttpRequest) -> Self {
        Self::from_headers(req.headers())
    }

    /// IP：X-Forwarded-For → X-Real-IP → "unknown"；UA：User-Agent → "unknown"
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        Self {
            ip_address: header("x-forwarded-for")
                .or_else(|| header("x-real-ip"))
                .unwrap_or_else(|| UNKNOWN.to_string()),
            user_agent: header("user-agent").unwrap_or_else(|| UNKNOWN.to_string()),
        }
    }
}
