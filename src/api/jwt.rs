//! 身份令牌校验
//!
//! 令牌由外部身份提供方用共享密钥（HS256）签发，这里只校验签名、过期时间
//! 以及可选的 aud，从中取出用户 id 和邮箱。不签发、不刷新。

use jsonwebtoken::errors::{Error as JwtError, ErrorKind};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::ApiConfig;

/// Identity Token Claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityClaims {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
}

pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtService {
    pub fn new(secret: &str, leeway_secs: u64, audience: Option<&str>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = leeway_secs;
        match audience.filter(|a| !a.is_empty()) {
            Some(aud) => validation.set_audience(&[aud]),
            None => validation.validate_aud = false,
        }

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// 未配置密钥时返回 None，此时所有请求都视为匿名
    pub fn from_config(config: &ApiConfig) -> Option<Self> {
        if config.jwt_secret.is_empty() {
            warn!("api.jwt_secret is not configured, identity tokens will not be accepted");
            return None;
        }
        Some(Self::new(
            &config.jwt_secret,
            config.jwt_leeway_secs,
            config.jwt_audience.as_deref(),
        ))
    }

    pub fn verify(&self, token: &str) -> Result<IdentityClaims, JwtError> {
        let token_data = decode::<IdentityClaims>(token, &self.decoding_key, &self.validation)?;

        if token_data.claims.sub.trim().is_empty() {
            return Err(JwtError::from(ErrorKind::InvalidSubject));
        }

        Ok(token_data.claims)
    }

    /// 用同一密钥签发令牌（本地联调和测试用）
    pub fn sign(&self, claims: &IdentityClaims) -> Result<String, JwtError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
    }
}
