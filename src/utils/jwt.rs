//! 会话令牌解析
//!
//! 令牌由认证服务签发，这里只读取声明（`sub`、`exp` 等）。
//! 配置了 `backend.jwt_secret` 时先在本地校验签名，过期由会话钩子负责刷新，不在此处拒绝。

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

pub const SESSION_AUDIENCE: &str = "authenticated";

// 会话令牌声明
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    #[serde(default)]
    pub exp: Option<i64>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

pub struct JwtUtils;

impl JwtUtils {
    /// 不校验签名，仅解码声明
    pub fn decode_unverified(token: &str) -> Result<SessionClaims, jsonwebtoken::errors::Error> {
        jsonwebtoken::dangerous::insecure_decode::<SessionClaims>(token).map(|data| data.claims)
    }

    /// HS256 校验签名和受众
    pub fn verify(token: &str, secret: &str) -> Result<SessionClaims, jsonwebtoken::errors::Error> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_audience(&[SESSION_AUDIENCE]);
        validation.required_spec_claims.clear();
        validation.required_spec_claims.insert("sub".to_string());

        decode::<SessionClaims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
            .map(|data| data.claims)
    }

    /// 令牌在 `leeway_secs` 秒内过期（或已过期）
    pub fn is_expiring(claims: &SessionClaims, now: i64, leeway_secs: i64) -> bool {
        match claims.exp {
            Some(exp) => exp <= now + leeway_secs,
            None => false,
        }
    }
}
