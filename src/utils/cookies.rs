//! 会话 Cookie
//!
//! 访问令牌和刷新令牌分别存放在 `<prefix>-access-token` 与 `<prefix>-refresh-token` 中。

use actix_web::HttpRequest;
use actix_web::cookie::{Cookie, SameSite, time::Duration};

use crate::config::AppConfig;
use crate::models::users::AuthSession;

#[derive(Debug, Clone)]
pub struct SessionCookies {
    prefix: String,
    max_age_days: i64,
    secure: bool,
}

impl SessionCookies {
    pub fn new(prefix: impl Into<String>, max_age_days: i64, secure: bool) -> Self {
        Self {
            prefix: prefix.into(),
            max_age_days,
            secure,
        }
    }

    pub fn from_config() -> Self {
        let config = AppConfig::get();
        Self::new(
            config.session.cookie_prefix.clone(),
            config.session.max_age_days,
            config.is_production(),
        )
    }

    pub fn access_name(&self) -> String {
        format!("{}-access-token", self.prefix)
    }

    pub fn refresh_name(&self) -> String {
        format!("{}-refresh-token", self.prefix)
    }

    /// 读取请求中的 (访问令牌, 刷新令牌)
    pub fn read(&self, req: &HttpRequest) -> (Option<String>, Option<String>) {
        let value = |name: String| {
            req.cookie(&name)
                .map(|c| c.value().to_string())
                .filter(|v| !v.is_empty())
        };
        (value(self.access_name()), value(self.refresh_name()))
    }

    fn build(&self, name: String, value: String, max_age: Duration) -> Cookie<'static> {
        Cookie::build(name, value)
            .path("/")
            .max_age(max_age)
            .same_site(SameSite::Lax)
            .http_only(true)
            .secure(self.secure)
            .finish()
    }

    /// 登录或刷新成功后写入的两个 Cookie
    pub fn issue(&self, session: &AuthSession) -> Vec<Cookie<'static>> {
        let max_age = Duration::days(self.max_age_days);
        vec![
            self.build(self.access_name(), session.access_token.clone(), max_age),
            self.build(self.refresh_name(), session.refresh_token.clone(), max_age),
        ]
    }

    /// 清除会话的过期 Cookie
    pub fn removal(&self) -> Vec<Cookie<'static>> {
        vec![
            self.build(self.access_name(), String::new(), Duration::ZERO),
            self.build(self.refresh_name(), String::new(), Duration::ZERO),
        ]
    }
}
