use async_trait::async_trait;
use reqwest::{Client as HttpClient, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, warn};

use super::IdentityProvider;
use crate::config::AppConfig;
use crate::errors::{Result, StudyDeskError};
use crate::models::users::{AuthSession, AuthUser, Role};

/// 认证服务 `/auth/v1` 客户端
pub struct GoTrueClient {
    http: HttpClient,
    auth_url: String,
    anon_key: String,
    service_role_key: String,
}

impl GoTrueClient {
    pub fn new(
        http: HttpClient,
        auth_url: impl Into<String>,
        anon_key: impl Into<String>,
        service_role_key: impl Into<String>,
    ) -> Self {
        Self {
            http,
            auth_url: auth_url.into(),
            anon_key: anon_key.into(),
            service_role_key: service_role_key.into(),
        }
    }

    pub fn from_config(http: HttpClient) -> Self {
        let config = AppConfig::get();
        Self::new(
            http,
            config.auth_url(),
            config.backend.anon_key.clone(),
            config.backend.service_role_key.clone(),
        )
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.auth_url, path)
    }

    /// 匿名密钥请求
    fn public(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.header("apikey", &self.anon_key)
    }

    /// 用户令牌请求
    fn as_user(&self, builder: RequestBuilder, access_token: &str) -> RequestBuilder {
        self.public(builder).bearer_auth(access_token)
    }

    /// service role 请求
    fn as_admin(&self, builder: RequestBuilder) -> Result<RequestBuilder> {
        if self.service_role_key.is_empty() {
            return Err(StudyDeskError::backend_config(
                "Service role key is not configured; admin user management is unavailable",
            ));
        }
        Ok(builder
            .header("apikey", &self.service_role_key)
            .bearer_auth(&self.service_role_key))
    }

    async fn send(builder: RequestBuilder) -> Result<Response> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|v| error_message(&v))
            .unwrap_or_else(|| format!("Authentication service returned HTTP {status}"));
        Err(map_status_error(status, message))
    }

    async fn send_json<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T> {
        let response = Self::send(builder).await?;
        Ok(response.json::<T>().await?)
    }
}

/// 从错误响应体中取出可读信息
pub fn error_message(body: &Value) -> Option<String> {
    ["error_description", "msg", "message", "error"]
        .iter()
        .filter_map(|key| body.get(*key))
        .find_map(|v| v.as_str().filter(|s| !s.is_empty()).map(str::to_string))
}

pub fn map_status_error(status: StatusCode, message: String) -> StudyDeskError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => StudyDeskError::authentication(message),
        s if s.is_client_error() => StudyDeskError::validation(message),
        _ => StudyDeskError::remote_service(message),
    }
}

#[async_trait]
impl IdentityProvider for GoTrueClient {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<AuthSession> {
        let builder = self
            .public(self.http.post(self.url("/token")))
            .query(&[("grant_type", "password")])
            .json(&json!({ "email": email, "password": password }));
        Self::send_json(builder).await
    }

    async fn get_user(&self, access_token: &str) -> Result<AuthUser> {
        let builder = self.as_user(self.http.get(self.url("/user")), access_token);
        Self::send_json(builder).await
    }

    async fn refresh_session(&self, refresh_token: &str) -> Result<AuthSession> {
        let builder = self
            .public(self.http.post(self.url("/token")))
            .query(&[("grant_type", "refresh_token")])
            .json(&json!({ "refresh_token": refresh_token }));
        let session: AuthSession = Self::send_json(builder).await?;
        debug!("Session refreshed for user {}", session.user.id);
        Ok(session)
    }

    async fn sign_out(&self, access_token: &str) -> Result<()> {
        let builder = self.as_user(self.http.post(self.url("/logout")), access_token);
        Self::send(builder).await.map(|_| ())
    }

    async fn admin_create_user(
        &self,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<AuthUser> {
        let builder = self.as_admin(self.http.post(self.url("/admin/users")))?.json(&json!({
            "email": email,
            "password": password,
            "email_confirm": true,
            "user_metadata": { "role": role.as_str() },
        }));
        Self::send_json(builder).await
    }

    async fn admin_delete_user(&self, user_id: &str) -> Result<()> {
        let builder = self.as_admin(
            self.http
                .delete(self.url(&format!("/admin/users/{user_id}"))),
        )?;
        Self::send(builder).await.map(|_| ())
    }

    async fn admin_update_password(&self, user_id: &str, password: &str) -> Result<()> {
        let builder = self
            .as_admin(self.http.put(self.url(&format!("/admin/users/{user_id}"))))?
            .json(&json!({ "password": password }));
        Self::send(builder).await.map(|_| ())
    }

    async fn health_check(&self) -> Result<()> {
        let builder = self.public(self.http.get(self.url("/health")));
        match Self::send(builder).await {
            Ok(_) => Ok(()),
            Err(e) => {
                warn!("Authentication service health check failed: {}", e);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_precedence() {
        let body = json!({ "error": "invalid_grant", "error_description": "Invalid login credentials" });
        assert_eq!(
            error_message(&body).as_deref(),
            Some("Invalid login credentials")
        );

        let body = json!({ "code": 422, "msg": "User already registered" });
        assert_eq!(error_message(&body).as_deref(), Some("User already registered"));

        let body = json!({ "error": "" , "message": "boom" });
        assert_eq!(error_message(&body).as_deref(), Some("boom"));

        assert_eq!(error_message(&json!({ "code": 500 })), None);
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            map_status_error(StatusCode::UNAUTHORIZED, "x".into()).code(),
            "E012"
        );
        assert_eq!(
            map_status_error(StatusCode::UNPROCESSABLE_ENTITY, "x".into()).code(),
            "E007"
        );
        assert_eq!(
            map_status_error(StatusCode::BAD_GATEWAY, "x".into()).code(),
            "E004"
        );
    }

    #[tokio::test]
    async fn test_admin_calls_require_service_role() {
        let client = GoTrueClient::new(HttpClient::new(), "http://127.0.0.1:9/auth/v1", "anon", "");
        let err = client.admin_delete_user("u1").await.unwrap_err();
        assert_eq!(err.code(), "E003");
    }
}
