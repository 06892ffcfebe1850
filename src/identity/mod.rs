//! 认证服务客户端
//!
//! 登录、会话刷新、用户管理都委托给托管的认证服务，这里只负责按其 HTTP 约定发起请求。

pub mod gotrue;

use async_trait::async_trait;
use std::sync::Arc;

use crate::errors::Result;
use crate::models::users::{AuthSession, AuthUser, Role};

pub use gotrue::GoTrueClient;

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// 邮箱密码登录
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<AuthSession>;
    /// 用访问令牌查询当前用户
    async fn get_user(&self, access_token: &str) -> Result<AuthUser>;
    /// 用刷新令牌换取新会话
    async fn refresh_session(&self, refresh_token: &str) -> Result<AuthSession>;
    /// 注销会话
    async fn sign_out(&self, access_token: &str) -> Result<()>;

    /// 以下需要 service role 密钥
    async fn admin_create_user(&self, email: &str, password: &str, role: Role)
    -> Result<AuthUser>;
    async fn admin_delete_user(&self, user_id: &str) -> Result<()>;
    async fn admin_update_password(&self, user_id: &str, password: &str) -> Result<()>;

    async fn health_check(&self) -> Result<()>;
}

pub fn create_identity_provider(http: reqwest::Client) -> Arc<dyn IdentityProvider> {
    Arc::new(GoTrueClient::from_config(http))
}
