/*!
 * 会话中间件
 *
 * 在每个请求上运行：读取会话 Cookie，必要时刷新令牌，解析当前用户，
 * 并把 [`Session`] 放入请求扩展。处理程序通过 [`LoadSession::extract_session`] 获取。
 *
 * ## 解析流程
 *
 * 1. 没有任何会话 Cookie：无会话
 * 2. 访问令牌缺失或即将过期且存在刷新令牌：向认证服务刷新，成功则写回新 Cookie
 * 3. 访问令牌存在：先查对象缓存 `auth_user:<token>`，未命中再向认证服务查询用户
 * 4. 任一步失败：清空会话并删除 Cookie
 *
 * 配置了 `backend.jwt_secret` 时，访问令牌的签名在发起任何远程调用之前校验。
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpRequest,
    cookie::Cookie,
    dev::{ServiceRequest, ServiceResponse},
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{debug, error, warn};

use crate::cache::{self, ObjectCache};
use crate::config::AppConfig;
use crate::identity::IdentityProvider;
use crate::models::users::{AuthSession, AuthUser, Role, Session};
use crate::utils::SessionCookies;
use crate::utils::jwt::JwtUtils;

/// 会话用户在对象缓存中的键
pub fn session_cache_key(access_token: &str) -> String {
    format!("auth_user:{access_token}")
}

#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub cookies: SessionCookies,
    pub refresh_leeway_secs: i64,
    pub user_cache_ttl: u64,
    // 为空时不在本地校验签名
    pub jwt_secret: String,
}

impl SessionSettings {
    pub fn from_config() -> Self {
        let config = AppConfig::get();
        Self {
            cookies: SessionCookies::from_config(),
            refresh_leeway_secs: config.session.refresh_leeway_secs,
            user_cache_ttl: config.session.user_cache_ttl,
            jwt_secret: config.backend.jwt_secret.clone(),
        }
    }
}

/// 响应上需要附加的 Cookie 变更
#[derive(Debug)]
enum CookieAction {
    Keep,
    Issue(AuthSession),
    Clear,
}

struct Resolution {
    session: Option<Session>,
    cookies: CookieAction,
}

impl Resolution {
    fn anonymous() -> Self {
        Self {
            session: None,
            cookies: CookieAction::Keep,
        }
    }

    fn cleared() -> Self {
        Self {
            session: None,
            cookies: CookieAction::Clear,
        }
    }
}

#[derive(Clone)]
pub struct LoadSession {
    settings: Rc<SessionSettings>,
}

impl LoadSession {
    pub fn new(settings: SessionSettings) -> Self {
        Self {
            settings: Rc::new(settings),
        }
    }

    pub fn from_config() -> Self {
        Self::new(SessionSettings::from_config())
    }

    /// 从请求扩展中提取会话
    pub fn extract_session(req: &HttpRequest) -> Option<Session> {
        req.extensions().get::<Session>().cloned()
    }

    /// 从请求扩展中提取用户 ID
    pub fn extract_user_id(req: &HttpRequest) -> Option<String> {
        req.extensions()
            .get::<Session>()
            .map(|s| s.user_id().to_string())
    }

    /// 从请求扩展中提取用户角色
    pub fn extract_user_role(req: &HttpRequest) -> Option<Role> {
        req.extensions().get::<Session>().and_then(Session::role)
    }
}

async fn resolve_user(
    settings: &SessionSettings,
    identity: &dyn IdentityProvider,
    cache: Option<&dyn ObjectCache>,
    access_token: &str,
) -> crate::errors::Result<AuthUser> {
    let key = session_cache_key(access_token);
    if let Some(cache) = cache
        && let Some(user) = cache::get_json::<AuthUser>(cache, &key).await
    {
        debug!("Session user {} served from cache", user.id);
        return Ok(user);
    }

    let user = identity.get_user(access_token).await?;
    if user.id.is_empty() {
        return Err(crate::errors::StudyDeskError::authentication(
            "Authentication service returned an empty user",
        ));
    }

    if let Some(cache) = cache {
        cache::insert_json(cache, key, &user, settings.user_cache_ttl).await;
    }
    Ok(user)
}

async fn refresh(
    settings: &SessionSettings,
    identity: &dyn IdentityProvider,
    cache: Option<&dyn ObjectCache>,
    refresh_token: &str,
) -> Resolution {
    match identity.refresh_session(refresh_token).await {
        Ok(auth) => {
            debug!("Session refreshed for user {}", auth.user.id);
            if let Some(cache) = cache {
                cache::insert_json(
                    cache,
                    session_cache_key(&auth.access_token),
                    &auth.user,
                    settings.user_cache_ttl,
                )
                .await;
            }
            let session = Session {
                access_token: auth.access_token.clone(),
                refresh_token: Some(auth.refresh_token.clone()),
                expires_at: auth.expires_at,
                user: auth.user.clone(),
            };
            Resolution {
                session: Some(session),
                cookies: CookieAction::Issue(auth),
            }
        }
        Err(e) => {
            warn!("Session refresh failed: {}", e);
            Resolution::cleared()
        }
    }
}

async fn resolve(
    settings: &SessionSettings,
    identity: &dyn IdentityProvider,
    cache: Option<&dyn ObjectCache>,
    access_token: Option<String>,
    refresh_token: Option<String>,
) -> Resolution {
    let Some(access_token) = access_token else {
        return match refresh_token {
            Some(rt) => refresh(settings, identity, cache, &rt).await,
            None => Resolution::anonymous(),
        };
    };

    let claims = if settings.jwt_secret.is_empty() {
        JwtUtils::decode_unverified(&access_token)
    } else {
        JwtUtils::verify(&access_token, &settings.jwt_secret)
    };
    let claims = match claims {
        Ok(claims) => claims,
        Err(e) => {
            warn!("Rejected session token: {}", e);
            return Resolution::cleared();
        }
    };

    let now = chrono::Utc::now().timestamp();
    if JwtUtils::is_expiring(&claims, now, settings.refresh_leeway_secs)
        && let Some(rt) = refresh_token.as_deref()
    {
        return refresh(settings, identity, cache, rt).await;
    }

    match resolve_user(settings, identity, cache, &access_token).await {
        Ok(user) => Resolution {
            session: Some(Session {
                access_token,
                refresh_token,
                expires_at: claims.exp,
                user,
            }),
            cookies: CookieAction::Keep,
        },
        Err(e) => {
            warn!("Discarding invalid session: {}", e);
            if let Err(e) = identity.sign_out(&access_token).await {
                debug!("Best-effort sign out failed: {}", e);
            }
            if let Some(cache) = cache {
                cache.remove(&session_cache_key(&access_token)).await;
            }
            Resolution::cleared()
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for LoadSession
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = LoadSessionMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(LoadSessionMiddleware {
            service: Rc::new(service),
            settings: self.settings.clone(),
        }))
    }
}

pub struct LoadSessionMiddleware<S> {
    service: Rc<S>,
    settings: Rc<SessionSettings>,
}

impl<S, B> Service<ServiceRequest> for LoadSessionMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let settings = self.settings.clone();

        Box::pin(async move {
            let (access_token, refresh_token) = settings.cookies.read(req.request());

            let resolution = if access_token.is_none() && refresh_token.is_none() {
                Resolution::anonymous()
            } else {
                let identity = req
                    .app_data::<web::Data<Arc<dyn IdentityProvider>>>()
                    .map(|data| data.get_ref().clone());
                let cache = req
                    .app_data::<web::Data<Arc<dyn ObjectCache>>>()
                    .map(|data| data.get_ref().clone());

                match identity {
                    Some(identity) => {
                        resolve(
                            &settings,
                            identity.as_ref(),
                            cache.as_deref(),
                            access_token,
                            refresh_token,
                        )
                        .await
                    }
                    None => {
                        error!("Identity provider not found in app data, session ignored");
                        Resolution::cleared()
                    }
                }
            };

            if let Some(session) = resolution.session {
                req.extensions_mut().insert(session);
            }

            let mut res = srv.call(req).await?;

            // 处理程序自行设置了会话 Cookie（登录、注销）时不覆盖
            let access_name = settings.cookies.access_name();
            let handled = res
                .response()
                .cookies()
                .any(|c| c.name() == access_name);
            if !handled {
                let cookies: Vec<Cookie<'static>> = match &resolution.cookies {
                    CookieAction::Keep => Vec::new(),
                    CookieAction::Issue(auth) => settings.cookies.issue(auth),
                    CookieAction::Clear => settings.cookies.removal(),
                };
                for cookie in cookies {
                    if let Err(e) = res.response_mut().add_cookie(&cookie) {
                        warn!("Failed to attach session cookie: {}", e);
                    }
                }
            }

            Ok(res)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{Result, StudyDeskError};
    use crate::models::users::UserMetadata;
    use async_trait::async_trait;
    use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
    use std::sync::Mutex;

    #[derive(Default)]
    struct StubIdentity {
        calls: Mutex<Vec<String>>,
        refresh_ok: bool,
        user_ok: bool,
    }

    fn user(id: &str) -> AuthUser {
        AuthUser {
            id: id.into(),
            email: Some("ada@example.com".into()),
            user_metadata: UserMetadata {
                role: Some("student".into()),
            },
            created_at: None,
        }
    }

    #[async_trait]
    impl IdentityProvider for StubIdentity {
        async fn sign_in_with_password(&self, _: &str, _: &str) -> Result<AuthSession> {
            Err(StudyDeskError::authentication("unused"))
        }
        async fn get_user(&self, token: &str) -> Result<AuthUser> {
            self.calls.lock().unwrap().push(format!("get_user:{token}"));
            if self.user_ok {
                Ok(user("u1"))
            } else {
                Err(StudyDeskError::authentication("invalid JWT"))
            }
        }
        async fn refresh_session(&self, token: &str) -> Result<AuthSession> {
            self.calls.lock().unwrap().push(format!("refresh:{token}"));
            if self.refresh_ok {
                Ok(AuthSession {
                    access_token: "new-access".into(),
                    refresh_token: "new-refresh".into(),
                    expires_in: Some(3600),
                    expires_at: Some(4_000_000_000),
                    token_type: Some("bearer".into()),
                    user: user("u1"),
                })
            } else {
                Err(StudyDeskError::authentication("Invalid Refresh Token"))
            }
        }
        async fn sign_out(&self, token: &str) -> Result<()> {
            self.calls.lock().unwrap().push(format!("sign_out:{token}"));
            Ok(())
        }
        async fn admin_create_user(&self, _: &str, _: &str, _: Role) -> Result<AuthUser> {
            Err(StudyDeskError::backend_config("unused"))
        }
        async fn admin_delete_user(&self, _: &str) -> Result<()> {
            Ok(())
        }
        async fn admin_update_password(&self, _: &str, _: &str) -> Result<()> {
            Ok(())
        }
        async fn health_check(&self) -> Result<()> {
            Ok(())
        }
    }

    fn settings(secret: &str) -> SessionSettings {
        SessionSettings {
            cookies: SessionCookies::new("sb", 7, false),
            refresh_leeway_secs: 60,
            user_cache_ttl: 30,
            jwt_secret: secret.into(),
        }
    }

    fn token(secret: &str, exp: i64) -> String {
        let claims = serde_json::json!({ "sub": "u1", "exp": exp, "aud": "authenticated" });
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn far_future() -> i64 {
        chrono::Utc::now().timestamp() + 3600
    }

    #[actix_web::test]
    async fn test_no_cookies_is_anonymous() {
        let identity = StubIdentity::default();
        let res = resolve(&settings(""), &identity, None, None, None).await;
        assert!(res.session.is_none());
        assert!(matches!(res.cookies, CookieAction::Keep));
        assert!(identity.calls.lock().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_valid_token_resolves_user_and_uses_cache() {
        let identity = StubIdentity {
            user_ok: true,
            ..Default::default()
        };
        let cache = crate::cache::object_cache::MokaCacheWrapper::with_settings(100, 60);
        let access = token("k", far_future());

        let first = resolve(&settings(""), &identity, Some(&cache), Some(access.clone()), None).await;
        let session = first.session.unwrap();
        assert_eq!(session.user_id(), "u1");
        assert_eq!(session.role(), Some(Role::Student));

        let second = resolve(&settings(""), &identity, Some(&cache), Some(access), None).await;
        assert!(second.session.is_some());
        assert_eq!(identity.calls.lock().unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn test_expiring_token_is_refreshed() {
        let identity = StubIdentity {
            refresh_ok: true,
            user_ok: true,
            ..Default::default()
        };
        let stale = token("k", chrono::Utc::now().timestamp() + 10);
        let res = resolve(
            &settings(""),
            &identity,
            None,
            Some(stale),
            Some("rt".into()),
        )
        .await;
        assert_eq!(res.session.unwrap().access_token, "new-access");
        assert!(matches!(res.cookies, CookieAction::Issue(_)));
        assert_eq!(*identity.calls.lock().unwrap(), vec!["refresh:rt".to_string()]);
    }

    #[actix_web::test]
    async fn test_failed_refresh_clears_session() {
        let identity = StubIdentity::default();
        let res = resolve(&settings(""), &identity, None, None, Some("rt".into())).await;
        assert!(res.session.is_none());
        assert!(matches!(res.cookies, CookieAction::Clear));
    }

    #[actix_web::test]
    async fn test_rejected_user_signs_out_and_clears() {
        let identity = StubIdentity::default();
        let access = token("k", far_future());
        let res = resolve(&settings(""), &identity, None, Some(access.clone()), None).await;
        assert!(res.session.is_none());
        assert!(matches!(res.cookies, CookieAction::Clear));
        let calls = identity.calls.lock().unwrap();
        assert_eq!(calls[1], format!("sign_out:{access}"));
    }

    #[actix_web::test]
    async fn test_bad_signature_rejected_before_remote_calls() {
        let identity = StubIdentity {
            user_ok: true,
            ..Default::default()
        };
        let forged = token("attacker", far_future());
        let res = resolve(
            &settings("server-secret"),
            &identity,
            None,
            Some(forged),
            None,
        )
        .await;
        assert!(res.session.is_none());
        assert!(identity.calls.lock().unwrap().is_empty());
    }
}
