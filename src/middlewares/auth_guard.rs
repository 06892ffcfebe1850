/*!
 * 页面导航守卫
 *
 * 作用于前端页面路由，必须位于 [`LoadSession`](super::LoadSession) 之内：
 *
 * - 未登录访问 `/private` 下的页面：303 跳转 `/login`
 * - 已登录访问 `/login`、`/register` 或 `/`：303 跳转 `/private/home`
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::debug;

use super::see_other;
use crate::models::users::Session;

pub const LOGIN_PATH: &str = "/login";
pub const HOME_PATH: &str = "/private/home";

/// 根据路径和登录状态决定是否跳转
pub fn guard_redirect(path: &str, has_session: bool) -> Option<&'static str> {
    if !has_session {
        let private = path == "/private" || path.starts_with("/private/");
        return private.then_some(LOGIN_PATH);
    }
    matches!(path, "/login" | "/register" | "/").then_some(HOME_PATH)
}

#[derive(Clone)]
pub struct AuthGuard;

impl<S, B> Transform<S, ServiceRequest> for AuthGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthGuardMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthGuardMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthGuardMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthGuardMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
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

        Box::pin(async move {
            let has_session = req.extensions().contains::<Session>();
            if let Some(location) = guard_redirect(req.path(), has_session) {
                debug!("Redirecting {} to {}", req.path(), location);
                return Ok(req.into_response(see_other(location).map_into_right_body()));
            }

            let res = srv.call(req).await?.map_into_left_body();
            Ok(res)
        })
    }
}
