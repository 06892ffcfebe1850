/*!
 * 基于角色的访问控制中间件
 *
 * 此中间件必须在 RequireSession 之后使用，角色取自认证服务 `user_metadata.role`。
 *
 * ```rust,ignore
 * web::scope("/api/v1/staff")
 *     .wrap(RequireRole::new(Role::Admin))
 *     .wrap(RequireSession)
 * ```
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::info;

use super::{LoadSession, create_error_response};
use crate::models::{ErrorCode, users::Role};

#[derive(Clone)]
pub struct RequireRole {
    allowed_roles: Vec<Role>,
}

impl RequireRole {
    /// 创建需要特定角色的中间件
    pub fn new(role: Role) -> Self {
        Self {
            allowed_roles: vec![role],
        }
    }

    /// 创建需要任一角色的中间件
    pub fn new_any(roles: &[Role]) -> Self {
        Self {
            allowed_roles: roles.to_vec(),
        }
    }

    pub fn permits(&self, role: Option<Role>) -> bool {
        role.is_some_and(|r| self.allowed_roles.contains(&r))
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireRoleMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleMiddleware {
            service: Rc::new(service),
            policy: self.clone(),
        }))
    }
}

pub struct RequireRoleMiddleware<S> {
    service: Rc<S>,
    policy: RequireRole,
}

impl<S, B> Service<ServiceRequest> for RequireRoleMiddleware<S>
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
        let policy = self.policy.clone();

        Box::pin(async move {
            let user_role = LoadSession::extract_user_role(req.request());

            if policy.permits(user_role) {
                let res = srv.call(req).await?.map_into_left_body();
                return Ok(res);
            }

            info!(
                "Access denied for user {:?} (role: {:?}). Allowed roles: {:?}",
                LoadSession::extract_user_id(req.request()),
                user_role,
                policy.allowed_roles
            );
            let response = match (LoadSession::extract_user_id(req.request()), user_role) {
                (None, _) => create_error_response(
                    StatusCode::UNAUTHORIZED,
                    ErrorCode::Unauthorized,
                    "Authentication required.",
                ),
                (Some(_), None) => create_error_response(
                    StatusCode::FORBIDDEN,
                    ErrorCode::UserRoleInvalid,
                    "Your account has no role assigned.",
                ),
                (Some(_), Some(_)) => {
                    create_error_response(StatusCode::FORBIDDEN, ErrorCode::Forbidden, "Access denied.")
                }
            };
            Ok(req.into_response(response.map_into_right_body()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permits() {
        let staff = RequireRole::new_any(Role::staff_roles());
        assert!(staff.permits(Some(Role::Admin)));
        assert!(staff.permits(Some(Role::Instructor)));
        assert!(!staff.permits(Some(Role::Student)));
        assert!(!staff.permits(None));

        let admin = RequireRole::new(Role::Admin);
        assert!(!admin.permits(Some(Role::Instructor)));
    }
}
