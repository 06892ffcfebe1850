pub mod login;
pub mod logout;
pub mod session;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;

use crate::cache::ObjectCache;
use crate::identity::IdentityProvider;
use crate::models::users::requests::LoginForm;
use crate::utils::SessionCookies;

pub struct AuthService {
    identity: Option<Arc<dyn IdentityProvider>>,
}

impl AuthService {
    pub fn new_lazy() -> Self {
        Self { identity: None }
    }

    pub(crate) fn get_identity(&self, request: &HttpRequest) -> Arc<dyn IdentityProvider> {
        match &self.identity {
            Some(identity) => identity.clone(),
            None => super::app_identity(request),
        }
    }

    pub(crate) fn get_cache(&self, request: &HttpRequest) -> Option<Arc<dyn ObjectCache>> {
        request
            .app_data::<web::Data<Arc<dyn ObjectCache>>>()
            .map(|data| data.get_ref().clone())
    }

    pub(crate) fn get_cookies(&self) -> SessionCookies {
        SessionCookies::from_config()
    }

    // 邮箱密码登录
    pub async fn login(&self, request: &HttpRequest, form: LoginForm) -> ActixResult<HttpResponse> {
        login::handle_login(self, request, form).await
    }

    // 注销
    pub async fn logout(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        logout::handle_logout(self, request).await
    }

    // 布局数据
    pub async fn session(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        session::handle_session(self, request).await
    }
}
