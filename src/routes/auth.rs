use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::users::requests::LoginForm;
use crate::services::AuthService;

// 懒加载的全局 AuthService 实例
static AUTH_SERVICE: Lazy<AuthService> = Lazy::new(AuthService::new_lazy);

pub async fn login(req: HttpRequest, form: web::Form<LoginForm>) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.login(&req, form.into_inner()).await
}

pub async fn logout(request: HttpRequest) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.logout(&request).await
}

pub async fn session(request: HttpRequest) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.session(&request).await
}

// 配置路由
pub fn configure_auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/auth")
            .service(
                web::resource("/login")
                    .wrap(middlewares::RateLimit::login())
                    .route(web::post().to(login)),
            )
            .route("/session", web::get().to(session)),
    )
    .service(
        web::resource("/logout")
            .route(web::get().to(logout))
            .route(web::post().to(logout)),
    );
}
