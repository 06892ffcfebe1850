use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::services::DashboardService;

static DASHBOARD_SERVICE: Lazy<DashboardService> = Lazy::new(DashboardService::new_lazy);

pub async fn home(request: HttpRequest) -> ActixResult<HttpResponse> {
    DASHBOARD_SERVICE.home(&request).await
}

pub fn configure_home_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/home")
            .wrap(middlewares::RequireSession)
            .route("", web::get().to(home)),
    );
}
