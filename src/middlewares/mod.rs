pub mod auth_guard;
pub mod rate_limit;
pub mod require_role;
pub mod require_session;
pub mod session;

use actix_web::{
    HttpResponse,
    http::{StatusCode, header},
};

use crate::models::{ApiResponse, ErrorCode};

pub use auth_guard::AuthGuard;
pub use rate_limit::RateLimit;
pub use require_role::RequireRole;
pub use require_session::RequireSession;
pub use session::LoadSession;

// 辅助函数：创建错误响应
pub(crate) fn create_error_response(
    status: StatusCode,
    code: ErrorCode,
    message: &str,
) -> HttpResponse {
    HttpResponse::build(status)
        .insert_header((header::CONTENT_TYPE, "application/json; charset=utf-8"))
        .json(ApiResponse::<()>::error_empty(code, message))
}

// 辅助函数：303 跳转
pub(crate) fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}
