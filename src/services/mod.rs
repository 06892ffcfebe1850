pub mod accounts;
pub mod auth;
pub mod courses;
pub mod dashboard;
pub mod flashdecks;
pub mod grades;
pub mod staff;
pub mod students;

use actix_web::{HttpRequest, HttpResponse, http::StatusCode, web};
use std::sync::Arc;

use crate::errors::StudyDeskError;
use crate::identity::IdentityProvider;
use crate::middlewares::LoadSession;
use crate::models::{ApiResponse, ErrorCode, profiles::ProfileKind, users::Session};
use crate::storage::{Storage, StorageProvider};

pub use auth::AuthService;
pub use courses::CourseService;
pub use dashboard::DashboardService;
pub use flashdecks::FlashdeckService;
pub use staff::StaffService;
pub use students::StudentService;

pub(crate) fn app_identity(request: &HttpRequest) -> Arc<dyn IdentityProvider> {
    request
        .app_data::<web::Data<Arc<dyn IdentityProvider>>>()
        .expect("Identity provider not found in app data")
        .get_ref()
        .clone()
}

pub(crate) fn app_storage_provider(request: &HttpRequest) -> Arc<dyn StorageProvider> {
    request
        .app_data::<web::Data<Arc<dyn StorageProvider>>>()
        .expect("Storage provider not found in app data")
        .get_ref()
        .clone()
}

/// 当前会话，缺失时返回跳转登录页的响应
pub(crate) fn current_session(request: &HttpRequest) -> Result<Session, HttpResponse> {
    LoadSession::extract_session(request).ok_or_else(|| {
        HttpResponse::SeeOther()
            .insert_header(("Location", "/login"))
            .finish()
    })
}

/// 当前用户在指定档案表中的 ID
pub(crate) async fn caller_profile_id(
    storage: &Arc<dyn Storage>,
    kind: ProfileKind,
    session: &Session,
) -> crate::errors::Result<Option<i64>> {
    Ok(storage
        .get_profile_by_user_id(kind, session.user_id())
        .await?
        .map(|p| p.id))
}

/// 存储或认证错误对应的 HTTP 状态
pub(crate) fn error_status(err: &StudyDeskError) -> StatusCode {
    match err {
        StudyDeskError::Validation(_) => StatusCode::BAD_REQUEST,
        StudyDeskError::NotFound(_) => StatusCode::NOT_FOUND,
        StudyDeskError::Conflict(_) => StatusCode::CONFLICT,
        StudyDeskError::Authentication(_) => StatusCode::UNAUTHORIZED,
        StudyDeskError::Authorization(_) => StatusCode::FORBIDDEN,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// 失败响应，消息形如 "<context>: <错误详情>"
pub(crate) fn failure(err: &StudyDeskError, code: ErrorCode, context: &str) -> HttpResponse {
    HttpResponse::build(error_status(err)).json(ApiResponse::error_empty(
        code,
        format!("{context}: {}", err.message()),
    ))
}

pub(crate) fn bad_request(code: ErrorCode, message: &str) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(code, message))
}

pub(crate) fn forbidden(code: ErrorCode, message: &str) -> HttpResponse {
    HttpResponse::Forbidden().json(ApiResponse::error_empty(code, message))
}

pub(crate) fn not_found(code: ErrorCode, message: &str) -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(code, message))
}
