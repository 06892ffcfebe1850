use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use super::StaffService;
use crate::models::{
    ApiResponse,
    profiles::{ProfileKind, responses::StaffListResponse},
};
use crate::services::current_session;

pub async fn list_staff(
    service: &StaffService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let session = match current_session(request) {
        Ok(session) => session,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request, &session);

    let (instructors, admins) = futures_util::join!(
        storage.list_profiles(ProfileKind::Instructor, None),
        storage.list_profiles(ProfileKind::Admin, None),
    );

    let instructors = instructors.unwrap_or_else(|e| {
        error!("Error loading instructors: {}", e);
        Vec::new()
    });
    let admins = admins.unwrap_or_else(|e| {
        error!("Error loading admins: {}", e);
        Vec::new()
    });

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        StaffListResponse {
            instructors,
            admins,
        },
        "Staff loaded",
    )))
}
