use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use super::StaffService;
use crate::models::{
    ApiResponse, ErrorCode,
    profiles::{ProfileKind, responses::StaffMemberResponse},
};
use crate::services::{current_session, not_found};

pub async fn get_staff_member(
    service: &StaffService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let session = match current_session(request) {
        Ok(session) => session,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request, &session);

    // 同一个 ID 先按教师查，再按管理员查
    for kind in [ProfileKind::Instructor, ProfileKind::Admin] {
        match storage.get_profile(kind, id).await {
            Ok(Some(member)) => {
                return Ok(HttpResponse::Ok().json(ApiResponse::success(
                    StaffMemberResponse { role: kind, member },
                    "Staff member loaded",
                )));
            }
            Ok(None) => {}
            Err(e) => error!("Error loading {} {}: {}", kind.label(), id, e),
        }
    }

    Ok(not_found(ErrorCode::StaffNotFound, "Staff member not found."))
}
