use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};

use super::CourseService;
use crate::errors::StudyDeskError;
use crate::models::{ApiResponse, ErrorCode, users::Role};
use crate::services::{current_session, failure, forbidden, not_found};

pub async fn delete_course(
    service: &CourseService,
    request: &HttpRequest,
    course_id: i64,
) -> ActixResult<HttpResponse> {
    let session = match current_session(request) {
        Ok(session) => session,
        Err(resp) => return Ok(resp),
    };
    if session.role() != Some(Role::Admin) {
        return Ok(forbidden(
            ErrorCode::CoursePermissionDenied,
            "Only admins can delete courses.",
        ));
    }

    let storage = service.get_storage(request, &session);
    match storage.delete_course(course_id).await {
        Ok(true) => {
            info!("Course {} deleted by {}", course_id, session.user_id());
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Course deleted successfully.")))
        }
        Ok(false) => Ok(not_found(ErrorCode::CourseNotFound, "Course not found.")),
        // 仍被选课或作业引用
        Err(StudyDeskError::Validation(msg)) => {
            warn!("Course {} still referenced: {}", course_id, msg);
            Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::Conflict,
                "Course cannot be deleted while students are enrolled or assignments exist.",
            )))
        }
        Err(e) => Ok(failure(&e, ErrorCode::InternalServerError, "Failed to delete course")),
    }
}
