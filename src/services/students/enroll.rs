use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::StudentService;
use crate::models::{
    ApiResponse, ErrorCode,
    enrollments::NewEnrollment,
    profiles::{ProfileKind, requests::EnrollStudentForm},
    users::Role,
};
use crate::services::{bad_request, current_session, failure, forbidden, not_found};
use crate::utils::{form::required_id, time::today};

pub async fn enroll_student(
    service: &StudentService,
    request: &HttpRequest,
    student_id: i64,
    form: EnrollStudentForm,
) -> ActixResult<HttpResponse> {
    let session = match current_session(request) {
        Ok(session) => session,
        Err(resp) => return Ok(resp),
    };
    if !matches!(session.role(), Some(Role::Admin | Role::Instructor)) {
        return Ok(forbidden(
            ErrorCode::Forbidden,
            "You are not authorized to enroll students.",
        ));
    }

    let Some(course_id) = required_id(&form.course_id) else {
        return Ok(bad_request(ErrorCode::BadRequest, "Course ID is missing."));
    };

    let storage = service.get_storage(request, &session);

    match storage.get_profile(ProfileKind::Student, student_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Ok(not_found(ErrorCode::StudentNotFound, "Student not found.")),
        Err(e) => return Ok(failure(&e, ErrorCode::EnrollmentFailed, "Failed to enroll student")),
    }

    match storage.find_enrollment(student_id, course_id).await {
        Ok(Some(_)) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::EnrollmentAlreadyExists,
                "Student is already enrolled in this course.",
            )));
        }
        Ok(None) => {}
        Err(e) => {
            return Ok(failure(
                &e,
                ErrorCode::EnrollmentFailed,
                "Could not verify enrollment status",
            ));
        }
    }

    let enrollment = NewEnrollment {
        student_id,
        course_id,
        enrollment_date: today(),
    };
    match storage.create_enrollment(enrollment).await {
        Ok(enrollment) => {
            info!("Student {} enrolled in course {}", student_id, course_id);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                enrollment,
                "Student enrolled successfully.",
            )))
        }
        Err(e) => Ok(failure(&e, ErrorCode::EnrollmentFailed, "Failed to enroll student")),
    }
}
