use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{CourseService, load_managed_course};
use crate::models::{
    ApiResponse, ErrorCode,
    assignments::requests::{AddStudentForm, RemoveStudentForm},
    enrollments::NewEnrollment,
    profiles::ProfileKind,
};
use crate::services::{bad_request, current_session, failure, forbidden, not_found};
use crate::utils::{form::required_id, time::today};

pub async fn add_student(
    service: &CourseService,
    request: &HttpRequest,
    course_id: i64,
    form: AddStudentForm,
) -> ActixResult<HttpResponse> {
    let session = match current_session(request) {
        Ok(session) => session,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request, &session);
    if let Err(resp) = load_managed_course(&storage, &session, course_id).await {
        return Ok(resp);
    }

    let Some(student_id) = required_id(&form.student_id) else {
        return Ok(bad_request(ErrorCode::BadRequest, "Student ID is required."));
    };

    match storage.get_profile(ProfileKind::Student, student_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Ok(not_found(ErrorCode::StudentNotFound, "Student not found.")),
        Err(e) => return Ok(failure(&e, ErrorCode::EnrollmentFailed, "Failed to add student")),
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
            info!("Student {} added to course {}", student_id, course_id);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                enrollment,
                "Student added to course successfully.",
            )))
        }
        Err(e) => Ok(failure(&e, ErrorCode::EnrollmentFailed, "Failed to add student")),
    }
}

pub async fn remove_student(
    service: &CourseService,
    request: &HttpRequest,
    course_id: i64,
    form: RemoveStudentForm,
) -> ActixResult<HttpResponse> {
    let session = match current_session(request) {
        Ok(session) => session,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request, &session);
    if let Err(resp) = load_managed_course(&storage, &session, course_id).await {
        return Ok(resp);
    }

    let Some(enrollment_id) = required_id(&form.enrollment_id) else {
        return Ok(bad_request(ErrorCode::BadRequest, "Enrollment ID is required."));
    };

    match storage.get_enrollment(enrollment_id).await {
        Ok(Some(enrollment)) if enrollment.course_id == course_id => {}
        Ok(_) => {
            return Ok(forbidden(
                ErrorCode::EnrollmentNotFound,
                "Invalid enrollment ID for this course.",
            ));
        }
        Err(e) => return Ok(failure(&e, ErrorCode::EnrollmentFailed, "Failed to remove student")),
    }

    if let Err(e) = storage.delete_grades_for_enrollment(enrollment_id).await {
        return Ok(failure(&e, ErrorCode::EnrollmentFailed, "Failed to remove student"));
    }

    match storage.delete_enrollment(enrollment_id).await {
        Ok(_) => {
            info!("Enrollment {} removed from course {}", enrollment_id, course_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
                "Student removed from course successfully.",
            )))
        }
        Err(e) => Ok(failure(&e, ErrorCode::EnrollmentFailed, "Failed to remove student")),
    }
}
