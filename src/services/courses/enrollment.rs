use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::CourseService;
use crate::models::{
    ApiResponse, ErrorCode,
    courses::requests::CourseEnrollmentForm,
    enrollments::NewEnrollment,
    profiles::ProfileKind,
    users::{Role, Session},
};
use crate::services::{
    bad_request, caller_profile_id, current_session, failure, forbidden, not_found,
};
use crate::storage::Storage;
use crate::utils::{form::required_id, time::today};
use std::sync::Arc;

/// 解析调用者自己的学生 ID，表单中提交了不同的 student_id 时拒绝
async fn resolve_student(
    storage: &Arc<dyn Storage>,
    session: &Session,
    form: &CourseEnrollmentForm,
    action: &str,
) -> Result<(i64, i64), HttpResponse> {
    let Some(course_id) = required_id(&form.course_id) else {
        return Err(bad_request(
            ErrorCode::BadRequest,
            &format!("Missing course_id or student_id for {action}."),
        ));
    };

    let student_id = match caller_profile_id(storage, ProfileKind::Student, session).await {
        Ok(Some(id)) => id,
        Ok(None) => {
            return Err(not_found(
                ErrorCode::StudentNotFound,
                "Student profile not found.",
            ));
        }
        Err(e) => {
            return Err(failure(
                &e,
                ErrorCode::InternalServerError,
                "Failed to load student profile",
            ));
        }
    };

    if let Some(submitted) = required_id(&form.student_id)
        && submitted != student_id
    {
        return Err(forbidden(
            ErrorCode::Forbidden,
            "You can only change your own enrollments.",
        ));
    }

    Ok((student_id, course_id))
}

pub async fn enroll(
    service: &CourseService,
    request: &HttpRequest,
    form: CourseEnrollmentForm,
) -> ActixResult<HttpResponse> {
    let session = match current_session(request) {
        Ok(session) => session,
        Err(resp) => return Ok(resp),
    };
    if session.role() != Some(Role::Student) {
        return Ok(forbidden(
            ErrorCode::Forbidden,
            "Only students can enroll in courses.",
        ));
    }

    let storage = service.get_storage(request, &session);
    let (student_id, course_id) =
        match resolve_student(&storage, &session, &form, "enrollment").await {
            Ok(ids) => ids,
            Err(resp) => return Ok(resp),
        };

    match storage.find_enrollment(student_id, course_id).await {
        Ok(Some(_)) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::EnrollmentAlreadyExists,
                "You are already enrolled in this course.",
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
            Ok(HttpResponse::Created().json(ApiResponse::success(enrollment, "Enrolled successfully!")))
        }
        Err(e) => Ok(failure(&e, ErrorCode::EnrollmentFailed, "Failed to enroll")),
    }
}

pub async fn disenroll(
    service: &CourseService,
    request: &HttpRequest,
    form: CourseEnrollmentForm,
) -> ActixResult<HttpResponse> {
    let session = match current_session(request) {
        Ok(session) => session,
        Err(resp) => return Ok(resp),
    };
    if session.role() != Some(Role::Student) {
        return Ok(forbidden(
            ErrorCode::Forbidden,
            "Only students can disenroll from courses.",
        ));
    }

    let storage = service.get_storage(request, &session);
    let (student_id, course_id) =
        match resolve_student(&storage, &session, &form, "disenrollment").await {
            Ok(ids) => ids,
            Err(resp) => return Ok(resp),
        };

    let enrollment = match storage.find_enrollment(student_id, course_id).await {
        Ok(Some(enrollment)) => enrollment,
        Ok(None) => {
            return Ok(not_found(
                ErrorCode::EnrollmentNotFound,
                "You are not enrolled in this course.",
            ));
        }
        Err(e) => return Ok(failure(&e, ErrorCode::EnrollmentFailed, "Failed to disenroll")),
    };

    // 先删除该选课下的成绩
    if let Err(e) = storage
        .delete_grades_for_enrollment(enrollment.enrollment_id)
        .await
    {
        return Ok(failure(&e, ErrorCode::EnrollmentFailed, "Failed to disenroll"));
    }

    match storage.delete_enrollment_for(student_id, course_id).await {
        Ok(_) => {
            info!("Student {} left course {}", student_id, course_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Disenrolled successfully!")))
        }
        Err(e) => Ok(failure(&e, ErrorCode::EnrollmentFailed, "Failed to disenroll")),
    }
}
