use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use tracing::info;

use super::{CourseService, load_managed_course};
use crate::models::{
    ApiResponse, ErrorCode,
    assignments::{
        GradeUpsert,
        requests::{ClearGradeForm, SetGradeForm},
    },
};
use crate::services::{bad_request, current_session, failure, forbidden, not_found};
use crate::storage::Storage;
use crate::utils::{
    form::{optional_trimmed, required_id, required_uuid},
    validate::parse_grade,
};

/// 选课和作业都必须属于该课程
async fn check_grade_target(
    storage: &Arc<dyn Storage>,
    course_id: i64,
    enrollment_id: i64,
    assignment_id: &str,
) -> Result<(), HttpResponse> {
    match storage.get_enrollment(enrollment_id).await {
        Ok(Some(e)) if e.course_id == course_id => {}
        Ok(_) => {
            return Err(forbidden(
                ErrorCode::EnrollmentNotFound,
                "Invalid enrollment ID for this course.",
            ));
        }
        Err(e) => {
            return Err(failure(
                &e,
                ErrorCode::GradeUpdateFailed,
                "Failed to verify enrollment",
            ));
        }
    }

    match storage.get_assignment(assignment_id).await {
        Ok(Some(a)) if a.course_id == Some(course_id) => Ok(()),
        Ok(_) => Err(not_found(
            ErrorCode::AssignmentNotFound,
            "Assignment not found for this course.",
        )),
        Err(e) => Err(failure(
            &e,
            ErrorCode::GradeUpdateFailed,
            "Failed to verify assignment",
        )),
    }
}

pub async fn set_grade(
    service: &CourseService,
    request: &HttpRequest,
    course_id: i64,
    form: SetGradeForm,
) -> ActixResult<HttpResponse> {
    let session = match current_session(request) {
        Ok(session) => session,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request, &session);
    if let Err(resp) = load_managed_course(&storage, &session, course_id).await {
        return Ok(resp);
    }

    let (Some(enrollment_id), Some(assignment_id)) = (
        required_id(&form.enrollment_id),
        required_uuid(&form.assignment_id),
    ) else {
        return Ok(bad_request(
            ErrorCode::BadRequest,
            "Enrollment ID and Assignment ID are required.",
        ));
    };
    let grade = match parse_grade(form.grade.as_deref().unwrap_or_default()) {
        Ok(grade) => grade,
        Err(msg) => return Ok(bad_request(ErrorCode::GradeInvalid, msg)),
    };

    if let Err(resp) = check_grade_target(&storage, course_id, enrollment_id, &assignment_id).await
    {
        return Ok(resp);
    }

    let upsert = GradeUpsert {
        enrollment_id,
        assignment_id,
        grade,
        feedback: optional_trimmed(&form.feedback),
        updated_at: chrono::Utc::now(),
    };
    match storage.upsert_grade(upsert).await {
        Ok(grade) => {
            info!(
                "Grade for enrollment {} / assignment {} saved",
                grade.enrollment_id, grade.assignment_id
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(grade, "Grade saved successfully.")))
        }
        Err(e) => Ok(failure(&e, ErrorCode::GradeUpdateFailed, "Failed to save grade")),
    }
}

pub async fn clear_grade(
    service: &CourseService,
    request: &HttpRequest,
    course_id: i64,
    form: ClearGradeForm,
) -> ActixResult<HttpResponse> {
    let session = match current_session(request) {
        Ok(session) => session,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request, &session);
    if let Err(resp) = load_managed_course(&storage, &session, course_id).await {
        return Ok(resp);
    }

    let (Some(enrollment_id), Some(assignment_id)) = (
        required_id(&form.enrollment_id),
        required_uuid(&form.assignment_id),
    ) else {
        return Ok(bad_request(
            ErrorCode::BadRequest,
            "Enrollment ID and Assignment ID are required.",
        ));
    };

    if let Err(resp) = check_grade_target(&storage, course_id, enrollment_id, &assignment_id).await
    {
        return Ok(resp);
    }

    match storage.delete_grade(enrollment_id, &assignment_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
            "Grade cleared successfully.",
        ))),
        Ok(false) => Ok(not_found(ErrorCode::NotFound, "Grade not found.")),
        Err(e) => Ok(failure(&e, ErrorCode::GradeUpdateFailed, "Failed to clear grade")),
    }
}
