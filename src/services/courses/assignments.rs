use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{CourseService, load_managed_course};
use crate::models::{
    ApiResponse, ErrorCode,
    assignments::{
        Assignment, AssignmentUpdate, NewAssignment,
        requests::{AddAssignmentForm, DeleteAssignmentForm, UpdateAssignmentForm},
    },
};
use crate::services::{bad_request, current_session, failure, not_found};
use crate::storage::Storage;
use crate::utils::{
    form::{required, required_uuid, tri_state},
    validate::{parse_due_date, parse_weight},
};
use std::sync::Arc;

/// 读取作业并确认属于该课程
async fn load_course_assignment(
    storage: &Arc<dyn Storage>,
    course_id: i64,
    assignment_id: &str,
) -> Result<Assignment, HttpResponse> {
    match storage.get_assignment(assignment_id).await {
        Ok(Some(a)) if a.course_id == Some(course_id) => Ok(a),
        Ok(_) => Err(not_found(
            ErrorCode::AssignmentNotFound,
            "Assignment not found for this course.",
        )),
        Err(e) => Err(failure(
            &e,
            ErrorCode::InternalServerError,
            "Failed to load assignment",
        )),
    }
}

pub async fn add_assignment(
    service: &CourseService,
    request: &HttpRequest,
    course_id: i64,
    form: AddAssignmentForm,
) -> ActixResult<HttpResponse> {
    let session = match current_session(request) {
        Ok(session) => session,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request, &session);
    if let Err(resp) = load_managed_course(&storage, &session, course_id).await {
        return Ok(resp);
    }

    let Some(assignment_name) = required(&form.assignment_name) else {
        return Ok(bad_request(
            ErrorCode::AssignmentInvalid,
            "Assignment name is required.",
        ));
    };
    let weight = match parse_weight(form.weight.as_deref().unwrap_or_default()) {
        Ok(weight) => weight,
        Err(msg) => return Ok(bad_request(ErrorCode::AssignmentInvalid, msg)),
    };
    let due_date = match parse_due_date(form.due_date.as_deref().unwrap_or_default()) {
        Ok(date) => date,
        Err(msg) => return Ok(bad_request(ErrorCode::AssignmentInvalid, msg)),
    };

    let assignment = NewAssignment {
        assignment_name: assignment_name.to_string(),
        course_id,
        weight,
        due_date,
    };
    match storage.create_assignment(assignment).await {
        Ok(assignment) => {
            info!(
                "Assignment {} added to course {}",
                assignment.assignment_id, course_id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                assignment,
                "Assignment added successfully.",
            )))
        }
        Err(e) => Ok(failure(
            &e,
            ErrorCode::AssignmentInvalid,
            "Failed to add assignment",
        )),
    }
}

pub async fn update_assignment(
    service: &CourseService,
    request: &HttpRequest,
    course_id: i64,
    form: UpdateAssignmentForm,
) -> ActixResult<HttpResponse> {
    let session = match current_session(request) {
        Ok(session) => session,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request, &session);
    if let Err(resp) = load_managed_course(&storage, &session, course_id).await {
        return Ok(resp);
    }

    let Some(assignment_id) = required_uuid(&form.assignment_id) else {
        return Ok(bad_request(
            ErrorCode::AssignmentInvalid,
            "Assignment ID is required.",
        ));
    };
    if let Err(resp) = load_course_assignment(&storage, course_id, &assignment_id).await {
        return Ok(resp);
    }

    let assignment_name = match tri_state(&form.assignment_name) {
        None => None,
        Some(Some(name)) => Some(name.to_string()),
        Some(None) => {
            return Ok(bad_request(
                ErrorCode::AssignmentInvalid,
                "Assignment name cannot be empty.",
            ));
        }
    };
    // 缺失：不修改；空白：置空
    let weight = match form.weight.as_deref().map(parse_weight).transpose() {
        Ok(weight) => weight,
        Err(msg) => return Ok(bad_request(ErrorCode::AssignmentInvalid, msg)),
    };
    let due_date = match form.due_date.as_deref().map(parse_due_date).transpose() {
        Ok(date) => date,
        Err(msg) => return Ok(bad_request(ErrorCode::AssignmentInvalid, msg)),
    };

    let update = AssignmentUpdate {
        assignment_name,
        weight,
        due_date,
        updated_at: Some(chrono::Utc::now()),
    };
    match storage.update_assignment(&assignment_id, update).await {
        Ok(Some(assignment)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            assignment,
            "Assignment updated successfully.",
        ))),
        Ok(None) => Ok(not_found(
            ErrorCode::AssignmentNotFound,
            "Assignment not found for this course.",
        )),
        Err(e) => Ok(failure(
            &e,
            ErrorCode::AssignmentInvalid,
            "Failed to update assignment",
        )),
    }
}

pub async fn delete_assignment(
    service: &CourseService,
    request: &HttpRequest,
    course_id: i64,
    form: DeleteAssignmentForm,
) -> ActixResult<HttpResponse> {
    let session = match current_session(request) {
        Ok(session) => session,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request, &session);
    if let Err(resp) = load_managed_course(&storage, &session, course_id).await {
        return Ok(resp);
    }

    let Some(assignment_id) = required_uuid(&form.assignment_id) else {
        return Ok(bad_request(
            ErrorCode::AssignmentInvalid,
            "Assignment ID is required.",
        ));
    };
    if let Err(resp) = load_course_assignment(&storage, course_id, &assignment_id).await {
        return Ok(resp);
    }

    // 成绩引用作业，先删成绩
    if let Err(e) = storage.delete_grades_for_assignment(&assignment_id).await {
        return Ok(failure(
            &e,
            ErrorCode::AssignmentInvalid,
            "Failed to delete assignment",
        ));
    }

    match storage.delete_assignment(&assignment_id).await {
        Ok(true) => {
            info!("Assignment {} deleted from course {}", assignment_id, course_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
                "Assignment deleted successfully.",
            )))
        }
        Ok(false) => Ok(not_found(
            ErrorCode::AssignmentNotFound,
            "Assignment not found for this course.",
        )),
        Err(e) => Ok(failure(
            &e,
            ErrorCode::AssignmentInvalid,
            "Failed to delete assignment",
        )),
    }
}
