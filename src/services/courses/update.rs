use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{CourseService, load_managed_course};
use crate::models::{
    ApiResponse, ErrorCode,
    courses::{CourseUpdate, requests::UpdateCourseForm},
};
use crate::services::{bad_request, current_session, failure, forbidden, not_found};
use crate::utils::form::{parse_bool, tri_state};

const INVALID_COURSE_DATA: &str = "Invalid data for updating course.";

pub async fn update_course(
    service: &CourseService,
    request: &HttpRequest,
    course_id: i64,
    form: UpdateCourseForm,
) -> ActixResult<HttpResponse> {
    let session = match current_session(request) {
        Ok(session) => session,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request, &session);
    let managed = match load_managed_course(&storage, &session, course_id).await {
        Ok(managed) => managed,
        Err(resp) => return Ok(resp),
    };

    let update = match build_update(&form) {
        Ok(update) => update,
        Err(msg) => return Ok(bad_request(ErrorCode::CourseUpdateFailed, msg)),
    };

    // 只有管理员可以更换授课教师
    if let Some(instructor_id) = update.instructor_id
        && !managed.is_admin
        && instructor_id != managed.course.instructor_id
    {
        return Ok(forbidden(
            ErrorCode::CoursePermissionDenied,
            "Only admins can reassign the course instructor.",
        ));
    }

    if is_empty(&update) {
        return Ok(bad_request(ErrorCode::CourseUpdateFailed, "No fields to update."));
    }

    match storage.update_course(course_id, update).await {
        Ok(Some(course)) => {
            info!("Course {} updated by {}", course_id, session.user_id());
            Ok(HttpResponse::Ok().json(ApiResponse::success(course, "Course updated successfully.")))
        }
        Ok(None) => Ok(not_found(ErrorCode::CourseNotFound, "Course not found.")),
        Err(e) => Ok(failure(&e, ErrorCode::CourseUpdateFailed, "Failed to update course")),
    }
}

/// 缺失的字段不修改；`instructor_id` 为空白时解除授课教师
fn build_update(form: &UpdateCourseForm) -> Result<CourseUpdate, &'static str> {
    let text = |value: &Option<String>| match tri_state(value) {
        None => Ok(None),
        Some(Some(v)) => Ok(Some(v.to_string())),
        Some(None) => Err(INVALID_COURSE_DATA),
    };
    let int = |value: &Option<String>| match tri_state(value) {
        None => Ok(None),
        Some(Some(v)) => v.parse::<i32>().map(Some).map_err(|_| INVALID_COURSE_DATA),
        Some(None) => Err(INVALID_COURSE_DATA),
    };

    let instructor_id = match tri_state(&form.instructor_id) {
        None => None,
        Some(None) => Some(None),
        Some(Some(v)) => Some(Some(v.parse::<i64>().map_err(|_| INVALID_COURSE_DATA)?)),
    };
    let active = match tri_state(&form.active) {
        None | Some(None) => None,
        Some(Some(v)) => Some(parse_bool(v).ok_or(INVALID_COURSE_DATA)?),
    };

    Ok(CourseUpdate {
        course_name: text(&form.course_name)?,
        ects: int(&form.ects)?,
        hours: int(&form.hours)?,
        format: text(&form.format)?,
        active,
        instructor_id,
    })
}

fn is_empty(update: &CourseUpdate) -> bool {
    update.course_name.is_none()
        && update.ects.is_none()
        && update.hours.is_none()
        && update.format.is_none()
        && update.active.is_none()
        && update.instructor_id.is_none()
}
