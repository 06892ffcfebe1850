use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::CourseService;
use crate::models::{
    ApiResponse, ErrorCode,
    courses::{NewCourse, requests::CreateCourseForm},
    profiles::ProfileKind,
    users::Role,
};
use crate::services::{bad_request, caller_profile_id, current_session, failure, forbidden};
use crate::utils::form::{required, required_i32, required_id};

pub async fn create_course(
    service: &CourseService,
    request: &HttpRequest,
    form: CreateCourseForm,
) -> ActixResult<HttpResponse> {
    let session = match current_session(request) {
        Ok(session) => session,
        Err(resp) => return Ok(resp),
    };
    let role = session.role();
    if !matches!(role, Some(Role::Admin | Role::Instructor)) {
        return Ok(forbidden(
            ErrorCode::CoursePermissionDenied,
            "You are not authorized to create courses.",
        ));
    }

    let (Some(course_name), Some(ects), Some(hours), Some(format), Some(instructor_id)) = (
        required(&form.course_name),
        required_i32(&form.ects),
        required_i32(&form.hours),
        required(&form.format),
        required_id(&form.instructor_id),
    ) else {
        return Ok(bad_request(
            ErrorCode::CourseCreationFailed,
            "Missing required fields or invalid data for creating course.",
        ));
    };

    let storage = service.get_storage(request, &session);

    // 教师只能为自己开课
    if role == Some(Role::Instructor) {
        match caller_profile_id(&storage, ProfileKind::Instructor, &session).await {
            Ok(Some(own_id)) if own_id == instructor_id => {}
            Ok(_) => {
                return Ok(forbidden(
                    ErrorCode::CoursePermissionDenied,
                    "Instructors can only create courses they teach.",
                ));
            }
            Err(e) => {
                return Ok(failure(
                    &e,
                    ErrorCode::CourseCreationFailed,
                    "Failed to create course",
                ));
            }
        }
    }

    let new_course = NewCourse {
        course_name: course_name.to_string(),
        ects,
        hours,
        format: format.to_string(),
        instructor_id: Some(instructor_id),
    };

    match storage.create_course(new_course).await {
        Ok(course) => {
            info!("Course {} created by {}", course.course_id, session.user_id());
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(course, "Course created successfully.")))
        }
        Err(e) => Ok(failure(
            &e,
            ErrorCode::CourseCreationFailed,
            "Failed to create course",
        )),
    }
}
