use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use super::CourseService;
use crate::models::{
    ApiResponse,
    courses::responses::CourseListResponse,
    profiles::{ProfileKind, ProfileOrder},
    users::Role,
};
use crate::services::{caller_profile_id, current_session};

pub async fn list_courses(
    service: &CourseService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let session = match current_session(request) {
        Ok(session) => session,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request, &session);

    let courses = storage.list_courses().await.unwrap_or_else(|e| {
        error!("Error loading courses: {}", e);
        Vec::new()
    });

    let instructor_order = ProfileOrder {
        column: "last_name",
        ascending: true,
    };
    let instructors = storage
        .list_profiles(ProfileKind::Instructor, Some(instructor_order))
        .await
        .unwrap_or_else(|e| {
            error!("Error loading instructors: {}", e);
            Vec::new()
        });

    let mut student_id = None;
    let mut enrolled_course_ids = Vec::new();
    if session.role() == Some(Role::Student) {
        match caller_profile_id(&storage, ProfileKind::Student, &session).await {
            Ok(Some(id)) => {
                student_id = Some(id);
                match storage.list_enrollments_by_student(id).await {
                    Ok(enrollments) => {
                        enrolled_course_ids = enrollments.iter().map(|e| e.course_id).collect();
                    }
                    Err(e) => error!("Error loading student enrollments: {}", e),
                }
            }
            Ok(None) => error!("No student profile for user {}", session.user_id()),
            Err(e) => error!("Error loading student profile for courses page: {}", e),
        }
    }

    let response = CourseListResponse {
        courses,
        instructors,
        role: session.role(),
        student_id,
        enrolled_course_ids,
    };
    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Courses loaded")))
}
