use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashSet;
use tracing::error;

use super::{CourseService, can_manage};
use crate::models::{
    ApiResponse, ErrorCode,
    courses::responses::{CourseDetailResponse, CourseEnrollmentView},
    profiles::{ProfileKind, ProfileOrder},
    users::Role,
};
use crate::services::{current_session, failure, grades, not_found};

pub async fn get_course(
    service: &CourseService,
    request: &HttpRequest,
    course_id: i64,
) -> ActixResult<HttpResponse> {
    let session = match current_session(request) {
        Ok(session) => session,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request, &session);

    let course = match storage.get_course(course_id).await {
        Ok(Some(course)) => course,
        Ok(None) => return Ok(not_found(ErrorCode::CourseNotFound, "Course not found.")),
        Err(e) => {
            return Ok(failure(
                &e,
                ErrorCode::InternalServerError,
                "Failed to load course",
            ));
        }
    };

    let assignments = storage
        .list_course_assignments(course_id)
        .await
        .unwrap_or_else(|e| {
            error!("Error loading assignments for course {}: {}", course_id, e);
            Vec::new()
        });

    let details = storage
        .list_course_enrollment_details(course_id)
        .await
        .unwrap_or_else(|e| {
            error!("Error loading enrollments for course {}: {}", course_id, e);
            Vec::new()
        });

    let can_manage = can_manage(&storage, &session, &course).await;

    // 只有可管理课程的人需要“添加学生”候选列表
    let available_students = if can_manage {
        let enrolled: HashSet<i64> = details.iter().map(|d| d.student_id).collect();
        let order = ProfileOrder {
            column: "last_name",
            ascending: true,
        };
        match storage.list_profiles(ProfileKind::Student, Some(order)).await {
            Ok(students) => students
                .into_iter()
                .filter(|s| !enrolled.contains(&s.id))
                .collect(),
            Err(e) => {
                error!("Error loading students: {}", e);
                Vec::new()
            }
        }
    } else {
        Vec::new()
    };

    let enrollments = details
        .into_iter()
        .map(|d| {
            let merged = grades::merge_grades(&assignments, &d.grades);
            CourseEnrollmentView {
                enrollment_id: d.enrollment_id,
                enrollment_date: d.enrollment_date,
                student: d.student,
                summary: grades::summarize(&merged),
                grades: d.grades,
            }
        })
        .collect();

    let response = CourseDetailResponse {
        course,
        assignments,
        enrollments,
        available_students,
        can_manage,
        is_admin: session.role() == Some(Role::Admin),
    };
    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Course loaded")))
}
