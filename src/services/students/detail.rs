use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use super::StudentService;
use crate::models::{
    ApiResponse, ErrorCode,
    enrollments::StudentEnrollmentDetail,
    profiles::{
        ProfileKind,
        responses::{EnrolledCourseView, StudentDetailResponse},
    },
    users::Role,
};
use crate::services::{current_session, failure, grades, not_found};

pub async fn get_student(
    service: &StudentService,
    request: &HttpRequest,
    student_id: i64,
) -> ActixResult<HttpResponse> {
    let session = match current_session(request) {
        Ok(session) => session,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request, &session);

    let student = match storage.get_profile(ProfileKind::Student, student_id).await {
        Ok(Some(student)) => student,
        Ok(None) => return Ok(not_found(ErrorCode::StudentNotFound, "Student not found.")),
        Err(e) => {
            return Ok(failure(
                &e,
                ErrorCode::InternalServerError,
                "Failed to load student",
            ));
        }
    };

    let details = storage
        .list_student_enrollment_details(student_id)
        .await
        .unwrap_or_else(|e| {
            error!("Error fetching enrolled courses with assignments and grades: {}", e);
            Vec::new()
        });

    let enrolled_ids: Vec<i64> = details
        .iter()
        .filter_map(|d| d.course.as_ref().map(|c| c.course_id))
        .collect();
    let available_courses = storage
        .list_course_options_excluding(&enrolled_ids)
        .await
        .unwrap_or_else(|e| {
            error!("Error fetching available courses: {}", e);
            Vec::new()
        });

    let enrolled_courses: Vec<EnrolledCourseView> =
        details.into_iter().filter_map(enrolled_view).collect();

    let total_ects = enrolled_courses.iter().map(|c| c.ects).sum();
    let course_averages: Vec<(i32, Option<f64>)> = enrolled_courses
        .iter()
        .map(|c| (c.ects, c.summary.average))
        .collect();

    let response = StudentDetailResponse {
        student,
        overall_average: grades::overall_average(&course_averages),
        total_ects,
        enrolled_courses,
        available_courses,
        can_enroll: matches!(session.role(), Some(Role::Admin | Role::Instructor)),
    };
    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Student loaded")))
}

/// 课程被删除或不可见的选课记录不展示
fn enrolled_view(detail: StudentEnrollmentDetail) -> Option<EnrolledCourseView> {
    let course = detail.course?;
    let assignments = grades::merge_grades(&course.assignments, &detail.grades);
    Some(EnrolledCourseView {
        enrollment_id: detail.enrollment_id,
        enrollment_date: detail.enrollment_date,
        course_id: course.course_id,
        course_name: course.course_name,
        ects: course.ects.unwrap_or_default(),
        hours: course.hours,
        format: course.format,
        summary: grades::summarize(&assignments),
        assignments,
    })
}
