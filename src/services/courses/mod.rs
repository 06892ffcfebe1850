pub mod assignments;
pub mod create;
pub mod delete;
pub mod detail;
pub mod enrollment;
pub mod grades;
pub mod list;
pub mod roster;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use tracing::error;

use crate::models::{
    ApiResponse, ErrorCode,
    assignments::requests::{
        AddAssignmentForm, AddStudentForm, ClearGradeForm, DeleteAssignmentForm,
        RemoveStudentForm, SetGradeForm, UpdateAssignmentForm,
    },
    courses::{
        Course,
        requests::{CourseEnrollmentForm, CreateCourseForm, UpdateCourseForm},
    },
    profiles::ProfileKind,
    users::{Role, Session},
};
use crate::storage::{Storage, StorageProvider};

pub struct CourseService {
    storage: Option<Arc<dyn StorageProvider>>,
}

/// 调用者有权管理的课程
pub(crate) struct ManagedCourse {
    pub course: Course,
    pub is_admin: bool,
}

impl CourseService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest, session: &Session) -> Arc<dyn Storage> {
        let provider = match &self.storage {
            Some(provider) => provider.clone(),
            None => super::app_storage_provider(request),
        };
        provider.for_session(&session.access_token)
    }

    // 课程列表
    pub async fn list_courses(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::list_courses(self, request).await
    }

    pub async fn create_course(
        &self,
        request: &HttpRequest,
        form: CreateCourseForm,
    ) -> ActixResult<HttpResponse> {
        create::create_course(self, request, form).await
    }

    // 学生自助选课
    pub async fn enroll(
        &self,
        request: &HttpRequest,
        form: CourseEnrollmentForm,
    ) -> ActixResult<HttpResponse> {
        enrollment::enroll(self, request, form).await
    }

    // 学生自助退课
    pub async fn disenroll(
        &self,
        request: &HttpRequest,
        form: CourseEnrollmentForm,
    ) -> ActixResult<HttpResponse> {
        enrollment::disenroll(self, request, form).await
    }

    // 课程详情
    pub async fn get_course(&self, request: &HttpRequest, course_id: i64) -> ActixResult<HttpResponse> {
        detail::get_course(self, request, course_id).await
    }

    pub async fn add_student(
        &self,
        request: &HttpRequest,
        course_id: i64,
        form: AddStudentForm,
    ) -> ActixResult<HttpResponse> {
        roster::add_student(self, request, course_id, form).await
    }

    pub async fn remove_student(
        &self,
        request: &HttpRequest,
        course_id: i64,
        form: RemoveStudentForm,
    ) -> ActixResult<HttpResponse> {
        roster::remove_student(self, request, course_id, form).await
    }

    pub async fn add_assignment(
        &self,
        request: &HttpRequest,
        course_id: i64,
        form: AddAssignmentForm,
    ) -> ActixResult<HttpResponse> {
        assignments::add_assignment(self, request, course_id, form).await
    }

    pub async fn update_assignment(
        &self,
        request: &HttpRequest,
        course_id: i64,
        form: UpdateAssignmentForm,
    ) -> ActixResult<HttpResponse> {
        assignments::update_assignment(self, request, course_id, form).await
    }

    pub async fn delete_assignment(
        &self,
        request: &HttpRequest,
        course_id: i64,
        form: DeleteAssignmentForm,
    ) -> ActixResult<HttpResponse> {
        assignments::delete_assignment(self, request, course_id, form).await
    }

    pub async fn set_grade(
        &self,
        request: &HttpRequest,
        course_id: i64,
        form: SetGradeForm,
    ) -> ActixResult<HttpResponse> {
        grades::set_grade(self, request, course_id, form).await
    }

    pub async fn clear_grade(
        &self,
        request: &HttpRequest,
        course_id: i64,
        form: ClearGradeForm,
    ) -> ActixResult<HttpResponse> {
        grades::clear_grade(self, request, course_id, form).await
    }

    pub async fn update_course(
        &self,
        request: &HttpRequest,
        course_id: i64,
        form: UpdateCourseForm,
    ) -> ActixResult<HttpResponse> {
        update::update_course(self, request, course_id, form).await
    }

    // 仅管理员
    pub async fn delete_course(
        &self,
        request: &HttpRequest,
        course_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_course(self, request, course_id).await
    }
}

/// 管理员或该课程的授课教师
pub(crate) async fn can_manage(storage: &Arc<dyn Storage>, session: &Session, course: &Course) -> bool {
    match session.role() {
        Some(Role::Admin) => true,
        Some(Role::Instructor) => {
            match super::caller_profile_id(storage, ProfileKind::Instructor, session).await {
                Ok(Some(id)) => course.instructor_id == Some(id),
                Ok(None) => false,
                Err(e) => {
                    error!("Failed to resolve instructor profile: {}", e);
                    false
                }
            }
        }
        _ => false,
    }
}

/// 读取课程并检查管理权限
pub(crate) async fn load_managed_course(
    storage: &Arc<dyn Storage>,
    session: &Session,
    course_id: i64,
) -> Result<ManagedCourse, HttpResponse> {
    let course = match storage.get_course(course_id).await {
        Ok(Some(course)) => course,
        Ok(None) => {
            return Err(super::not_found(
                ErrorCode::CourseNotFound,
                "Course not found.",
            ));
        }
        Err(e) => {
            return Err(super::failure(
                &e,
                ErrorCode::InternalServerError,
                "Failed to load course",
            ));
        }
    };

    if !can_manage(storage, session, &course).await {
        return Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::CoursePermissionDenied,
            "You are not authorized to manage this course.",
        )));
    }

    Ok(ManagedCourse {
        is_admin: session.role() == Some(Role::Admin),
        course,
    })
}
