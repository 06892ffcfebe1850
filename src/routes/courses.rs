use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::{
    assignments::requests::{
        AddAssignmentForm, AddStudentForm, ClearGradeForm, DeleteAssignmentForm,
        RemoveStudentForm, SetGradeForm, UpdateAssignmentForm,
    },
    courses::requests::{CourseEnrollmentForm, CreateCourseForm, UpdateCourseForm},
    users::Role,
};
use crate::services::CourseService;
use crate::utils::SafeCourseId;

// 懒加载的全局 COURSE_SERVICE 实例
static COURSE_SERVICE: Lazy<CourseService> = Lazy::new(CourseService::new_lazy);

// HTTP处理程序
pub async fn list_courses(req: HttpRequest) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.list_courses(&req).await
}

pub async fn create_course(
    req: HttpRequest,
    form: web::Form<CreateCourseForm>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.create_course(&req, form.into_inner()).await
}

pub async fn enroll(
    req: HttpRequest,
    form: web::Form<CourseEnrollmentForm>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.enroll(&req, form.into_inner()).await
}

pub async fn disenroll(
    req: HttpRequest,
    form: web::Form<CourseEnrollmentForm>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.disenroll(&req, form.into_inner()).await
}

pub async fn get_course(req: HttpRequest, course_id: SafeCourseId) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.get_course(&req, course_id.0).await
}

pub async fn add_student(
    req: HttpRequest,
    course_id: SafeCourseId,
    form: web::Form<AddStudentForm>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE
        .add_student(&req, course_id.0, form.into_inner())
        .await
}

pub async fn remove_student(
    req: HttpRequest,
    course_id: SafeCourseId,
    form: web::Form<RemoveStudentForm>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE
        .remove_student(&req, course_id.0, form.into_inner())
        .await
}

pub async fn add_assignment(
    req: HttpRequest,
    course_id: SafeCourseId,
    form: web::Form<AddAssignmentForm>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE
        .add_assignment(&req, course_id.0, form.into_inner())
        .await
}

pub async fn update_assignment(
    req: HttpRequest,
    course_id: SafeCourseId,
    form: web::Form<UpdateAssignmentForm>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE
        .update_assignment(&req, course_id.0, form.into_inner())
        .await
}

pub async fn delete_assignment(
    req: HttpRequest,
    course_id: SafeCourseId,
    form: web::Form<DeleteAssignmentForm>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE
        .delete_assignment(&req, course_id.0, form.into_inner())
        .await
}

pub async fn set_grade(
    req: HttpRequest,
    course_id: SafeCourseId,
    form: web::Form<SetGradeForm>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE
        .set_grade(&req, course_id.0, form.into_inner())
        .await
}

pub async fn clear_grade(
    req: HttpRequest,
    course_id: SafeCourseId,
    form: web::Form<ClearGradeForm>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE
        .clear_grade(&req, course_id.0, form.into_inner())
        .await
}

pub async fn update_course(
    req: HttpRequest,
    course_id: SafeCourseId,
    form: web::Form<UpdateCourseForm>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE
        .update_course(&req, course_id.0, form.into_inner())
        .await
}

pub async fn delete_course(req: HttpRequest, course_id: SafeCourseId) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.delete_course(&req, course_id.0).await
}

// 配置路由
pub fn configure_course_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/courses")
            .wrap(middlewares::RequireSession)
            .route("", web::get().to(list_courses))
            .service(
                // 教师只能为自己建课，管理员可以指定教师
                web::resource("/create").route(
                    web::post()
                        .to(create_course)
                        .wrap(middlewares::RequireRole::new_any(Role::staff_roles())),
                ),
            )
            .service(
                web::resource("/enroll").route(
                    web::post()
                        .to(enroll)
                        .wrap(middlewares::RequireRole::new(Role::Student)),
                ),
            )
            .service(
                web::resource("/disenroll").route(
                    web::post()
                        .to(disenroll)
                        .wrap(middlewares::RequireRole::new(Role::Student)),
                ),
            )
            .route("/{course_id}", web::get().to(get_course))
            .service(
                // 课程管理：管理员或该课程的授课教师，具体归属在服务层判断
                web::scope("/{course_id}")
                    .wrap(middlewares::RequireRole::new_any(Role::staff_roles()))
                    .route("/students/add", web::post().to(add_student))
                    .route("/students/remove", web::post().to(remove_student))
                    .route("/assignments/add", web::post().to(add_assignment))
                    .route("/assignments/update", web::post().to(update_assignment))
                    .route("/assignments/delete", web::post().to(delete_assignment))
                    .route("/grades/set", web::post().to(set_grade))
                    .route("/grades/clear", web::post().to(clear_grade))
                    .route("/update", web::post().to(update_course))
                    .route(
                        "/delete",
                        web::post()
                            .to(delete_course)
                            .wrap(middlewares::RequireRole::new(Role::Admin)),
                    ),
            ),
    );
}
