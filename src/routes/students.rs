use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::{
    profiles::requests::{CreateAccountForm, EnrollStudentForm, StudentListQuery},
    users::Role,
};
use crate::services::StudentService;
use crate::utils::SafeStudentId;

static STUDENT_SERVICE: Lazy<StudentService> = Lazy::new(StudentService::new_lazy);

pub async fn list_students(
    req: HttpRequest,
    query: web::Query<StudentListQuery>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.list_students(&req, query.into_inner()).await
}

pub async fn create_student(
    req: HttpRequest,
    form: web::Form<CreateAccountForm>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.create_student(&req, form.into_inner()).await
}

pub async fn get_student(req: HttpRequest, student_id: SafeStudentId) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.get_student(&req, student_id.0).await
}

pub async fn enroll_student(
    req: HttpRequest,
    student_id: SafeStudentId,
    form: web::Form<EnrollStudentForm>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE
        .enroll_student(&req, student_id.0, form.into_inner())
        .await
}

pub fn configure_student_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/students")
            .wrap(middlewares::RequireSession)
            .route("", web::get().to(list_students))
            .service(
                web::resource("/create")
                    .wrap(middlewares::RateLimit::mutations())
                    .route(web::post().to(create_student)),
            )
            .route("/{student_id}", web::get().to(get_student))
            .route(
                "/{student_id}/enroll",
                web::post()
                    .to(enroll_student)
                    .wrap(middlewares::RequireRole::new_any(Role::staff_roles())),
            ),
    );
}
