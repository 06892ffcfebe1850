use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::{
    profiles::requests::{
        CreateAccountForm, DeleteAdminForm, DeleteInstructorForm, UpdateInstructorForm,
    },
    users::Role,
};
use crate::services::StaffService;
use crate::utils::SafeStaffId;

static STAFF_SERVICE: Lazy<StaffService> = Lazy::new(StaffService::new_lazy);

pub async fn list_staff(req: HttpRequest) -> ActixResult<HttpResponse> {
    STAFF_SERVICE.list_staff(&req).await
}

pub async fn get_staff_member(req: HttpRequest, staff_id: SafeStaffId) -> ActixResult<HttpResponse> {
    STAFF_SERVICE.get_staff_member(&req, staff_id.0).await
}

pub async fn create_instructor(
    req: HttpRequest,
    form: web::Form<CreateAccountForm>,
) -> ActixResult<HttpResponse> {
    STAFF_SERVICE.create_instructor(&req, form.into_inner()).await
}

pub async fn create_admin(
    req: HttpRequest,
    form: web::Form<CreateAccountForm>,
) -> ActixResult<HttpResponse> {
    STAFF_SERVICE.create_admin(&req, form.into_inner()).await
}

pub async fn update_instructor(
    req: HttpRequest,
    form: web::Form<UpdateInstructorForm>,
) -> ActixResult<HttpResponse> {
    STAFF_SERVICE.update_instructor(&req, form.into_inner()).await
}

pub async fn delete_instructor(
    req: HttpRequest,
    form: web::Form<DeleteInstructorForm>,
) -> ActixResult<HttpResponse> {
    STAFF_SERVICE.delete_instructor(&req, form.into_inner()).await
}

pub async fn delete_admin(
    req: HttpRequest,
    form: web::Form<DeleteAdminForm>,
) -> ActixResult<HttpResponse> {
    STAFF_SERVICE.delete_admin(&req, form.into_inner()).await
}

pub fn configure_staff_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/staff")
            .wrap(middlewares::RequireSession)
            .route("", web::get().to(list_staff))
            .service(
                // 账号管理仅限管理员
                web::scope("/instructors")
                    .wrap(middlewares::RequireRole::new(Role::Admin))
                    .service(
                        web::resource("/create")
                            .wrap(middlewares::RateLimit::mutations())
                            .route(web::post().to(create_instructor)),
                    )
                    .route("/update", web::post().to(update_instructor))
                    .route("/delete", web::post().to(delete_instructor)),
            )
            .service(
                web::scope("/admins")
                    .wrap(middlewares::RequireRole::new(Role::Admin))
                    .service(
                        web::resource("/create")
                            .wrap(middlewares::RateLimit::mutations())
                            .route(web::post().to(create_admin)),
                    )
                    .route("/delete", web::post().to(delete_admin)),
            )
            .route("/{staff_id}", web::get().to(get_staff_member)),
    );
}
