use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::{StaffService, admin_session, verified_member};
use crate::models::{
    ApiResponse, ErrorCode,
    profiles::{
        ProfileKind,
        requests::{DeleteAdminForm, DeleteInstructorForm},
    },
};
use crate::services::{bad_request, not_found};
use crate::utils::form::{required_id, required_uuid};

pub async fn delete_instructor(
    service: &StaffService,
    request: &HttpRequest,
    form: DeleteInstructorForm,
) -> ActixResult<HttpResponse> {
    delete_member(
        service,
        request,
        ProfileKind::Instructor,
        required_id(&form.instructor_id),
        required_uuid(&form.user_id),
    )
    .await
}

pub async fn delete_admin(
    service: &StaffService,
    request: &HttpRequest,
    form: DeleteAdminForm,
) -> ActixResult<HttpResponse> {
    delete_member(
        service,
        request,
        ProfileKind::Admin,
        required_id(&form.admin_id),
        required_uuid(&form.user_id),
    )
    .await
}

/// 核对档案与认证用户后，先删档案行，再删认证用户
async fn delete_member(
    service: &StaffService,
    request: &HttpRequest,
    kind: ProfileKind,
    id: Option<i64>,
    user_id: Option<String>,
) -> ActixResult<HttpResponse> {
    let session = match admin_session(request) {
        Ok(session) => session,
        Err(resp) => return Ok(resp),
    };

    let (Some(id), Some(user_id)) = (id, user_id) else {
        return Ok(bad_request(
            ErrorCode::BadRequest,
            &format!(
                "Missing {} or user_id for deletion.",
                kind.id_column()
            ),
        ));
    };

    let storage = service.get_storage(request, &session);
    if let Err(resp) = verified_member(&storage, kind, id, &user_id).await {
        return Ok(resp);
    }

    match storage.delete_profile(kind, id).await {
        Ok(true) => {}
        Ok(false) => {
            return Ok(not_found(
                ErrorCode::StaffNotFound,
                &format!("{} not found.", kind.title()),
            ));
        }
        Err(e) => {
            error!("Error deleting {} record: {}", kind.label(), e);
            return Ok(HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::AccountDeleteFailed,
                format!("Failed to delete {} record: {}", kind.label(), e.message()),
            )));
        }
    }

    let identity = service.get_identity(request);
    if let Err(e) = identity.admin_delete_user(&user_id).await {
        error!("Error deleting auth user for {}: {}", kind.label(), e);
        return Ok(HttpResponse::InternalServerError().json(ApiResponse::error_empty(
            ErrorCode::AccountDeleteFailed,
            format!(
                "{} record deleted, but failed to delete auth user: {}",
                kind.title(),
                e.message()
            ),
        )));
    }

    info!("{} {} deleted by {}", kind.title(), id, session.user_id());
    Ok(HttpResponse::Ok().json(ApiResponse::success_empty(format!(
        "{} and auth user deleted successfully.",
        kind.title()
    ))))
}
