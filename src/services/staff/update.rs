use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::{StaffService, admin_session, verified_member};
use crate::models::{
    ApiResponse, ErrorCode,
    profiles::{ProfileKind, ProfileUpdate, requests::UpdateInstructorForm},
};
use crate::services::{bad_request, failure, not_found};
use crate::utils::form::{required, required_id, required_password, required_uuid};

pub async fn update_instructor(
    service: &StaffService,
    request: &HttpRequest,
    form: UpdateInstructorForm,
) -> ActixResult<HttpResponse> {
    let session = match admin_session(request) {
        Ok(session) => session,
        Err(resp) => return Ok(resp),
    };

    let (Some(instructor_id), Some(user_id), Some(first_name), Some(last_name), Some(email)) = (
        required_id(&form.instructor_id),
        required_uuid(&form.user_id),
        required(&form.first_name),
        required(&form.last_name),
        required(&form.email),
    ) else {
        return Ok(bad_request(
            ErrorCode::BadRequest,
            "Missing required fields for update.",
        ));
    };

    let storage = service.get_storage(request, &session);
    if let Err(resp) =
        verified_member(&storage, ProfileKind::Instructor, instructor_id, &user_id).await
    {
        return Ok(resp);
    }

    let update = ProfileUpdate {
        first_name: Some(first_name.to_string()),
        last_name: Some(last_name.to_string()),
        email: Some(email.to_string()),
    };
    match storage
        .update_profile(ProfileKind::Instructor, instructor_id, update)
        .await
    {
        Ok(Some(_)) => {}
        Ok(None) => return Ok(not_found(ErrorCode::StaffNotFound, "Instructor not found.")),
        Err(e) => {
            error!("Error updating instructor record: {}", e);
            return Ok(failure(
                &e,
                ErrorCode::AccountUpdateFailed,
                "Failed to update instructor data",
            ));
        }
    }

    // 密码留空表示不修改
    if let Some(password) = required_password(&form.password) {
        let identity = service.get_identity(request);
        if let Err(e) = identity.admin_update_password(&user_id, password).await {
            error!("Error updating auth user password for instructor: {}", e);
            return Ok(HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::AccountUpdateFailed,
                format!(
                    "Instructor data updated, but failed to update password: {}",
                    e.message()
                ),
            )));
        }
    }

    info!("Instructor {} updated by {}", instructor_id, session.user_id());
    Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
        "Instructor updated successfully.",
    )))
}
