use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::StaffService;
use crate::models::profiles::{ProfileKind, requests::CreateAccountForm};
use crate::services::{accounts::provision_account, current_session};

pub async fn create_instructor(
    _service: &StaffService,
    request: &HttpRequest,
    form: CreateAccountForm,
) -> ActixResult<HttpResponse> {
    let session = match current_session(request) {
        Ok(session) => session,
        Err(resp) => return Ok(resp),
    };
    Ok(provision_account(
        request,
        &session,
        ProfileKind::Instructor,
        &form,
        "Missing required fields, including password.",
    )
    .await)
}

pub async fn create_admin(
    _service: &StaffService,
    request: &HttpRequest,
    form: CreateAccountForm,
) -> ActixResult<HttpResponse> {
    let session = match current_session(request) {
        Ok(session) => session,
        Err(resp) => return Ok(resp),
    };
    Ok(provision_account(
        request,
        &session,
        ProfileKind::Admin,
        &form,
        "Missing required fields for admin, including password.",
    )
    .await)
}
