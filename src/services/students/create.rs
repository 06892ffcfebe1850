use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::StudentService;
use crate::models::profiles::{ProfileKind, requests::CreateAccountForm};
use crate::services::{accounts::provision_account, current_session};

pub async fn create_student(
    _service: &StudentService,
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
        ProfileKind::Student,
        &form,
        "Missing required fields.",
    )
    .await)
}
