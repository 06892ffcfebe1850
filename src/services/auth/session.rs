use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AuthService;
use crate::middlewares::LoadSession;
use crate::models::{ApiResponse, users::responses::SessionResponse};

pub async fn handle_session(
    _service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let session = LoadSession::extract_session(request);
    let response = SessionResponse {
        role: session.as_ref().and_then(|s| s.role()),
        user: session.map(|s| s.user),
    };
    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Session loaded")))
}
