use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{debug, info};

use super::AuthService;
use crate::middlewares::{LoadSession, auth_guard::LOGIN_PATH, session::session_cache_key};

pub async fn handle_logout(
    service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let cookies = service.get_cookies();

    // 会话可能刚刚被刷新，优先使用请求扩展中的令牌
    let access_token = LoadSession::extract_session(request)
        .map(|s| s.access_token)
        .or_else(|| cookies.read(request).0);

    if let Some(token) = access_token {
        if let Err(e) = service.get_identity(request).sign_out(&token).await {
            debug!("Best-effort sign out failed: {}", e);
        }
        if let Some(cache) = service.get_cache(request) {
            cache.remove(&session_cache_key(&token)).await;
        }
        info!("Session signed out");
    }

    let mut response = HttpResponse::SeeOther();
    response.insert_header(("Location", LOGIN_PATH));
    for cookie in cookies.removal() {
        response.cookie(cookie);
    }
    Ok(response.finish())
}
