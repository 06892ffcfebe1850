use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};

use super::AuthService;
use crate::cache;
use crate::config::AppConfig;
use crate::middlewares::{auth_guard::HOME_PATH, session::session_cache_key};
use crate::models::{
    ApiResponse, ErrorCode,
    users::{requests::LoginForm, responses::LoginFailure},
};
use crate::utils::form::{required, required_password};

pub async fn handle_login(
    service: &AuthService,
    request: &HttpRequest,
    form: LoginForm,
) -> ActixResult<HttpResponse> {
    let echo = LoginFailure {
        email: form.email.clone().unwrap_or_default(),
    };

    let (Some(email), Some(password)) =
        (required(&form.email), required_password(&form.password))
    else {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error(
            ErrorCode::BadRequest,
            echo,
            "Email and password are required.",
        )));
    };

    let identity = service.get_identity(request);
    let auth = match identity.sign_in_with_password(email, password).await {
        Ok(auth) => auth,
        Err(e) => {
            warn!("Login failed for {}: {}", email, e);
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error(
                ErrorCode::AuthFailed,
                echo,
                e.message(),
            )));
        }
    };

    if let Some(cache) = service.get_cache(request) {
        cache::insert_json(
            cache.as_ref(),
            session_cache_key(&auth.access_token),
            &auth.user,
            AppConfig::get().session.user_cache_ttl,
        )
        .await;
    }

    info!("User {} logged in", auth.user.id);

    let mut response = HttpResponse::SeeOther();
    response.insert_header(("Location", HOME_PATH));
    for cookie in service.get_cookies().issue(&auth) {
        response.cookie(cookie);
    }
    Ok(response.finish())
}
