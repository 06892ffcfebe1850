use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::FlashdeckService;
use crate::models::{
    ApiResponse, ErrorCode,
    flashdecks::{NewDeck, requests::CreateDeckForm},
};
use crate::services::{bad_request, current_session, failure};
use crate::utils::form::{optional_trimmed, required};

pub async fn create_deck(
    service: &FlashdeckService,
    request: &HttpRequest,
    form: CreateDeckForm,
) -> ActixResult<HttpResponse> {
    let session = match current_session(request) {
        Ok(session) => session,
        Err(resp) => return Ok(resp),
    };

    let Some(name) = required(&form.name) else {
        return Ok(bad_request(ErrorCode::BadRequest, "Deck name is required."));
    };

    let deck = NewDeck {
        user_id: session.user_id().to_string(),
        name: name.to_string(),
        description: optional_trimmed(&form.description),
    };

    let storage = service.get_storage(request, &session);
    match storage.create_deck(deck).await {
        Ok(deck) => {
            info!("Flashdeck {} created by {}", deck.flashdeck_id, session.user_id());
            Ok(HttpResponse::Created().json(ApiResponse::success(
                deck,
                "Flashdeck created successfully.",
            )))
        }
        Err(e) => Ok(failure(&e, ErrorCode::InternalServerError, "Failed to create flashdeck")),
    }
}
