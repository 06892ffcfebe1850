use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use super::FlashdeckService;
use crate::models::{
    ApiResponse,
    flashdecks::{DeckScope, responses::DeckListResponse},
};
use crate::services::current_session;

pub async fn list_decks(
    service: &FlashdeckService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let session = match current_session(request) {
        Ok(session) => session,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request, &session);
    let user_id = session.user_id();

    let (my_decks, other_decks) = futures_util::join!(
        storage.list_decks(user_id, DeckScope::Owned),
        storage.list_decks(user_id, DeckScope::Others),
    );

    let my_decks = my_decks.unwrap_or_else(|e| {
        error!("Error loading own flashdecks: {}", e);
        Vec::new()
    });
    let other_decks = other_decks.unwrap_or_else(|e| {
        error!("Error loading other flashdecks: {}", e);
        Vec::new()
    });

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        DeckListResponse {
            my_decks,
            other_decks,
        },
        "Flashdecks loaded",
    )))
}
