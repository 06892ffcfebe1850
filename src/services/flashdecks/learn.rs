use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use rand::seq::SliceRandom;

use super::{FlashdeckService, parse_deck_id};
use crate::models::{
    ApiResponse, ErrorCode,
    flashdecks::{requests::LearnQuery, responses::LearnResponse},
};
use crate::services::{current_session, failure, not_found};
use crate::utils::form::parse_bool;

pub async fn learn(
    service: &FlashdeckService,
    request: &HttpRequest,
    deck_id: &str,
    query: LearnQuery,
) -> ActixResult<HttpResponse> {
    let session = match current_session(request) {
        Ok(session) => session,
        Err(resp) => return Ok(resp),
    };
    let Some(deck_id) = parse_deck_id(deck_id) else {
        return Ok(not_found(ErrorCode::DeckNotFound, "Flashdeck not found."));
    };
    let storage = service.get_storage(request, &session);

    let deck = match storage.get_deck(&deck_id).await {
        Ok(Some(deck)) => deck,
        Ok(None) => return Ok(not_found(ErrorCode::DeckNotFound, "Flashdeck not found.")),
        Err(e) => {
            return Ok(failure(&e, ErrorCode::InternalServerError, "Failed to load flashdeck"));
        }
    };

    let mut cards = match storage.list_cards(&deck_id, true).await {
        Ok(cards) => cards,
        Err(e) => return Ok(failure(&e, ErrorCode::InternalServerError, "Failed to load cards")),
    };

    let shuffled = query
        .shuffle
        .as_deref()
        .and_then(parse_bool)
        .unwrap_or(false);
    if shuffled {
        cards.shuffle(&mut rand::rng());
    }

    let is_owner = deck.user_id == session.user_id();
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        LearnResponse {
            deck,
            cards,
            is_owner,
            shuffled,
        },
        "Flashdeck loaded",
    )))
}
