use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use super::{FlashdeckService, parse_deck_id};
use crate::models::{ApiResponse, ErrorCode, flashdecks::responses::DeckDetailResponse};
use crate::services::{current_session, failure, not_found};

pub async fn get_deck(
    service: &FlashdeckService,
    request: &HttpRequest,
    deck_id: &str,
) -> ActixResult<HttpResponse> {
    let session = match current_session(request) {
        Ok(session) => session,
        Err(resp) => return Ok(resp),
    };
    let Some(deck_id) = parse_deck_id(deck_id) else {
        return Ok(not_found(ErrorCode::DeckNotFound, "Flashdeck not found."));
    };
    let storage = service.get_storage(request, &session);

    // 他人的卡组在这里同样视为不存在
    let deck = match storage.get_deck(&deck_id).await {
        Ok(Some(deck)) if deck.user_id == session.user_id() => deck,
        Ok(_) => return Ok(not_found(ErrorCode::DeckNotFound, "Flashdeck not found.")),
        Err(e) => {
            return Ok(failure(&e, ErrorCode::InternalServerError, "Failed to load flashdeck"));
        }
    };

    let cards = storage.list_cards(&deck_id, false).await.unwrap_or_else(|e| {
        error!("Error loading cards for flashdeck {}: {}", deck_id, e);
        Vec::new()
    });

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        DeckDetailResponse { deck, cards },
        "Flashdeck loaded",
    )))
}
