use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::{FlashdeckService, load_owned_deck, parse_deck_id};
use crate::models::{
    ApiResponse, ErrorCode,
    flashdecks::{
        Card, CardUpdate, NewCard,
        requests::{CreateCardForm, DeleteCardForm, UpdateCardForm},
    },
    users::Session,
};
use crate::services::{bad_request, current_session, failure, forbidden, not_found};
use crate::storage::Storage;
use crate::utils::form::{required, required_uuid};

const CONTENT_REQUIRED: &str = "Front and back content are required.";

pub async fn create_card(
    service: &FlashdeckService,
    request: &HttpRequest,
    deck_id: &str,
    form: CreateCardForm,
) -> ActixResult<HttpResponse> {
    let session = match current_session(request) {
        Ok(session) => session,
        Err(resp) => return Ok(resp),
    };
    let Some(deck_id) = parse_deck_id(deck_id) else {
        return Ok(not_found(ErrorCode::DeckNotFound, "Flashdeck not found."));
    };
    let (Some(front), Some(back)) = (required(&form.front_content), required(&form.back_content))
    else {
        return Ok(bad_request(ErrorCode::BadRequest, CONTENT_REQUIRED));
    };

    let storage = service.get_storage(request, &session);
    if let Err(resp) = load_owned_deck(&storage, &session, &deck_id).await {
        return Ok(resp);
    }

    let card = NewCard {
        flashdeck_id: deck_id,
        front_content: front.to_string(),
        back_content: back.to_string(),
    };
    match storage.create_card(card).await {
        Ok(card) => Ok(HttpResponse::Created().json(ApiResponse::success(
            card,
            "Card created successfully.",
        ))),
        Err(e) => Ok(failure(&e, ErrorCode::InternalServerError, "Failed to create card")),
    }
}

pub async fn update_card(
    service: &FlashdeckService,
    request: &HttpRequest,
    deck_id: &str,
    form: UpdateCardForm,
) -> ActixResult<HttpResponse> {
    let session = match current_session(request) {
        Ok(session) => session,
        Err(resp) => return Ok(resp),
    };
    let Some(card_id) = required_uuid(&form.card_id) else {
        return Ok(bad_request(ErrorCode::BadRequest, "Card ID is required."));
    };
    let (Some(front), Some(back)) = (required(&form.front_content), required(&form.back_content))
    else {
        return Ok(bad_request(ErrorCode::BadRequest, CONTENT_REQUIRED));
    };

    let storage = service.get_storage(request, &session);
    if let Err(resp) = load_owned_card(&storage, &session, deck_id, &card_id).await {
        return Ok(resp);
    }

    let update = CardUpdate {
        front_content: front.to_string(),
        back_content: back.to_string(),
    };
    match storage.update_card(&card_id, update).await {
        Ok(Some(card)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            card,
            "Card updated successfully.",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::CardNotFound, "Card not found.")),
        Err(e) => Ok(failure(&e, ErrorCode::InternalServerError, "Failed to update card")),
    }
}

pub async fn delete_card(
    service: &FlashdeckService,
    request: &HttpRequest,
    deck_id: &str,
    form: DeleteCardForm,
) -> ActixResult<HttpResponse> {
    let session = match current_session(request) {
        Ok(session) => session,
        Err(resp) => return Ok(resp),
    };
    let Some(card_id) = required_uuid(&form.card_id) else {
        return Ok(bad_request(ErrorCode::BadRequest, "Card ID is required."));
    };

    let storage = service.get_storage(request, &session);
    if let Err(resp) = load_owned_card(&storage, &session, deck_id, &card_id).await {
        return Ok(resp);
    }

    match storage.delete_card(&card_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
            "Card deleted successfully.",
        ))),
        Ok(false) => Ok(not_found(ErrorCode::CardNotFound, "Card not found.")),
        Err(e) => Ok(failure(&e, ErrorCode::InternalServerError, "Failed to delete card")),
    }
}

/// 卡片必须存在（404），且属于路径中调用者自己的卡组（403）
async fn load_owned_card(
    storage: &Arc<dyn Storage>,
    session: &Session,
    deck_id: &str,
    card_id: &str,
) -> Result<Card, HttpResponse> {
    let card = match storage.get_card(card_id).await {
        Ok(Some(card)) => card,
        Ok(None) => return Err(not_found(ErrorCode::CardNotFound, "Card not found.")),
        Err(e) => return Err(failure(&e, ErrorCode::InternalServerError, "Failed to load card")),
    };

    if parse_deck_id(deck_id).as_deref() != Some(card.flashdeck_id.as_str()) {
        return Err(forbidden(
            ErrorCode::CardPermissionDenied,
            "This card does not belong to the flashdeck.",
        ));
    }

    match load_owned_deck(storage, session, &card.flashdeck_id).await {
        Ok(_) => Ok(card),
        Err(_) => Err(forbidden(
            ErrorCode::CardPermissionDenied,
            "You do not own this flashdeck.",
        )),
    }
}
