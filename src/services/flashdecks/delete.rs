use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{FlashdeckService, load_owned_deck};
use crate::models::{ApiResponse, ErrorCode, flashdecks::requests::DeleteDeckForm};
use crate::services::{bad_request, current_session, failure};
use crate::utils::form::required_uuid;

pub async fn delete_deck(
    service: &FlashdeckService,
    request: &HttpRequest,
    form: DeleteDeckForm,
) -> ActixResult<HttpResponse> {
    let session = match current_session(request) {
        Ok(session) => session,
        Err(resp) => return Ok(resp),
    };

    let Some(deck_id) = required_uuid(&form.flashdeck_id) else {
        return Ok(bad_request(ErrorCode::BadRequest, "Flashdeck ID is required."));
    };

    let storage = service.get_storage(request, &session);
    if let Err(resp) = load_owned_deck(&storage, &session, &deck_id).await {
        return Ok(resp);
    }

    // 先删卡片，再删卡组
    if let Err(e) = storage.delete_cards_in_deck(&deck_id).await {
        return Ok(failure(&e, ErrorCode::InternalServerError, "Failed to delete cards"));
    }
    match storage.delete_deck(&deck_id).await {
        Ok(_) => {
            info!("Flashdeck {} deleted by {}", deck_id, session.user_id());
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
                "Flashdeck deleted successfully.",
            )))
        }
        Err(e) => Ok(failure(&e, ErrorCode::InternalServerError, "Failed to delete flashdeck")),
    }
}
