use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::flashdecks::requests::{
    CreateCardForm, CreateDeckForm, DeleteCardForm, DeleteDeckForm, LearnQuery, UpdateCardForm,
};
use crate::services::FlashdeckService;
use crate::utils::SafeDeckId;

static FLASHDECK_SERVICE: Lazy<FlashdeckService> = Lazy::new(FlashdeckService::new_lazy);

pub async fn list_decks(req: HttpRequest) -> ActixResult<HttpResponse> {
    FLASHDECK_SERVICE.list_decks(&req).await
}

pub async fn create_deck(
    req: HttpRequest,
    form: web::Form<CreateDeckForm>,
) -> ActixResult<HttpResponse> {
    FLASHDECK_SERVICE.create_deck(&req, form.into_inner()).await
}

pub async fn delete_deck(
    req: HttpRequest,
    form: web::Form<DeleteDeckForm>,
) -> ActixResult<HttpResponse> {
    FLASHDECK_SERVICE.delete_deck(&req, form.into_inner()).await
}

pub async fn get_deck(req: HttpRequest, deck_id: SafeDeckId) -> ActixResult<HttpResponse> {
    FLASHDECK_SERVICE.get_deck(&req, &deck_id.0).await
}

pub async fn create_card(
    req: HttpRequest,
    deck_id: SafeDeckId,
    form: web::Form<CreateCardForm>,
) -> ActixResult<HttpResponse> {
    FLASHDECK_SERVICE
        .create_card(&req, &deck_id.0, form.into_inner())
        .await
}

pub async fn update_card(
    req: HttpRequest,
    deck_id: SafeDeckId,
    form: web::Form<UpdateCardForm>,
) -> ActixResult<HttpResponse> {
    FLASHDECK_SERVICE
        .update_card(&req, &deck_id.0, form.into_inner())
        .await
}

pub async fn delete_card(
    req: HttpRequest,
    deck_id: SafeDeckId,
    form: web::Form<DeleteCardForm>,
) -> ActixResult<HttpResponse> {
    FLASHDECK_SERVICE
        .delete_card(&req, &deck_id.0, form.into_inner())
        .await
}

pub async fn learn(
    req: HttpRequest,
    deck_id: SafeDeckId,
    query: web::Query<LearnQuery>,
) -> ActixResult<HttpResponse> {
    FLASHDECK_SERVICE
        .learn(&req, &deck_id.0, query.into_inner())
        .await
}

pub fn configure_flashdeck_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/flashdecks")
            .wrap(middlewares::RequireSession)
            .route("", web::get().to(list_decks))
            .route("/create", web::post().to(create_deck))
            .route("/delete", web::post().to(delete_deck))
            .route("/{deck_id}", web::get().to(get_deck))
            .route("/{deck_id}/cards/create", web::post().to(create_card))
            .route("/{deck_id}/cards/update", web::post().to(update_card))
            .route("/{deck_id}/cards/delete", web::post().to(delete_card))
            .route("/{deck_id}/learn", web::get().to(learn)),
    );
}
