pub mod cards;
pub mod create;
pub mod delete;
pub mod detail;
pub mod learn;
pub mod list;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::{
    ErrorCode,
    flashdecks::{
        Deck,
        requests::{
            CreateCardForm, CreateDeckForm, DeleteCardForm, DeleteDeckForm, LearnQuery,
            UpdateCardForm,
        },
    },
    users::Session,
};
use crate::storage::{Storage, StorageProvider};

use super::{failure, forbidden, not_found};

pub struct FlashdeckService {
    storage: Option<Arc<dyn StorageProvider>>,
}

impl FlashdeckService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest, session: &Session) -> Arc<dyn Storage> {
        let provider = match &self.storage {
            Some(provider) => provider.clone(),
            None => super::app_storage_provider(request),
        };
        provider.for_session(&session.access_token)
    }

    // 我的卡组与他人的卡组
    pub async fn list_decks(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::list_decks(self, request).await
    }

    pub async fn create_deck(
        &self,
        request: &HttpRequest,
        form: CreateDeckForm,
    ) -> ActixResult<HttpResponse> {
        create::create_deck(self, request, form).await
    }

    pub async fn delete_deck(
        &self,
        request: &HttpRequest,
        form: DeleteDeckForm,
    ) -> ActixResult<HttpResponse> {
        delete::delete_deck(self, request, form).await
    }

    // 卡组详情（仅所有者）
    pub async fn get_deck(&self, request: &HttpRequest, deck_id: &str) -> ActixResult<HttpResponse> {
        detail::get_deck(self, request, deck_id).await
    }

    pub async fn create_card(
        &self,
        request: &HttpRequest,
        deck_id: &str,
        form: CreateCardForm,
    ) -> ActixResult<HttpResponse> {
        cards::create_card(self, request, deck_id, form).await
    }

    pub async fn update_card(
        &self,
        request: &HttpRequest,
        deck_id: &str,
        form: UpdateCardForm,
    ) -> ActixResult<HttpResponse> {
        cards::update_card(self, request, deck_id, form).await
    }

    pub async fn delete_card(
        &self,
        request: &HttpRequest,
        deck_id: &str,
        form: DeleteCardForm,
    ) -> ActixResult<HttpResponse> {
        cards::delete_card(self, request, deck_id, form).await
    }

    // 学习模式，任何登录用户可用
    pub async fn learn(
        &self,
        request: &HttpRequest,
        deck_id: &str,
        query: LearnQuery,
    ) -> ActixResult<HttpResponse> {
        learn::learn(self, request, deck_id, query).await
    }
}

/// 读取调用者拥有的卡组：不存在为 404，不是所有者为 403
pub(crate) async fn load_owned_deck(
    storage: &Arc<dyn Storage>,
    session: &Session,
    deck_id: &str,
) -> Result<Deck, HttpResponse> {
    match storage.get_deck(deck_id).await {
        Ok(Some(deck)) if deck.user_id == session.user_id() => Ok(deck),
        Ok(Some(_)) => Err(forbidden(
            ErrorCode::DeckPermissionDenied,
            "You do not own this flashdeck.",
        )),
        Ok(None) => Err(not_found(ErrorCode::DeckNotFound, "Flashdeck not found.")),
        Err(e) => Err(failure(&e, ErrorCode::InternalServerError, "Failed to load flashdeck")),
    }
}

/// 路径中的卡组 ID 必须是 UUID
pub(crate) fn parse_deck_id(raw: &str) -> Option<String> {
    uuid::Uuid::parse_str(raw.trim()).ok().map(|id| id.to_string())
}
