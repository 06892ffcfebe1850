//! 闪卡组与闪卡存储操作

use super::{PostgrestStorage, TableQuery};
use crate::errors::Result;
use crate::models::flashdecks::{Card, CardUpdate, Deck, DeckScope, NewCard, NewDeck};

impl PostgrestStorage {
    /// 自己的或其他人的卡组，新建在前
    pub async fn list_decks_impl(&self, owner_id: &str, scope: DeckScope) -> Result<Vec<Deck>> {
        let query = TableQuery::new("decks").select("*");
        let query = match scope {
            DeckScope::Owned => query.eq("user_id", owner_id),
            DeckScope::Others => query.neq("user_id", owner_id),
        };
        self.fetch_all(query.order("created_at", false)).await
    }

    pub async fn get_deck_impl(&self, deck_id: &str) -> Result<Option<Deck>> {
        let query = TableQuery::new("decks")
            .select("*")
            .eq("flashdeck_id", deck_id);
        self.fetch_optional(query).await
    }

    pub async fn create_deck_impl(&self, deck: NewDeck) -> Result<Deck> {
        self.insert_one(TableQuery::new("decks"), &deck).await
    }

    pub async fn delete_deck_impl(&self, deck_id: &str) -> Result<bool> {
        let query = TableQuery::new("decks").eq("flashdeck_id", deck_id);
        Ok(self.delete_rows(query).await? > 0)
    }

    pub async fn list_cards_impl(&self, deck_id: &str, ascending: bool) -> Result<Vec<Card>> {
        let query = TableQuery::new("cards")
            .select("*")
            .eq("flashdeck_id", deck_id)
            .order("created_at", ascending);
        self.fetch_all(query).await
    }

    pub async fn get_card_impl(&self, card_id: &str) -> Result<Option<Card>> {
        let query = TableQuery::new("cards").select("*").eq("card_id", card_id);
        self.fetch_optional(query).await
    }

    pub async fn create_card_impl(&self, card: NewCard) -> Result<Card> {
        self.insert_one(TableQuery::new("cards"), &card).await
    }

    pub async fn update_card_impl(&self, card_id: &str, update: CardUpdate) -> Result<Option<Card>> {
        let query = TableQuery::new("cards").eq("card_id", card_id);
        self.update_one(query, &update).await
    }

    pub async fn delete_card_impl(&self, card_id: &str) -> Result<bool> {
        let query = TableQuery::new("cards").eq("card_id", card_id);
        Ok(self.delete_rows(query).await? > 0)
    }

    pub async fn delete_cards_in_deck_impl(&self, deck_id: &str) -> Result<u64> {
        let query = TableQuery::new("cards").eq("flashdeck_id", deck_id);
        self.delete_rows(query).await
    }
}
