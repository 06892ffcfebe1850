use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 闪卡组
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/flashdeck.ts")]
pub struct Deck {
    pub flashdeck_id: String,
    pub user_id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(
        default,
        deserialize_with = "crate::utils::time::deserialize_timestamp_opt"
    )]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

// 闪卡，归属通过所在卡组的 user_id 判断
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/flashdeck.ts")]
pub struct Card {
    pub card_id: String,
    pub flashdeck_id: String,
    pub front_content: String,
    pub back_content: String,
    #[serde(
        default,
        deserialize_with = "crate::utils::time::deserialize_timestamp_opt"
    )]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// 卡组列表范围
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeckScope {
    Owned,
    Others,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewDeck {
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewCard {
    pub flashdeck_id: String,
    pub front_content: String,
    pub back_content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CardUpdate {
    pub front_content: String,
    pub back_content: String,
}

pub mod requests {
    use serde::Deserialize;

    #[derive(Debug, Clone, Default, Deserialize)]
    pub struct CreateDeckForm {
        pub name: Option<String>,
        pub description: Option<String>,
    }

    #[derive(Debug, Clone, Default, Deserialize)]
    pub struct DeleteDeckForm {
        pub flashdeck_id: Option<String>,
    }

    #[derive(Debug, Clone, Default, Deserialize)]
    pub struct CreateCardForm {
        pub front_content: Option<String>,
        pub back_content: Option<String>,
    }

    #[derive(Debug, Clone, Default, Deserialize)]
    pub struct UpdateCardForm {
        pub card_id: Option<String>,
        pub front_content: Option<String>,
        pub back_content: Option<String>,
    }

    #[derive(Debug, Clone, Default, Deserialize)]
    pub struct DeleteCardForm {
        pub card_id: Option<String>,
    }

    #[derive(Debug, Clone, Default, Deserialize)]
    pub struct LearnQuery {
        pub shuffle: Option<String>,
    }
}

pub mod responses {
    use serde::Serialize;
    use ts_rs::TS;

    use super::{Card, Deck};

    #[derive(Debug, Clone, Serialize, TS)]
    #[ts(export, export_to = "../frontend/src/types/generated/flashdeck.ts")]
    pub struct DeckListResponse {
        pub my_decks: Vec<Deck>,
        pub other_decks: Vec<Deck>,
    }

    #[derive(Debug, Clone, Serialize, TS)]
    #[ts(export, export_to = "../frontend/src/types/generated/flashdeck.ts")]
    pub struct DeckDetailResponse {
        pub deck: Deck,
        pub cards: Vec<Card>,
    }

    #[derive(Debug, Clone, Serialize, TS)]
    #[ts(export, export_to = "../frontend/src/types/generated/flashdeck.ts")]
    pub struct LearnResponse {
        pub deck: Deck,
        pub cards: Vec<Card>,
        pub is_owner: bool,
        pub shuffled: bool,
    }
}
