//! 闪卡组归属、卡片管理与学习模式

#[macro_use]
mod common;

use actix_web::{http::StatusCode, test};
use common::{Backend, access_cookie};
use studydesk::models::profiles::ProfileKind;

#[actix_web::test]
async fn test_deck_lists_split_by_owner() {
    let backend = Backend::new();
    let (ada_id, ada) = backend.sign_in(ProfileKind::Student, "Ada", "Lovelace");
    let (alan_id, _) = backend.sign_in(ProfileKind::Student, "Alan", "Turing");
    let ada_user = backend.user_id_of(ProfileKind::Student, ada_id);
    let alan_user = backend.user_id_of(ProfileKind::Student, alan_id);
    backend.storage.with(|t| {
        t.add_deck(&ada_user, "Older");
        t.add_deck(&alan_user, "Shared");
        t.add_deck(&ada_user, "Newer");
    });
    let app = test_app!(backend);

    let req = test::TestRequest::get()
        .uri("/api/v1/flashdecks")
        .cookie(access_cookie(&ada))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["my_decks"][0]["name"], "Newer");
    assert_eq!(body["data"]["my_decks"][1]["name"], "Older");
    assert_eq!(body["data"]["other_decks"][0]["name"], "Shared");
    assert_eq!(body["data"]["other_decks"].as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn test_create_and_delete_deck() {
    let backend = Backend::new();
    let (ada_id, ada) = backend.sign_in(ProfileKind::Student, "Ada", "Lovelace");
    let (_, alan) = backend.sign_in(ProfileKind::Student, "Alan", "Turing");
    let ada_user = backend.user_id_of(ProfileKind::Student, ada_id);
    let app = test_app!(backend);

    let (status, body) =
        post_form!(&app, &ada, "/api/v1/flashdecks/create", &[("name", "  ")]).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Deck name is required.");

    let (status, body) = post_form!(
        &app,
        &ada,
        "/api/v1/flashdecks/create",
        &[("name", "Latin verbs"), ("description", "  ")]
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["user_id"], ada_user.as_str());
    assert!(body["data"]["description"].is_null());
    let deck_id = body["data"]["flashdeck_id"].as_str().unwrap().to_string();
    backend.storage.with(|t| {
        t.add_card(&deck_id, "amo", "I love");
        t.add_card(&deck_id, "video", "I see");
    });

    let (status, body) = post_form!(
        &app,
        &alan,
        "/api/v1/flashdecks/delete",
        &[("flashdeck_id", deck_id.as_str())]
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "You do not own this flashdeck.");

    let (status, body) = post_form!(
        &app,
        &ada,
        "/api/v1/flashdecks/delete",
        &[("flashdeck_id", deck_id.as_str())]
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Flashdeck deleted successfully.");
    backend.storage.with(|t| {
        assert!(t.decks.is_empty());
        assert!(t.cards.is_empty());
    });

    let (status, _) = post_form!(
        &app,
        &ada,
        "/api/v1/flashdecks/delete",
        &[("flashdeck_id", deck_id.as_str())]
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_deck_detail_hides_foreign_decks() {
    let backend = Backend::new();
    let (ada_id, ada) = backend.sign_in(ProfileKind::Student, "Ada", "Lovelace");
    let (_, alan) = backend.sign_in(ProfileKind::Student, "Alan", "Turing");
    let ada_user = backend.user_id_of(ProfileKind::Student, ada_id);
    let deck_id = backend.storage.with(|t| {
        let deck = t.add_deck(&ada_user, "Latin verbs");
        t.add_card(&deck, "amo", "I love");
        t.add_card(&deck, "video", "I see");
        deck
    });
    let app = test_app!(backend);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/flashdecks/{deck_id}"))
        .cookie(access_cookie(&ada))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    // 最新的卡片在前
    assert_eq!(body["data"]["cards"][0]["front_content"], "video");

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/flashdecks/{deck_id}"))
        .cookie(access_cookie(&alan))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get()
        .uri("/api/v1/flashdecks/not-a-uuid")
        .cookie(access_cookie(&ada))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_client_error());
}

#[actix_web::test]
async fn test_card_ownership_checks() {
    let backend = Backend::new();
    let (ada_id, ada) = backend.sign_in(ProfileKind::Student, "Ada", "Lovelace");
    let (_, alan) = backend.sign_in(ProfileKind::Student, "Alan", "Turing");
    let ada_user = backend.user_id_of(ProfileKind::Student, ada_id);
    let (deck, other_deck, foreign_card) = backend.storage.with(|t| {
        let deck = t.add_deck(&ada_user, "Latin verbs");
        let other = t.add_deck(&ada_user, "Greek");
        let card = t.add_card(&other, "logos", "word");
        (deck, other, card)
    });
    let app = test_app!(backend);
    let cards = format!("/api/v1/flashdecks/{deck}/cards");

    let (status, body) = post_form!(
        &app,
        &ada,
        format!("{cards}/create"),
        &[("front_content", "amo")]
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Front and back content are required.");

    let (status, _) = post_form!(
        &app,
        &alan,
        format!("{cards}/create"),
        &[("front_content", "amo"), ("back_content", "I love")]
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = post_form!(
        &app,
        &ada,
        format!("{cards}/create"),
        &[("front_content", "amo"), ("back_content", "I love")]
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let card_id = body["data"]["card_id"].as_str().unwrap().to_string();

    let (status, body) = post_form!(
        &app,
        &ada,
        format!("{cards}/update"),
        &[
            ("card_id", card_id.as_str()),
            ("front_content", "amare"),
            ("back_content", "to love"),
        ]
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Card updated successfully.");

    // 卡片属于同一用户的另一卡组
    let (status, body) = post_form!(
        &app,
        &ada,
        format!("{cards}/delete"),
        &[("card_id", foreign_card.as_str())]
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "This card does not belong to the flashdeck.");

    let (status, _) = post_form!(
        &app,
        &ada,
        format!("/api/v1/flashdecks/{other_deck}/cards/delete"),
        &[("card_id", foreign_card.as_str())]
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = post_form!(
        &app,
        &ada,
        format!("{cards}/delete"),
        &[("card_id", uuid::Uuid::new_v4().to_string().as_str())]
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Card not found.");

    let fronts: Vec<String> =
        backend.storage.with(|t| t.cards.iter().map(|c| c.front_content.clone()).collect());
    assert_eq!(fronts, vec!["amare".to_string()]);
}

#[actix_web::test]
async fn test_learn_mode() {
    let backend = Backend::new();
    let (ada_id, ada) = backend.sign_in(ProfileKind::Student, "Ada", "Lovelace");
    let (_, alan) = backend.sign_in(ProfileKind::Student, "Alan", "Turing");
    let ada_user = backend.user_id_of(ProfileKind::Student, ada_id);
    let deck = backend.storage.with(|t| {
        let deck = t.add_deck(&ada_user, "Numbers");
        for n in 1..=20 {
            t.add_card(&deck, &n.to_string(), "");
        }
        deck
    });
    let app = test_app!(backend);
    let in_order: Vec<String> = (1..=20).map(|n| n.to_string()).collect();
    let fronts = |body: &serde_json::Value| -> Vec<String> {
        body["data"]["cards"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["front_content"].as_str().unwrap().to_string())
            .collect()
    };

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/flashdecks/{deck}/learn"))
        .cookie(access_cookie(&ada))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(fronts(&body), in_order);
    assert_eq!(body["data"]["is_owner"], true);
    assert_eq!(body["data"]["shuffled"], false);

    // 他人的卡组可以学习，但不是所有者
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/flashdecks/{deck}/learn?shuffle=true"))
        .cookie(access_cookie(&alan))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["is_owner"], false);
    assert_eq!(body["data"]["shuffled"], true);
    let mut shuffled = fronts(&body);
    shuffled.sort_by_key(|f| f.parse::<u32>().unwrap());
    assert_eq!(shuffled, in_order);
}
