// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Favorites route tests.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use tower::ServiceExt;

mod common;
use common::{body_json, create_test_app};

const UNUSED_GATEWAY: &str = "http://127.0.0.1:9/v1/chat/completions";

fn toggle(activity: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/favorites/toggle")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(activity.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_toggle_and_list() {
    let (app, state) = create_test_app(UNUSED_GATEWAY);
    let fort = serde_json::to_value(state.catalog.get("1").unwrap()).unwrap();

    let response = app.clone().oneshot(toggle(&fort)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["favorite"], true);
    assert_eq!(json["favorites"][0]["id"], "1");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/favorites")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(body_json(response).await["favorites"][0]["title"], "Blanket Fort Adventure");

    let response = app.oneshot(toggle(&fort)).await.unwrap();
    let json = body_json(response).await;
    assert_eq!(json["favorite"], false);
    assert_eq!(json["favorites"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_generated_activity_can_be_favorited() {
    let (app, state) = create_test_app(UNUSED_GATEWAY);
    let generated = serde_json::json!({
        "id": "ai-1700000000000-k3j9x0abc",
        "title": "Sock Basketball",
        "description": "Shoot socks into a basket.",
        "ageGroups": ["2-4", "5-7", "8-10", "11-13"],
        "locations": ["indoor"],
        "duration": "5min",
        "materials": "household",
        "emoji": "🧺"
    });

    let response = app.oneshot(toggle(&generated)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(state
        .favorites
        .lock()
        .await
        .is_favorite("ai-1700000000000-k3j9x0abc"));
}

#[tokio::test]
async fn test_toggle_rejects_invalid_activity() {
    let (app, _) = create_test_app(UNUSED_GATEWAY);
    let broken = serde_json::json!({
        "id": "x",
        "title": "Nowhere",
        "description": "",
        "ageGroups": ["2-4"],
        "locations": [],
        "duration": "5min",
        "materials": "none",
        "emoji": "?"
    });

    let response = app.oneshot(toggle(&broken)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_remove_unknown_id_is_noop() {
    let (app, _) = create_test_app(UNUSED_GATEWAY);

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/favorites/nonexistent-id")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["favorites"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_remove_existing() {
    let (app, state) = create_test_app(UNUSED_GATEWAY);
    {
        let mut favorites = state.favorites.lock().await;
        favorites.toggle(state.catalog.get("5").unwrap().clone()).unwrap();
        favorites.toggle(state.catalog.get("6").unwrap().clone()).unwrap();
    }

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/favorites/5")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let json = body_json(response).await;
    let ids: Vec<&str> = json["favorites"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["6"]);
}
