// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use activity_jar::config::Config;
use activity_jar::middleware::auth::create_jwt;
use activity_jar::routes::create_router;
use activity_jar::services::{ActivityCatalog, GenerationClient, MemoryStore, PurchaseLedger};
use activity_jar::AppState;
use axum::body::Bytes;
use axum::response::IntoResponse;
use axum::{routing::post, Router};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// User seeded as having bought the unlock.
#[allow(dead_code)]
pub const PAID_USER: &str = "paid-user";
/// User without a purchase.
#[allow(dead_code)]
pub const FREE_USER: &str = "free-user";

/// Chat-completions body whose reply text is `content`.
#[allow(dead_code)]
pub fn chat_reply(content: &str) -> serde_json::Value {
    serde_json::json!({
        "choices": [{ "message": { "role": "assistant", "content": content } }]
    })
}

/// Local chat-completions gateway with a record of what it received.
#[allow(dead_code)]
pub struct MockGateway {
    pub url: String,
    pub hits: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<serde_json::Value>>>,
}

#[allow(dead_code)]
impl MockGateway {
    /// Request bodies in arrival order.
    pub fn requests(&self) -> Vec<serde_json::Value> {
        self.requests.lock().unwrap().clone()
    }

    /// The user message of the `n`th request.
    pub fn user_prompt(&self, n: usize) -> String {
        self.requests()[n]["messages"][1]["content"]
            .as_str()
            .expect("user message content")
            .to_string()
    }
}

/// Start a local gateway that answers every POST with `response` after
/// `delay`, recording each request body.
#[allow(dead_code)]
pub async fn spawn_gateway<R>(response: R, delay: Duration) -> MockGateway
where
    R: IntoResponse + Clone + Send + Sync + 'static,
{
    let hits = Arc::new(AtomicUsize::new(0));
    let requests = Arc::new(Mutex::new(Vec::new()));
    let (counter, recorded) = (hits.clone(), requests.clone());

    let app = Router::new().route(
        "/v1/chat/completions",
        post(move |body: Bytes| {
            let counter = counter.clone();
            let recorded = recorded.clone();
            let response = response.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
                recorded.lock().unwrap().push(json);
                tokio::time::sleep(delay).await;
                response
            }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock gateway");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockGateway {
        url: format!("http://{}/v1/chat/completions", addr),
        hits,
        requests,
    }
}

/// Start a gateway that answers immediately.
/// Returns the endpoint URL and a hit counter.
#[allow(dead_code)]
pub async fn spawn_mock_gateway<R>(response: R) -> (String, Arc<AtomicUsize>)
where
    R: IntoResponse + Clone + Send + Sync + 'static,
{
    let gateway = spawn_gateway(response, Duration::ZERO).await;
    (gateway.url, gateway.hits)
}

/// Generation client pointed at `endpoint`.
#[allow(dead_code)]
pub fn test_client(endpoint: &str) -> GenerationClient {
    GenerationClient::new(
        endpoint.to_string(),
        "test_gateway_key".to_string(),
        "test-model".to_string(),
        Duration::from_secs(5),
    )
    .expect("Failed to build generation client")
}

/// Create a test app with in-memory dependencies.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app(gateway_url: &str) -> (axum::Router, Arc<AppState>) {
    let config = Config {
        ai_gateway_url: gateway_url.to_string(),
        ..Config::default()
    };

    let state = Arc::new(AppState::new(
        config,
        ActivityCatalog::builtin().expect("built-in catalog"),
        test_client(gateway_url),
        Box::new(MemoryStore::new()),
        Box::new(PurchaseLedger::with_unlocked_users([PAID_USER])),
    ));

    (create_router(state.clone()), state)
}

/// Session token for `user_id` signed with the test key.
#[allow(dead_code)]
pub fn create_test_jwt(user_id: &str, signing_key: &[u8]) -> String {
    create_jwt(user_id, signing_key).expect("Failed to create JWT")
}

/// Read a JSON response body.
#[allow(dead_code)]
pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}
