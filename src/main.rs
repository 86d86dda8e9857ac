// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity Jar API Server
//!
//! Serves curated and AI-generated activities for parents and kids.

use activity_jar::{
    config::Config,
    services::{
        ActivityCatalog, EntitlementGate, FileStore, GenerationClient, OpenAccess,
        PurchaseLedger,
    },
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Activity Jar API");

    // Load the activity catalog
    let catalog = match &config.catalog_path {
        Some(path) => {
            tracing::info!(path = %path.display(), "Loading activity catalog");
            ActivityCatalog::load_from_file(path).expect("Failed to load activity catalog")
        }
        None => ActivityCatalog::builtin().expect("Built-in activity catalog is invalid"),
    };

    // AI gateway client
    let generator = GenerationClient::new(
        config.ai_gateway_url.clone(),
        config.ai_gateway_api_key.clone(),
        config.ai_model.clone(),
        config.ai_request_timeout(),
    )
    .expect("Failed to initialize generation client");
    tracing::info!(model = %config.ai_model, "Generation client initialized");

    // Favorites slot
    let favorites_storage =
        FileStore::open(&config.favorites_dir).expect("Failed to open favorites directory");
    tracing::info!(dir = %config.favorites_dir.display(), "Favorites storage ready");

    // Paywall
    let entitlements: Box<dyn EntitlementGate> = if config.paywall_enabled {
        tracing::info!(
            unlocked = config.unlocked_users.len(),
            "Paywall enabled"
        );
        Box::new(PurchaseLedger::with_unlocked_users(
            config.unlocked_users.iter().cloned(),
        ))
    } else {
        tracing::warn!("Paywall disabled, all users may generate");
        Box::new(OpenAccess)
    };

    // Build shared state
    let state = Arc::new(AppState::new(
        config.clone(),
        catalog,
        generator,
        Box::new(favorites_storage),
        entitlements,
    ));

    // Build router
    let app = activity_jar::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("activity_jar=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
