// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Activity Jar: one thing to do with your kid, right now.
//!
//! This crate provides the backend API: a curated activity catalog with
//! filtering and random picks, AI-generated activities behind a paywall,
//! and a persisted favorites list.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use dashmap::DashMap;
use services::{
    ActivityCatalog, EntitlementGate, FavoritesStore, GenerationClient, KeyValueStore,
    RecentTitles,
};
use tokio::sync::Mutex;

/// Favorites store over whichever storage backend was configured.
pub type SharedFavorites = Mutex<FavoritesStore<Box<dyn KeyValueStore>>>;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    /// Read-only after startup
    pub catalog: ActivityCatalog,
    pub generator: GenerationClient,
    pub favorites: SharedFavorites,
    pub entitlements: Box<dyn EntitlementGate>,
    /// Recently generated titles per user, newest first
    pub recent_titles: DashMap<String, RecentTitles>,
}

impl AppState {
    pub fn new(
        config: Config,
        catalog: ActivityCatalog,
        generator: GenerationClient,
        favorites_storage: Box<dyn KeyValueStore>,
        entitlements: Box<dyn EntitlementGate>,
    ) -> Self {
        Self {
            config,
            catalog,
            generator,
            favorites: Mutex::new(FavoritesStore::load(favorites_storage)),
            entitlements,
            recent_titles: DashMap::new(),
        }
    }
}
