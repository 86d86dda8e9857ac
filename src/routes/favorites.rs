// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Favorites routes for the device profile.

use crate::error::{AppError, Result};
use crate::models::Activity;
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::{delete, get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/favorites", get(list_favorites))
        .route("/api/favorites/toggle", post(toggle_favorite))
        .route("/api/favorites/{id}", delete(remove_favorite))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct FavoritesResponse {
    pub favorites: Vec<Activity>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ToggleResponse {
    /// Whether the activity is a favorite after the toggle
    pub favorite: bool,
    pub favorites: Vec<Activity>,
}

/// Current favorites in the order they were added.
async fn list_favorites(State(state): State<Arc<AppState>>) -> Json<FavoritesResponse> {
    let favorites = state.favorites.lock().await;
    Json(FavoritesResponse {
        favorites: favorites.favorites().to_vec(),
    })
}

/// Add the activity, or remove it if it is already a favorite.
async fn toggle_favorite(
    State(state): State<Arc<AppState>>,
    Json(activity): Json<Activity>,
) -> Result<Json<ToggleResponse>> {
    activity
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let id = activity.id.clone();
    let mut favorites = state.favorites.lock().await;
    let favorite = favorites.toggle(activity)?;
    tracing::info!(id = %id, favorite, "Toggled favorite");

    Ok(Json(ToggleResponse {
        favorite,
        favorites: favorites.favorites().to_vec(),
    }))
}

/// Remove a favorite by id. Unknown ids are not an error.
async fn remove_favorite(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<FavoritesResponse>> {
    let mut favorites = state.favorites.lock().await;
    favorites.remove(&id)?;
    tracing::info!(id = %id, "Removed favorite");

    Ok(Json(FavoritesResponse {
        favorites: favorites.favorites().to_vec(),
    }))
}
