// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for authenticated users.

use crate::middleware::auth::AuthUser;
use crate::AppState;
use axum::{extract::State, routing::get, Extension, Json, Router};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// API routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/me", get(get_me))
}

/// Current user response.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserResponse {
    pub user_id: String,
    /// Whether the user may generate activities
    pub has_purchased: bool,
    pub recent_titles: Vec<String>,
}

/// Get the current user's unlock status.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Json<UserResponse> {
    let has_purchased = state.entitlements.has_access(&user.user_id);
    let recent_titles = state
        .recent_titles
        .get(&user.user_id)
        .map(|history| history.to_vec())
        .unwrap_or_default();

    Json(UserResponse {
        user_id: user.user_id,
        has_purchased,
        recent_titles,
    })
}
