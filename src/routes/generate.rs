// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! AI generation route (signed-in, unlocked users).

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::Activity;
use crate::services::GenerationRequest;
use crate::AppState;
use axum::{extract::State, routing::post, Extension, Json, Router};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/generate-activity", post(generate_activity))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct GenerateResponse {
    pub activity: Activity,
}

/// Generate a new activity for the filters in the body.
///
/// When the body carries no recent titles (missing, empty or not an array),
/// the user's server-side history is used instead.
async fn generate_activity(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(mut request): Json<GenerationRequest>,
) -> Result<Json<GenerateResponse>> {
    if !request.has_recent_activities() {
        if let Some(history) = state.recent_titles.get(&user.user_id) {
            request.set_recent_titles(history.to_vec());
        }
    }

    tracing::info!(user_id = %user.user_id, "Generating activity");
    let activity = state.generator.generate(&request).await?;

    state
        .recent_titles
        .entry(user.user_id.clone())
        .or_default()
        .push(activity.title.clone());

    Ok(Json(GenerateResponse { activity }))
}
