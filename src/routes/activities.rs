// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Catalog routes: listing, lookup and random picks.

use crate::error::{AppError, Result};
use crate::models::{Activity, FilterQuery, FilterSpec};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Upper bound on ids accepted in `exclude`.
const MAX_EXCLUDE_IDS: usize = 100;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/activities", get(list_activities))
        .route("/api/activities/random", get(random_activity))
        .route("/api/activities/{id}", get(get_activity))
}

fn parse_filters(query: &FilterQuery) -> Result<FilterSpec> {
    query
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))
}

// ─── Listing ─────────────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ActivitiesResponse {
    pub activities: Vec<Activity>,
    pub total: usize,
}

/// List catalog activities matching the filters, in catalog order.
async fn list_activities(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FilterQuery>,
) -> Result<Json<ActivitiesResponse>> {
    let spec = parse_filters(&query)?;
    let activities: Vec<Activity> = state.catalog.filter(&spec).into_iter().cloned().collect();

    tracing::debug!(
        filters = spec.active_count(),
        total = activities.len(),
        "Listing activities"
    );

    Ok(Json(ActivitiesResponse {
        total: activities.len(),
        activities,
    }))
}

/// Get a single catalog activity.
async fn get_activity(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Activity>> {
    state
        .catalog
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Activity {} not found", id)))
}

// ─── Random pick ─────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RandomQuery {
    #[serde(flatten)]
    filters: FilterQuery,
    /// Comma-separated ids to skip (e.g. recently shown)
    exclude: Option<String>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RandomActivityResponse {
    /// `null` when nothing matches; not an error
    pub activity: Option<Activity>,
}

/// Pick a random catalog activity matching the filters.
async fn random_activity(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RandomQuery>,
) -> Result<Json<RandomActivityResponse>> {
    let spec = parse_filters(&query.filters)?;

    let exclude: Vec<&str> = query
        .exclude
        .as_deref()
        .unwrap_or("")
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .collect();
    if exclude.len() > MAX_EXCLUDE_IDS {
        return Err(AppError::BadRequest(format!(
            "At most {} ids may be excluded",
            MAX_EXCLUDE_IDS
        )));
    }

    let activity = state
        .catalog
        .random(&spec, &exclude, &mut rand::thread_rng())
        .cloned();

    tracing::debug!(
        filters = spec.active_count(),
        excluded = exclude.len(),
        found = activity.is_some(),
        "Random activity"
    );

    Ok(Json(RandomActivityResponse { activity }))
}
