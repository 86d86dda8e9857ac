// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Curated activity catalog.

use crate::models::{Activity, FilterSpec};
use crate::services::selector;
use rand::Rng;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Catalog compiled into the binary.
const BUILTIN_CATALOG: &str = include_str!("../../data/activities.json");

/// Immutable set of curated activities, loaded once at startup.
#[derive(Debug, Default, Clone)]
pub struct ActivityCatalog {
    activities: Vec<Activity>,
}

impl ActivityCatalog {
    /// Load the built-in catalog.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::load_from_json(BUILTIN_CATALOG)
    }

    /// Load a catalog from a JSON file (array of activities).
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let json_data =
            fs::read_to_string(path.as_ref()).map_err(|e| CatalogError::IoError(e.to_string()))?;
        Self::load_from_json(&json_data)
    }

    /// Load a catalog from a JSON string.
    pub fn load_from_json(json_data: &str) -> Result<Self, CatalogError> {
        let activities: Vec<Activity> = serde_json::from_str(json_data)
            .map_err(|e| CatalogError::ParseError(e.to_string()))?;
        Self::from_activities(activities)
    }

    /// Build a catalog, checking every activity and id uniqueness.
    pub fn from_activities(activities: Vec<Activity>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for activity in &activities {
            activity
                .validate()
                .map_err(|e| CatalogError::InvalidActivity {
                    id: activity.id.clone(),
                    reason: e.to_string(),
                })?;
            if !seen.insert(activity.id.as_str()) {
                return Err(CatalogError::DuplicateId(activity.id.clone()));
            }
        }

        tracing::info!(count = activities.len(), "Loaded activity catalog");
        Ok(Self { activities })
    }

    /// All activities in catalog order.
    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    /// Look up an activity by id.
    pub fn get(&self, id: &str) -> Option<&Activity> {
        self.activities.iter().find(|a| a.id == id)
    }

    /// Activities matching `spec`, in catalog order.
    pub fn filter(&self, spec: &FilterSpec) -> Vec<&Activity> {
        selector::filter_activities(&self.activities, spec)
    }

    /// Random matching activity that is not in `exclude_ids`.
    pub fn random<S: AsRef<str>, R: Rng + ?Sized>(
        &self,
        spec: &FilterSpec,
        exclude_ids: &[S],
        rng: &mut R,
    ) -> Option<&Activity> {
        selector::select_random(&self.activities, spec, exclude_ids, rng)
    }
}

/// Errors from catalog loading.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read file: {0}")]
    IoError(String),

    #[error("Failed to parse catalog: {0}")]
    ParseError(String),

    #[error("Invalid activity {id}: {reason}")]
    InvalidActivity { id: String, reason: String },

    #[error("Duplicate activity id: {0}")]
    DuplicateId(String),
}
