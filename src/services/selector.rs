// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Filtering and random selection over a slice of activities.

use crate::models::{matches, Activity, FilterSpec};
use rand::Rng;

/// Activities matching `spec`, preserving input order.
pub fn filter_activities<'a>(activities: &'a [Activity], spec: &FilterSpec) -> Vec<&'a Activity> {
    activities.iter().filter(|a| matches(a, spec)).collect()
}

/// Pick one matching activity uniformly at random, skipping `exclude_ids`.
///
/// Returns `None` when nothing is left after filtering and exclusion.
pub fn select_random<'a, S, R>(
    activities: &'a [Activity],
    spec: &FilterSpec,
    exclude_ids: &[S],
    rng: &mut R,
) -> Option<&'a Activity>
where
    S: AsRef<str>,
    R: Rng + ?Sized,
{
    let candidates: Vec<&Activity> = filter_activities(activities, spec)
        .into_iter()
        .filter(|a| !exclude_ids.iter().any(|id| id.as_ref() == a.id))
        .collect();

    if candidates.is_empty() {
        tracing::debug!(filters = spec.active_count(), "No activity matches filters");
        return None;
    }

    let idx = rng.gen_range(0..candidates.len());
    Some(candidates[idx])
}
