// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Paywall gate for AI generation.

use crate::models::purchase::{Purchase, UNLOCK_PRODUCT_ID};
use crate::time_utils::format_utc_rfc3339;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

/// Decides whether a user may use gated features.
pub trait EntitlementGate: Send + Sync {
    fn has_access(&self, user_id: &str) -> bool;
}

/// Gate used when the paywall is disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct OpenAccess;

impl EntitlementGate for OpenAccess {
    fn has_access(&self, _user_id: &str) -> bool {
        true
    }
}

/// In-memory set of unlocked users, keyed by user id.
///
/// Checkout and payment verification live outside this service. The ledger
/// is seeded at startup from configured users and only answers "has this
/// user unlocked".
#[derive(Debug, Default)]
pub struct PurchaseLedger {
    purchases: DashMap<String, Purchase>,
}

impl PurchaseLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ledger with the given users already unlocked.
    pub fn with_unlocked_users<I, S>(users: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let ledger = Self::new();
        for user in users {
            ledger.record_purchase(user);
        }
        ledger
    }

    /// Record an unlock. Returns `false` if the user already had one.
    pub fn record_purchase(&self, user_id: impl Into<String>) -> bool {
        let user_id = user_id.into();
        match self.purchases.entry(user_id.clone()) {
            Entry::Occupied(_) => {
                tracing::info!(user_id = %user_id, "Purchase already exists for user");
                false
            }
            Entry::Vacant(slot) => {
                slot.insert(Purchase {
                    user_id: user_id.clone(),
                    product_id: UNLOCK_PRODUCT_ID.to_string(),
                    recorded_at: format_utc_rfc3339(chrono::Utc::now()),
                });
                tracing::info!(user_id = %user_id, "Purchase recorded for user");
                true
            }
        }
    }
}

impl EntitlementGate for PurchaseLedger {
    fn has_access(&self, user_id: &str) -> bool {
        self.purchases.contains_key(user_id)
    }
}
