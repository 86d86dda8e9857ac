// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Purchase record backing the paywall.

use serde::{Deserialize, Serialize};

/// Product id for the one-time unlock.
pub const UNLOCK_PRODUCT_ID: &str = "unlock_activity_jar";

/// An unlock of the paid product for one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Purchase {
    /// Owner (auth subject)
    pub user_id: String,
    /// Always `UNLOCK_PRODUCT_ID` today
    pub product_id: String,
    /// When the purchase was recorded (RFC3339)
    pub recorded_at: String,
}
