// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod catalog;
pub mod entitlements;
pub mod favorites;
pub mod generation;
pub mod selector;

pub use catalog::{ActivityCatalog, CatalogError};
pub use entitlements::{EntitlementGate, OpenAccess, PurchaseLedger};
pub use favorites::{FavoritesStore, FileStore, KeyValueStore, MemoryStore, StorageError};
pub use generation::{GenerationClient, GenerationError, GenerationRequest, RecentTitles};
pub use selector::{filter_activities, select_random};
