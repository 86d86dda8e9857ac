// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod activity;
pub mod filter;
pub mod purchase;

pub use activity::{Activity, AgeGroup, Duration, Location, Materials};
pub use filter::{matches, FilterQuery, FilterSpec, InvalidFilter, RawFilters};
pub use purchase::Purchase;
