// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Activity model shared by the catalog, generator and favorites.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Age bracket an activity is suitable for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum AgeGroup {
    #[serde(rename = "2-4")]
    Ages2To4,
    #[serde(rename = "5-7")]
    Ages5To7,
    #[serde(rename = "8-10")]
    Ages8To10,
    #[serde(rename = "11-13")]
    Ages11To13,
}

impl AgeGroup {
    pub const ALL: [AgeGroup; 4] = [
        AgeGroup::Ages2To4,
        AgeGroup::Ages5To7,
        AgeGroup::Ages8To10,
        AgeGroup::Ages11To13,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgeGroup::Ages2To4 => "2-4",
            AgeGroup::Ages5To7 => "5-7",
            AgeGroup::Ages8To10 => "8-10",
            AgeGroup::Ages11To13 => "11-13",
        }
    }
}

/// Where the activity happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum Location {
    Indoor,
    Outdoor,
    Kitchen,
    Travel,
}

impl Location {
    pub const ALL: [Location; 4] = [
        Location::Indoor,
        Location::Outdoor,
        Location::Kitchen,
        Location::Travel,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Location::Indoor => "indoor",
            Location::Outdoor => "outdoor",
            Location::Kitchen => "kitchen",
            Location::Travel => "travel",
        }
    }
}

/// How long the activity takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum Duration {
    #[serde(rename = "5min")]
    FiveMinutes,
    #[serde(rename = "15min")]
    FifteenMinutes,
    #[serde(rename = "30min")]
    ThirtyMinutes,
}

impl Duration {
    pub const ALL: [Duration; 3] = [
        Duration::FiveMinutes,
        Duration::FifteenMinutes,
        Duration::ThirtyMinutes,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Duration::FiveMinutes => "5min",
            Duration::FifteenMinutes => "15min",
            Duration::ThirtyMinutes => "30min",
        }
    }
}

/// What supplies the activity needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum Materials {
    None,
    Household,
    Craft,
}

impl Materials {
    pub const ALL: [Materials; 3] = [Materials::None, Materials::Household, Materials::Craft];

    pub fn as_str(&self) -> &'static str {
        match self {
            Materials::None => "none",
            Materials::Household => "household",
            Materials::Craft => "craft",
        }
    }

    /// Human-readable phrase used in generation prompts.
    pub fn describe(&self) -> &'static str {
        match self {
            Materials::None => "no supplies needed",
            Materials::Household => "common household items",
            Materials::Craft => "craft supplies",
        }
    }
}

/// Value outside an enum's closed set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} value: {value:?}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl FromStr for AgeGroup {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_variant("ageGroup", s, &Self::ALL, Self::as_str)
    }
}

impl FromStr for Location {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_variant("location", s, &Self::ALL, Self::as_str)
    }
}

impl FromStr for Duration {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_variant("duration", s, &Self::ALL, Self::as_str)
    }
}

impl FromStr for Materials {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_variant("materials", s, &Self::ALL, Self::as_str)
    }
}

fn parse_variant<T: Copy>(
    kind: &'static str,
    s: &str,
    all: &[T],
    as_str: fn(&T) -> &'static str,
) -> Result<T, UnknownVariant> {
    all.iter()
        .copied()
        .find(|v| as_str(v) == s)
        .ok_or_else(|| UnknownVariant {
            kind,
            value: s.to_string(),
        })
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Materials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single suggested activity, either curated or generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Activity {
    /// Catalog ids are small integers; generated ids start with `ai-`
    pub id: String,
    /// Short display title
    pub title: String,
    /// One or two sentences
    pub description: String,
    /// Never empty
    pub age_groups: Vec<AgeGroup>,
    /// Never empty
    pub locations: Vec<Location>,
    pub duration: Duration,
    pub materials: Materials,
    /// Single display glyph
    pub emoji: String,
}

impl Activity {
    /// Check the invariants serde cannot express.
    pub fn validate(&self) -> Result<(), ActivityError> {
        if self.id.trim().is_empty() {
            return Err(ActivityError::EmptyField("id"));
        }
        if self.title.trim().is_empty() {
            return Err(ActivityError::EmptyField("title"));
        }
        if self.age_groups.is_empty() {
            return Err(ActivityError::EmptyField("ageGroups"));
        }
        if self.locations.is_empty() {
            return Err(ActivityError::EmptyField("locations"));
        }
        Ok(())
    }

    /// Whether this activity came from the generator rather than the catalog.
    pub fn is_generated(&self) -> bool {
        self.id.starts_with(GENERATED_ID_PREFIX)
    }
}

/// Prefix that keeps generated ids out of the catalog's id space.
pub const GENERATED_ID_PREFIX: &str = "ai-";

/// Activity invariant violations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActivityError {
    #[error("Activity field must not be empty: {0}")]
    EmptyField(&'static str),
}
