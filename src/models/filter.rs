// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Filter constraints and the activity predicate.

use super::activity::{Activity, AgeGroup, Duration, Location, Materials};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Four independent optional constraints. `None` means no constraint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct FilterSpec {
    pub age_group: Option<AgeGroup>,
    pub location: Option<Location>,
    pub duration: Option<Duration>,
    pub materials: Option<Materials>,
}

impl FilterSpec {
    /// Whether `activity` satisfies every constraint that is set.
    pub fn matches(&self, activity: &Activity) -> bool {
        matches(activity, self)
    }

    /// Number of constraints that are set.
    pub fn active_count(&self) -> usize {
        [
            self.age_group.is_some(),
            self.location.is_some(),
            self.duration.is_some(),
            self.materials.is_some(),
        ]
        .into_iter()
        .filter(|set| *set)
        .count()
    }
}

/// Filter predicate.
///
/// Scalar fields must be equal; set-valued fields must contain the value.
pub fn matches(activity: &Activity, spec: &FilterSpec) -> bool {
    if let Some(age) = spec.age_group {
        if !activity.age_groups.contains(&age) {
            return false;
        }
    }
    if let Some(location) = spec.location {
        if !activity.locations.contains(&location) {
            return false;
        }
    }
    if let Some(duration) = spec.duration {
        if activity.duration != duration {
            return false;
        }
    }
    if let Some(materials) = spec.materials {
        if activity.materials != materials {
            return false;
        }
    }
    true
}

/// A filter value outside its closed set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid value for filter '{field}': {value}")]
pub struct InvalidFilter {
    pub field: &'static str,
    pub value: String,
}

/// Filters as they arrive in a JSON request body, before validation.
///
/// Fields are raw JSON so that a wrong type is reported as an invalid
/// filter rather than a body deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFilters {
    #[serde(default)]
    pub age_group: Option<Value>,
    #[serde(default)]
    pub location: Option<Value>,
    #[serde(default)]
    pub duration: Option<Value>,
    #[serde(default)]
    pub materials: Option<Value>,
}

impl RawFilters {
    /// Read filters from any JSON value. Anything other than an object
    /// means no filters.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Object(map) => Self {
                age_group: map.get("ageGroup").cloned(),
                location: map.get("location").cloned(),
                duration: map.get("duration").cloned(),
                materials: map.get("materials").cloned(),
            },
            _ => Self::default(),
        }
    }

    /// Object form as sent in a request body. Unset fields are omitted.
    pub fn to_json(&self) -> Value {
        let mut map = serde_json::Map::new();
        for (key, value) in [
            ("ageGroup", &self.age_group),
            ("location", &self.location),
            ("duration", &self.duration),
            ("materials", &self.materials),
        ] {
            if let Some(value) = value {
                map.insert(key.to_string(), value.clone());
            }
        }
        Value::Object(map)
    }

    pub fn validate(&self) -> Result<FilterSpec, InvalidFilter> {
        Ok(FilterSpec {
            age_group: parse_json_field("ageGroup", self.age_group.as_ref())?,
            location: parse_json_field("location", self.location.as_ref())?,
            duration: parse_json_field("duration", self.duration.as_ref())?,
            materials: parse_json_field("materials", self.materials.as_ref())?,
        })
    }
}

impl From<FilterSpec> for RawFilters {
    fn from(spec: FilterSpec) -> Self {
        let to_value = |s: Option<&'static str>| s.map(|s| Value::String(s.to_string()));
        Self {
            age_group: to_value(spec.age_group.as_ref().map(AgeGroup::as_str)),
            location: to_value(spec.location.as_ref().map(Location::as_str)),
            duration: to_value(spec.duration.as_ref().map(Duration::as_str)),
            materials: to_value(spec.materials.as_ref().map(Materials::as_str)),
        }
    }
}

/// Filters taken from a query string (`?ageGroup=5-7&location=kitchen`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterQuery {
    pub age_group: Option<String>,
    pub location: Option<String>,
    pub duration: Option<String>,
    pub materials: Option<String>,
}

impl FilterQuery {
    /// Empty parameters (`?location=`) count as unset.
    pub fn validate(&self) -> Result<FilterSpec, InvalidFilter> {
        Ok(FilterSpec {
            age_group: parse_str_field("ageGroup", self.age_group.as_deref())?,
            location: parse_str_field("location", self.location.as_deref())?,
            duration: parse_str_field("duration", self.duration.as_deref())?,
            materials: parse_str_field("materials", self.materials.as_deref())?,
        })
    }
}

fn parse_json_field<T: FromStr>(
    field: &'static str,
    value: Option<&Value>,
) -> Result<Option<T>, InvalidFilter> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => s.parse().map(Some).map_err(|_| InvalidFilter {
            field,
            value: s.clone(),
        }),
        Some(other) => Err(InvalidFilter {
            field,
            value: other.to_string(),
        }),
    }
}

fn parse_str_field<T: FromStr>(
    field: &'static str,
    value: Option<&str>,
) -> Result<Option<T>, InvalidFilter> {
    match value {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(|_| InvalidFilter {
            field,
            value: s.to_string(),
        }),
    }
}
