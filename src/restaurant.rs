// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! The restaurant record and its write payload.
//!
//! The primary store owns [`Restaurant`] values and assigns their `id`.
//! Callers only ever hand in [`RestaurantFields`], which is validated before
//! any store call is made.

use serde::{Deserialize, Serialize};

/// A restaurant as persisted by the primary store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restaurant {
    /// Store-assigned identity, never changes
    pub id: i64,
    pub name: String,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Restaurant {
    /// Build a record from an id and a field set.
    pub fn from_fields(id: i64, fields: RestaurantFields) -> Self {
        Self {
            id,
            name: fields.name,
            location: fields.location,
            description: fields.description,
        }
    }
}

/// Mutable fields of a restaurant, used for both create and update.
///
/// Updates always carry the full field set: there is no partial update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestaurantFields {
    pub name: String,
    pub location: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl RestaurantFields {
    pub fn new(name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
            description: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Check the field set before it reaches the store.
    ///
    /// Returns a human-readable reason on failure.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name should not be empty".to_string());
        }
        if self.location.trim().is_empty() {
            return Err("location should not be empty".to_string());
        }
        Ok(())
    }
}
