// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

use async_trait::async_trait;
use crate::restaurant::{Restaurant, RestaurantFields};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Record not found")]
    NotFound,
    #[error("Store backend error: {0}")]
    Backend(String),
}

/// Contract of the primary (authoritative) restaurant store.
///
/// Field sets are validated by the caller; adapters only persist.
#[async_trait]
pub trait RestaurantStore: Send + Sync {
    /// Every stored restaurant, ordered by id.
    async fn find_all(&self) -> Result<Vec<Restaurant>, StoreError>;

    /// Insert a new restaurant. The store assigns the id.
    async fn create(&self, fields: &RestaurantFields) -> Result<Restaurant, StoreError>;

    /// Replace all fields of an existing restaurant.
    ///
    /// Returns [`StoreError::NotFound`] when no record has this id.
    async fn update(&self, id: i64, fields: &RestaurantFields) -> Result<Restaurant, StoreError>;
}
