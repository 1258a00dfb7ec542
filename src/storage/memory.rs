// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use crate::restaurant::{Restaurant, RestaurantFields};
use super::traits::{RestaurantStore, StoreError};

pub struct InMemoryRestaurantStore {
    data: DashMap<i64, Restaurant>,
    next_id: AtomicI64,
}

impl InMemoryRestaurantStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            data: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }

    /// Get current record count
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl Default for InMemoryRestaurantStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RestaurantStore for InMemoryRestaurantStore {
    async fn find_all(&self) -> Result<Vec<Restaurant>, StoreError> {
        let mut all: Vec<Restaurant> = self.data.iter().map(|r| r.value().clone()).collect();
        all.sort_by_key(|r| r.id);
        Ok(all)
    }

    async fn create(&self, fields: &RestaurantFields) -> Result<Restaurant, StoreError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let record = Restaurant::from_fields(id, fields.clone());
        self.data.insert(id, record.clone());
        Ok(record)
    }

    async fn update(&self, id: i64, fields: &RestaurantFields) -> Result<Restaurant, StoreError> {
        match self.data.get_mut(&id) {
            Some(mut entry) => {
                let record = Restaurant::from_fields(id, fields.clone());
                *entry.value_mut() = record.clone();
                Ok(record)
            }
            None => Err(StoreError::NotFound),
        }
    }
}
