// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Record operations: list, create, update.
//!
//! Every successful create/update is followed by exactly one index sync
//! before returning. The sync outcome never changes the result.

use tracing::{debug, info};

use crate::restaurant::{Restaurant, RestaurantFields};
use crate::storage::traits::StoreError;

use super::{RestaurantService, ServiceError};

impl RestaurantService {
    /// Every restaurant in the primary store, ordered by id.
    ///
    /// Reads the primary store directly; the index is not involved.
    pub async fn list(&self) -> Result<Vec<Restaurant>, ServiceError> {
        Ok(self.store.find_all().await?)
    }

    /// Validate and store a new restaurant, then index it.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// # use restaurant_index::{RestaurantService, RestaurantFields};
    /// # async fn example(service: &RestaurantService) {
    /// let fields = RestaurantFields::new("Pizza Place", "Downtown").with_description("Wood oven");
    /// let created = service.create(&fields).await.unwrap();
    /// assert_eq!(created.name, "Pizza Place");
    /// # }
    /// ```
    pub async fn create(&self, fields: &RestaurantFields) -> Result<Restaurant, ServiceError> {
        fields.validate().map_err(ServiceError::Validation)?;

        let record = self.store.create(fields).await?;
        info!(id = record.id, "Restaurant created");

        let outcome = self.synchronizer.on_record_written(&record).await;
        debug!(id = record.id, ?outcome, "Index sync after create");
        Ok(record)
    }

    /// Replace all fields of an existing restaurant, then re-index it.
    ///
    /// Returns [`ServiceError::RecordNotFound`] without touching the index
    /// when no restaurant has this id.
    pub async fn update(&self, id: i64, fields: &RestaurantFields) -> Result<Restaurant, ServiceError> {
        fields.validate().map_err(ServiceError::Validation)?;

        let record = self.store.update(id, fields).await.map_err(|e| match e {
            StoreError::NotFound => ServiceError::RecordNotFound(id),
            other => ServiceError::Store(other),
        })?;
        info!(id, "Restaurant updated");

        let outcome = self.synchronizer.on_record_written(&record).await;
        debug!(id, ?outcome, "Index sync after update");
        Ok(record)
    }
}
