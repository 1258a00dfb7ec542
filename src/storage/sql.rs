// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! SQL primary store for restaurants.
//!
//! ```sql
//! CREATE TABLE restaurants (
//!   id BIGINT AUTO_INCREMENT PRIMARY KEY,
//!   name VARCHAR(255) NOT NULL,
//!   location VARCHAR(255) NOT NULL,
//!   description TEXT
//! )
//! ```
//!
//! ## sqlx Any Driver Quirks
//!
//! The `Any` driver hands MySQL TEXT columns back as BLOB, so text columns
//! are read as `String` first and as UTF-8 bytes second.

use async_trait::async_trait;
use sqlx::any::{AnyPoolOptions, AnyRow};
use sqlx::{AnyPool, Row};
use crate::restaurant::{Restaurant, RestaurantFields};
use super::traits::{RestaurantStore, StoreError};
use crate::resilience::retry::{retry, RetryConfig};
use std::sync::Once;
use std::time::Duration;
use tracing::debug;

// SQLx `Any` driver requires runtime installation
static INSTALL_DRIVERS: Once = Once::new();

fn install_drivers() {
    INSTALL_DRIVERS.call_once(|| {
        sqlx::any::install_default_drivers();
    });
}

pub struct SqlRestaurantStore {
    pool: AnyPool,
    is_sqlite: bool,
}

impl SqlRestaurantStore {
    /// Create a new SQL store with startup-mode retry (fails fast if config is wrong).
    pub async fn new(connection_string: &str) -> Result<Self, StoreError> {
        install_drivers();

        let is_sqlite = connection_string.starts_with("sqlite:");
        // Every connection to an in-memory SQLite database sees its own database,
        // so the pool must hold exactly one connection for its whole life.
        let in_memory = is_sqlite && connection_string.contains(":memory:");

        let pool = retry("sql_connect", &RetryConfig::startup(), || async {
            let options = if in_memory {
                AnyPoolOptions::new()
                    .max_connections(1)
                    .idle_timeout(None)
                    .max_lifetime(None)
            } else {
                AnyPoolOptions::new()
                    .max_connections(20)
                    .acquire_timeout(Duration::from_secs(10))
                    .idle_timeout(Duration::from_secs(300))
            };
            options
                .connect(connection_string)
                .await
                .map_err(|e| StoreError::Backend(e.to_string()))
        })
        .await?;

        let store = Self { pool, is_sqlite };
        store.init_schema().await?;
        Ok(store)
    }

    /// Get a clone of the connection pool.
    pub fn pool(&self) -> AnyPool {
        self.pool.clone()
    }

    async fn init_schema(&self) -> Result<(), StoreError> {
        let sql = if self.is_sqlite {
            r#"
            CREATE TABLE IF NOT EXISTS restaurants (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                location TEXT NOT NULL,
                description TEXT
            )
            "#
        } else {
            r#"
            CREATE TABLE IF NOT EXISTS restaurants (
                id BIGINT AUTO_INCREMENT PRIMARY KEY,
                name VARCHAR(255) NOT NULL,
                location VARCHAR(255) NOT NULL,
                description TEXT
            )
            "#
        };

        retry("sql_init_schema", &RetryConfig::startup(), || async {
            sqlx::query(sql)
                .execute(&self.pool)
                .await
                .map_err(|e| StoreError::Backend(e.to_string()))
        })
        .await?;

        Ok(())
    }

    /// Read a text column as String (SQLite) or UTF-8 bytes (MySQL).
    fn text_column(row: &AnyRow, column: &str) -> Option<String> {
        row.try_get::<String, _>(column).ok().or_else(|| {
            row.try_get::<Vec<u8>, _>(column)
                .ok()
                .and_then(|bytes| String::from_utf8(bytes).ok())
        })
    }

    fn row_to_restaurant(row: &AnyRow) -> Result<Restaurant, StoreError> {
        let id: i64 = row
            .try_get("id")
            .map_err(|e| StoreError::Backend(format!("Invalid id column: {}", e)))?;
        let name = Self::text_column(row, "name")
            .ok_or_else(|| StoreError::Backend(format!("Restaurant {} has no name", id)))?;
        let location = Self::text_column(row, "location")
            .ok_or_else(|| StoreError::Backend(format!("Restaurant {} has no location", id)))?;
        let description = Self::text_column(row, "description");

        Ok(Restaurant { id, name, location, description })
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Restaurant>, StoreError> {
        let row = sqlx::query("SELECT id, name, location, description FROM restaurants WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        row.as_ref().map(Self::row_to_restaurant).transpose()
    }
}

#[async_trait]
impl RestaurantStore for SqlRestaurantStore {
    async fn find_all(&self) -> Result<Vec<Restaurant>, StoreError> {
        retry("sql_find_all", &RetryConfig::query(), || async {
            let rows = sqlx::query("SELECT id, name, location, description FROM restaurants ORDER BY id")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| StoreError::Backend(e.to_string()))?;

            rows.iter().map(Self::row_to_restaurant).collect()
        })
        .await
    }

    // Inserts are not retried: a retry after a lost reply would insert twice.
    async fn create(&self, fields: &RestaurantFields) -> Result<Restaurant, StoreError> {
        let result = sqlx::query("INSERT INTO restaurants (name, location, description) VALUES (?, ?, ?)")
            .bind(fields.name.clone())
            .bind(fields.location.clone())
            .bind(fields.description.clone())
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        let id = result
            .last_insert_id()
            .ok_or_else(|| StoreError::Backend("Insert did not report a generated id".to_string()))?;

        debug!(id, "Restaurant inserted");
        Ok(Restaurant::from_fields(id, fields.clone()))
    }

    async fn update(&self, id: i64, fields: &RestaurantFields) -> Result<Restaurant, StoreError> {
        sqlx::query("UPDATE restaurants SET name = ?, location = ?, description = ? WHERE id = ?")
            .bind(fields.name.clone())
            .bind(fields.location.clone())
            .bind(fields.description.clone())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        // MySQL reports zero affected rows for a no-op update, so existence
        // is decided by reading the row back.
        self.find_by_id(id).await?.ok_or(StoreError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_store() -> SqlRestaurantStore {
        SqlRestaurantStore::new("sqlite::memory:").await.unwrap()
    }

    #[tokio::test]
    async fn test_create_and_find_all() {
        let store = memory_store().await;

        let created = store
            .create(&RestaurantFields::new("Pizza Place", "Downtown"))
            .await
            .unwrap();
        assert_eq!(created.id, 1);

        let all = store.find_all().await.unwrap();
        assert_eq!(all, vec![created]);
    }

    #[tokio::test]
    async fn test_description_round_trips_as_optional() {
        let store = memory_store().await;

        store
            .create(&RestaurantFields::new("A", "B").with_description("Cozy"))
            .await
            .unwrap();
        store.create(&RestaurantFields::new("C", "D")).await.unwrap();

        let all = store.find_all().await.unwrap();
        assert_eq!(all[0].description.as_deref(), Some("Cozy"));
        assert_eq!(all[1].description, None);
    }

    #[tokio::test]
    async fn test_update_existing() {
        let store = memory_store().await;
        let created = store
            .create(&RestaurantFields::new("Pizza Place", "Downtown"))
            .await
            .unwrap();

        let updated = store
            .update(created.id, &RestaurantFields::new("Pizza Palace", "Downtown"))
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "Pizza Palace");
        assert_eq!(store.find_all().await.unwrap(), vec![updated]);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let store = memory_store().await;
        let result = store.update(99, &RestaurantFields::new("X", "Y")).await;
        assert!(matches!(result, Err(StoreError::NotFound)));
    }
}
