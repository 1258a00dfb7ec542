// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Restaurant resource facade.
//!
//! The [`RestaurantService`] is the operation surface HTTP controllers call.
//! It ties together:
//! - the primary store (source of truth)
//! - the index synchronizer (schema, hydration, per-write upserts)
//! - the index client (search queries)
//!
//! # Lifecycle
//!
//! ```text
//! Created → EnsuringSchema → Hydrating → Ready → ShuttingDown
//!                  └─(schema failed)─→ SearchDisabled
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use restaurant_index::{IndexConfig, RestaurantService, RestaurantFields, ServiceState};
//! use restaurant_index::search::InMemoryIndexClient;
//! use restaurant_index::storage::memory::InMemoryRestaurantStore;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let service = RestaurantService::new(
//!     IndexConfig::default(),
//!     Arc::new(InMemoryRestaurantStore::new()),
//!     Arc::new(InMemoryIndexClient::new()),
//! );
//! assert_eq!(service.state(), ServiceState::Created);
//!
//! service.start().await.expect("start failed");
//! let created = service.create(&RestaurantFields::new("Pizza Place", "Downtown")).await.unwrap();
//! let found = service.search("name", "pizza").await.unwrap();
//! assert_eq!(found[0].id, created.id);
//! # }
//! ```

mod api;
mod lifecycle;
mod search_api;
mod types;

pub use types::{ServiceError, ServiceState};

use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::config::IndexConfig;
use crate::resilience::retry::RetryConfig;
use crate::search::{IndexClient, InMemoryIndexClient, RedisIndexClient};
use crate::storage::memory::InMemoryRestaurantStore;
use crate::storage::sql::SqlRestaurantStore;
use crate::storage::traits::RestaurantStore;
use crate::sync::{IndexSynchronizer, SyncStatsSnapshot};

/// Restaurant operations over a primary store with an advisory search index.
///
/// # Thread Safety
///
/// The service is `Send + Sync`; share it behind an `Arc` across request
/// handlers. All methods take `&self`.
pub struct RestaurantService {
    pub(super) config: IndexConfig,

    /// Primary store (source of truth)
    pub(super) store: Arc<dyn RestaurantStore>,

    /// Index connection, shared with the synchronizer
    pub(super) index: Arc<dyn IndexClient>,

    pub(super) synchronizer: IndexSynchronizer,

    /// Retry policy for search queries
    pub(super) search_retry: RetryConfig,

    /// Service state (broadcast to watchers)
    pub(super) state: watch::Sender<ServiceState>,

    /// Service state receiver (for internal use)
    pub(super) state_rx: watch::Receiver<ServiceState>,
}

impl RestaurantService {
    /// Create a service over an existing store and index connection.
    ///
    /// The service starts in `Created` state. Call [`start()`](Self::start)
    /// to declare the schema and hydrate the index.
    pub fn new(config: IndexConfig, store: Arc<dyn RestaurantStore>, index: Arc<dyn IndexClient>) -> Self {
        let (state_tx, state_rx) = watch::channel(ServiceState::Created);
        let synchronizer = IndexSynchronizer::new(Arc::clone(&index), config.search_index(), config.sync_policy());

        Self {
            config,
            store,
            index,
            synchronizer,
            search_retry: RetryConfig::query(),
            state: state_tx,
            state_rx,
        }
    }

    /// Open the backends named in the config.
    ///
    /// Without `sql_url` the primary store is in-memory; without `redis_url`
    /// the index is in-memory. A configured Redis that cannot be reached
    /// is an error: the host decides whether to run without search.
    pub async fn connect(config: IndexConfig) -> Result<Self, ServiceError> {
        let store: Arc<dyn RestaurantStore> = match config.sql_url {
            Some(ref sql_url) => {
                info!(url = %sql_url, "Connecting to primary store");
                Arc::new(SqlRestaurantStore::new(sql_url).await?)
            }
            None => {
                warn!("No SQL URL configured - restaurants are kept in memory only!");
                Arc::new(InMemoryRestaurantStore::new())
            }
        };

        let index: Arc<dyn IndexClient> = match config.redis_url {
            Some(ref redis_url) => {
                info!(url = %redis_url, prefix = ?config.redis_prefix, "Connecting to search index");
                let client = RedisIndexClient::with_prefix(redis_url, config.redis_prefix.as_deref())
                    .await
                    .map_err(ServiceError::IndexUnavailable)?;
                Arc::new(client)
            }
            None => {
                warn!("No Redis URL configured - using in-process search index");
                Arc::new(InMemoryIndexClient::new())
            }
        };

        Ok(Self::new(config, store, index))
    }

    /// Override the retry policy for search queries.
    #[must_use]
    pub fn with_search_retry(mut self, retry: RetryConfig) -> Self {
        self.search_retry = retry;
        self
    }

    /// Get current service state.
    #[must_use]
    pub fn state(&self) -> ServiceState {
        *self.state_rx.borrow()
    }

    /// Get a receiver to watch state changes.
    #[must_use]
    pub fn state_receiver(&self) -> watch::Receiver<ServiceState> {
        self.state_rx.clone()
    }

    /// Check if the service is fully started.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.state() == ServiceState::Ready
    }

    #[must_use]
    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Index write outcomes since construction.
    #[must_use]
    pub fn sync_stats(&self) -> SyncStatsSnapshot {
        self.synchronizer.stats().snapshot()
    }

    pub(super) fn set_state(&self, state: ServiceState) {
        let _ = self.state.send(state);
        crate::metrics::set_service_state(&state.to_string());
    }
}
