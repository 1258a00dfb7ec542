// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! # Restaurant Index
//!
//! Search index synchronization for a restaurant REST backend.
//!
//! ## Architecture
//!
//! The primary store is the source of truth. A RediSearch index is kept in
//! step with it on a best-effort basis and serves field searches:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  RestaurantService (facade)                 │
//! │  • list / create / update / search                         │
//! │  • lifecycle: start (schema + hydration), shutdown (drain) │
//! └─────────────────────────────────────────────────────────────┘
//!            │ writes, list                     │ search
//!            ▼                                  ▼
//! ┌──────────────────────────┐     ┌─────────────────────────────┐
//! │      Primary Store       │     │       Query Translator      │
//! │  • SQLite / MySQL (sqlx) │     │  • SearchBy allow-list      │
//! │  • in-memory (DashMap)   │     │  • RediSearch syntax        │
//! └──────────────────────────┘     │  • hits → Restaurant        │
//!            │ committed record    └─────────────────────────────┘
//!            ▼                                  │
//! ┌──────────────────────────┐                  │
//! │    IndexSynchronizer     │                  │
//! │  • ensure schema         │                  │
//! │  • hydrate at startup    │                  │
//! │  • upsert per write      │                  │
//! └──────────────────────────┘                  │
//!            │                                  │
//!            ▼                                  ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        IndexClient                          │
//! │  • Redis Stack (FT.CREATE / JSON.SET / FT.SEARCH)          │
//! │  • in-memory engine                                        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The index is advisory: a failed or slow index write is logged, counted
//! and bounded by a timeout, but never fails a write the primary store
//! already accepted.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use restaurant_index::{IndexConfig, RestaurantFields, RestaurantService};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = IndexConfig {
//!         redis_url: Some("redis://localhost:6379".into()),
//!         sql_url: Some("sqlite:restaurants.db".into()),
//!         ..Default::default()
//!     };
//!
//!     let service = RestaurantService::connect(config).await.expect("Failed to connect");
//!     service.start().await.expect("Failed to start");
//!
//!     let fields = RestaurantFields::new("Pizza Place", "Downtown");
//!     let created = service.create(&fields).await.expect("Failed to create");
//!
//!     for restaurant in service.search("name", "pizza").await.expect("Search failed") {
//!         println!("{}: {} ({})", restaurant.id, restaurant.name, restaurant.location);
//!     }
//!
//!     service.update(created.id, &RestaurantFields::new("Pizza Palace", "Downtown")).await.ok();
//!     service.shutdown().await;
//! }
//! ```
//!
//! ## Modules
//!
//! - [`service`]: The [`RestaurantService`] facade and its lifecycle
//! - [`storage`]: Primary store backends (SQL, Memory)
//! - [`search`]: Index client, schema, query translation
//! - [`sync`]: Schema declaration, hydration, incremental sync
//! - [`resilience`]: Retry logic
//! - [`metrics`]: Metrics facade instrumentation

pub mod config;
pub mod restaurant;
pub mod storage;
pub mod search;
pub mod sync;
pub mod resilience;
pub mod service;
pub mod metrics;

pub use config::IndexConfig;
pub use restaurant::{Restaurant, RestaurantFields};
pub use service::{RestaurantService, ServiceError, ServiceState};
pub use storage::traits::{RestaurantStore, StoreError};
pub use search::{IndexClient, IndexError, SearchBy};
pub use sync::{HydrationReport, SyncOutcome, SyncStatsSnapshot};
pub use resilience::retry::RetryConfig;
pub use metrics::LatencyTimer;
