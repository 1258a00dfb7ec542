// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Primary store adapters.
//!
//! The primary store is the source of truth for restaurants. Adapters
//! implement [`traits::RestaurantStore`]:
//!
//! - [`memory::InMemoryRestaurantStore`] - DashMap-backed, for tests and embedding
//! - [`sql::SqlRestaurantStore`] - SQLite or MySQL through the sqlx `Any` driver

pub mod traits;
pub mod memory;
pub mod sql;
