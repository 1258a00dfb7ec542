// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Search Infrastructure
//!
//! Index client, index schema and query translation for the restaurant index.
//!
//! # Architecture
//!
//! ```text
//! (searchBy, searchValue)
//!     ↓ Query::parse (allow-list: name, location)
//! Query (AST)
//!     ├─→ RediSearchTranslator → FT.SEARCH syntax → RedisIndexClient
//!     └─→ Query::matches                          → InMemoryIndexClient
//!     ↓
//! IndexHit (key + fields)
//!     ↓ project_hits (id from key suffix)
//! Restaurant
//! ```
//!
//! # Schema Registration
//!
//! ```rust,no_run
//! # use restaurant_index::search::{IndexClient, InMemoryIndexClient, SearchIndex, SchemaStatus};
//! # async fn example() {
//! let client = InMemoryIndexClient::new();
//! let index = SearchIndex::restaurants("restaurants", "restaurant:");
//!
//! assert_eq!(client.ensure_schema(&index).await.unwrap(), SchemaStatus::Created);
//! // A second declaration (restart, another replica) is not an error
//! assert_eq!(client.ensure_schema(&index).await.unwrap(), SchemaStatus::AlreadyExists);
//! # }
//! ```

mod client;
mod document;
mod memory_client;
mod query;
mod redis_client;
mod redis_translator;
mod schema;

pub use client::{IndexClient, IndexError, SchemaStatus, SearchOptions};
pub use document::{document_key, id_from_key, project_hit, project_hits, IndexDocument, IndexHit};
pub use memory_client::InMemoryIndexClient;
pub use query::{tokenize, Query, QueryError, SearchBy, Term};
pub use redis_client::RedisIndexClient;
pub use redis_translator::RediSearchTranslator;
pub use schema::{SearchField, SearchFieldType, SearchIndex};
