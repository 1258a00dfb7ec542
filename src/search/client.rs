// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use super::document::{IndexDocument, IndexHit};
use super::query::Query;
use super::schema::SearchIndex;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum IndexError {
    #[error("Search index '{0}' already exists")]
    SchemaAlreadyExists(String),
    #[error("Failed to create search index '{index}': {reason}")]
    SchemaCreationFailed { index: String, reason: String },
    #[error("Search index unavailable: {0}")]
    Unavailable(String),
    #[error("Search index operation timed out after {0:?}")]
    Timeout(Duration),
    #[error("Malformed search index reply: {0}")]
    MalformedReply(String),
}

/// Outcome of [`IndexClient::ensure_schema`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaStatus {
    Created,
    AlreadyExists,
}

/// Options for [`IndexClient::query`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOptions {
    /// Maximum number of hits to return
    pub limit: usize,
    /// Sortable field to order by (ascending); engine order when `None`
    pub sort_by: Option<String>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            limit: 100,
            sort_by: None,
        }
    }
}

/// Connection to a document/full-text index engine.
///
/// Implementations are shared process-wide behind an `Arc`; every method
/// may suspend on network I/O. None of them touch the primary store.
#[async_trait]
pub trait IndexClient: Send + Sync {
    /// Declare a schema.
    ///
    /// Reports [`IndexError::SchemaAlreadyExists`] when the engine already
    /// holds an index with this name.
    async fn create_schema(&self, index: &SearchIndex) -> Result<(), IndexError>;

    /// Write the full field set for a key, replacing any previous document.
    async fn upsert_document(&self, key: &str, document: &IndexDocument) -> Result<(), IndexError>;

    /// Run a read-only query against the named index.
    async fn query(
        &self,
        index_name: &str,
        query: &Query,
        options: &SearchOptions,
    ) -> Result<Vec<IndexHit>, IndexError>;

    /// Declare a schema, treating "already exists" as success.
    async fn ensure_schema(&self, index: &SearchIndex) -> Result<SchemaStatus, IndexError> {
        match self.create_schema(index).await {
            Ok(()) => Ok(SchemaStatus::Created),
            Err(IndexError::SchemaAlreadyExists(_)) => Ok(SchemaStatus::AlreadyExists),
            Err(e) => Err(e),
        }
    }
}
