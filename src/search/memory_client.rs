// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! In-process index engine.
//!
//! Holds documents in a `DashMap` and evaluates [`Query`] values directly.
//! Used by tests and by hosts that run without Redis.

use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::RwLock;
use serde_json::Value;

use super::client::{IndexClient, IndexError, SearchOptions};
use super::document::{IndexDocument, IndexHit};
use super::query::Query;
use super::schema::SearchIndex;

pub struct InMemoryIndexClient {
    schemas: RwLock<HashMap<String, SearchIndex>>,
    documents: DashMap<String, IndexDocument>,
}

impl InMemoryIndexClient {
    #[must_use]
    pub fn new() -> Self {
        Self {
            schemas: RwLock::new(HashMap::new()),
            documents: DashMap::new(),
        }
    }

    /// Stored document for a key
    #[must_use]
    pub fn document(&self, key: &str) -> Option<IndexDocument> {
        self.documents.get(key).map(|d| d.value().clone())
    }

    /// Number of stored documents
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    #[must_use]
    pub fn has_schema(&self, name: &str) -> bool {
        self.schemas.read().contains_key(name)
    }

    fn compare_field(a: Option<&Value>, b: Option<&Value>) -> Ordering {
        match (a, b) {
            (Some(Value::Number(x)), Some(Value::Number(y))) => {
                let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
                x.partial_cmp(&y).unwrap_or(Ordering::Equal)
            }
            (Some(Value::String(x)), Some(Value::String(y))) => x.to_lowercase().cmp(&y.to_lowercase()),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            _ => Ordering::Equal,
        }
    }
}

impl Default for InMemoryIndexClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IndexClient for InMemoryIndexClient {
    async fn create_schema(&self, index: &SearchIndex) -> Result<(), IndexError> {
        let mut schemas = self.schemas.write();
        if schemas.contains_key(&index.name) {
            return Err(IndexError::SchemaAlreadyExists(index.name.clone()));
        }
        schemas.insert(index.name.clone(), index.clone());
        Ok(())
    }

    async fn upsert_document(&self, key: &str, document: &IndexDocument) -> Result<(), IndexError> {
        self.documents.insert(key.to_string(), document.clone());
        Ok(())
    }

    async fn query(
        &self,
        index_name: &str,
        query: &Query,
        options: &SearchOptions,
    ) -> Result<Vec<IndexHit>, IndexError> {
        let prefix = self
            .schemas
            .read()
            .get(index_name)
            .map(|index| index.prefix.clone())
            .ok_or_else(|| IndexError::Unavailable(format!("{}: no such index", index_name)))?;

        let mut hits: Vec<IndexHit> = self
            .documents
            .iter()
            .filter(|entry| entry.key().starts_with(&prefix) && query.matches(entry.value()))
            .map(|entry| IndexHit {
                key: entry.key().clone(),
                fields: entry.value().clone(),
            })
            .collect();

        match &options.sort_by {
            Some(field) => hits.sort_by(|a, b| {
                Self::compare_field(a.fields.get(field), b.fields.get(field))
                    .then_with(|| a.key.cmp(&b.key))
            }),
            None => hits.sort_by(|a, b| a.key.cmp(&b.key)),
        }
        hits.truncate(options.limit);

        Ok(hits)
    }
}
