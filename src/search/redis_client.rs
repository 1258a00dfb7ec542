// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! RediSearch index client (Redis Stack: RediSearch + RedisJSON).
//!
//! Documents are RedisJSON values written with `JSON.SET key $ <doc>`, which
//! replaces the whole document. The index is declared `ON JSON` over the key
//! prefix, so RediSearch picks up every write under that prefix:
//!
//! ```text
//! FT.CREATE idx:restaurants ON JSON PREFIX 1 restaurant: SCHEMA $.name AS name TEXT SORTABLE ...
//! JSON.SET restaurant:1 $ '{"id":1,"name":"Pizza Place","location":"Downtown"}'
//! FT.SEARCH idx:restaurants '@name:*Pizza*' SORTBY id ASC LIMIT 0 100
//! ```
//!
//! The connection is a [`ConnectionManager`], which reconnects on its own
//! after transient failures. Calls here are single attempts; retry and
//! timeout policy belongs to the caller.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{cmd, Client, Value};
use tracing::debug;

use super::client::{IndexClient, IndexError, SearchOptions};
use super::document::{IndexDocument, IndexHit};
use super::query::Query;
use super::redis_translator::RediSearchTranslator;
use super::schema::SearchIndex;
use crate::resilience::retry::{retry, RetryConfig};

pub struct RedisIndexClient {
    connection: ConnectionManager,
    /// Optional key prefix for namespacing (e.g., "myapp:" → "myapp:restaurant:1")
    prefix: String,
}

impl RedisIndexClient {
    /// Connect without a key prefix.
    pub async fn new(connection_string: &str) -> Result<Self, IndexError> {
        Self::with_prefix(connection_string, None).await
    }

    /// Connect with an optional key prefix.
    ///
    /// The prefix is prepended to document keys and index names, enabling
    /// namespacing when sharing a Redis instance with other applications.
    pub async fn with_prefix(connection_string: &str, prefix: Option<&str>) -> Result<Self, IndexError> {
        let client = Client::open(connection_string)
            .map_err(|e| IndexError::Unavailable(e.to_string()))?;

        // Use startup config: fast-fail, don't hang forever
        let connection = retry("redis_connect", &RetryConfig::startup(), || async {
            ConnectionManager::new(client.clone()).await
        })
        .await
        .map_err(|e: redis::RedisError| IndexError::Unavailable(e.to_string()))?;

        Ok(Self {
            connection,
            prefix: prefix.unwrap_or("").to_string(),
        })
    }

    /// Get the configured prefix
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Apply the prefix to a key.
    #[inline]
    fn prefixed_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    fn is_already_exists(err: &redis::RedisError) -> bool {
        err.to_string().contains("Index already exists")
    }

    /// Build the FT.SEARCH argument list (without the command name).
    fn ft_search_args(index: &str, query: &str, options: &SearchOptions) -> Vec<String> {
        let mut args = vec![index.to_string(), query.to_string()];
        if let Some(ref field) = options.sort_by {
            args.extend(["SORTBY".to_string(), field.clone(), "ASC".to_string()]);
        }
        args.extend(["LIMIT".to_string(), "0".to_string(), options.limit.to_string()]);
        args
    }

    /// Parse an FT.SEARCH reply on a JSON index.
    ///
    /// Shape: `[total, key1, ["$", "<json>"], key2, ["$", "<json>"], ...]`
    /// Keys come back with the namespace prefix stripped.
    fn parse_search_reply(reply: Value, prefix: &str) -> Result<Vec<IndexHit>, IndexError> {
        let items = match reply {
            Value::Array(items) => items,
            other => {
                return Err(IndexError::MalformedReply(format!("expected array, got {:?}", other)))
            }
        };

        let mut iter = items.into_iter();
        match iter.next() {
            Some(Value::Int(_)) => {}
            None => return Ok(Vec::new()),
            Some(other) => {
                return Err(IndexError::MalformedReply(format!("expected total count, got {:?}", other)))
            }
        }

        let mut hits = Vec::new();
        while let Some(key_value) = iter.next() {
            let key: String = redis::from_redis_value(&key_value)
                .map_err(|e| IndexError::MalformedReply(format!("invalid key: {}", e)))?;
            let fields_value = iter
                .next()
                .ok_or_else(|| IndexError::MalformedReply(format!("no fields for key {}", key)))?;
            let pairs: Vec<String> = redis::from_redis_value(&fields_value)
                .map_err(|e| IndexError::MalformedReply(format!("invalid fields for {}: {}", key, e)))?;

            let json = pairs
                .chunks(2)
                .find(|pair| pair.len() == 2 && pair[0] == "$")
                .map(|pair| pair[1].as_str())
                .ok_or_else(|| IndexError::MalformedReply(format!("no document body for {}", key)))?;
            let fields = IndexDocument::from_json(json)
                .map_err(|e| IndexError::MalformedReply(format!("invalid document {}: {}", key, e)))?;

            hits.push(IndexHit {
                key: key.strip_prefix(prefix).unwrap_or(&key).to_string(),
                fields,
            });
        }

        Ok(hits)
    }
}

#[async_trait]
impl IndexClient for RedisIndexClient {
    async fn create_schema(&self, index: &SearchIndex) -> Result<(), IndexError> {
        let mut conn = self.connection.clone();
        let args = index.to_ft_create_args_with_prefix(Some(self.prefix.as_str()));
        debug!(index = %args[0], prefix = %index.prefix, "FT.CREATE");

        match cmd("FT.CREATE").arg(&args).query_async::<()>(&mut conn).await {
            Ok(()) => Ok(()),
            Err(e) if Self::is_already_exists(&e) => Err(IndexError::SchemaAlreadyExists(args[0].clone())),
            Err(e) => Err(IndexError::SchemaCreationFailed {
                index: args[0].clone(),
                reason: e.to_string(),
            }),
        }
    }

    async fn upsert_document(&self, key: &str, document: &IndexDocument) -> Result<(), IndexError> {
        let mut conn = self.connection.clone();
        let doc = document
            .to_json()
            .map_err(|e| IndexError::Unavailable(format!("Unserializable document: {}", e)))?;

        // JSON.SET key $ <json>
        cmd("JSON.SET")
            .arg(self.prefixed_key(key))
            .arg("$")
            .arg(doc)
            .query_async::<()>(&mut conn)
            .await
            .map_err(|e| IndexError::Unavailable(e.to_string()))
    }

    async fn query(
        &self,
        index_name: &str,
        query: &Query,
        options: &SearchOptions,
    ) -> Result<Vec<IndexHit>, IndexError> {
        let mut conn = self.connection.clone();
        let index = format!("{}idx:{}", self.prefix, index_name);
        let query_str = RediSearchTranslator::translate(query);
        debug!(index = %index, query = %query_str, "FT.SEARCH");

        let reply: Value = cmd("FT.SEARCH")
            .arg(Self::ft_search_args(&index, &query_str, options))
            .query_async(&mut conn)
            .await
            .map_err(|e| IndexError::Unavailable(e.to_string()))?;

        Self::parse_search_reply(reply, &self.prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bulk(s: &str) -> Value {
        Value::BulkString(s.as_bytes().to_vec())
    }

    #[test]
    fn test_ft_search_args_with_sort() {
        let options = SearchOptions { limit: 25, sort_by: Some("id".into()) };
        let args = RedisIndexClient::ft_search_args("idx:restaurants", "@name:*Pizza*", &options);
        assert_eq!(
            args,
            vec!["idx:restaurants", "@name:*Pizza*", "SORTBY", "id", "ASC", "LIMIT", "0", "25"]
        );
    }

    #[test]
    fn test_ft_search_args_engine_order() {
        let args = RedisIndexClient::ft_search_args("idx:r", "@name:*a*", &SearchOptions::default());
        assert_eq!(args, vec!["idx:r", "@name:*a*", "LIMIT", "0", "100"]);
    }

    fn hit(key: &str, json: &str) -> [Value; 2] {
        [bulk(key), Value::Array(vec![bulk("$"), bulk(json)])]
    }

    #[test]
    fn test_parse_reply_strips_prefix() {
        let mut items = vec![Value::Int(2)];
        items.extend(hit("app:restaurant:1", r#"{"id":1,"name":"Pizza Place","location":"Downtown"}"#));
        items.extend(hit("app:restaurant:2", r#"{"id":2,"name":"Pizza Hut","location":"Uptown"}"#));

        let hits = RedisIndexClient::parse_search_reply(Value::Array(items), "app:").unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].key, "restaurant:1");
        assert_eq!(hits[0].fields.get_str("name"), Some("Pizza Place"));
        assert_eq!(hits[1].key, "restaurant:2");
    }

    #[test]
    fn test_parse_empty_reply() {
        let hits = RedisIndexClient::parse_search_reply(Value::Array(vec![Value::Int(0)]), "").unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn test_parse_reply_missing_fields_is_malformed() {
        let reply = Value::Array(vec![Value::Int(1), bulk("restaurant:1")]);
        let err = RedisIndexClient::parse_search_reply(reply, "").unwrap_err();
        assert!(matches!(err, IndexError::MalformedReply(_)));
    }

    #[test]
    fn test_parse_reply_rejects_non_array() {
        let err = RedisIndexClient::parse_search_reply(Value::Nil, "").unwrap_err();
        assert!(matches!(err, IndexError::MalformedReply(_)));
    }

    #[test]
    fn test_parse_reply_invalid_json_body() {
        let mut items = vec![Value::Int(1)];
        items.extend(hit("restaurant:1", "not json"));
        let err = RedisIndexClient::parse_search_reply(Value::Array(items), "").unwrap_err();
        assert!(matches!(err, IndexError::MalformedReply(_)));
    }
}
