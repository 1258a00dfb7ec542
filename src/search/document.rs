// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Index documents and the mapping between restaurants and index hits.
//!
//! A restaurant with id `1` lives in the index under `restaurant:1`
//! (key prefix + id) as a flat JSON document:
//!
//! ```json
//! {"id": 1, "name": "Pizza Place", "location": "Downtown"}
//! ```
//!
//! The key is the source of the id when projecting hits back to records.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::restaurant::Restaurant;

/// Field set stored in the index for one key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndexDocument {
    fields: Map<String, Value>,
}

impl IndexDocument {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.fields)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl From<&Restaurant> for IndexDocument {
    fn from(record: &Restaurant) -> Self {
        let doc = IndexDocument::new()
            .with("id", record.id)
            .with("name", record.name.as_str())
            .with("location", record.location.as_str());
        match &record.description {
            Some(description) => doc.with("description", description.as_str()),
            None => doc,
        }
    }
}

/// One search result: the document key and its stored fields.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexHit {
    pub key: String,
    pub fields: IndexDocument,
}

/// Index key for a restaurant id.
pub fn document_key(key_prefix: &str, id: i64) -> String {
    format!("{}{}", key_prefix, id)
}

/// Recover the restaurant id from an index key.
pub fn id_from_key(key_prefix: &str, key: &str) -> Option<i64> {
    key.strip_prefix(key_prefix)?.parse().ok()
}

/// Reshape a hit into a restaurant.
///
/// Returns `None` when the key carries no id or a required field is missing.
pub fn project_hit(key_prefix: &str, hit: &IndexHit) -> Option<Restaurant> {
    let id = id_from_key(key_prefix, &hit.key)?;
    Some(Restaurant {
        id,
        name: hit.fields.get_str("name")?.to_string(),
        location: hit.fields.get_str("location")?.to_string(),
        description: hit.fields.get_str("description").map(String::from),
    })
}

/// Reshape hits in engine order, dropping (and logging) malformed ones.
pub fn project_hits(key_prefix: &str, hits: &[IndexHit]) -> Vec<Restaurant> {
    hits.iter()
        .filter_map(|hit| {
            let projected = project_hit(key_prefix, hit);
            if projected.is_none() {
                warn!(key = %hit.key, "Skipping index hit that does not map to a restaurant");
            }
            projected
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pizza_place() -> Restaurant {
        Restaurant {
            id: 1,
            name: "Pizza Place".into(),
            location: "Downtown".into(),
            description: None,
        }
    }

    #[test]
    fn test_document_from_restaurant() {
        let doc = IndexDocument::from(&pizza_place());
        let json: Value = serde_json::from_str(&doc.to_json().unwrap()).unwrap();
        assert_eq!(json, json!({"id": 1, "name": "Pizza Place", "location": "Downtown"}));
    }

    #[test]
    fn test_document_includes_description_when_present() {
        let mut record = pizza_place();
        record.description = Some("Wood oven".into());
        let doc = IndexDocument::from(&record);
        assert_eq!(doc.get_str("description"), Some("Wood oven"));
        assert_eq!(doc.len(), 4);
    }

    #[test]
    fn test_key_round_trip() {
        assert_eq!(document_key("restaurant:", 1), "restaurant:1");
        assert_eq!(id_from_key("restaurant:", "restaurant:1"), Some(1));
        assert_eq!(id_from_key("restaurant:", "restaurant:abc"), None);
        assert_eq!(id_from_key("restaurant:", "other:1"), None);
        assert_eq!(id_from_key("restaurant:", "restaurant:"), None);
    }

    #[test]
    fn test_project_hit_uses_key_for_id() {
        // A stale or missing id field in the document does not matter
        let hit = IndexHit {
            key: "restaurant:1".into(),
            fields: IndexDocument::new()
                .with("id", 999)
                .with("name", "Pizza Place")
                .with("location", "Downtown"),
        };
        assert_eq!(project_hit("restaurant:", &hit), Some(pizza_place()));
    }

    #[test]
    fn test_project_hits_skips_malformed() {
        let good = IndexHit {
            key: "restaurant:1".into(),
            fields: IndexDocument::from(&pizza_place()),
        };
        let bad_key = IndexHit {
            key: "restaurant:x".into(),
            fields: IndexDocument::from(&pizza_place()),
        };
        let missing_field = IndexHit {
            key: "restaurant:2".into(),
            fields: IndexDocument::new().with("name", "No Location"),
        };

        let projected = project_hits("restaurant:", &[bad_key, good, missing_field]);
        assert_eq!(projected, vec![pizza_place()]);
    }

    #[test]
    fn test_from_json() {
        let doc = IndexDocument::from_json(r#"{"name":"A","location":"B","id":3}"#).unwrap();
        assert_eq!(doc.get_str("name"), Some("A"));
        assert_eq!(doc.get("id"), Some(&json!(3)));
        assert!(IndexDocument::from_json("[1,2]").is_err());
    }
}
