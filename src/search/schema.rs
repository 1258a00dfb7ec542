// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Index schema definition.
//!
//! # RediSearch Index Creation
//!
//! ```text
//! FT.CREATE idx:restaurants
//!   ON JSON
//!   PREFIX 1 restaurant:
//!   SCHEMA
//!     $.name AS name TEXT SORTABLE
//!     $.location AS location TEXT SORTABLE
//!     $.description AS description TEXT
//!     $.id AS id NUMERIC SORTABLE
//! ```

/// Search index definition
#[derive(Debug, Clone, PartialEq)]
pub struct SearchIndex {
    /// Index name (will be prefixed with "idx:")
    pub name: String,
    /// Key prefix this index covers (e.g., "restaurant:")
    pub prefix: String,
    /// Field definitions for the index
    pub fields: Vec<SearchField>,
}

impl SearchIndex {
    /// Create a new search index definition
    pub fn new(name: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prefix: prefix.into(),
            fields: Vec::new(),
        }
    }

    /// The restaurant schema: searchable name/location, stored description,
    /// sortable numeric id.
    pub fn restaurants(name: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self::new(name, prefix)
            .text_sortable("name")
            .text_sortable("location")
            .text("description")
            .numeric_sortable("id")
    }

    /// Add a text field
    pub fn text(mut self, name: impl Into<String>) -> Self {
        self.fields.push(SearchField::new(name, SearchFieldType::Text, false));
        self
    }

    /// Add a sortable text field
    pub fn text_sortable(mut self, name: impl Into<String>) -> Self {
        self.fields.push(SearchField::new(name, SearchFieldType::Text, true));
        self
    }

    /// Add a sortable numeric field
    pub fn numeric_sortable(mut self, name: impl Into<String>) -> Self {
        self.fields.push(SearchField::new(name, SearchFieldType::Numeric, true));
        self
    }

    /// Look up a declared field
    pub fn field(&self, name: &str) -> Option<&SearchField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Engine-side index name, e.g. `app:idx:restaurants`
    pub fn qualified_name(&self, redis_prefix: Option<&str>) -> String {
        format!("{}idx:{}", redis_prefix.unwrap_or(""), self.name)
    }

    /// Generate the FT.CREATE command arguments
    pub fn to_ft_create_args(&self) -> Vec<String> {
        self.to_ft_create_args_with_prefix(None)
    }

    /// Generate FT.CREATE args with optional global redis prefix
    ///
    /// The redis_prefix is prepended to both the index name and the key prefix
    /// to match the actual key structure in Redis.
    pub fn to_ft_create_args_with_prefix(&self, redis_prefix: Option<&str>) -> Vec<String> {
        let prefix = redis_prefix.unwrap_or("");

        let mut args = vec![
            self.qualified_name(redis_prefix),
            "ON".to_string(),
            "JSON".to_string(),
            "PREFIX".to_string(),
            "1".to_string(),
            format!("{}{}", prefix, self.prefix),
            "SCHEMA".to_string(),
        ];

        for field in &self.fields {
            args.extend(field.to_schema_args());
        }

        args
    }
}

/// Search field definition
#[derive(Debug, Clone, PartialEq)]
pub struct SearchField {
    /// Field name (used in queries, and the top-level JSON key)
    pub name: String,
    pub field_type: SearchFieldType,
    pub sortable: bool,
}

impl SearchField {
    fn new(name: impl Into<String>, field_type: SearchFieldType, sortable: bool) -> Self {
        Self {
            name: name.into(),
            field_type,
            sortable,
        }
    }

    fn to_schema_args(&self) -> Vec<String> {
        let mut args = vec![
            format!("$.{}", self.name),
            "AS".to_string(),
            self.name.clone(),
            self.field_type.to_string(),
        ];

        if self.sortable {
            args.push("SORTABLE".to_string());
        }

        args
    }
}

/// Search field types used by the restaurant index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchFieldType {
    /// Full-text searchable field
    Text,
    /// Numeric field (supports range queries and sorting)
    Numeric,
}

impl std::fmt::Display for SearchFieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchFieldType::Text => write!(f, "TEXT"),
            SearchFieldType::Numeric => write!(f, "NUMERIC"),
        }
    }
}
