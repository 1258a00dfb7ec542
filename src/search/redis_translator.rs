// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! RediSearch Translator
//!
//! Translates a [`Query`] to RediSearch FT.SEARCH syntax.
//!
//! # RediSearch Query Syntax
//!
//! ```text
//! @field:*value*            - Contains (infix wildcard, case-insensitive)
//! @field:(*a* *b*)          - Every term contained
//! @field:(a w)              - Exact tokens, for values with no long fragment
//! ```
//!
//! Terms come from [`Query::terms`], which splits on the same separators
//! the index tokenizer uses, so "Tex-Mex" becomes `@name:(*tex* *mex*)`.

use super::query::{Query, Term};

/// RediSearch query translator
pub struct RediSearchTranslator;

impl RediSearchTranslator {
    /// Translate a query to RediSearch FT.SEARCH syntax
    pub fn translate(query: &Query) -> String {
        // Field names come from the SearchBy allow-list and never need escaping
        let field_name = query.field.as_str();
        let terms: Vec<String> = query
            .terms()
            .into_iter()
            .map(|term| match term {
                Term::Contains(t) => format!("*{}*", Self::escape_value(&t.to_lowercase())),
                Term::Exact(t) => Self::escape_value(&t.to_lowercase()),
            })
            .collect();

        if terms.len() == 1 {
            format!("@{}:{}", field_name, terms[0])
        } else {
            format!("@{}:({})", field_name, terms.join(" "))
        }
    }

    /// Escape every character that is not part of a plain token.
    fn escape_value(value: &str) -> String {
        let mut escaped = String::with_capacity(value.len());
        for c in value.chars() {
            if !(c.is_alphanumeric() || c == '_') {
                escaped.push('\\');
            }
            escaped.push(c);
        }
        escaped
    }
}
