// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Search request parsing and the query AST.
//!
//! Callers name the field to search as a string. That string never reaches
//! the query language: it is parsed into [`SearchBy`], a closed set of the
//! indexed fields, and rejected otherwise.
//!
//! # Example
//!
//! ```rust
//! use restaurant_index::search::{Query, SearchBy};
//!
//! let query = Query::parse("name", "Pizza").unwrap();
//! assert_eq!(query.field, SearchBy::Name);
//!
//! assert!(Query::parse("description", "oven").is_err());
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::document::IndexDocument;

/// Fields a caller may search by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchBy {
    Name,
    Location,
}

impl SearchBy {
    pub const ALL: [SearchBy; 2] = [SearchBy::Name, SearchBy::Location];

    /// Index field name
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchBy::Name => "name",
            SearchBy::Location => "location",
        }
    }
}

impl fmt::Display for SearchBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchBy {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SearchBy::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| QueryError::InvalidField(s.to_string()))
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("searchBy must be one of the following values: name, location (got '{0}')")]
    InvalidField(String),
    #[error("searchValue should not be empty")]
    EmptyValue,
}

/// Characters the index tokenizer splits text on, besides whitespace.
pub const TOKEN_SEPARATORS: &str = ",.<>{}[]\"':;!@#$%^&*()-+=~";

/// Shortest term matched as a substring. Shorter fragments only match a
/// whole token.
pub const MIN_INFIX_LEN: usize = 2;

fn is_separator(c: char) -> bool {
    c.is_whitespace() || TOKEN_SEPARATORS.contains(c)
}

/// Split text into tokens the way the index does.
pub fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    text.split(is_separator).filter(|token| !token.is_empty())
}

/// One searchable fragment of a query value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Term<'a> {
    /// Matches any token containing the fragment
    Contains(&'a str),
    /// Matches a token equal to the fragment
    Exact(&'a str),
}

impl<'a> Term<'a> {
    pub fn as_str(&self) -> &'a str {
        match *self {
            Term::Contains(s) | Term::Exact(s) => s,
        }
    }

    fn matches_token(&self, token: &str) -> bool {
        match self {
            Term::Contains(s) => token.contains(&s.to_lowercase()),
            Term::Exact(s) => token == s.to_lowercase(),
        }
    }
}

/// Case-insensitive, un-anchored match on one field.
///
/// The value is tokenized like indexed text. Multi-token values match
/// documents whose field contains every term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pub field: SearchBy,
    pub value: String,
}

impl Query {
    pub fn contains(field: SearchBy, value: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
        }
    }

    /// Parse a raw `(searchBy, searchValue)` pair.
    ///
    /// A value made only of separators has nothing to search for and is
    /// rejected as empty.
    pub fn parse(search_by: &str, search_value: &str) -> Result<Self, QueryError> {
        let field = search_by.parse::<SearchBy>()?;
        let value = search_value.trim();
        if tokenize(value).next().is_none() {
            return Err(QueryError::EmptyValue);
        }
        Ok(Self::contains(field, value))
    }

    /// Terms of the value.
    ///
    /// Fragments shorter than [`MIN_INFIX_LEN`] are dropped when a longer
    /// fragment exists ("Joe's" searches for "Joe"). A value made only of
    /// short fragments keeps them as exact-token terms.
    pub fn terms(&self) -> Vec<Term<'_>> {
        let (long, short): (Vec<&str>, Vec<&str>) =
            tokenize(&self.value).partition(|token| token.chars().count() >= MIN_INFIX_LEN);
        if long.is_empty() {
            short.into_iter().map(Term::Exact).collect()
        } else {
            long.into_iter().map(Term::Contains).collect()
        }
    }

    /// Evaluate the query against a document.
    pub fn matches(&self, document: &IndexDocument) -> bool {
        let Some(field_value) = document.get_str(self.field.as_str()) else {
            return false;
        };
        let haystack = field_value.to_lowercase();
        let tokens: Vec<&str> = tokenize(&haystack).collect();
        let terms = self.terms();
        !terms.is_empty()
            && terms
                .iter()
                .all(|term| tokens.iter().any(|token| term.matches_token(token)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(name: &str, location: &str) -> IndexDocument {
        IndexDocument::new().with("name", name).with("location", location)
    }

    #[test]
    fn test_search_by_allow_list() {
        assert_eq!("name".parse::<SearchBy>().unwrap(), SearchBy::Name);
        assert_eq!("location".parse::<SearchBy>().unwrap(), SearchBy::Location);
        assert_eq!(
            "description".parse::<SearchBy>().unwrap_err(),
            QueryError::InvalidField("description".into())
        );
        // The allow-list is exact
        assert!("Name".parse::<SearchBy>().is_err());
        assert!("name ".parse::<SearchBy>().is_err());
        assert!("@name:*".parse::<SearchBy>().is_err());
    }

    #[test]
    fn test_parse_rejects_empty_value() {
        assert_eq!(Query::parse("name", "").unwrap_err(), QueryError::EmptyValue);
        assert_eq!(Query::parse("name", "  \t").unwrap_err(), QueryError::EmptyValue);
    }

    #[test]
    fn test_parse_checks_field_before_value() {
        assert_eq!(
            Query::parse("id", "").unwrap_err(),
            QueryError::InvalidField("id".into())
        );
    }

    #[test]
    fn test_parse_trims_value() {
        let query = Query::parse("location", "  Downtown ").unwrap();
        assert_eq!(query, Query::contains(SearchBy::Location, "Downtown"));
    }

    #[test]
    fn test_matches_prefix_and_infix_case_insensitive() {
        let d = doc("Pizza Place", "Downtown");
        assert!(Query::contains(SearchBy::Name, "Pizza").matches(&d));
        assert!(Query::contains(SearchBy::Name, "pizza").matches(&d));
        assert!(Query::contains(SearchBy::Name, "Place").matches(&d));
        assert!(Query::contains(SearchBy::Name, "izz").matches(&d));
        assert!(!Query::contains(SearchBy::Name, "Palace").matches(&d));
    }

    #[test]
    fn test_matches_only_named_field() {
        let d = doc("Pizza Place", "Downtown");
        assert!(!Query::contains(SearchBy::Location, "Pizza").matches(&d));
        assert!(Query::contains(SearchBy::Location, "town").matches(&d));
    }

    #[test]
    fn test_multi_word_requires_every_term() {
        let d = doc("Pizza Place", "Downtown");
        assert!(Query::contains(SearchBy::Name, "place pizz").matches(&d));
        assert!(!Query::contains(SearchBy::Name, "pizza palace").matches(&d));
    }

    #[test]
    fn test_tokenize_splits_on_separators() {
        let tokens: Vec<&str> = tokenize("Joe's Tex-Mex (Main St.)").collect();
        assert_eq!(tokens, vec!["Joe", "s", "Tex", "Mex", "Main", "St"]);
        assert_eq!(tokenize("--- !!").count(), 0);
        // Not a separator
        assert_eq!(tokenize("a|b_c").collect::<Vec<_>>(), vec!["a|b_c"]);
    }

    #[test]
    fn test_terms_drop_short_fragments() {
        let query = Query::contains(SearchBy::Name, "Joe's");
        assert_eq!(query.terms(), vec![Term::Contains("Joe")]);

        let query = Query::contains(SearchBy::Name, "Tex-Mex");
        assert_eq!(query.terms(), vec![Term::Contains("Tex"), Term::Contains("Mex")]);
    }

    #[test]
    fn test_terms_keep_short_fragments_when_alone() {
        let query = Query::contains(SearchBy::Name, "A&W");
        assert_eq!(query.terms(), vec![Term::Exact("A"), Term::Exact("W")]);
    }

    #[test]
    fn test_parse_rejects_separator_only_value() {
        assert_eq!(Query::parse("name", " -'- ").unwrap_err(), QueryError::EmptyValue);
        assert!(Query::parse("name", "-a-").is_ok());
    }

    #[test]
    fn test_punctuated_value_matches() {
        let d = doc("Joe's Tex-Mex", "Main St.");
        assert!(Query::contains(SearchBy::Name, "Tex-Mex").matches(&d));
        assert!(Query::contains(SearchBy::Name, "joe's").matches(&d));
        assert!(Query::contains(SearchBy::Name, "mex, joe").matches(&d));
        assert!(Query::contains(SearchBy::Location, "St.").matches(&d));
        assert!(!Query::contains(SearchBy::Name, "Tex-Mix").matches(&d));
    }

    #[test]
    fn test_short_fragments_match_whole_tokens() {
        let d = doc("A&W Diner", "Downtown");
        assert!(Query::contains(SearchBy::Name, "a&w").matches(&d));
        assert!(Query::contains(SearchBy::Name, "w").matches(&d));
        // "n" is inside "diner" and "downtown" but is not a token
        assert!(!Query::contains(SearchBy::Name, "n").matches(&d));
    }

    #[test]
    fn test_missing_field_never_matches() {
        let d = IndexDocument::new().with("name", "Pizza Place");
        assert!(!Query::contains(SearchBy::Location, "Down").matches(&d));
    }
}
