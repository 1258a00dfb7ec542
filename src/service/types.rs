// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Public types for the restaurant service.

use thiserror::Error;

use crate::search::{IndexError, QueryError};
use crate::storage::traits::StoreError;

/// Service lifecycle state.
///
/// Use [`super::RestaurantService::state()`] to check the current state or
/// [`super::RestaurantService::state_receiver()`] to watch for changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceState {
    /// Just created, not yet started
    Created,
    /// Declaring the index schema
    EnsuringSchema,
    /// Bulk-loading the index from the primary store
    Hydrating,
    /// Serving every operation
    Ready,
    /// Schema creation failed; writes and list are served, search is not
    SearchDisabled,
    /// Drained; writes no longer reach the index
    ShuttingDown,
}

impl ServiceState {
    /// Whether `search` may contact the index in this state.
    #[must_use]
    pub fn serves_search(&self) -> bool {
        !matches!(self, Self::SearchDisabled)
    }
}

impl std::fmt::Display for ServiceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Created => write!(f, "Created"),
            Self::EnsuringSchema => write!(f, "EnsuringSchema"),
            Self::Hydrating => write!(f, "Hydrating"),
            Self::Ready => write!(f, "Ready"),
            Self::SearchDisabled => write!(f, "SearchDisabled"),
            Self::ShuttingDown => write!(f, "ShuttingDown"),
        }
    }
}

/// Errors returned by the facade.
///
/// Index failures on the write path never show up here; they are counted
/// in the sync stats instead.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Restaurant {0} not found")]
    RecordNotFound(i64),
    #[error("Invalid search field '{0}' (expected name or location)")]
    InvalidSearchField(String),
    #[error("Search value must not be empty")]
    EmptySearchValue,
    #[error("Search index schema could not be created: {0}")]
    SchemaCreationFailed(#[source] IndexError),
    #[error("Search failed: {0}")]
    IndexUnavailable(#[source] IndexError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ServiceError {
    /// Caller mistakes (HTTP 4xx territory).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::RecordNotFound(_) | Self::InvalidSearchField(_) | Self::EmptySearchValue
        )
    }

    /// Transient backend failures worth retrying later.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::IndexUnavailable(_) | Self::Store(StoreError::Backend(_)))
    }
}

impl From<QueryError> for ServiceError {
    fn from(err: QueryError) -> Self {
        match err {
            QueryError::InvalidField(field) => Self::InvalidSearchField(field),
            QueryError::EmptyValue => Self::EmptySearchValue,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_state_display() {
        assert_eq!(format!("{}", ServiceState::Created), "Created");
        assert_eq!(format!("{}", ServiceState::SearchDisabled), "SearchDisabled");
        assert_eq!(format!("{}", ServiceState::ShuttingDown), "ShuttingDown");
    }

    #[test]
    fn test_only_search_disabled_blocks_search() {
        assert!(ServiceState::Ready.serves_search());
        assert!(ServiceState::Hydrating.serves_search());
        assert!(!ServiceState::SearchDisabled.serves_search());
    }

    #[test]
    fn test_error_classification() {
        assert!(ServiceError::Validation("name should not be empty".into()).is_client_error());
        assert!(ServiceError::RecordNotFound(9).is_client_error());
        assert!(ServiceError::EmptySearchValue.is_client_error());
        assert!(!ServiceError::RecordNotFound(9).is_retryable());

        let unavailable = ServiceError::IndexUnavailable(IndexError::Unavailable("down".into()));
        assert!(unavailable.is_retryable());
        assert!(!unavailable.is_client_error());

        assert!(ServiceError::Store(StoreError::Backend("pool".into())).is_retryable());
        assert!(!ServiceError::Store(StoreError::NotFound).is_retryable());
    }

    #[test]
    fn test_query_error_conversion() {
        let err: ServiceError = QueryError::InvalidField("owner".into()).into();
        assert!(matches!(err, ServiceError::InvalidSearchField(ref f) if f == "owner"));
        let err: ServiceError = QueryError::EmptyValue.into();
        assert!(matches!(err, ServiceError::EmptySearchValue));
    }
}
