// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Search API for RestaurantService
//!
//! # Architecture
//!
//! ```text
//! search(searchBy, searchValue)
//!       │
//!       ├─→ Query::parse (reject unknown field / empty value)
//!       │
//!       ├─→ SearchDisabled? IndexUnavailable
//!       │
//!       ├─→ IndexClient::query (retry + timeout, SORTBY id, LIMIT n)
//!       │
//!       └─→ project_hits → Vec<Restaurant>
//! ```
//!
//! The primary store is never consulted; results reflect the index.

use tokio::time::timeout;
use tracing::debug;

use crate::metrics::{self, LatencyTimer};
use crate::resilience::retry::retry;
use crate::restaurant::Restaurant;
use crate::search::{project_hits, IndexError, Query, SearchOptions};

use super::{RestaurantService, ServiceError};

impl RestaurantService {
    /// Find restaurants whose `search_by` field contains `search_value`.
    ///
    /// `search_by` must be `name` or `location`. Matching is
    /// case-insensitive; the value is split on spaces and punctuation and
    /// every term must match. Results are ordered by id and capped at
    /// `search_limit`.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// # use restaurant_index::RestaurantService;
    /// # async fn example(service: &RestaurantService) {
    /// let downtown = service.search("location", "downtown").await.unwrap();
    /// assert!(service.search("owner", "bob").await.is_err());
    /// # }
    /// ```
    pub async fn search(&self, search_by: &str, search_value: &str) -> Result<Vec<Restaurant>, ServiceError> {
        let query = Query::parse(search_by, search_value).map_err(|e| {
            metrics::record_search_query("rejected");
            ServiceError::from(e)
        })?;

        let state = self.state();
        if !state.serves_search() {
            metrics::record_search_query("unavailable");
            return Err(ServiceError::IndexUnavailable(IndexError::Unavailable(format!(
                "search is disabled ({})",
                state
            ))));
        }

        let _timer = LatencyTimer::new("search");
        let index = self.synchronizer.index();
        let options = SearchOptions {
            limit: self.config.search_limit,
            sort_by: Some("id".to_string()),
        };
        let limit = self.config.index_timeout();

        let attempts = retry("index_search", &self.search_retry, || {
            self.index.query(&index.name, &query, &options)
        });
        let hits = match timeout(limit, attempts).await {
            Ok(Ok(hits)) => hits,
            Ok(Err(e)) => {
                metrics::record_search_query("error");
                return Err(ServiceError::IndexUnavailable(e));
            }
            Err(_) => {
                metrics::record_search_query("timeout");
                metrics::record_timeout("search");
                return Err(ServiceError::IndexUnavailable(IndexError::Timeout(limit)));
            }
        };

        let records = project_hits(&index.prefix, &hits);
        debug!(field = %query.field, hits = hits.len(), results = records.len(), "Search complete");
        metrics::record_search_results(records.len());
        metrics::record_search_query("success");
        Ok(records)
    }
}
