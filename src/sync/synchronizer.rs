// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use super::stats::SyncStats;
use crate::metrics::LatencyTimer;
use crate::resilience::retry::{retry, RetryConfig};
use crate::restaurant::Restaurant;
use crate::search::{document_key, IndexClient, IndexDocument, IndexError, SchemaStatus, SearchIndex};
use crate::storage::traits::{RestaurantStore, StoreError};

/// Upper bound on concurrent write-path upserts. `drain` acquires all of them.
const MAX_IN_FLIGHT: u32 = 1024;

/// Bounds for a single index write.
#[derive(Debug, Clone)]
pub struct SyncPolicy {
    /// Wall-clock limit for one upsert, retries included
    pub timeout: Duration,
    /// Attempts and backoff per upsert
    pub retry: RetryConfig,
    /// Upserts in flight during hydration
    pub hydration_concurrency: usize,
}

impl Default for SyncPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(2),
            retry: RetryConfig::index_write(3),
            hydration_concurrency: 32,
        }
    }
}

/// Result of one incremental sync. Never an error for the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncOutcome {
    /// The index holds the written field set
    Indexed,
    /// The engine rejected or lost the upsert after all attempts
    Failed(IndexError),
    /// The upsert did not finish within the policy timeout
    TimedOut,
    /// Index writes are closed (shutdown); no attempt was made
    Skipped,
}

impl SyncOutcome {
    #[must_use]
    pub fn is_indexed(&self) -> bool {
        matches!(self, Self::Indexed)
    }
}

/// Result of a bulk hydration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HydrationReport {
    /// Records read from the primary store
    pub total: usize,
    /// Records upserted into the index
    pub indexed: usize,
    /// Records that failed or timed out (logged and skipped)
    pub failed: usize,
}

impl HydrationReport {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed == 0
    }
}

/// Keeps the search index consistent with the primary store.
///
/// Owns an `Arc` of the index client handed over at startup. Clones of the
/// client reference go to hydration tasks only.
pub struct IndexSynchronizer {
    client: Arc<dyn IndexClient>,
    index: SearchIndex,
    policy: SyncPolicy,
    stats: Arc<SyncStats>,
    /// Write-path permits; closed by `drain`
    in_flight: Semaphore,
}

impl IndexSynchronizer {
    pub fn new(client: Arc<dyn IndexClient>, index: SearchIndex, policy: SyncPolicy) -> Self {
        Self {
            client,
            index,
            policy,
            stats: Arc::new(SyncStats::new()),
            in_flight: Semaphore::new(MAX_IN_FLIGHT as usize),
        }
    }

    pub fn index(&self) -> &SearchIndex {
        &self.index
    }

    pub fn policy(&self) -> &SyncPolicy {
        &self.policy
    }

    pub fn stats(&self) -> Arc<SyncStats> {
        Arc::clone(&self.stats)
    }

    /// Whether `drain` has run. Closed synchronizers skip every write.
    pub fn is_closed(&self) -> bool {
        self.in_flight.is_closed()
    }

    /// Declare the index schema. Safe to call on every startup.
    pub async fn ensure_schema(&self) -> Result<SchemaStatus, IndexError> {
        let result = match timeout(self.policy.timeout, self.client.ensure_schema(&self.index)).await {
            Ok(result) => result,
            Err(_) => Err(IndexError::Timeout(self.policy.timeout)),
        };

        match &result {
            Ok(SchemaStatus::Created) => {
                info!(index = %self.index.name, prefix = %self.index.prefix, "Search index created");
                crate::metrics::record_schema_operation("created");
            }
            Ok(SchemaStatus::AlreadyExists) => {
                debug!(index = %self.index.name, "Search index already exists");
                crate::metrics::record_schema_operation("exists");
            }
            Err(e) => {
                error!(index = %self.index.name, error = %e, "Search index declaration failed");
                crate::metrics::record_schema_operation("error");
            }
        }
        result
    }

    /// Upsert every record in the store into the index.
    ///
    /// Records are independent keys, so upserts run concurrently (bounded by
    /// `hydration_concurrency`) in no particular order. Individual failures
    /// are logged and counted; only a failed read of the store is an error.
    pub async fn hydrate(&self, store: &dyn RestaurantStore) -> Result<HydrationReport, StoreError> {
        let records = store.find_all().await?;
        let total = records.len();
        info!(total, index = %self.index.name, "Hydrating search index");

        let limit = Arc::new(Semaphore::new(self.policy.hydration_concurrency.max(1)));
        let mut join_set: JoinSet<SyncOutcome> = JoinSet::new();
        let mut report = HydrationReport {
            total,
            ..Default::default()
        };

        for record in records {
            // At most `hydration_concurrency` tasks (and documents) exist at once
            let Ok(permit) = Arc::clone(&limit).acquire_owned().await else {
                settle_skipped(&self.stats, "hydration");
                report.failed += 1;
                continue;
            };
            let client = Arc::clone(&self.client);
            let stats = Arc::clone(&self.stats);
            let policy = self.policy.clone();
            let key = document_key(&self.index.prefix, record.id);
            let document = IndexDocument::from(&record);

            join_set.spawn(async move {
                let result = upsert_bounded(client.as_ref(), &key, &document, &policy).await;
                drop(permit);
                settle(&stats, "hydration", &key, result)
            });
        }

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok(SyncOutcome::Indexed) => report.indexed += 1,
                Ok(_) => report.failed += 1,
                Err(e) => {
                    error!(error = %e, "Hydration task panicked");
                    self.stats.record_failure();
                    report.failed += 1;
                }
            }
        }

        crate::metrics::record_hydration(report.total, report.indexed, report.failed);
        if report.is_complete() {
            info!(indexed = report.indexed, "Search index hydrated");
        } else {
            warn!(
                indexed = report.indexed,
                failed = report.failed,
                "Search index partially hydrated"
            );
        }
        Ok(report)
    }

    /// Mirror a committed create/update into the index.
    ///
    /// Exactly one logical upsert (retried within the policy). The outcome is
    /// reported for observability; the write itself has already succeeded.
    pub async fn on_record_written(&self, record: &Restaurant) -> SyncOutcome {
        let key = document_key(&self.index.prefix, record.id);
        let Ok(_permit) = self.in_flight.acquire().await else {
            debug!(key = %key, "Index writes closed, skipping sync");
            return settle_skipped(&self.stats, "write");
        };

        let document = IndexDocument::from(record);
        let result = upsert_bounded(self.client.as_ref(), &key, &document, &self.policy).await;
        settle(&self.stats, "write", &key, result)
    }

    /// Wait for in-flight write-path upserts, then refuse new ones.
    ///
    /// Returns `false` when the wait timed out; writes still running at that
    /// point finish on their own.
    pub async fn drain(&self, wait: Duration) -> bool {
        let drained = match timeout(wait, self.in_flight.acquire_many(MAX_IN_FLIGHT)).await {
            Ok(Ok(permits)) => {
                permits.forget();
                true
            }
            // Already closed by an earlier drain
            Ok(Err(_)) => true,
            Err(_) => {
                warn!(timeout = ?wait, "Timed out waiting for in-flight index writes");
                false
            }
        };
        self.in_flight.close();
        drained
    }
}

/// One upsert with retry, bounded as a whole by the policy timeout.
async fn upsert_bounded(
    client: &dyn IndexClient,
    key: &str,
    document: &IndexDocument,
    policy: &SyncPolicy,
) -> Result<(), IndexError> {
    let _timer = LatencyTimer::new("upsert");
    let attempts = retry("index_upsert", &policy.retry, || client.upsert_document(key, document));
    match timeout(policy.timeout, attempts).await {
        Ok(result) => result,
        Err(_) => Err(IndexError::Timeout(policy.timeout)),
    }
}

fn settle(stats: &SyncStats, source: &'static str, key: &str, result: Result<(), IndexError>) -> SyncOutcome {
    match result {
        Ok(()) => {
            debug!(key = %key, source, "Indexed");
            stats.record_success();
            crate::metrics::record_index_upsert(source, "success");
            SyncOutcome::Indexed
        }
        Err(IndexError::Timeout(limit)) => {
            warn!(key = %key, source, timeout = ?limit, "Index upsert timed out; document may be stale");
            stats.record_timeout();
            crate::metrics::record_index_upsert(source, "timeout");
            crate::metrics::record_timeout("upsert");
            SyncOutcome::TimedOut
        }
        Err(e) => {
            warn!(key = %key, source, error = %e, "Index upsert failed; document may be stale");
            stats.record_failure();
            crate::metrics::record_index_upsert(source, "error");
            SyncOutcome::Failed(e)
        }
    }
}

fn settle_skipped(stats: &SyncStats, source: &'static str) -> SyncOutcome {
    stats.record_skipped();
    crate::metrics::record_index_upsert(source, "skipped");
    SyncOutcome::Skipped
}
