// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

use std::sync::atomic::{AtomicU64, Ordering};

/// In-process counters for index write outcomes.
///
/// `failed` and `timeouts` together are the records whose index document may
/// be stale; they only grow.
#[derive(Debug, Default)]
pub struct SyncStats {
    succeeded: AtomicU64,
    failed: AtomicU64,
    timeouts: AtomicU64,
    skipped: AtomicU64,
}

/// Point-in-time copy of [`SyncStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncStatsSnapshot {
    pub succeeded: u64,
    pub failed: u64,
    pub timeouts: u64,
    pub skipped: u64,
}

impl SyncStatsSnapshot {
    /// Writes that did not reach the index.
    #[must_use]
    pub fn unsynced(&self) -> u64 {
        self.failed + self.timeouts + self.skipped
    }
}

impl SyncStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_success(&self) {
        self.succeeded.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_failure(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_timeout(&self) {
        self.timeouts.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_skipped(&self) {
        self.skipped.fetch_add(1, Ordering::Relaxed);
    }

    #[must_use]
    pub fn snapshot(&self) -> SyncStatsSnapshot {
        SyncStatsSnapshot {
            succeeded: self.succeeded.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            timeouts: self.timeouts.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
        }
    }
}
