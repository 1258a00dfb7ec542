// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Index synchronization.
//!
//! Keeps the advisory search index in step with the primary store:
//!
//! ```text
//! startup:  ensure_schema ──→ hydrate(store) ──→ HydrationReport
//!                              └─ JoinSet, ≤ hydration_concurrency upserts in flight
//! writes:   store.create/update ──→ on_record_written ──→ SyncOutcome
//!                                    └─ retry + timeout, never fails the write
//! shutdown: drain(timeout) waits for in-flight upserts, then closes
//! ```
//!
//! Every outcome is counted in [`SyncStats`] and in the `metrics` facade.

mod stats;
mod synchronizer;

pub use stats::{SyncStats, SyncStatsSnapshot};
pub use synchronizer::{HydrationReport, IndexSynchronizer, SyncOutcome, SyncPolicy};
