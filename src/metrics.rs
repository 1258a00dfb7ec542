// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Metrics instrumentation for the restaurant index.
//!
//! Uses the `metrics` crate for backend-agnostic metrics collection.
//! The host process is responsible for choosing the exporter (Prometheus, OTEL, etc.)
//!
//! # Metric Naming Convention
//! - `restaurant_index_` prefix for all metrics
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Labels
//! - `source`: write, hydration
//! - `operation`: upsert, search, create_schema
//! - `outcome`: success, error, timeout, skipped

use metrics::{counter, gauge, histogram};
use std::time::{Duration, Instant};

// ═══════════════════════════════════════════════════════════════════════════
// SYNC - Index upserts driven by primary store writes
// ═══════════════════════════════════════════════════════════════════════════

/// Record an index upsert outcome
pub fn record_index_upsert(source: &str, outcome: &str) {
    counter!(
        "restaurant_index_upserts_total",
        "source" => source.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);
}

/// Record a soft timeout on an index operation
pub fn record_timeout(operation: &str) {
    counter!(
        "restaurant_index_timeouts_total",
        "operation" => operation.to_string()
    )
    .increment(1);
}

/// Record index operation latency
pub fn record_latency(operation: &str, duration: Duration) {
    histogram!(
        "restaurant_index_operation_seconds",
        "operation" => operation.to_string()
    )
    .record(duration.as_secs_f64());
}

/// Record hydration results
pub fn record_hydration(total: usize, indexed: usize, failed: usize) {
    counter!("restaurant_index_hydrated_records_total").increment(indexed as u64);
    counter!("restaurant_index_hydration_failures_total").increment(failed as u64);
    gauge!("restaurant_index_hydration_last_total").set(total as f64);
}

// ═══════════════════════════════════════════════════════════════════════════
// SCHEMA
// ═══════════════════════════════════════════════════════════════════════════

/// Record schema declaration outcome (created, exists, error)
pub fn record_schema_operation(outcome: &str) {
    counter!(
        "restaurant_index_schema_operations_total",
        "outcome" => outcome.to_string()
    )
    .increment(1);
}

// ═══════════════════════════════════════════════════════════════════════════
// SEARCH
// ═══════════════════════════════════════════════════════════════════════════

/// Record a search request outcome (success, rejected, error)
pub fn record_search_query(outcome: &str) {
    counter!(
        "restaurant_index_search_queries_total",
        "outcome" => outcome.to_string()
    )
    .increment(1);
}

/// Record search result count
pub fn record_search_results(count: usize) {
    histogram!("restaurant_index_search_results").record(count as f64);
}

// ═══════════════════════════════════════════════════════════════════════════
// LIFECYCLE
// ═══════════════════════════════════════════════════════════════════════════

/// Track service state transitions
pub fn set_service_state(state: &str) {
    counter!(
        "restaurant_index_state_transitions_total",
        "state" => state.to_string()
    )
    .increment(1);
}

/// Record startup phase duration
pub fn record_startup_phase(phase: &str, duration: Duration) {
    histogram!(
        "restaurant_index_startup_seconds",
        "phase" => phase.to_string()
    )
    .record(duration.as_secs_f64());
}

/// A timing guard that records latency on drop
pub struct LatencyTimer {
    operation: &'static str,
    start: Instant,
}

impl LatencyTimer {
    /// Start a new latency timer
    pub fn new(operation: &'static str) -> Self {
        Self {
            operation,
            start: Instant::now(),
        }
    }
}

impl Drop for LatencyTimer {
    fn drop(&mut self) {
        record_latency(self.operation, self.start.elapsed());
    }
}
