// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Service lifecycle: start and shutdown.

use std::time::Instant;
use tracing::{error, info, warn};

use crate::sync::HydrationReport;

use super::{RestaurantService, ServiceError, ServiceState};

impl RestaurantService {
    /// Start the service.
    ///
    /// Startup flow:
    /// 1. Declare the index schema (idempotent; "already exists" is success)
    /// 2. Hydrate the index from every record in the primary store
    /// 3. Ready!
    ///
    /// When the schema cannot be declared the service moves to
    /// `SearchDisabled` and returns [`ServiceError::SchemaCreationFailed`];
    /// `list`, `create` and `update` keep working.
    ///
    /// Individual hydration failures are logged and counted in the report.
    /// A failed read of the primary store is returned as an error, but the
    /// service still becomes `Ready` so new writes are indexed.
    #[tracing::instrument(skip(self), fields(index = %self.config.index_name))]
    pub async fn start(&self) -> Result<HydrationReport, ServiceError> {
        let startup_start = Instant::now();
        info!("Starting restaurant service...");

        // ========== PHASE 1: Declare schema ==========
        let phase_start = Instant::now();
        self.set_state(ServiceState::EnsuringSchema);
        if let Err(e) = self.synchronizer.ensure_schema().await {
            error!(error = %e, "Search disabled: index schema unavailable");
            self.set_state(ServiceState::SearchDisabled);
            return Err(ServiceError::SchemaCreationFailed(e));
        }
        crate::metrics::record_startup_phase("ensure_schema", phase_start.elapsed());

        // ========== PHASE 2: Hydrate from primary store ==========
        let phase_start = Instant::now();
        self.set_state(ServiceState::Hydrating);
        let hydrated = self.synchronizer.hydrate(self.store.as_ref()).await;
        crate::metrics::record_startup_phase("hydration", phase_start.elapsed());

        // ========== PHASE 3: Ready ==========
        self.set_state(ServiceState::Ready);
        crate::metrics::record_startup_phase("total", startup_start.elapsed());

        match hydrated {
            Ok(report) => {
                info!(
                    total = report.total,
                    indexed = report.indexed,
                    failed = report.failed,
                    elapsed = ?startup_start.elapsed(),
                    "Restaurant service ready"
                );
                Ok(report)
            }
            Err(e) => {
                warn!(error = %e, "Could not read primary store for hydration; index holds new writes only");
                Err(ServiceError::Store(e))
            }
        }
    }

    /// Initiate graceful shutdown.
    ///
    /// Waits up to `drain_timeout` for in-flight index writes. Writes after
    /// this point still reach the primary store but skip index sync.
    /// Returns `false` if the drain timed out.
    #[tracing::instrument(skip(self))]
    pub async fn shutdown(&self) -> bool {
        let shutdown_start = Instant::now();
        info!("Initiating restaurant service shutdown...");
        self.set_state(ServiceState::ShuttingDown);

        let drained = self.synchronizer.drain(self.config.drain_timeout()).await;
        let stats = self.sync_stats();
        crate::metrics::record_startup_phase("shutdown", shutdown_start.elapsed());
        info!(
            drained,
            indexed = stats.succeeded,
            unsynced = stats.unsynced(),
            "Restaurant service shutdown complete"
        );
        drained
    }
}
