//! Prometheus metrics for GraphQL operations.
//!
//! The recorder is installed once per process; `/metrics` renders it through the
//! stored handle. Without an installed recorder the `metrics` macros are no-ops.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::Instant;
use tracing::{info, warn};

pub const OPERATIONS_TOTAL: &str = "todo_graphql_operations_total";
pub const OPERATION_DURATION_SECONDS: &str = "todo_graphql_operation_duration_seconds";

static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the global Prometheus recorder. Idempotent.
pub fn init_metrics() -> Option<PrometheusHandle> {
    if let Some(handle) = HANDLE.get() {
        return Some(handle.clone());
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            metrics::describe_counter!(OPERATIONS_TOTAL, "GraphQL todo operations by outcome");
            metrics::describe_histogram!(
                OPERATION_DURATION_SECONDS,
                "Time spent in the storage call behind each GraphQL field"
            );
            info!("Prometheus recorder installed");
            Some(HANDLE.get_or_init(|| handle).clone())
        }
        Err(e) => {
            warn!("Failed to install Prometheus recorder: {}", e);
            HANDLE.get().cloned()
        }
    }
}

/// Records the outcome and duration of one resolver's storage call when finished
pub struct OperationTimer {
    operation: &'static str,
    start: Instant,
}

impl OperationTimer {
    pub fn start(operation: &'static str) -> Self {
        Self {
            operation,
            start: Instant::now(),
        }
    }

    pub fn finish(self, ok: bool) {
        let outcome = if ok { "ok" } else { "error" };
        metrics::counter!(OPERATIONS_TOTAL, "operation" => self.operation, "outcome" => outcome)
            .increment(1);
        metrics::histogram!(OPERATION_DURATION_SECONDS, "operation" => self.operation)
            .record(self.start.elapsed().as_secs_f64());
    }
}
