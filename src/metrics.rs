use axum_prometheus::metrics::{counter, gauge};

use crate::store::{StoreError, StoreResult};

const LIVE_COUNTERS: &str = "counters_live";

/// Counts one store operation, labelled by its outcome
pub fn record_operation<T>(operation: &'static str, result: &StoreResult<T>) {
    let outcome = match result {
        Ok(_) => "ok",
        Err(StoreError::AlreadyExists(_)) => "conflict",
        Err(StoreError::NotFound(_)) => "not_found",
    };
    counter!("counter_operations_total", "operation" => operation, "outcome" => outcome)
        .increment(1);
}

/// Bumps the live counter gauge after a successful create
pub fn record_counter_created() {
    gauge!(LIVE_COUNTERS).increment(1.0);
}

/// Lowers the live counter gauge after a successful delete
pub fn record_counter_deleted() {
    gauge!(LIVE_COUNTERS).decrement(1.0);
}
