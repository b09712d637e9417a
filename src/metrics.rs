//! Prometheus metrics for request latency and store activity.
//!
//! This module provides:
//! - Per-endpoint HTTP request latency
//! - Store operation latency (lock wait plus map operation)
//! - Counters for user mutations and client errors
//! - A gauge tracking how many users are stored

use std::time::Instant;

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use tracing::debug;

// === Metric Name Constants ===

/// HTTP request latency metric name.
pub const METRIC_HTTP_REQUEST_LATENCY: &str = "http_request_latency_ms";
/// Store operation latency metric name.
pub const METRIC_STORE_OPERATION_LATENCY: &str = "store_operation_latency_ms";
/// Users created counter metric name.
pub const METRIC_USERS_CREATED: &str = "users_created_total";
/// Users updated counter metric name.
pub const METRIC_USERS_UPDATED: &str = "users_updated_total";
/// Users deleted counter metric name.
pub const METRIC_USERS_DELETED: &str = "users_deleted_total";
/// Lookups of unknown ids counter metric name.
pub const METRIC_USERS_NOT_FOUND: &str = "users_not_found_total";
/// Rejected request bodies counter metric name.
pub const METRIC_DECODE_ERRORS: &str = "decode_errors_total";
/// Stored users gauge metric name.
pub const METRIC_USERS_STORED: &str = "users_stored";

/// Initialize all metric descriptions.
/// Call this once at startup, after a recorder is installed.
pub fn init_metrics() {
    describe_histogram!(
        METRIC_HTTP_REQUEST_LATENCY,
        "HTTP request latency in milliseconds"
    );
    describe_histogram!(
        METRIC_STORE_OPERATION_LATENCY,
        "Store operation latency in milliseconds, including lock wait"
    );

    describe_counter!(METRIC_USERS_CREATED, "Total number of users created");
    describe_counter!(METRIC_USERS_UPDATED, "Total number of users updated");
    describe_counter!(METRIC_USERS_DELETED, "Total number of users deleted");
    describe_counter!(
        METRIC_USERS_NOT_FOUND,
        "Total number of requests referencing an unknown user"
    );
    describe_counter!(
        METRIC_DECODE_ERRORS,
        "Total number of request bodies that failed to decode"
    );

    describe_gauge!(METRIC_USERS_STORED, "Number of users currently stored");

    debug!("Metrics initialized");
}

/// Install the global Prometheus recorder and return a handle for rendering.
pub fn install_prometheus() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    init_metrics();
    Ok(handle)
}

/// Record HTTP request latency.
pub fn record_http_latency(start: Instant, endpoint: &str) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    histogram!(METRIC_HTTP_REQUEST_LATENCY, "endpoint" => endpoint.to_string()).record(latency_ms);
}

/// Increment users created counter.
pub fn inc_users_created() {
    counter!(METRIC_USERS_CREATED).increment(1);
}

/// Increment users updated counter.
pub fn inc_users_updated() {
    counter!(METRIC_USERS_UPDATED).increment(1);
}

/// Increment users deleted counter.
pub fn inc_users_deleted() {
    counter!(METRIC_USERS_DELETED).increment(1);
}

/// Increment not-found counter.
pub fn inc_users_not_found() {
    counter!(METRIC_USERS_NOT_FOUND).increment(1);
}

/// Increment decode errors counter.
pub fn inc_decode_errors() {
    counter!(METRIC_DECODE_ERRORS).increment(1);
}

/// Set the stored users gauge.
pub fn set_users_stored(count: usize) {
    gauge!(METRIC_USERS_STORED).set(count as f64);
}

/// RAII guard for timing operations.
/// Automatically records latency when dropped.
pub struct LatencyTimer {
    start: Instant,
    metric_name: &'static str,
}

impl LatencyTimer {
    /// Create a new latency timer for the given metric.
    pub fn new(metric_name: &'static str) -> Self {
        Self {
            start: Instant::now(),
            metric_name,
        }
    }

    /// Get elapsed time in milliseconds (without recording).
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for LatencyTimer {
    fn drop(&mut self) {
        let latency_ms = self.start.elapsed().as_secs_f64() * 1000.0;
        histogram!(self.metric_name).record(latency_ms);
    }
}

/// Create a latency timer for a store operation.
pub fn timer_store_operation() -> LatencyTimer {
    LatencyTimer::new(METRIC_STORE_OPERATION_LATENCY)
}
