//! Metrics and observability utilities
//!
//! Prometheus-style metrics for the API and the ingestion pipeline
//! with standardized naming conventions.

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram, Unit};
use std::time::Instant;

/// Metrics prefix for all PaperNest metrics
pub const METRICS_PREFIX: &str = "papernest";

/// Histogram buckets for API request latency (in seconds)
pub const LATENCY_BUCKETS: &[f64] = &[
    0.001,  // 1ms
    0.005,  // 5ms
    0.010,  // 10ms
    0.025,  // 25ms
    0.050,  // 50ms
    0.100,  // 100ms
    0.250,  // 250ms
    0.500,  // 500ms
    1.000,  // 1s
    2.500,  // 2.5s
    5.000,  // 5s
];

/// Buckets for upstream feed requests, which include the network round trip
pub const FETCH_BUCKETS: &[f64] = &[
    0.100,  // 100ms
    0.250,  // 250ms
    0.500,  // 500ms
    1.000,  // 1s
    2.500,  // 2.5s
    5.000,  // 5s
    10.00,  // 10s
    30.00,  // 30s - default request timeout
];

fn name(suffix: &str) -> String {
    format!("{}_{}", METRICS_PREFIX, suffix)
}

/// Register all metric descriptions
pub fn register_metrics() {
    // Request metrics
    describe_counter!(name("requests_total"), Unit::Count, "Total number of HTTP requests");

    describe_histogram!(
        name("request_duration_seconds"),
        Unit::Seconds,
        "HTTP request latency in seconds"
    );

    // Fetch metrics
    describe_counter!(
        name("fetch_requests_total"),
        Unit::Count,
        "Total upstream feed requests by kind and outcome"
    );

    describe_histogram!(
        name("fetch_duration_seconds"),
        Unit::Seconds,
        "Upstream feed request latency in seconds"
    );

    // Ingestion metrics
    describe_counter!(
        name("entries_skipped_total"),
        Unit::Count,
        "Feed entries skipped during conversion"
    );

    describe_counter!(name("papers_stored_total"), Unit::Count, "Papers upserted");

    describe_counter!(
        name("upsert_failures_total"),
        Unit::Count,
        "Paper upserts that failed"
    );

    describe_counter!(
        name("cycles_total"),
        Unit::Count,
        "Ingestion cycles by trigger and outcome"
    );

    describe_histogram!(
        name("cycle_duration_seconds"),
        Unit::Seconds,
        "Ingestion cycle duration in seconds"
    );

    describe_gauge!(
        name("last_cycle_stored"),
        Unit::Count,
        "Papers stored by the most recent cycle"
    );

    tracing::info!("Metrics registered");
}

/// Helper to record request metrics
pub struct RequestMetrics {
    start: Instant,
    endpoint: String,
    method: String,
}

impl RequestMetrics {
    /// Start tracking a request
    pub fn start(method: &str, endpoint: &str) -> Self {
        Self {
            start: Instant::now(),
            endpoint: endpoint.to_string(),
            method: method.to_string(),
        }
    }

    /// Record request completion
    pub fn finish(self, status: u16) {
        let duration = self.start.elapsed().as_secs_f64();

        counter!(
            name("requests_total"),
            "method" => self.method.clone(),
            "endpoint" => self.endpoint.clone(),
            "status" => status.to_string()
        )
        .increment(1);

        histogram!(
            name("request_duration_seconds"),
            "method" => self.method,
            "endpoint" => self.endpoint
        )
        .record(duration);
    }
}

/// Record one upstream feed request.
///
/// `kind` is `search` or `id_list`; `outcome` is `success`, `http_error`,
/// `transport_error` or `decode_error`.
pub fn record_fetch(duration_secs: f64, kind: &'static str, outcome: &'static str) {
    counter!(name("fetch_requests_total"), "kind" => kind, "outcome" => outcome).increment(1);

    histogram!(name("fetch_duration_seconds"), "kind" => kind).record(duration_secs);
}

/// Record entries dropped during feed conversion
pub fn record_entries_skipped(reason: &'static str, count: u64) {
    counter!(name("entries_skipped_total"), "reason" => reason).increment(count);
}

/// Record the outcome of an ingestion cycle
pub fn record_cycle(trigger: &'static str, success: bool, stored: u64, failed: u64, duration_secs: f64) {
    let outcome = if success { "success" } else { "error" };

    counter!(name("cycles_total"), "trigger" => trigger, "outcome" => outcome).increment(1);
    histogram!(name("cycle_duration_seconds"), "trigger" => trigger).record(duration_secs);

    if success {
        counter!(name("papers_stored_total")).increment(stored);
        counter!(name("upsert_failures_total")).increment(failed);
        gauge!(name("last_cycle_stored")).set(stored as f64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buckets_sorted() {
        for buckets in [LATENCY_BUCKETS, FETCH_BUCKETS] {
            let mut prev = 0.0;
            for &bucket in buckets {
                assert!(bucket > prev);
                prev = bucket;
            }
        }
    }

    #[test]
    fn test_metric_names_are_prefixed() {
        assert_eq!(name("cycles_total"), "papernest_cycles_total");
    }

    #[test]
    fn test_recorders_without_exporter() {
        // No recorder installed: calls are no-ops and must not panic
        let metrics = RequestMetrics::start("GET", "/v1/papers");
        metrics.finish(200);
        record_fetch(0.2, "search", "success");
        record_entries_skipped("timestamp", 2);
        record_cycle("scheduled", true, 10, 1, 1.5);
    }
}
