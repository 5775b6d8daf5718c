//! Metrics collection and exposition.
//!
//! # Metrics
//! - `http_requests_total` (counter): requests by method, route, status
//! - `http_request_duration_seconds` (histogram): latency distribution
//! - `users_total` (gauge): records currently in the store
//! - `process_*`: CPU, memory, open fds, threads and start time of this
//!   process, sampled on every scrape
//!
//! # Design Decisions
//! - One process-global Prometheus recorder, installed at most once
//! - `route` is the matched route template; unmatched requests use the raw path
//! - Histogram buckets tuned for typical web latencies

use std::sync::{Mutex, OnceLock, PoisonError};
use std::time::{Duration, Instant};

use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};
use metrics_process::Collector;
use thiserror::Error;

pub const HTTP_REQUESTS_TOTAL: &str = "http_requests_total";
pub const HTTP_REQUEST_DURATION: &str = "http_request_duration_seconds";
pub const USERS_TOTAL: &str = "users_total";

/// Content type of the Prometheus text exposition format.
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

const DURATION_BUCKETS: &[f64] = &[
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

static HANDLE: Mutex<Option<PrometheusHandle>> = Mutex::new(None);
static PROCESS: OnceLock<Collector> = OnceLock::new();

fn process_collector() -> &'static Collector {
    PROCESS.get_or_init(Collector::default)
}

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("failed to build prometheus recorder: {0}")]
    Build(#[from] BuildError),
    #[error("another metrics recorder is already installed")]
    RecorderInUse,
}

/// Install the global Prometheus recorder, or return the existing handle.
pub fn install() -> Result<PrometheusHandle, MetricsError> {
    let mut slot = HANDLE.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(handle) = slot.as_ref() {
        return Ok(handle.clone());
    }

    let recorder = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full(HTTP_REQUEST_DURATION.to_string()),
            DURATION_BUCKETS,
        )?
        .build_recorder();
    let handle = recorder.handle();
    metrics::set_global_recorder(recorder).map_err(|_| MetricsError::RecorderInUse)?;

    describe();
    process_collector().collect();

    tracing::debug!("Prometheus recorder installed");
    *slot = Some(handle.clone());
    Ok(handle)
}

fn describe() {
    metrics::describe_counter!(HTTP_REQUESTS_TOTAL, "Total number of HTTP requests");
    metrics::describe_histogram!(
        HTTP_REQUEST_DURATION,
        metrics::Unit::Seconds,
        "HTTP request latency"
    );
    metrics::describe_gauge!(USERS_TOTAL, "Number of users held in memory");
    process_collector().describe();
}

/// Sample process metrics and render everything in the text format.
pub fn render(handle: &PrometheusHandle) -> String {
    process_collector().collect();
    handle.render()
}

/// Record a completed HTTP request.
pub fn record_request(method: &str, route: &str, status: u16, start: Instant) {
    let labels = [
        ("method", method.to_string()),
        ("route", route.to_string()),
        ("status", status.to_string()),
    ];
    metrics::counter!(HTTP_REQUESTS_TOTAL, &labels).increment(1);
    metrics::histogram!(HTTP_REQUEST_DURATION, &labels).record(start.elapsed().as_secs_f64());
}

/// Record the current size of the user store.
pub fn record_user_count(count: usize) {
    metrics::gauge!(USERS_TOTAL).set(count as f64);
}

/// Periodically drain histogram buffers. Runs until the task is aborted.
pub async fn run_upkeep(handle: PrometheusHandle, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);
    loop {
        ticker.tick().await;
        handle.run_upkeep();
    }
}
