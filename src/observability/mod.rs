//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Every request:
//!     → request id assigned (http::request)
//!     → span + structured events (logging.rs)
//!     → counters, gauges, histograms (metrics.rs)
//!
//! Consumers:
//!     → Log aggregation (stdout, JSON lines)
//!     → Metrics endpoint (Prometheus scrape of /metrics)
//! ```

pub mod logging;
pub mod metrics;
