//! Push-based observability for the beacon
//!
//! Counters only; the beacon never opens a listening socket.

pub mod metrics;

pub use metrics::ReporterMetrics;
