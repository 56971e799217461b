//! Statistics beacon for embedding in a host application.
//!
//! Every hour (by default) the beacon gathers an instance id, the product and
//! environment versions, and a live gauge, encodes them as compact JSON and
//! POSTs them to a collection endpoint. Failures are logged and dropped; the
//! host is never blocked or interrupted.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use application::bootstrap::BeaconBootstrap;
pub use application::reporting::{ReportingTask, StatisticsReporter, TickOutcome};
pub use config::ReporterConfig;
