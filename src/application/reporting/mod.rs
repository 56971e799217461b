//! Periodic statistics reporting.
//!
//! - **LiveGauge**: live metric with primary/legacy accessors probed once
//! - **StatisticsReporter**: one tick (gather, encode, POST, log)
//! - **ReportingTask**: start/stop lifecycle around the host scheduler

pub mod gauge;
pub mod reporter;
pub mod task;

pub use gauge::LiveGauge;
pub use reporter::{StatisticsReporter, TickOutcome};
pub use task::ReportingTask;
