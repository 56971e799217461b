//! Prometheus counters for the statistics beacon
//!
//! All metrics use the `beacon_` prefix. Nothing is served; the host may
//! call `render()` and ship the text wherever it likes.

use prometheus::{Gauge, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::Arc;

#[derive(Clone)]
pub struct ReporterMetrics {
    registry: Arc<Registry>,
    /// Reports the collector answered with 200
    pub reports_sent: IntCounter,
    /// Ticks that ended early or got a non-200, by stage
    pub reports_failed: IntCounterVec,
    /// Last HTTP status seen, 0 before the first response
    pub last_status_code: Gauge,
}

impl ReporterMetrics {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let reports_sent = IntCounter::with_opts(Opts::new(
            "beacon_reports_sent_total",
            "Reports accepted by the collector",
        ))?;
        registry.register(Box::new(reports_sent.clone()))?;

        let reports_failed = IntCounterVec::new(
            Opts::new(
                "beacon_reports_failed_total",
                "Reports that were not accepted, by failing stage",
            ),
            &["stage"],
        )?;
        registry.register(Box::new(reports_failed.clone()))?;

        let last_status_code = Gauge::with_opts(Opts::new(
            "beacon_last_status_code",
            "HTTP status of the most recent report",
        ))?;
        registry.register(Box::new(last_status_code.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            reports_sent,
            reports_failed,
            last_status_code,
        })
    }

    /// Render all metrics in Prometheus text format
    pub fn render(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        encoder
            .encode_to_string(&metric_families)
            .unwrap_or_default()
    }

    pub fn record_status(&self, status: u16) {
        self.last_status_code.set(f64::from(status));
        if status == 200 {
            self.reports_sent.inc();
        } else {
            self.inc_failed("status");
        }
    }

    pub fn inc_failed(&self, stage: &str) {
        self.reports_failed.with_label_values(&[stage]).inc();
    }
}
