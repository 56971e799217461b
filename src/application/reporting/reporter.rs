//! One reporting tick: gather, encode, POST, log.
//!
//! Every step returns a `Result`; `tick` is the only place outcomes are
//! inspected, and it never lets an error out.

use super::gauge::LiveGauge;
use crate::config::ReporterConfig;
use crate::domain::errors::{EncodingError, ReportError};
use crate::domain::json;
use crate::domain::ports::{HostEnvironment, ReportRequest, ReportTransport};
use crate::domain::snapshot::ReportSnapshot;
use crate::infrastructure::observability::ReporterMetrics;
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;
use url::form_urlencoded;
use uuid::Uuid;

pub const SUCCESS_STATUS: u16 = 200;

/// How a tick ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Accepted,
    Rejected { status: u16 },
    Failed { stage: &'static str },
}

pub struct StatisticsReporter {
    host: Arc<dyn HostEnvironment>,
    transport: Arc<dyn ReportTransport>,
    gauge: LiveGauge,
    metrics: ReporterMetrics,
    config: ReporterConfig,
    instance_id: Uuid,
}

impl StatisticsReporter {
    /// Create a reporter with a fresh random instance id.
    ///
    /// The host's gauge accessors are probed here, once.
    pub fn new(
        host: Arc<dyn HostEnvironment>,
        transport: Arc<dyn ReportTransport>,
        metrics: ReporterMetrics,
        config: ReporterConfig,
    ) -> Self {
        let gauge = LiveGauge::resolve(host.as_ref(), config.debug);
        Self {
            host,
            transport,
            gauge,
            metrics,
            config,
            instance_id: Uuid::new_v4(),
        }
    }

    pub fn instance_id(&self) -> Uuid {
        self.instance_id
    }

    pub fn metrics(&self) -> &ReporterMetrics {
        &self.metrics
    }

    pub fn config(&self) -> &ReporterConfig {
        &self.config
    }

    pub fn snapshot(&self) -> ReportSnapshot {
        ReportSnapshot {
            instance_id: self.instance_id.to_string(),
            product_version: self.host.product_version(),
            environment_version: self.host.environment_version(),
            live_metric: self.gauge.read(),
        }
    }

    /// `<endpoint_base>/<form-encoded product name>/post`
    pub fn endpoint(&self, product_name: &str) -> Result<Url, url::ParseError> {
        let encoded: String = form_urlencoded::byte_serialize(product_name.as_bytes()).collect();
        Url::parse(&format!(
            "{}/{}/post",
            self.config.endpoint_base.trim_end_matches('/'),
            encoded
        ))
    }

    pub fn build_request(&self, snapshot: &ReportSnapshot) -> Result<ReportRequest, ReportError> {
        let endpoint = self.endpoint(&self.host.product_name())?;
        let body = json::to_vec(&snapshot.to_object())?;

        let mut headers = vec![
            ("Accept", "*/*".to_string()),
            ("Content-Length", body.len().to_string()),
            ("Content-Type", "application/json".to_string()),
        ];
        if self.config.declare_gzip_encoding {
            // Body stays uncompressed; see ReporterConfig::declare_gzip_encoding
            headers.push(("Content-Encoding", "gzip".to_string()));
        }
        headers.push(("Connection", "close".to_string()));
        headers.push(("User-Agent", self.config.user_agent.clone()));

        Ok(ReportRequest {
            endpoint,
            headers,
            body,
        })
    }

    async fn submit(&self, snapshot: &ReportSnapshot) -> Result<u16, ReportError> {
        let request = self.build_request(snapshot)?;
        debug!(
            "[statistics] Posting {} bytes to {}",
            request.body.len(),
            request.endpoint
        );
        let status = self.transport.post(request).await?;
        Ok(status)
    }

    /// Run one report. Never fails; every problem is logged and counted.
    pub async fn tick(&self) -> TickOutcome {
        let snapshot = self.snapshot();

        let status = match self.submit(&snapshot).await {
            Ok(status) => status,
            Err(e) => {
                self.metrics.inc_failed(e.stage());
                self.log_soft_failure(&e);
                return TickOutcome::Failed { stage: e.stage() };
            }
        };

        self.metrics.record_status(status);
        if status == SUCCESS_STATUS {
            debug!("[statistics] Report accepted");
            return TickOutcome::Accepted;
        }

        if self.config.debug {
            warn!("[statistics] Service returned non-OK response code: {}", status);
            match Self::rejection_diagnostic(&snapshot) {
                Ok(line) => info!("[statistics] {}", line),
                Err(e) => warn!(
                    "[statistics] Failed to re-encode data \
                     (to show the POST request which caused the error): {}",
                    e
                ),
            }
        }
        TickOutcome::Rejected { status }
    }

    /// Re-encode the rejected payload for the non-OK diagnostic line
    pub fn rejection_diagnostic(snapshot: &ReportSnapshot) -> Result<String, EncodingError> {
        let payload = json::to_string(&snapshot.to_object())?;
        Ok(format!("POST data which caused this error: {}", payload))
    }

    fn log_soft_failure(&self, error: &ReportError) {
        if self.config.debug {
            warn!("[statistics] {}", error);
        } else {
            debug!("[statistics] {}", error);
        }
    }
}
