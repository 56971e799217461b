use anyhow::{Context, Result};
use std::sync::Arc;

use crate::application::reporting::{ReportingTask, StatisticsReporter};
use crate::config::ReporterConfig;
use crate::domain::ports::{HostEnvironment, ReportTransport, Scheduler};
use crate::infrastructure::http_transport::HttpTransport;
use crate::infrastructure::observability::ReporterMetrics;
use crate::infrastructure::scheduler::TokioScheduler;

pub struct BeaconBootstrap;

impl BeaconBootstrap {
    /// Wire a task with the reqwest transport and the caller's tokio runtime.
    /// Nothing is scheduled until `start()`.
    pub fn init(host: Arc<dyn HostEnvironment>, config: ReporterConfig) -> Result<ReportingTask> {
        let scheduler =
            TokioScheduler::current().context("Statistics beacon needs a tokio runtime")?;
        let transport = HttpTransport::from_config(&config);
        Self::init_with(host, Arc::new(transport), Arc::new(scheduler), config)
    }

    pub fn init_with(
        host: Arc<dyn HostEnvironment>,
        transport: Arc<dyn ReportTransport>,
        scheduler: Arc<dyn Scheduler>,
        config: ReporterConfig,
    ) -> Result<ReportingTask> {
        config.validate()?;
        let metrics = ReporterMetrics::new().context("Failed to register beacon metrics")?;
        let reporter = StatisticsReporter::new(host, transport, metrics, config);
        Ok(ReportingTask::new(Arc::new(reporter), scheduler))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::mock::{ManualScheduler, MockHost, MockTransport};

    #[test]
    fn test_init_outside_runtime_fails() {
        let host = Arc::new(MockHost::new("Demo"));
        let result = BeaconBootstrap::init(host, ReporterConfig::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_init_with_rejects_invalid_config() {
        let config = ReporterConfig {
            interval_secs: 0,
            ..ReporterConfig::default()
        };
        let result = BeaconBootstrap::init_with(
            Arc::new(MockHost::new("Demo")),
            Arc::new(MockTransport::responding(200)),
            Arc::new(ManualScheduler::new()),
            config,
        );
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_init_inside_runtime_starts_stopped() {
        let task = BeaconBootstrap::init(Arc::new(MockHost::new("Demo")), ReporterConfig::default())
            .expect("runtime is available");
        assert!(!task.is_running());
    }
}
