use super::reporter::{StatisticsReporter, TickOutcome};
use crate::domain::errors::SchedulerError;
use crate::domain::ports::{Job, JobId, Scheduler};
use futures::FutureExt;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Owns the periodic reporting job.
///
/// `start` and `stop` may race from any number of threads; the lock covers
/// only the job-id bookkeeping, never a running tick. The first report goes
/// out one full period after `start`.
pub struct ReportingTask {
    reporter: Arc<StatisticsReporter>,
    scheduler: Arc<dyn Scheduler>,
    period: Duration,
    job: Mutex<Option<JobId>>,
}

impl ReportingTask {
    pub fn new(reporter: Arc<StatisticsReporter>, scheduler: Arc<dyn Scheduler>) -> Self {
        let period = reporter.config().interval();
        Self {
            reporter,
            scheduler,
            period,
            job: Mutex::new(None),
        }
    }

    pub fn reporter(&self) -> &Arc<StatisticsReporter> {
        &self.reporter
    }

    pub fn is_running(&self) -> bool {
        self.job.lock().is_some()
    }

    /// Schedule the report job. No-op when already running.
    pub fn start(&self) -> Result<(), SchedulerError> {
        let mut job = self.job.lock();
        if job.is_some() {
            return Ok(());
        }

        let reporter = self.reporter.clone();
        let run: Job = Arc::new(move || {
            let reporter = reporter.clone();
            async move {
                reporter.tick().await;
            }
            .boxed()
        });

        let id = self.scheduler.schedule_repeating(run, self.period, self.period)?;
        *job = Some(id);
        info!(
            "[statistics] Reporting every {:?} as instance {} ({})",
            self.period,
            self.reporter.instance_id(),
            id
        );
        Ok(())
    }

    /// Cancel future runs. A tick already in flight completes. No-op when
    /// already stopped.
    pub fn stop(&self) {
        let mut job = self.job.lock();
        if let Some(id) = job.take() {
            self.scheduler.cancel(id);
            debug!("[statistics] Cancelled {}", id);
        }
    }

    /// Run one report now, on the caller's task
    pub async fn report_now(&self) -> TickOutcome {
        self.reporter.tick().await
    }
}

impl Drop for ReportingTask {
    fn drop(&mut self) {
        self.stop();
    }
}
