//! In-memory collaborators for tests and the demo host.

use crate::domain::errors::{GaugeError, SchedulerError, TransportError};
use crate::domain::ports::{
    GaugeAccessor, HostEnvironment, Job, JobId, ReportRequest, ReportTransport, Scheduler,
};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;
use tracing::info;

/// Host with fixed metadata and optional gauge accessors
#[derive(Clone)]
pub struct MockHost {
    name: String,
    product_version: String,
    environment_version: String,
    gauge: Option<Arc<dyn GaugeAccessor>>,
    legacy_gauge: Option<Arc<dyn GaugeAccessor>>,
}

impl MockHost {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            product_version: "0.0.0".to_string(),
            environment_version: "mock".to_string(),
            gauge: None,
            legacy_gauge: None,
        }
    }

    pub fn with_versions(mut self, product_version: &str, environment_version: &str) -> Self {
        self.product_version = product_version.to_string();
        self.environment_version = environment_version.to_string();
        self
    }

    pub fn with_gauge(mut self, gauge: impl GaugeAccessor + 'static) -> Self {
        self.gauge = Some(Arc::new(gauge));
        self
    }

    pub fn with_legacy_gauge(mut self, gauge: impl GaugeAccessor + 'static) -> Self {
        self.legacy_gauge = Some(Arc::new(gauge));
        self
    }
}

impl HostEnvironment for MockHost {
    fn product_name(&self) -> String {
        self.name.clone()
    }

    fn product_version(&self) -> String {
        self.product_version.clone()
    }

    fn environment_version(&self) -> String {
        self.environment_version.clone()
    }

    fn live_gauge(&self) -> Option<Arc<dyn GaugeAccessor>> {
        self.gauge.clone()
    }

    fn legacy_live_gauge(&self) -> Option<Arc<dyn GaugeAccessor>> {
        self.legacy_gauge.clone()
    }
}

pub struct FixedGauge(Result<i64, String>);

impl FixedGauge {
    pub fn ok(value: i64) -> Self {
        Self(Ok(value))
    }

    pub fn failing(reason: &str) -> Self {
        Self(Err(reason.to_string()))
    }
}

impl GaugeAccessor for FixedGauge {
    fn read(&self) -> Result<i64, GaugeError> {
        self.0.clone().map_err(GaugeError)
    }
}

/// Gauge whose value can be changed while the reporter runs
#[derive(Clone, Default)]
pub struct SharedGauge(Arc<AtomicI64>);

impl SharedGauge {
    pub fn set(&self, value: i64) {
        self.0.store(value, Ordering::Relaxed);
    }
}

impl GaugeAccessor for SharedGauge {
    fn read(&self) -> Result<i64, GaugeError> {
        Ok(self.0.load(Ordering::Relaxed))
    }
}

type ErrorFactory = Box<dyn Fn() -> TransportError + Send + Sync>;

/// Transport that records every request and answers from a script
pub struct MockTransport {
    response: Result<u16, ErrorFactory>,
    requests: Mutex<Vec<ReportRequest>>,
    attempts: AtomicUsize,
    log_requests: bool,
}

impl MockTransport {
    pub fn responding(status: u16) -> Self {
        Self {
            response: Ok(status),
            requests: Mutex::new(Vec::new()),
            attempts: AtomicUsize::new(0),
            log_requests: false,
        }
    }

    pub fn failing<F>(error: F) -> Self
    where
        F: Fn() -> TransportError + Send + Sync + 'static,
    {
        Self {
            response: Err(Box::new(error)),
            requests: Mutex::new(Vec::new()),
            attempts: AtomicUsize::new(0),
            log_requests: false,
        }
    }

    /// Also log each request body at info level
    pub fn logging(mut self) -> Self {
        self.log_requests = true;
        self
    }

    pub fn requests(&self) -> Vec<ReportRequest> {
        self.requests.lock().clone()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReportTransport for MockTransport {
    async fn post(&self, request: ReportRequest) -> Result<u16, TransportError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.log_requests {
            info!(
                "MockTransport: POST {} {}",
                request.endpoint,
                String::from_utf8_lossy(&request.body)
            );
        }
        self.requests.lock().push(request);
        match &self.response {
            Ok(status) => Ok(*status),
            Err(make_error) => Err(make_error()),
        }
    }
}

struct ScheduledJob {
    job: Job,
    initial_delay: Duration,
    period: Duration,
}

/// Scheduler that only runs jobs when told to
#[derive(Default)]
pub struct ManualScheduler {
    jobs: Mutex<HashMap<JobId, ScheduledJob>>,
    next_id: AtomicU64,
    scheduled: AtomicUsize,
    refuse_next: AtomicBool,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `schedule_repeating` call fail
    pub fn refuse_next(&self) {
        self.refuse_next.store(true, Ordering::SeqCst);
    }

    /// Total successful `schedule_repeating` calls
    pub fn scheduled_count(&self) -> usize {
        self.scheduled.load(Ordering::SeqCst)
    }

    pub fn active_jobs(&self) -> Vec<JobId> {
        let mut ids: Vec<JobId> = self.jobs.lock().keys().copied().collect();
        ids.sort_by_key(|id| id.0);
        ids
    }

    /// `(initial_delay, period)` of an active job
    pub fn timing(&self, id: JobId) -> Option<(Duration, Duration)> {
        self.jobs
            .lock()
            .get(&id)
            .map(|j| (j.initial_delay, j.period))
    }

    /// Run one tick of `id` to completion. Does nothing for a cancelled job.
    pub async fn fire(&self, id: JobId) {
        let job = self.jobs.lock().get(&id).map(|j| j.job.clone());
        if let Some(job) = job {
            job().await;
        }
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_repeating(
        &self,
        job: Job,
        initial_delay: Duration,
        period: Duration,
    ) -> Result<JobId, SchedulerError> {
        if self.refuse_next.swap(false, Ordering::SeqCst) {
            return Err(SchedulerError::Unavailable {
                reason: "refused by test".to_string(),
            });
        }
        if period.is_zero() {
            return Err(SchedulerError::ZeroPeriod);
        }
        let id = JobId(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.jobs.lock().insert(
            id,
            ScheduledJob {
                job,
                initial_delay,
                period,
            },
        );
        self.scheduled.fetch_add(1, Ordering::SeqCst);
        Ok(id)
    }

    fn cancel(&self, id: JobId) {
        self.jobs.lock().remove(&id);
    }
}
