use crate::domain::errors::{GaugeError, SchedulerError, TransportError};
use async_trait::async_trait;
use futures::future::BoxFuture;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Descriptive metadata the embedding host exposes
pub trait HostEnvironment: Send + Sync {
    /// Product name, used in the endpoint path
    fn product_name(&self) -> String;
    fn product_version(&self) -> String;
    /// Version string of the host environment itself
    fn environment_version(&self) -> String;

    /// Current-API accessor for the live gauge, `None` if this host lacks it
    fn live_gauge(&self) -> Option<Arc<dyn GaugeAccessor>>;

    /// Accessor older host versions expose instead
    fn legacy_live_gauge(&self) -> Option<Arc<dyn GaugeAccessor>> {
        None
    }
}

/// Reads one live gauge value (e.g. connected users)
pub trait GaugeAccessor: Send + Sync {
    fn read(&self) -> Result<i64, GaugeError>;
}

/// Identifier of a job handed out by a `Scheduler`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JobId(pub u64);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "job-{}", self.0)
    }
}

/// Factory for one run of a repeating job
pub type Job = Arc<dyn Fn() -> BoxFuture<'static, ()> + Send + Sync>;

/// Background scheduler provided by the host.
///
/// Jobs run off the caller's thread. `cancel` stops future runs only; a run
/// already in progress finishes on its own.
pub trait Scheduler: Send + Sync {
    fn schedule_repeating(
        &self,
        job: Job,
        initial_delay: Duration,
        period: Duration,
    ) -> Result<JobId, SchedulerError>;

    fn cancel(&self, id: JobId);
}

/// An outgoing report POST
#[derive(Debug, Clone)]
pub struct ReportRequest {
    pub endpoint: Url,
    pub headers: Vec<(&'static str, String)>,
    pub body: Vec<u8>,
}

impl ReportRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[async_trait]
pub trait ReportTransport: Send + Sync {
    /// Send the request and return the response status code
    async fn post(&self, request: ReportRequest) -> Result<u16, TransportError>;
}
