//! Scheduler backed by a tokio runtime.
//!
//! Each job gets a driver task holding a fixed-rate interval. Every tick is
//! spawned as its own task, so a slow report never shifts the schedule and
//! two ticks can overlap when one outlives the period. Cancelling aborts the
//! driver only; spawned ticks run to completion.

use crate::domain::errors::SchedulerError;
use crate::domain::ports::{Job, JobId, Scheduler};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::debug;

pub struct TokioScheduler {
    handle: Handle,
    drivers: Mutex<HashMap<JobId, JoinHandle<()>>>,
    next_id: AtomicU64,
}

impl TokioScheduler {
    pub fn new(handle: Handle) -> Self {
        Self {
            handle,
            drivers: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Use the runtime the caller is running on
    pub fn current() -> Result<Self, SchedulerError> {
        let handle = Handle::try_current().map_err(|e| SchedulerError::Unavailable {
            reason: e.to_string(),
        })?;
        Ok(Self::new(handle))
    }

    pub fn active_jobs(&self) -> usize {
        self.drivers.lock().len()
    }
}

impl Scheduler for TokioScheduler {
    fn schedule_repeating(
        &self,
        job: Job,
        initial_delay: Duration,
        period: Duration,
    ) -> Result<JobId, SchedulerError> {
        if period.is_zero() {
            return Err(SchedulerError::ZeroPeriod);
        }
        let id = JobId(self.next_id.fetch_add(1, Ordering::SeqCst));

        let driver = self.handle.spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + initial_delay, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Burst);
            loop {
                ticker.tick().await;
                debug!("TokioScheduler: {} tick", id);
                tokio::spawn(job());
            }
        });

        self.drivers.lock().insert(id, driver);
        Ok(id)
    }

    fn cancel(&self, id: JobId) {
        if let Some(driver) = self.drivers.lock().remove(&id) {
            driver.abort();
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        for (_, driver) in self.drivers.lock().drain() {
            driver.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;

    fn counting_job(counter: Arc<AtomicUsize>) -> Job {
        Arc::new(move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
            .boxed()
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_tick_after_initial_delay() {
        let scheduler = TokioScheduler::current().unwrap();
        let counter = Arc::new(AtomicUsize::new(0));
        scheduler
            .schedule_repeating(
                counting_job(counter.clone()),
                Duration::from_secs(10),
                Duration::from_secs(10),
            )
            .unwrap();

        tokio::time::sleep(Duration::from_secs(9)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_secs(20)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_future_ticks() {
        let scheduler = TokioScheduler::current().unwrap();
        let counter = Arc::new(AtomicUsize::new(0));
        let id = scheduler
            .schedule_repeating(
                counting_job(counter.clone()),
                Duration::from_secs(1),
                Duration::from_secs(1),
            )
            .unwrap();

        tokio::time::sleep(Duration::from_millis(1500)).await;
        scheduler.cancel(id);
        scheduler.cancel(id);
        tokio::time::sleep(Duration::from_secs(10)).await;

        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(scheduler.active_jobs(), 0);
    }

    #[test]
    fn test_zero_period_rejected() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let scheduler = TokioScheduler::new(runtime.handle().clone());
        let result = scheduler.schedule_repeating(
            counting_job(Arc::new(AtomicUsize::new(0))),
            Duration::ZERO,
            Duration::ZERO,
        );
        assert!(matches!(result, Err(SchedulerError::ZeroPeriod)));
    }

    #[test]
    fn test_current_outside_runtime_is_unavailable() {
        assert!(matches!(
            TokioScheduler::current(),
            Err(SchedulerError::Unavailable { .. })
        ));
    }
}
