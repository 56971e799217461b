use crate::domain::ports::{GaugeAccessor, HostEnvironment};
use std::sync::Arc;
use tracing::{debug, warn};

/// Value reported when no accessor yields a reading
pub const GAUGE_DEFAULT: i64 = 0;

/// Live gauge with its accessors probed once, at construction.
///
/// Reads try the current-API accessor first, then the legacy one, then fall
/// back to `GAUGE_DEFAULT`. A read never fails.
pub struct LiveGauge {
    accessors: Vec<(&'static str, Arc<dyn GaugeAccessor>)>,
    debug: bool,
}

impl LiveGauge {
    pub fn resolve(host: &dyn HostEnvironment, debug: bool) -> Self {
        let accessors: Vec<(&'static str, Arc<dyn GaugeAccessor>)> = [
            ("primary", host.live_gauge()),
            ("legacy", host.legacy_live_gauge()),
        ]
        .into_iter()
        .filter_map(|(label, accessor)| accessor.map(|a| (label, a)))
        .collect();

        if accessors.is_empty() {
            debug!("[statistics] Host exposes no live gauge accessor; reporting {}", GAUGE_DEFAULT);
        }

        Self { accessors, debug }
    }

    pub fn accessor_labels(&self) -> Vec<&'static str> {
        self.accessors.iter().map(|(label, _)| *label).collect()
    }

    pub fn read(&self) -> i64 {
        for (label, accessor) in &self.accessors {
            match accessor.read() {
                Ok(value) => return value,
                Err(e) => debug!("[statistics] {} gauge accessor failed: {}", label, e),
            }
        }
        if self.debug && !self.accessors.is_empty() {
            warn!("[statistics] Unable to get live gauge value, reporting {}", GAUGE_DEFAULT);
        }
        GAUGE_DEFAULT
    }
}
