//! Runtime diagnostics.
//!
//! Monitoring-only counters shared between tasks: how many readings were
//! published, how many acquisitions failed, and what each consumer last
//! observed. Every counter has a single writer; the telemetry loop only
//! reads them, so relaxed atomics suffice.

use core::sync::atomic::{AtomicU32, Ordering};

use serde::Serialize;

use crate::fanout::ConsumerId;

#[derive(Default)]
struct ConsumerCounters {
    observed: AtomicU32,
    last_sequence: AtomicU32,
}

#[derive(Default)]
pub struct Metrics {
    acquisition_failures: AtomicU32,
    consumers: [ConsumerCounters; ConsumerId::COUNT],
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one failed acquisition; returns the running total.
    pub fn record_acquisition_failure(&self) -> u32 {
        self.acquisition_failures.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Record that `consumer` acted on the reading with `sequence`.
    ///
    /// Returns `false` if the sequence went backwards, which the fan-out
    /// design rules out.
    pub fn record_observed(&self, consumer: ConsumerId, sequence: u32) -> bool {
        let c = &self.consumers[consumer as usize];
        let seen_before = c.observed.fetch_add(1, Ordering::Relaxed) > 0;
        let previous = c.last_sequence.swap(sequence, Ordering::Relaxed);
        !(seen_before && sequence < previous)
    }

    pub fn snapshot(&self, published: u32, uptime_secs: u64) -> MetricsSnapshot {
        MetricsSnapshot {
            uptime_secs,
            published,
            acquisition_failures: self.acquisition_failures.load(Ordering::Relaxed),
            consumers: ConsumerId::ALL.map(|id| {
                let c = &self.consumers[id as usize];
                ConsumerSnapshot {
                    consumer: id,
                    observed: c.observed.load(Ordering::Relaxed),
                    last_sequence: c.last_sequence.load(Ordering::Relaxed),
                }
            }),
        }
    }
}

/// Point-in-time copy of [`Metrics`], suitable for logging as JSON.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub uptime_secs: u64,
    pub published: u32,
    pub acquisition_failures: u32,
    pub consumers: [ConsumerSnapshot; ConsumerId::COUNT],
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ConsumerSnapshot {
    pub consumer: ConsumerId,
    pub observed: u32,
    pub last_sequence: u32,
}

impl MetricsSnapshot {
    /// Largest gap between the newest published sequence and what a
    /// consumer last acted on.
    pub fn max_lag(&self) -> u32 {
        let newest = self.published.saturating_sub(1);
        self.consumers
            .iter()
            .filter(|c| c.observed > 0)
            .map(|c| newest.saturating_sub(c.last_sequence))
            .max()
            .unwrap_or(0)
    }
}
