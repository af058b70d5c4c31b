//! Outbound station events.
//!
//! Emitted by the sampler, the task spawner and the telemetry loop through
//! the [`EventSink`](super::ports::EventSink) port.

use crate::diagnostics::MetricsSnapshot;
use crate::error::Error;

/// Structured events emitted by the station core.
#[derive(Debug, Clone)]
pub enum StationEvent {
    /// The sampler is running (carries the sample period in ms).
    Started { sample_period_ms: u32 },

    /// Classification went from normal to alert.
    AlertRaised {
        sequence: u32,
        level_pct: f32,
        rainfall_pct: f32,
    },

    /// Classification went from alert back to normal.
    AlertCleared { sequence: u32 },

    /// Periodic telemetry snapshot.
    Telemetry(MetricsSnapshot),

    /// A task stopped because its device failed to attach.
    TaskHalted { task: &'static str, error: Error },
}
