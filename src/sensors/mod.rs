//! Sensor subsystem: the [`Reading`] snapshot and the [`SensorSampler`]
//! that produces one every sample period.
//!
//! A reading is classified at construction: `alert` is derived from the
//! two percentages and cannot be set independently.

pub mod sampler;

pub use sampler::SensorSampler;

use crate::config::{LEVEL_THRESHOLD, RAIN_THRESHOLD};

/// Full-scale value of the 12-bit ADC.
pub const ADC_MAX: u16 = 4095;

/// Linear map of a raw 12-bit sample onto `[0, 100]` percent.
///
/// Values above [`ADC_MAX`] saturate at 100 %; the sampler rejects them
/// before they get here.
pub fn raw_to_percent(raw: u16) -> f32 {
    let raw = raw.min(ADC_MAX);
    (f32::from(raw) / f32::from(ADC_MAX)) * 100.0
}

/// Flood-risk classification.
pub fn is_alert(level_pct: f32, rainfall_pct: f32) -> bool {
    level_pct >= LEVEL_THRESHOLD || rainfall_pct >= RAIN_THRESHOLD
}

/// Immutable snapshot of one sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    level_pct: f32,
    rainfall_pct: f32,
    alert: bool,
    sequence: u32,
}

impl Reading {
    /// Pre-seeded value every mailbox holds before the first sample.
    pub const INITIAL: Self = Self {
        level_pct: 0.0,
        rainfall_pct: 0.0,
        alert: false,
        sequence: 0,
    };

    pub fn new(level_pct: f32, rainfall_pct: f32, sequence: u32) -> Self {
        let level_pct = level_pct.clamp(0.0, 100.0);
        let rainfall_pct = rainfall_pct.clamp(0.0, 100.0);
        Self {
            level_pct,
            rainfall_pct,
            alert: is_alert(level_pct, rainfall_pct),
            sequence,
        }
    }

    /// Build a reading straight from two raw ADC samples.
    pub fn from_raw(level_raw: u16, rainfall_raw: u16, sequence: u32) -> Self {
        Self::new(raw_to_percent(level_raw), raw_to_percent(rainfall_raw), sequence)
    }

    pub fn level_pct(&self) -> f32 {
        self.level_pct
    }

    pub fn rainfall_pct(&self) -> f32 {
        self.rainfall_pct
    }

    pub fn alert(&self) -> bool {
        self.alert
    }

    pub fn sequence(&self) -> u32 {
        self.sequence
    }
}

impl Default for Reading {
    fn default() -> Self {
        Self::INITIAL
    }
}
