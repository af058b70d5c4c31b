//! Station configuration parameters.
//!
//! Thresholds and task periods are compile-time constants; there is no
//! configuration file. [`StationConfig`] bundles the timing constants so the
//! running station carries one validated copy and can report it at boot.
//! The alert thresholds are not part of it: they define [`Reading`]'s
//! classification and cannot vary per station.
//!
//! [`Reading`]: crate::sensors::Reading

use core::time::Duration;

use serde::Serialize;

/// Water level (%) at or above which the station raises an alert.
pub const LEVEL_THRESHOLD: f32 = 70.0;
/// Rainfall volume (%) at or above which the station raises an alert.
pub const RAIN_THRESHOLD: f32 = 80.0;

/// Sensor sampling period.
pub const SAMPLE_PERIOD_MS: u32 = 100;
/// Minimum delay between display redraws.
pub const DISPLAY_PERIOD_MS: u32 = 500;
/// RGB indicator refresh period.
pub const INDICATOR_PERIOD_MS: u32 = 200;
/// LED matrix refresh period.
pub const MATRIX_PERIOD_MS: u32 = 500;

/// Buzzer on-time during a beep.
pub const ALARM_ON_MS: u32 = 200;
/// Buzzer off-time between beeps.
pub const ALARM_OFF_MS: u32 = 300;
/// Alarm poll period while silent.
pub const ALARM_IDLE_POLL_MS: u32 = 500;
/// Buzzer duty (percent of the tone PWM period) while beeping.
pub const ALARM_DUTY_PERCENT: u8 = 50;

/// Telemetry report interval.
pub const TELEMETRY_INTERVAL_SECS: u32 = 10;

/// Core station configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StationConfig {
    // --- Task periods ---
    pub sample_period_ms: u32,
    pub display_period_ms: u32,
    pub indicator_period_ms: u32,
    pub matrix_period_ms: u32,

    // --- Alarm cadence ---
    pub alarm_on_ms: u32,
    pub alarm_off_ms: u32,
    pub alarm_idle_poll_ms: u32,
    pub alarm_duty_percent: u8,

    // --- Telemetry ---
    pub telemetry_interval_secs: u32,
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            sample_period_ms: SAMPLE_PERIOD_MS,       // 10 Hz
            display_period_ms: DISPLAY_PERIOD_MS,     // 2 Hz
            indicator_period_ms: INDICATOR_PERIOD_MS, // 5 Hz
            matrix_period_ms: MATRIX_PERIOD_MS,       // 2 Hz

            alarm_on_ms: ALARM_ON_MS,
            alarm_off_ms: ALARM_OFF_MS,
            alarm_idle_poll_ms: ALARM_IDLE_POLL_MS,
            alarm_duty_percent: ALARM_DUTY_PERCENT,

            telemetry_interval_secs: TELEMETRY_INTERVAL_SECS,
        }
    }
}

impl StationConfig {
    /// Check the invariants every task relies on.
    pub fn validate(&self) -> Result<(), &'static str> {
        let periods = [
            self.sample_period_ms,
            self.display_period_ms,
            self.indicator_period_ms,
            self.matrix_period_ms,
            self.alarm_on_ms,
            self.alarm_off_ms,
            self.alarm_idle_poll_ms,
        ];
        if periods.contains(&0) {
            return Err("task periods must be non-zero");
        }
        // A cleared alert must silence the buzzer within one idle poll.
        if self.alarm_on_ms.max(self.alarm_off_ms) > self.alarm_idle_poll_ms {
            return Err("alarm hold exceeds idle poll period");
        }
        if self.alarm_duty_percent > 100 {
            return Err("alarm duty must be <= 100%");
        }
        if self.telemetry_interval_secs == 0 {
            return Err("telemetry interval must be non-zero");
        }
        Ok(())
    }

    pub fn sample_period(&self) -> Duration {
        ms(self.sample_period_ms)
    }

    pub fn display_period(&self) -> Duration {
        ms(self.display_period_ms)
    }

    pub fn indicator_period(&self) -> Duration {
        ms(self.indicator_period_ms)
    }

    pub fn matrix_period(&self) -> Duration {
        ms(self.matrix_period_ms)
    }

    pub fn telemetry_interval(&self) -> Duration {
        Duration::from_secs(u64::from(self.telemetry_interval_secs))
    }
}

fn ms(v: u32) -> Duration {
    Duration::from_millis(u64::from(v))
}
