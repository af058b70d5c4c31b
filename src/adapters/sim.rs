//! Host-side simulated devices.
//!
//! Stand-ins for the station's peripherals so the full task graph runs on
//! a workstation. Output adapters publish what they were last told to do
//! through cheap shared probes, which the telemetry loop and tests read
//! from other threads.

use core::convert::Infallible;
use core::sync::atomic::{AtomicU16, AtomicU32, Ordering};
use std::sync::Arc;

use log::debug;

use crate::app::ports::{AdcChannel, AnalogInput, DisplayOutput, MatrixOutput};
use crate::drivers::display::{LEVEL_LABEL, RAIN_LABEL, Screen};
use crate::error::{OutputError, SensorError};
use crate::sensors::ADC_MAX;

// ── Analog input ─────────────────────────────────────────────

/// Simulated joystick: each axis sweeps a triangle wave over the full
/// 12-bit range. The two axes use different periods so alert episodes
/// (and their overlaps) drift over time.
pub struct SweepAnalog {
    level_period: u32,
    rain_period: u32,
    tick: u32,
}

impl SweepAnalog {
    /// Periods are in samples of the water-level channel.
    pub fn new(level_period: u32, rain_period: u32) -> Self {
        Self {
            level_period: level_period.max(2),
            rain_period: rain_period.max(2),
            tick: 0,
        }
    }
}

impl Default for SweepAnalog {
    /// ~24 s and ~37 s sweeps at the default sample period.
    fn default() -> Self {
        Self::new(240, 370)
    }
}

impl AnalogInput for SweepAnalog {
    fn read(&mut self, channel: AdcChannel) -> Result<u16, SensorError> {
        let raw = match channel {
            AdcChannel::WaterLevel => {
                self.tick = self.tick.wrapping_add(1);
                triangle(self.tick, self.level_period)
            }
            AdcChannel::Rainfall => triangle(self.tick, self.rain_period),
        };
        Ok(raw)
    }
}

/// Triangle wave 0 → ADC_MAX → 0 over `period` ticks.
fn triangle(tick: u32, period: u32) -> u16 {
    let half = u64::from(period / 2).max(1);
    let phase = u64::from(tick % period);
    let distance = if phase <= half { phase } else { u64::from(period) - phase };
    let raw = (distance.min(half) * u64::from(ADC_MAX)) / half;
    u16::try_from(raw).unwrap_or(ADC_MAX)
}

// ── PWM channel ──────────────────────────────────────────────

/// In-memory PWM channel. The duty is mirrored into a shared atomic that a
/// [`PwmProbe`] can read.
pub struct SimPwm {
    max: u16,
    duty: Arc<AtomicU16>,
}

/// Read side of a [`SimPwm`].
#[derive(Clone)]
pub struct PwmProbe {
    max: u16,
    duty: Arc<AtomicU16>,
}

impl SimPwm {
    pub fn new(max: u16) -> (Self, PwmProbe) {
        let duty = Arc::new(AtomicU16::new(0));
        (
            Self {
                max,
                duty: duty.clone(),
            },
            PwmProbe { max, duty },
        )
    }
}

impl PwmProbe {
    pub fn duty(&self) -> u16 {
        self.duty.load(Ordering::Relaxed)
    }

    pub fn max(&self) -> u16 {
        self.max
    }

    /// Current duty as 0–255 brightness.
    pub fn level(&self) -> u8 {
        let scaled = u32::from(self.duty()) * u32::from(u8::MAX) / u32::from(self.max.max(1));
        u8::try_from(scaled).unwrap_or(u8::MAX)
    }
}

impl embedded_hal::pwm::ErrorType for SimPwm {
    type Error = Infallible;
}

impl embedded_hal::pwm::SetDutyCycle for SimPwm {
    fn max_duty_cycle(&self) -> u16 {
        self.max
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        self.duty.store(duty.min(self.max), Ordering::Relaxed);
        Ok(())
    }
}

// ── Display ──────────────────────────────────────────────────

/// Writes each composed screen to the log at debug level.
#[derive(Default)]
pub struct LogDisplay {
    frames: u32,
}

impl LogDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> u32 {
        self.frames
    }
}

impl DisplayOutput for LogDisplay {
    fn render(&mut self, screen: &Screen) -> Result<(), OutputError> {
        self.frames = self.frames.wrapping_add(1);
        let [l1, l2, l3] = screen.layout.banner();
        debug!(
            "LCD | {} / {} / {} | {} {} | {} {}",
            l1,
            l2,
            l3.trim(),
            LEVEL_LABEL,
            screen.level,
            RAIN_LABEL,
            screen.rainfall
        );
        Ok(())
    }
}

// ── Pixel matrix ─────────────────────────────────────────────

/// Counts pushed words and remembers the last one.
pub struct SimMatrix {
    probe: MatrixProbe,
}

#[derive(Clone, Default)]
pub struct MatrixProbe {
    last_word: Arc<AtomicU32>,
    words: Arc<AtomicU32>,
}

impl SimMatrix {
    pub fn new() -> (Self, MatrixProbe) {
        let probe = MatrixProbe::default();
        (
            Self {
                probe: probe.clone(),
            },
            probe,
        )
    }
}

impl MatrixProbe {
    pub fn last_word(&self) -> u32 {
        self.last_word.load(Ordering::Relaxed)
    }

    pub fn words_pushed(&self) -> u32 {
        self.words.load(Ordering::Relaxed)
    }
}

impl MatrixOutput for SimMatrix {
    fn push_color(&mut self, word: u32) -> Result<(), OutputError> {
        self.probe.last_word.store(word, Ordering::Relaxed);
        self.probe.words.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}
