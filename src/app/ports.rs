//! Port traits: the boundary between the station core and its devices.
//!
//! ```text
//!   AnalogInput ──▶ SensorSampler ──▶ Distributor ──▶ consumers ──▶ outputs
//! ```
//!
//! Device adapters implement these traits; the sampler and consumer tasks
//! take them via generics, so the core never touches hardware directly.
//! PWM-driven outputs (RGB brightness, buzzer tone) use
//! [`embedded_hal::pwm::SetDutyCycle`] directly instead of a local trait.

use crate::drivers::display::Screen;
use crate::error::{OutputError, SensorError};
use crate::pins;

// ───────────────────────────────────────────────────────────────
// Analog input (driven adapter: hardware → sampler)
// ───────────────────────────────────────────────────────────────

/// The two simulated sensor axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdcChannel {
    WaterLevel,
    Rainfall,
}

impl AdcChannel {
    /// ADC mux input selected for this channel.
    pub const fn input(self) -> u8 {
        match self {
            Self::WaterLevel => pins::WATER_LEVEL_ADC_INPUT,
            Self::Rainfall => pins::RAINFALL_ADC_INPUT,
        }
    }
}

/// Raw 12-bit analog sampling.
pub trait AnalogInput {
    /// Sample one channel. Expected range is `[0, 4095]`.
    fn read(&mut self, channel: AdcChannel) -> Result<u16, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Display (driven adapter: renderer → screen)
// ───────────────────────────────────────────────────────────────

/// Opaque, synchronous screen renderer.
pub trait DisplayOutput {
    fn render(&mut self, screen: &Screen) -> Result<(), OutputError>;
}

// ───────────────────────────────────────────────────────────────
// LED matrix (driven adapter: matrix driver → serial stream)
// ───────────────────────────────────────────────────────────────

/// Serial command stream of the pixel matrix. One word per cell.
pub trait MatrixOutput {
    fn push_color(&mut self, word: u32) -> Result<(), OutputError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink (driven adapter: core → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The core emits structured [`StationEvent`](super::events::StationEvent)s
/// through this port. Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::StationEvent);
}
