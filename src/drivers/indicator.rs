//! RGB indicator light.
//!
//! Three PWM channels drive discrete R/G/B LEDs. Every indicator period the
//! task takes the latest reading and shows full red on alert, full green
//! otherwise. Blue is always off.
//!
//! Brightness levels are 0–255 and are applied as a fraction of each
//! channel's PWM period, so the driver does not care how the channel's
//! counter is wrapped.

use embedded_hal::pwm::SetDutyCycle;
use log::{debug, warn};

use crate::error::OutputError;
use crate::fanout::ConsumerId;
use crate::sensors::Reading;
use crate::station::Station;

/// Colour as (R, G, B), each 0–255.
pub type Rgb = (u8, u8, u8);

pub const COLOUR_ALERT: Rgb = (255, 0, 0);
pub const COLOUR_NORMAL: Rgb = (0, 255, 0);

pub fn colour_for(reading: &Reading) -> Rgb {
    if reading.alert() { COLOUR_ALERT } else { COLOUR_NORMAL }
}

pub struct IndicatorLight<P> {
    red: P,
    green: P,
    blue: P,
    current: Rgb,
}

impl<P: SetDutyCycle> IndicatorLight<P> {
    pub fn new(red: P, green: P, blue: P) -> Self {
        Self {
            red,
            green,
            blue,
            current: (0, 0, 0),
        }
    }

    pub fn set_colour(&mut self, r: u8, g: u8, b: u8) -> Result<(), OutputError> {
        set_level(&mut self.red, r)?;
        set_level(&mut self.green, g)?;
        set_level(&mut self.blue, b)?;
        self.current = (r, g, b);
        Ok(())
    }

    pub fn off(&mut self) -> Result<(), OutputError> {
        self.set_colour(0, 0, 0)
    }

    /// Show the colour for `reading`.
    pub fn apply(&mut self, reading: &Reading) -> Result<Rgb, OutputError> {
        let (r, g, b) = colour_for(reading);
        if self.current != (r, g, b) {
            debug!("indicator: ({}, {}, {}) at seq {}", r, g, b, reading.sequence());
        }
        self.set_colour(r, g, b)?;
        Ok(self.current)
    }

    pub fn current_colour(&self) -> Rgb {
        self.current
    }

    /// Refresh from the latest reading every indicator period.
    pub async fn run(mut self, station: &Station) {
        let mailbox = station.distributor().mailbox(ConsumerId::Indicator);
        let period = station.config().indicator_period();
        loop {
            if let Some(reading) = mailbox.take_or_last(period).await {
                station.observe(ConsumerId::Indicator, &reading);
                if let Err(e) = self.apply(&reading) {
                    warn!("indicator: {}", e);
                }
            }
            async_io_mini::Timer::after(period).await;
        }
    }
}

fn set_level<P: SetDutyCycle>(channel: &mut P, level: u8) -> Result<(), OutputError> {
    channel
        .set_duty_cycle_fraction(u16::from(level), u16::from(u8::MAX))
        .map_err(|_| OutputError::PwmWriteFailed)
}
