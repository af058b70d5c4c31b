//! Status display renderer.
//!
//! Event-driven: waits for a fresh reading, composes one of two fixed
//! layouts and hands it to the [`DisplayOutput`]. After each redraw it
//! holds off for the display period so redraws stay throttled no matter
//! how fast the sampler runs.
//!
//! ```text
//! ┌──────────────────────────┐
//! │ Flood detected           │   banner (3 lines,
//! │ Evacuate now             │   layout-dependent)
//! │   EMERGENCY              │
//! ├────────────┬─────────────┤
//! │ Level      │ Rain        │
//! │ 75.0%      │ 10.0%       │
//! └────────────┴─────────────┘
//! ```

use core::fmt::Write;

use log::{info, warn};

use crate::app::ports::DisplayOutput;
use crate::error::OutputError;
use crate::fanout::ConsumerId;
use crate::sensors::Reading;
use crate::station::Station;

pub const LEVEL_LABEL: &str = "Level";
pub const RAIN_LABEL: &str = "Rain";

/// Fits "100.0%".
pub type PercentText = heapless::String<8>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Alert: evacuation banner.
    Emergency,
    /// No alert: idle banner.
    Normal,
}

impl Layout {
    pub fn for_reading(reading: &Reading) -> Self {
        if reading.alert() { Self::Emergency } else { Self::Normal }
    }

    pub const fn banner(self) -> [&'static str; 3] {
        match self {
            Self::Emergency => ["Flood detected", "Evacuate now", "  EMERGENCY"],
            Self::Normal => ["FLOOD WATCH", "Station online", "  Monitoring"],
        }
    }
}

/// One decimal place plus a `%` suffix.
pub fn format_percent(pct: f32) -> PercentText {
    let mut text = PercentText::new();
    // Cannot overflow for values in [0, 100].
    let _ = write!(text, "{:.1}%", pct);
    text
}

/// Everything the display shows for one reading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    pub layout: Layout,
    pub level: PercentText,
    pub rainfall: PercentText,
    pub sequence: u32,
}

impl Screen {
    pub fn compose(reading: &Reading) -> Self {
        Self {
            layout: Layout::for_reading(reading),
            level: format_percent(reading.level_pct()),
            rainfall: format_percent(reading.rainfall_pct()),
            sequence: reading.sequence(),
        }
    }
}

pub struct DisplayRenderer<D> {
    display: D,
    shown: Option<Layout>,
}

impl<D: DisplayOutput> DisplayRenderer<D> {
    pub fn new(display: D) -> Self {
        Self {
            display,
            shown: None,
        }
    }

    /// Compose and draw `reading`. Returns the screen that was drawn.
    pub fn render(&mut self, reading: &Reading) -> Result<Screen, OutputError> {
        let screen = Screen::compose(reading);
        self.display.render(&screen)?;
        if self.shown != Some(screen.layout) {
            info!("display: {:?} layout (seq {})", screen.layout, screen.sequence);
            self.shown = Some(screen.layout);
        }
        Ok(screen)
    }

    pub fn output(&self) -> &D {
        &self.display
    }

    /// Wait for each fresh reading, draw it, then hold for the display period.
    pub async fn run(mut self, station: &Station) {
        let mailbox = station.distributor().mailbox(ConsumerId::Display);
        let hold = station.config().display_period();
        loop {
            let reading = mailbox.take_wait().await;
            station.observe(ConsumerId::Display, &reading);
            if let Err(e) = self.render(&reading) {
                warn!("display: render failed ({})", e);
            }
            async_io_mini::Timer::after(hold).await;
        }
    }
}
