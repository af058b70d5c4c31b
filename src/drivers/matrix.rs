//! 5×5 addressable pixel matrix.
//!
//! Every matrix period the whole grid is painted one colour: red on alert,
//! green otherwise. Words are 32-bit with the colour in GRB order in the
//! upper 24 bits, which is how WS2812-style pixels are clocked out.

use log::{debug, warn};

use crate::app::ports::MatrixOutput;
use crate::error::OutputError;
use crate::fanout::ConsumerId;
use crate::sensors::Reading;
use crate::station::Station;

pub const CELL_COUNT: usize = 25;

pub const WORD_RED: u32 = 0x00FF_0000;
pub const WORD_GREEN: u32 = 0xFF00_0000;

pub type Frame = [u32; CELL_COUNT];

/// Pack an RGB triple into a matrix word (`G R B 00`).
pub const fn grb_word(r: u8, g: u8, b: u8) -> u32 {
    ((g as u32) << 24) | ((r as u32) << 16) | ((b as u32) << 8)
}

pub fn frame_for(reading: &Reading) -> Frame {
    [if reading.alert() { WORD_RED } else { WORD_GREEN }; CELL_COUNT]
}

pub struct MatrixDriver<M> {
    output: M,
    last_word: Option<u32>,
}

impl<M: MatrixOutput> MatrixDriver<M> {
    pub fn new(output: M) -> Self {
        Self {
            output,
            last_word: None,
        }
    }

    /// Push a full frame for `reading`.
    pub fn apply(&mut self, reading: &Reading) -> Result<Frame, OutputError> {
        let frame = frame_for(reading);
        for word in frame {
            self.output.push_color(word)?;
        }
        if self.last_word != Some(frame[0]) {
            debug!("matrix: word {:#010x} at seq {}", frame[0], reading.sequence());
            self.last_word = Some(frame[0]);
        }
        Ok(frame)
    }

    pub fn output(&self) -> &M {
        &self.output
    }

    pub async fn run(mut self, station: &Station) {
        let mailbox = station.distributor().mailbox(ConsumerId::Matrix);
        let period = station.config().matrix_period();
        loop {
            if let Some(reading) = mailbox.take_or_last(period).await {
                station.observe(ConsumerId::Matrix, &reading);
                if let Err(e) = self.apply(&reading) {
                    warn!("matrix: {}", e);
                }
            }
            async_io_mini::Timer::after(period).await;
        }
    }
}
