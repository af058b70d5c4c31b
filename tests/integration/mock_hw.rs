//! Mock devices for integration tests.
//!
//! Every mock records what it was asked to do into shared state, so tests
//! can inspect outputs while the task that owns the device runs on another
//! thread.

use std::collections::VecDeque;
use std::convert::Infallible;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use floodwatch::app::events::StationEvent;
use floodwatch::app::ports::{AdcChannel, AnalogInput, DisplayOutput, EventSink, MatrixOutput};
use floodwatch::drivers::display::Screen;
use floodwatch::error::{OutputError, SensorError};

/// Raw samples for level 75.0 % / rain 10.0 % (scenario A).
pub const RAW_FLOOD: (u16, u16) = (3071, 410);
/// Raw samples for level 50.0 % / rain 50.0 % (scenario B).
pub const RAW_QUIET: (u16, u16) = (2048, 2048);

// ── Analog input ─────────────────────────────────────────────

/// Plays back a fixed script of (level, rain) pairs, then repeats the last
/// one. `None` makes the read fail.
pub struct ScriptedAdc {
    script: VecDeque<Option<(u16, u16)>>,
    current: Option<(u16, u16)>,
}

#[allow(dead_code)]
impl ScriptedAdc {
    pub fn new(script: &[Option<(u16, u16)>]) -> Self {
        Self {
            script: script.iter().copied().collect(),
            current: None,
        }
    }

    pub fn constant(pair: (u16, u16)) -> Self {
        Self::new(&[Some(pair)])
    }
}

impl AnalogInput for ScriptedAdc {
    fn read(&mut self, channel: AdcChannel) -> Result<u16, SensorError> {
        if channel == AdcChannel::WaterLevel {
            if let Some(next) = self.script.pop_front() {
                self.current = next;
            }
        }
        let (level, rain) = self.current.ok_or(SensorError::AdcReadFailed)?;
        Ok(match channel {
            AdcChannel::WaterLevel => level,
            AdcChannel::Rainfall => rain,
        })
    }
}

/// Flips between [`RAW_FLOOD`] and [`RAW_QUIET`] on command.
pub struct SwitchAdc {
    flooding: Arc<AtomicBool>,
}

impl SwitchAdc {
    pub fn new(flooding: bool) -> (Self, Arc<AtomicBool>) {
        let flag = Arc::new(AtomicBool::new(flooding));
        (
            Self {
                flooding: flag.clone(),
            },
            flag,
        )
    }
}

impl AnalogInput for SwitchAdc {
    fn read(&mut self, channel: AdcChannel) -> Result<u16, SensorError> {
        let (level, rain) = if self.flooding.load(Ordering::Relaxed) {
            RAW_FLOOD
        } else {
            RAW_QUIET
        };
        Ok(match channel {
            AdcChannel::WaterLevel => level,
            AdcChannel::Rainfall => rain,
        })
    }
}

// ── Display ──────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct RecordingDisplay {
    pub screens: Arc<Mutex<Vec<Screen>>>,
}

#[allow(dead_code)]
impl RecordingDisplay {
    pub fn last(&self) -> Option<Screen> {
        self.screens.lock().unwrap().last().cloned()
    }

    pub fn count(&self) -> usize {
        self.screens.lock().unwrap().len()
    }
}

impl DisplayOutput for RecordingDisplay {
    fn render(&mut self, screen: &Screen) -> Result<(), OutputError> {
        self.screens.lock().unwrap().push(screen.clone());
        Ok(())
    }
}

// ── PWM ──────────────────────────────────────────────────────

/// PWM channel recording every duty written.
#[derive(Clone)]
pub struct RecordingPwm {
    max: u16,
    pub history: Arc<Mutex<Vec<u16>>>,
}

#[allow(dead_code)]
impl RecordingPwm {
    pub fn new(max: u16) -> Self {
        Self {
            max,
            history: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn last(&self) -> Option<u16> {
        self.history.lock().unwrap().last().copied()
    }

    pub fn writes(&self) -> Vec<u16> {
        self.history.lock().unwrap().clone()
    }
}

impl embedded_hal::pwm::ErrorType for RecordingPwm {
    type Error = Infallible;
}

impl embedded_hal::pwm::SetDutyCycle for RecordingPwm {
    fn max_duty_cycle(&self) -> u16 {
        self.max
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        self.history.lock().unwrap().push(duty);
        Ok(())
    }
}

// ── Matrix ───────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct RecordingMatrix {
    pub words: Arc<Mutex<Vec<u32>>>,
    pub fail: Arc<AtomicBool>,
    pub rejected: Arc<AtomicU32>,
}

#[allow(dead_code)]
impl RecordingMatrix {
    /// The most recent complete frame, if any.
    pub fn last_frame(&self, cells: usize) -> Option<Vec<u32>> {
        let words = self.words.lock().unwrap();
        (words.len() >= cells).then(|| words[words.len() - cells..].to_vec())
    }
}

impl MatrixOutput for RecordingMatrix {
    fn push_color(&mut self, word: u32) -> Result<(), OutputError> {
        if self.fail.load(Ordering::Relaxed) {
            self.rejected.fetch_add(1, Ordering::Relaxed);
            return Err(OutputError::MatrixWriteFailed);
        }
        self.words.lock().unwrap().push(word);
        Ok(())
    }
}

// ── Events ───────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct RecordingSink {
    pub events: Arc<Mutex<Vec<StationEvent>>>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn snapshot(&self) -> Vec<StationEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &StationEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}
