//! Audible alarm: buzzer cadence state machine.
//!
//! ```text
//!            alert                 alert
//!  ┌────────┐ ───▶ ┌────────┐ ───▶ ┌─────────┐
//!  │ Silent │      │ BeepOn │      │ BeepOff │
//!  │ 0%     │ ◀─── │ 50%    │ ◀─── │ 0%      │
//!  │ 500 ms │ !alert 200 ms │ alert│ 300 ms  │
//!  └────────┘ ◀────────────────────└─────────┘
//!                       !alert
//! ```
//!
//! The latest reading is sampled at every state boundary, so a cleared
//! alert silences the buzzer after at most one hold (≤ the idle poll).
//!
//! The machine itself is clock-free: [`AlarmStateMachine::step`] returns the
//! duty to apply and how long to hold it, and the task loop does the
//! sleeping. That keeps the cadence testable without timers.

use core::time::Duration;

use embedded_hal::pwm::SetDutyCycle;
use log::{info, warn};

use crate::config::StationConfig;
use crate::error::OutputError;
use crate::fanout::ConsumerId;
use crate::station::Station;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlarmState {
    Silent,
    BeepOn,
    BeepOff,
}

/// Output of one state boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub state: AlarmState,
    /// Tone duty as a percentage of the PWM period.
    pub duty_percent: u8,
    pub hold: Duration,
}

/// Beep timing and loudness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlarmCadence {
    pub on: Duration,
    pub off: Duration,
    pub idle_poll: Duration,
    pub duty_percent: u8,
}

impl AlarmCadence {
    pub fn from_config(config: &StationConfig) -> Self {
        Self {
            on: Duration::from_millis(u64::from(config.alarm_on_ms)),
            off: Duration::from_millis(u64::from(config.alarm_off_ms)),
            idle_poll: Duration::from_millis(u64::from(config.alarm_idle_poll_ms)),
            duty_percent: config.alarm_duty_percent,
        }
    }
}

impl Default for AlarmCadence {
    fn default() -> Self {
        Self::from_config(&StationConfig::default())
    }
}

pub struct AlarmStateMachine {
    state: AlarmState,
    cadence: AlarmCadence,
}

impl AlarmStateMachine {
    pub fn new(cadence: AlarmCadence) -> Self {
        Self {
            state: AlarmState::Silent,
            cadence,
        }
    }

    pub fn state(&self) -> AlarmState {
        self.state
    }

    /// Advance one boundary given the latest alert flag.
    pub fn step(&mut self, alert: bool) -> Step {
        self.state = match (self.state, alert) {
            (_, false) => AlarmState::Silent,
            (AlarmState::Silent | AlarmState::BeepOff, true) => AlarmState::BeepOn,
            (AlarmState::BeepOn, true) => AlarmState::BeepOff,
        };
        Step {
            state: self.state,
            duty_percent: self.duty_percent(),
            hold: self.hold(),
        }
    }

    /// Dwell time of the current state.
    pub fn hold(&self) -> Duration {
        match self.state {
            AlarmState::Silent => self.cadence.idle_poll,
            AlarmState::BeepOn => self.cadence.on,
            AlarmState::BeepOff => self.cadence.off,
        }
    }

    fn duty_percent(&self) -> u8 {
        match self.state {
            AlarmState::BeepOn => self.cadence.duty_percent,
            AlarmState::Silent | AlarmState::BeepOff => 0,
        }
    }
}

/// Buzzer task: owns the tone PWM channel and the cadence machine.
pub struct AudioAlarm<P> {
    tone: P,
    machine: AlarmStateMachine,
}

impl<P: SetDutyCycle> AudioAlarm<P> {
    pub fn new(tone: P, cadence: AlarmCadence) -> Self {
        Self {
            tone,
            machine: AlarmStateMachine::new(cadence),
        }
    }

    pub fn state(&self) -> AlarmState {
        self.machine.state()
    }

    /// Advance the machine and drive the buzzer accordingly.
    pub fn step(&mut self, alert: bool) -> Result<Step, OutputError> {
        let before = self.machine.state();
        let step = self.machine.step(alert);
        if before == AlarmState::Silent && step.state != AlarmState::Silent {
            info!("alarm: sounding");
        } else if before != AlarmState::Silent && step.state == AlarmState::Silent {
            info!("alarm: silenced");
        }
        self.tone
            .set_duty_cycle_percent(step.duty_percent)
            .map_err(|_| OutputError::PwmWriteFailed)?;
        Ok(step)
    }

    /// Sample the latest reading at every state boundary, forever.
    pub async fn run(mut self, station: &Station) {
        let mailbox = station.distributor().mailbox(ConsumerId::Alarm);
        let idle_poll = self.machine.cadence.idle_poll;
        loop {
            let alert = match mailbox.take_or_last(idle_poll).await {
                Some(reading) => {
                    station.observe(ConsumerId::Alarm, &reading);
                    reading.alert()
                }
                None => false,
            };
            let hold = match self.step(alert) {
                Ok(step) => step.hold,
                Err(e) => {
                    warn!("alarm: {}", e);
                    self.machine.hold()
                }
            };
            async_io_mini::Timer::after(hold).await;
        }
    }
}
