//! Station context and task wiring.
//!
//! [`Station`] owns everything the tasks share: the validated
//! configuration, the fan-out distributor and the diagnostic counters. It
//! is created once at boot and handed to each task thread as an
//! `Arc<Station>`.
//!
//! Each `spawn_*` function starts one task thread. The device is built by
//! a factory *inside* that thread, so a device that fails to attach halts
//! only its own task; the rest of the station keeps running.

use std::io;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use embedded_hal::pwm::SetDutyCycle;
use futures_lite::future::block_on;
use log::error;

use crate::app::events::StationEvent;
use crate::app::ports::{AnalogInput, DisplayOutput, EventSink, MatrixOutput};
use crate::config::StationConfig;
use crate::diagnostics::{Metrics, MetricsSnapshot};
use crate::drivers::alarm::{AlarmCadence, AudioAlarm};
use crate::drivers::display::DisplayRenderer;
use crate::drivers::indicator::IndicatorLight;
use crate::drivers::matrix::MatrixDriver;
use crate::drivers::task_pin::{TaskSpec, spawn_task};
use crate::error::Error;
use crate::fanout::{ConsumerId, Distributor};
use crate::sensors::{Reading, SensorSampler};

pub struct Station {
    config: StationConfig,
    distributor: Distributor,
    metrics: Metrics,
    started: Instant,
}

impl Station {
    /// Validate `config` and register every consumer, each mailbox seeded
    /// with [`Reading::INITIAL`].
    pub fn new(config: StationConfig) -> Result<Self, Error> {
        config.validate().map_err(Error::Init)?;
        Ok(Self {
            config,
            distributor: Distributor::new(Reading::INITIAL),
            metrics: Metrics::new(),
            started: Instant::now(),
        })
    }

    pub fn config(&self) -> &StationConfig {
        &self.config
    }

    pub fn distributor(&self) -> &Distributor {
        &self.distributor
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn uptime(&self) -> Duration {
        self.started.elapsed()
    }

    /// Record that `consumer` is acting on `reading`.
    pub fn observe(&self, consumer: ConsumerId, reading: &Reading) {
        if !self.metrics.record_observed(consumer, reading.sequence()) {
            error!(
                "{}: sequence went backwards (now {})",
                consumer,
                reading.sequence()
            );
        }
    }

    pub fn telemetry(&self) -> MetricsSnapshot {
        self.metrics
            .snapshot(self.distributor.published(), self.uptime().as_secs())
    }

    // ── Task spawning ────────────────────────────────────────

    pub fn spawn_sampler<A, F>(
        self: &Arc<Self>,
        factory: F,
        mut sink: impl EventSink + Send + 'static,
    ) -> io::Result<JoinHandle<()>>
    where
        A: AnalogInput + 'static,
        F: FnOnce() -> Result<A, Error> + Send + 'static,
    {
        let station = Arc::clone(self);
        spawn_task(TaskSpec::SAMPLER, move || {
            let Some(adc) = attach(TaskSpec::SAMPLER, factory, &mut sink) else {
                return;
            };
            block_on(SensorSampler::new(adc).run(&station, sink));
        })
    }

    pub fn spawn_display<D, F>(
        self: &Arc<Self>,
        factory: F,
        mut sink: impl EventSink + Send + 'static,
    ) -> io::Result<JoinHandle<()>>
    where
        D: DisplayOutput + 'static,
        F: FnOnce() -> Result<D, Error> + Send + 'static,
    {
        let station = Arc::clone(self);
        spawn_task(TaskSpec::DISPLAY, move || {
            let Some(display) = attach(TaskSpec::DISPLAY, factory, &mut sink) else {
                return;
            };
            block_on(DisplayRenderer::new(display).run(&station));
        })
    }

    /// The factory yields the red, green and blue channels.
    pub fn spawn_indicator<P, F>(
        self: &Arc<Self>,
        factory: F,
        mut sink: impl EventSink + Send + 'static,
    ) -> io::Result<JoinHandle<()>>
    where
        P: SetDutyCycle + 'static,
        F: FnOnce() -> Result<(P, P, P), Error> + Send + 'static,
    {
        let station = Arc::clone(self);
        spawn_task(TaskSpec::INDICATOR, move || {
            let Some((r, g, b)) = attach(TaskSpec::INDICATOR, factory, &mut sink) else {
                return;
            };
            block_on(IndicatorLight::new(r, g, b).run(&station));
        })
    }

    pub fn spawn_alarm<P, F>(
        self: &Arc<Self>,
        factory: F,
        mut sink: impl EventSink + Send + 'static,
    ) -> io::Result<JoinHandle<()>>
    where
        P: SetDutyCycle + 'static,
        F: FnOnce() -> Result<P, Error> + Send + 'static,
    {
        let station = Arc::clone(self);
        spawn_task(TaskSpec::ALARM, move || {
            let Some(tone) = attach(TaskSpec::ALARM, factory, &mut sink) else {
                return;
            };
            let cadence = AlarmCadence::from_config(station.config());
            block_on(AudioAlarm::new(tone, cadence).run(&station));
        })
    }

    pub fn spawn_matrix<M, F>(
        self: &Arc<Self>,
        factory: F,
        mut sink: impl EventSink + Send + 'static,
    ) -> io::Result<JoinHandle<()>>
    where
        M: MatrixOutput + 'static,
        F: FnOnce() -> Result<M, Error> + Send + 'static,
    {
        let station = Arc::clone(self);
        spawn_task(TaskSpec::MATRIX, move || {
            let Some(output) = attach(TaskSpec::MATRIX, factory, &mut sink) else {
                return;
            };
            block_on(MatrixDriver::new(output).run(&station));
        })
    }
}

/// Build a task's device; on failure report it and let the task end.
fn attach<D>(
    spec: TaskSpec,
    factory: impl FnOnce() -> Result<D, Error>,
    sink: &mut impl EventSink,
) -> Option<D> {
    match factory() {
        Ok(device) => Some(device),
        Err(e) => {
            let task = spec.display_name();
            error!("{}: device init failed ({}), task halted", task, e);
            sink.emit(&StationEvent::TaskHalted { task, error: e });
            None
        }
    }
}
