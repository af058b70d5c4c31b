//! Periodic flood-sensor sampler, the station's only producer.
//!
//! Each cycle reads both analog axes, converts them to percent, classifies
//! the pair and publishes the resulting [`Reading`] through the
//! [`Distributor`]. Publishing never waits on a consumer.
//!
//! ## Acquisition failures
//!
//! A failed or out-of-range sample is not published. The sampler keeps its
//! last known-good reading and does not advance the sequence, so consumers
//! simply keep acting on the previous value.

use std::time::Instant;

use log::{debug, error, info, warn};

use super::{ADC_MAX, Reading};
use crate::app::events::StationEvent;
use crate::app::ports::{AdcChannel, AnalogInput, EventSink};
use crate::diagnostics::Metrics;
use crate::error::SensorError;
use crate::fanout::Distributor;
use crate::station::Station;

/// Consecutive failures between repeated `error!` reports.
const FAILURE_REPORT_EVERY: u32 = 50;

pub struct SensorSampler<A> {
    adc: A,
    next_sequence: u32,
    last_good: Option<Reading>,
    consecutive_failures: u32,
    alert_active: bool,
}

impl<A: AnalogInput> SensorSampler<A> {
    pub fn new(adc: A) -> Self {
        Self {
            adc,
            next_sequence: 0,
            last_good: None,
            consecutive_failures: 0,
            alert_active: false,
        }
    }

    /// Sample both axes and build the next reading.
    ///
    /// On error nothing changes except the failure count.
    pub fn acquire(&mut self) -> Result<Reading, SensorError> {
        let sampled = self.read_checked(AdcChannel::WaterLevel).and_then(|level| {
            self.read_checked(AdcChannel::Rainfall)
                .map(|rainfall| (level, rainfall))
        });

        let (level_raw, rainfall_raw) = match sampled {
            Ok(pair) => pair,
            Err(e) => {
                self.consecutive_failures = self.consecutive_failures.saturating_add(1);
                return Err(e);
            }
        };

        let reading = Reading::from_raw(level_raw, rainfall_raw, self.next_sequence);
        self.next_sequence = self.next_sequence.saturating_add(1);
        self.last_good = Some(reading);
        self.consecutive_failures = 0;
        Ok(reading)
    }

    /// The most recent successfully acquired reading.
    pub fn last_good(&self) -> Option<Reading> {
        self.last_good
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// One sampling cycle: acquire, publish, report alert transitions.
    ///
    /// Returns the published reading, or `None` if acquisition failed.
    pub fn tick(
        &mut self,
        distributor: &Distributor,
        metrics: &Metrics,
        sink: &mut impl EventSink,
    ) -> Option<Reading> {
        match self.acquire() {
            Ok(reading) => {
                distributor.publish(reading);
                self.report_transition(&reading, sink);
                Some(reading)
            }
            Err(e) => {
                let total = metrics.record_acquisition_failure();
                match self.consecutive_failures {
                    1 => warn!(
                        "sampler: acquisition failed ({}), holding seq {:?}",
                        e,
                        self.last_good.map(|r| r.sequence())
                    ),
                    n if n % FAILURE_REPORT_EVERY == 0 => error!(
                        "sampler: {} consecutive acquisition failures ({} total), last: {}",
                        n, total, e
                    ),
                    _ => {}
                }
                None
            }
        }
    }

    /// Run forever at the station's sample period.
    pub async fn run(mut self, station: &Station, mut sink: impl EventSink) {
        let period = station.config().sample_period();
        sink.emit(&StationEvent::Started {
            sample_period_ms: station.config().sample_period_ms,
        });
        info!("sampler: running every {} ms", period.as_millis());

        loop {
            let started = Instant::now();
            self.tick(station.distributor(), station.metrics(), &mut sink);
            // Hold the period regardless of how long the cycle took.
            async_io_mini::Timer::after(period.saturating_sub(started.elapsed())).await;
        }
    }

    fn read_checked(&mut self, channel: AdcChannel) -> Result<u16, SensorError> {
        let raw = self.adc.read(channel)?;
        if raw > ADC_MAX {
            debug!("sampler: ADC{} returned {} ({:?})", channel.input(), raw, channel);
            return Err(SensorError::OutOfRange(raw));
        }
        Ok(raw)
    }

    fn report_transition(&mut self, reading: &Reading, sink: &mut impl EventSink) {
        if reading.alert() == self.alert_active {
            return;
        }
        self.alert_active = reading.alert();
        let event = if reading.alert() {
            StationEvent::AlertRaised {
                sequence: reading.sequence(),
                level_pct: reading.level_pct(),
                rainfall_pct: reading.rainfall_pct(),
            }
        } else {
            StationEvent::AlertCleared {
                sequence: reading.sequence(),
            }
        };
        sink.emit(&event);
    }
}
