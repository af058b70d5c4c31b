//! Single-threaded pipeline tests: sampler → distributor → every consumer.
//!
//! Each test ticks the sampler by hand and drains each mailbox into its
//! driver, so the outcome is deterministic.

use crate::mock_hw::{RAW_FLOOD, RAW_QUIET, RecordingDisplay, RecordingMatrix, RecordingPwm, RecordingSink, ScriptedAdc};

use floodwatch::app::events::StationEvent;
use floodwatch::config::StationConfig;
use floodwatch::drivers::alarm::{AlarmCadence, AlarmState, AudioAlarm};
use floodwatch::drivers::display::{DisplayRenderer, Layout};
use floodwatch::drivers::indicator::{COLOUR_ALERT, COLOUR_NORMAL, IndicatorLight};
use floodwatch::drivers::matrix::{CELL_COUNT, MatrixDriver, WORD_GREEN, WORD_RED};
use floodwatch::fanout::ConsumerId;
use floodwatch::pins::{LED_PWM_WRAP, TONE_PWM_WRAP};
use floodwatch::sensors::SensorSampler;
use floodwatch::station::Station;

struct Rig {
    station: Station,
    display: DisplayRenderer<RecordingDisplay>,
    screens: RecordingDisplay,
    indicator: IndicatorLight<RecordingPwm>,
    rgb: [RecordingPwm; 3],
    alarm: AudioAlarm<RecordingPwm>,
    tone: RecordingPwm,
    matrix: MatrixDriver<RecordingMatrix>,
    pixels: RecordingMatrix,
}

impl Rig {
    fn new() -> Self {
        let screens = RecordingDisplay::default();
        let rgb = [
            RecordingPwm::new(LED_PWM_WRAP),
            RecordingPwm::new(LED_PWM_WRAP),
            RecordingPwm::new(LED_PWM_WRAP),
        ];
        let tone = RecordingPwm::new(TONE_PWM_WRAP);
        let pixels = RecordingMatrix::default();
        Self {
            station: Station::new(StationConfig::default()).unwrap(),
            display: DisplayRenderer::new(screens.clone()),
            screens,
            indicator: IndicatorLight::new(rgb[0].clone(), rgb[1].clone(), rgb[2].clone()),
            rgb,
            alarm: AudioAlarm::new(tone.clone(), AlarmCadence::default()),
            tone,
            matrix: MatrixDriver::new(pixels.clone()),
            pixels,
        }
    }

    /// Deliver whatever is pending to every consumer, the way each task's
    /// next cycle would.
    fn drain(&mut self) {
        let d = self.station.distributor();
        if let Some(r) = d.mailbox(ConsumerId::Display).try_take() {
            self.station.observe(ConsumerId::Display, &r);
            self.display.render(&r).unwrap();
        }
        if let Some(r) = d.mailbox(ConsumerId::Indicator).try_take() {
            self.station.observe(ConsumerId::Indicator, &r);
            self.indicator.apply(&r).unwrap();
        }
        let alarm_reading = d.mailbox(ConsumerId::Alarm).try_take();
        if let Some(r) = alarm_reading {
            self.station.observe(ConsumerId::Alarm, &r);
        }
        let alert = alarm_reading
            .or_else(|| d.mailbox(ConsumerId::Alarm).last())
            .is_some_and(|r| r.alert());
        self.alarm.step(alert).unwrap();
        if let Some(r) = d.mailbox(ConsumerId::Matrix).try_take() {
            self.station.observe(ConsumerId::Matrix, &r);
            self.matrix.apply(&r).unwrap();
        }
    }

    fn rgb_levels(&self) -> [u16; 3] {
        [
            self.rgb[0].last().unwrap_or(0),
            self.rgb[1].last().unwrap_or(0),
            self.rgb[2].last().unwrap_or(0),
        ]
    }
}

#[test]
fn scenario_flood_drives_every_output_to_alert() {
    let mut rig = Rig::new();
    let mut sink = RecordingSink::default();
    let mut sampler = SensorSampler::new(ScriptedAdc::constant(RAW_FLOOD));

    let reading = sampler
        .tick(rig.station.distributor(), rig.station.metrics(), &mut sink)
        .unwrap();
    assert!(reading.alert());
    rig.drain();

    let screen = rig.screens.last().unwrap();
    assert_eq!(screen.layout, Layout::Emergency);
    assert_eq!(screen.level.as_str(), "75.0%");
    assert_eq!(screen.rainfall.as_str(), "10.0%");

    assert_eq!(rig.indicator.current_colour(), COLOUR_ALERT);
    assert_eq!(rig.rgb_levels(), [255, 0, 0]);

    assert_eq!(rig.pixels.last_frame(CELL_COUNT).unwrap(), vec![WORD_RED; CELL_COUNT]);

    assert_eq!(rig.alarm.state(), AlarmState::BeepOn);
    assert_eq!(rig.tone.last(), Some(TONE_PWM_WRAP / 2));

    assert!(matches!(
        sink.snapshot().as_slice(),
        [StationEvent::AlertRaised { sequence: 0, .. }]
    ));
}

#[test]
fn scenario_quiet_keeps_station_calm() {
    let mut rig = Rig::new();
    let mut sink = RecordingSink::default();
    let mut sampler = SensorSampler::new(ScriptedAdc::constant(RAW_QUIET));

    for _ in 0..3 {
        sampler.tick(rig.station.distributor(), rig.station.metrics(), &mut sink);
        rig.drain();
    }

    let screen = rig.screens.last().unwrap();
    assert_eq!(screen.layout, Layout::Normal);
    assert_eq!(screen.level.as_str(), "50.0%");
    assert_eq!(screen.rainfall.as_str(), "50.0%");

    assert_eq!(rig.indicator.current_colour(), COLOUR_NORMAL);
    assert_eq!(rig.rgb_levels(), [0, 255, 0]);
    assert_eq!(rig.pixels.last_frame(CELL_COUNT).unwrap(), vec![WORD_GREEN; CELL_COUNT]);

    assert_eq!(rig.alarm.state(), AlarmState::Silent);
    assert!(rig.tone.writes().iter().all(|&d| d == 0));
    assert!(sink.snapshot().is_empty());
}

#[test]
fn slow_consumer_skips_to_latest_reading() {
    let mut rig = Rig::new();
    let mut sink = RecordingSink::default();
    let mut sampler = SensorSampler::new(ScriptedAdc::new(&[
        Some(RAW_QUIET),
        Some(RAW_QUIET),
        Some(RAW_QUIET),
        Some(RAW_FLOOD),
    ]));

    // Four samples land before any consumer runs.
    for _ in 0..4 {
        sampler.tick(rig.station.distributor(), rig.station.metrics(), &mut sink);
    }
    rig.drain();

    assert_eq!(rig.screens.count(), 1);
    assert_eq!(rig.screens.last().unwrap().sequence, 3);
    assert_eq!(rig.indicator.current_colour(), COLOUR_ALERT);

    let t = rig.station.telemetry();
    assert_eq!(t.published, 4);
    assert_eq!(t.max_lag(), 0);
}

#[test]
fn acquisition_failure_leaves_consumers_on_last_good() {
    let mut rig = Rig::new();
    let mut sink = RecordingSink::default();
    let mut sampler = SensorSampler::new(ScriptedAdc::new(&[Some(RAW_FLOOD), None, None]));

    sampler.tick(rig.station.distributor(), rig.station.metrics(), &mut sink);
    rig.drain();
    assert!(sampler.tick(rig.station.distributor(), rig.station.metrics(), &mut sink).is_none());
    assert!(sampler.tick(rig.station.distributor(), rig.station.metrics(), &mut sink).is_none());
    rig.drain();

    // No new screen and the indicator still shows the flood reading.
    assert_eq!(rig.screens.count(), 1);
    assert_eq!(rig.indicator.current_colour(), COLOUR_ALERT);
    // The alarm keeps beeping from the last observed reading.
    assert_eq!(rig.alarm.state(), AlarmState::BeepOff);

    let t = rig.station.telemetry();
    assert_eq!(t.published, 1);
    assert_eq!(t.acquisition_failures, 2);
}

#[test]
fn alarm_is_silent_before_first_reading() {
    let mut rig = Rig::new();
    rig.drain();
    assert_eq!(rig.alarm.state(), AlarmState::Silent);
    // Seeded mailboxes are not dirty, so nothing was rendered.
    assert_eq!(rig.screens.count(), 0);
}
