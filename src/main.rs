//! FloodWatch station main entry point.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │  SweepAnalog   SimPwm ×4   LogDisplay   SimMatrix  LogEventSink│
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  sampler ──▶ Distributor ──▶ display · indicator · alarm ·     │
//! │  (100 ms)    (4 mailboxes)   matrix   (one thread each)        │
//! │                                                                │
//! │  main thread: boot, spawn, periodic telemetry                  │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::sync::Arc;

use anyhow::{Context, Result};
use log::info;

use floodwatch::adapters::log_sink::LogEventSink;
use floodwatch::adapters::sim::{LogDisplay, SimMatrix, SimPwm, SweepAnalog};
use floodwatch::app::events::StationEvent;
use floodwatch::app::ports::EventSink;
use floodwatch::config::StationConfig;
use floodwatch::pins;
use floodwatch::station::Station;

fn main() -> Result<()> {
    // ── 1. Logging ────────────────────────────────────────────
    init_logging()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  FloodWatch v{}                    ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = StationConfig::default();
    info!("Config: {}", serde_json::to_string(&config)?);
    log_pin_map();

    let station = Arc::new(Station::new(config).context("station config rejected")?);

    // ── 3. Sim devices and probes ─────────────────────────────
    let (red, red_probe) = SimPwm::new(pins::LED_PWM_WRAP);
    let (green, green_probe) = SimPwm::new(pins::LED_PWM_WRAP);
    let (blue, blue_probe) = SimPwm::new(pins::LED_PWM_WRAP);
    let (tone, tone_probe) = SimPwm::new(pins::TONE_PWM_WRAP);
    let (matrix, matrix_probe) = SimMatrix::new();

    // ── 4. Tasks ──────────────────────────────────────────────
    // Consumers first so nothing published at startup goes unobserved.
    let _display = station
        .spawn_display(|| Ok(LogDisplay::new()), LogEventSink::new())
        .context("spawn display")?;
    let _indicator = station
        .spawn_indicator(move || Ok((red, green, blue)), LogEventSink::new())
        .context("spawn indicator")?;
    let _alarm = station
        .spawn_alarm(move || Ok(tone), LogEventSink::new())
        .context("spawn alarm")?;
    let _matrix = station
        .spawn_matrix(move || Ok(matrix), LogEventSink::new())
        .context("spawn matrix")?;
    let _sampler = station
        .spawn_sampler(|| Ok(SweepAnalog::default()), LogEventSink::new())
        .context("spawn sampler")?;

    info!("Station running, entering telemetry loop");

    // ── 5. Telemetry loop ─────────────────────────────────────
    let mut sink = LogEventSink::new();
    loop {
        std::thread::sleep(station.config().telemetry_interval());
        sink.emit(&StationEvent::Telemetry(station.telemetry()));
        info!(
            "OUTPUTS | rgb=({}, {}, {}) | tone={}/{} | matrix={:#010x} ({} words)",
            red_probe.level(),
            green_probe.level(),
            blue_probe.level(),
            tone_probe.duty(),
            tone_probe.max(),
            matrix_probe.last_word(),
            matrix_probe.words_pushed()
        );
    }
}

#[cfg(feature = "espidf")]
fn init_logging() -> Result<()> {
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;
    Ok(())
}

#[cfg(not(feature = "espidf"))]
fn init_logging() -> Result<()> {
    let level = floodwatch::adapters::log_sink::ConsoleLogger::install()?;
    info!("Host console logger at {}", level);
    Ok(())
}

fn log_pin_map() {
    info!(
        "Pins: level=GPIO{} (ADC{}) rain=GPIO{} (ADC{})",
        pins::WATER_LEVEL_ADC_GPIO,
        pins::WATER_LEVEL_ADC_INPUT,
        pins::RAINFALL_ADC_GPIO,
        pins::RAINFALL_ADC_INPUT
    );
    info!(
        "Pins: rgb=GPIO{}/{}/{} (wrap {}) buzzer=GPIO{} (wrap {}, clkdiv {}) matrix=GPIO{}",
        pins::LED_R_GPIO,
        pins::LED_G_GPIO,
        pins::LED_B_GPIO,
        pins::LED_PWM_WRAP,
        pins::BUZZER_GPIO,
        pins::TONE_PWM_WRAP,
        pins::TONE_PWM_CLKDIV,
        pins::LED_MATRIX_GPIO
    );
    info!(
        "Pins: display i2c sda=GPIO{} scl=GPIO{} addr={:#04x} @ {} Hz",
        pins::I2C_SDA_GPIO,
        pins::I2C_SCL_GPIO,
        pins::DISPLAY_I2C_ADDR,
        pins::DISPLAY_I2C_HZ
    );
}
