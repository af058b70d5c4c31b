//! Console logging and the log-based event sink.
//!
//! On ESP-IDF the firmware logs through `esp_idf_logger` (UART / USB-CDC).
//! On the host, [`ConsoleLogger`] prints the same `L (ms) target: msg`
//! shape to stderr, filtered by the `FLOODWATCH_LOG` environment variable
//! (`error`, `warn`, `info`, `debug`, `trace` or `off`; default `info`).
//!
//! [`LogEventSink`] turns structured [`StationEvent`]s into log lines.
//! Telemetry snapshots are rendered as JSON.

use std::io::Write;
use std::sync::OnceLock;
use std::time::Instant;

use log::{error, info, warn, Level, LevelFilter, Log, Metadata, Record};

use crate::app::events::StationEvent;
use crate::app::ports::EventSink;

/// Environment variable holding the host log level.
pub const LOG_ENV: &str = "FLOODWATCH_LOG";

// ── Host console logger ──────────────────────────────────────

pub struct ConsoleLogger {
    level: LevelFilter,
    started: Instant,
}

static LOGGER: OnceLock<ConsoleLogger> = OnceLock::new();

impl ConsoleLogger {
    pub fn new(level: LevelFilter) -> Self {
        Self {
            level,
            started: Instant::now(),
        }
    }

    /// Install as the global logger, honouring [`LOG_ENV`].
    pub fn install() -> Result<LevelFilter, log::SetLoggerError> {
        let level = std::env::var(LOG_ENV)
            .ok()
            .and_then(|v| parse_level(&v))
            .unwrap_or(LevelFilter::Info);
        let logger = LOGGER.get_or_init(|| Self::new(level));
        log::set_logger(logger)?;
        log::set_max_level(logger.level);
        Ok(logger.level)
    }
}

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let tag = match record.level() {
            Level::Error => 'E',
            Level::Warn => 'W',
            Level::Info => 'I',
            Level::Debug => 'D',
            Level::Trace => 'V',
        };
        let thread = std::thread::current();
        let mut out = std::io::stderr().lock();
        // Nothing useful to do if stderr is gone.
        let _ = writeln!(
            out,
            "{} ({}) {}[{}]: {}",
            tag,
            self.started.elapsed().as_millis(),
            record.target(),
            thread.name().unwrap_or("?"),
            record.args()
        );
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Parse a level name, case-insensitively.
pub fn parse_level(value: &str) -> Option<LevelFilter> {
    value.trim().parse().ok()
}

// ── Event sink ───────────────────────────────────────────────

/// Adapter that logs every [`StationEvent`] to the console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &StationEvent) {
        match event {
            StationEvent::Started { sample_period_ms } => {
                info!("START | sampling every {} ms", sample_period_ms);
            }
            StationEvent::AlertRaised {
                sequence,
                level_pct,
                rainfall_pct,
            } => {
                warn!(
                    "ALERT | seq={} | level={:.1}% rain={:.1}%",
                    sequence, level_pct, rainfall_pct
                );
            }
            StationEvent::AlertCleared { sequence } => {
                info!("ALERT | cleared at seq={}", sequence);
            }
            StationEvent::Telemetry(snapshot) => match serde_json::to_string(snapshot) {
                Ok(json) => info!("TELEM | {}", json),
                Err(e) => warn!("TELEM | unserialisable snapshot ({}): {:?}", e, snapshot),
            },
            StationEvent::TaskHalted { task, error: e } => {
                error!("HALT | task '{}' stopped: {}", task, e);
            }
        }
    }
}
