//! Named task threads with explicit stack size and priority.
//!
//! On ESP-IDF, `std::thread` is backed by pthreads over FreeRTOS tasks.
//! `esp_pthread_set_cfg()` sets thread-local configuration that applies to
//! the *next* `pthread_create()` from the calling thread, so the
//! config→spawn pair must not be interleaved with other thread creation on
//! the same thread. On the host, core and priority are logged and ignored.

use std::io;
use std::thread::JoinHandle;

/// CPU core identifiers for the ESP32-S3 dual-core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum Core {
    /// Core 0 (PRO_CPU): protocol stacks, console.
    Pro = 0,
    /// Core 1 (APP_CPU): station tasks.
    App = 1,
}

/// How a station task is scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskSpec {
    /// Thread name. Must be NUL-terminated (e.g. `"sampler\0"`).
    pub name: &'static str,
    pub core: Core,
    pub priority: u8,
    pub stack_kb: usize,
}

impl TaskSpec {
    pub const SAMPLER: Self = Self::app("sampler\0", 6, 4);
    pub const DISPLAY: Self = Self::app("display\0", 5, 8);
    pub const INDICATOR: Self = Self::app("indicator\0", 5, 4);
    pub const ALARM: Self = Self::app("alarm\0", 5, 4);
    pub const MATRIX: Self = Self::app("matrix\0", 5, 4);

    const fn app(name: &'static str, priority: u8, stack_kb: usize) -> Self {
        Self {
            name,
            core: Core::App,
            priority,
            stack_kb,
        }
    }

    /// Name without the trailing NUL.
    pub fn display_name(&self) -> &'static str {
        self.name.trim_end_matches('\0')
    }
}

/// Spawn `f` on its own thread configured by `spec`.
#[cfg(all(feature = "espidf", target_os = "espidf"))]
pub fn spawn_task(spec: TaskSpec, f: impl FnOnce() + Send + 'static) -> io::Result<JoinHandle<()>> {
    use esp_idf_svc::sys;

    // SAFETY: the config is fully initialised by the IDF helper and only
    // read by the next pthread_create() on this thread.
    let ret = unsafe {
        let mut cfg = sys::esp_create_default_pthread_config();
        cfg.pin_to_core = spec.core as i32;
        cfg.prio = i32::from(spec.priority);
        cfg.stack_size = (spec.stack_kb * 1024) as i32;
        cfg.thread_name = spec.name.as_ptr() as *const _;
        sys::esp_pthread_set_cfg(&cfg)
    };
    if ret != sys::ESP_OK as i32 {
        return Err(io::Error::other(format!("esp_pthread_set_cfg failed: {ret}")));
    }

    log::info!(
        "Spawning '{}' on {:?} (pri={}, stack={}KB)",
        spec.display_name(),
        spec.core,
        spec.priority,
        spec.stack_kb
    );

    std::thread::Builder::new()
        .name(spec.display_name().into())
        .spawn(f)
}

/// Host threads format logs with std; small firmware stacks are not enough.
#[cfg(not(all(feature = "espidf", target_os = "espidf")))]
const HOST_MIN_STACK_KB: usize = 64;

/// Host fallback: ignores core affinity and priority.
#[cfg(not(all(feature = "espidf", target_os = "espidf")))]
pub fn spawn_task(spec: TaskSpec, f: impl FnOnce() + Send + 'static) -> io::Result<JoinHandle<()>> {
    log::info!(
        "Spawning '{}' (sim, pri={} ignored, stack={}KB)",
        spec.display_name(),
        spec.priority,
        spec.stack_kb
    );

    std::thread::Builder::new()
        .name(spec.display_name().into())
        .stack_size(spec.stack_kb.max(HOST_MIN_STACK_KB) * 1024)
        .spawn(f)
}
