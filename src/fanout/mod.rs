//! Sampler → consumer fan-out.
//!
//! ```text
//! ┌──────────────┐  publish  ┌─────────────┐   ┌─────────┐   ┌──────────────┐
//! │ SensorSampler│──────────▶│ Distributor │──▶│ Mailbox │──▶│ Display      │
//! └──────────────┘           │             │──▶│ Mailbox │──▶│ Indicator    │
//!                            │             │──▶│ Mailbox │──▶│ Alarm        │
//!                            │             │──▶│ Mailbox │──▶│ Matrix       │
//!                            └─────────────┘   └─────────┘   └──────────────┘
//! ```
//!
//! Single writer, one reader per mailbox: no locking between tasks beyond
//! the critical section inside each mailbox slot.

pub mod distributor;
pub mod mailbox;

pub use distributor::Distributor;
pub use mailbox::Mailbox;

use serde::Serialize;

/// The fixed consumer set, in registration (publish) order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(usize)]
pub enum ConsumerId {
    Display = 0,
    Indicator = 1,
    Alarm = 2,
    Matrix = 3,
}

impl ConsumerId {
    pub const COUNT: usize = 4;

    pub const ALL: [Self; Self::COUNT] = [Self::Display, Self::Indicator, Self::Alarm, Self::Matrix];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Display => "display",
            Self::Indicator => "indicator",
            Self::Alarm => "alarm",
            Self::Matrix => "matrix",
        }
    }
}

impl core::fmt::Display for ConsumerId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}
