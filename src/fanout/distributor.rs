//! Reading fan-out.
//!
//! The [`Distributor`] owns one [`Mailbox`] per consumer and copies every
//! published [`Reading`] into each of them, in registration order. The cost
//! of a publish is one signal per consumer regardless of how slowly any
//! consumer drains its mailbox.

use core::sync::atomic::{AtomicU32, Ordering};

use super::ConsumerId;
use super::mailbox::Mailbox;
use crate::sensors::Reading;

pub struct Distributor {
    /// Indexed by `ConsumerId as usize`. Fixed for the process lifetime.
    mailboxes: [Mailbox<Reading>; ConsumerId::COUNT],
    published: AtomicU32,
}

impl Distributor {
    /// Register every consumer, each mailbox seeded with `initial`.
    pub fn new(initial: Reading) -> Self {
        Self {
            mailboxes: core::array::from_fn(|_| Mailbox::seeded(initial)),
            published: AtomicU32::new(0),
        }
    }

    /// Copy `reading` into every mailbox and return. Never waits on a
    /// consumer.
    pub fn publish(&self, reading: Reading) {
        for id in ConsumerId::ALL {
            self.mailboxes[id as usize].publish(reading);
        }
        self.published.fetch_add(1, Ordering::Relaxed);
    }

    /// The mailbox read by `consumer`.
    pub fn mailbox(&self, consumer: ConsumerId) -> &Mailbox<Reading> {
        &self.mailboxes[consumer as usize]
    }

    /// Number of readings published since start.
    pub fn published(&self) -> u32 {
        self.published.load(Ordering::Relaxed)
    }
}

impl Default for Distributor {
    fn default() -> Self {
        Self::new(Reading::INITIAL)
    }
}
