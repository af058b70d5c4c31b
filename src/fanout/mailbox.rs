//! Single-slot, latest-value-wins mailbox.
//!
//! One writer (the distributor) and one reader (the owning consumer task).
//! A publish never blocks and always overwrites an unread value, so a slow
//! reader only ever sees the most recent value, never a backlog.
//!
//! ```text
//!   publish(v) ──▶ ┌─────────────┐ ──▶ take_wait()      (event-driven)
//!                  │ pending (1) │ ──▶ take_or_last(t)  (periodic)
//!                  │ last seen   │ ──▶ try_take()
//!                  └─────────────┘
//! ```
//!
//! The pending slot is an `embassy-sync` [`Signal`], which already has the
//! overwrite-on-signal semantics and wakes an async waiter on any thread.

use core::cell::Cell;
use core::time::Duration;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

pub struct Mailbox<T> {
    /// Unread value; `signaled()` is the dirty flag.
    pending: Signal<CriticalSectionRawMutex, T>,
    /// Most recent value handed to the reader (or the seed).
    last: Mutex<CriticalSectionRawMutex, Cell<Option<T>>>,
}

impl<T> Mailbox<T> {
    /// An empty mailbox: periodic reads wait until the first publish.
    pub const fn new() -> Self {
        Self {
            pending: Signal::new(),
            last: Mutex::new(Cell::new(None)),
        }
    }

    /// A mailbox whose reader starts with `initial` as its last value.
    /// The seed does not count as unread.
    pub const fn seeded(initial: T) -> Self {
        Self {
            pending: Signal::new(),
            last: Mutex::new(Cell::new(Some(initial))),
        }
    }
}

impl<T> Default for Mailbox<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy + Send> Mailbox<T> {
    /// Store `value`, replacing any unread one. O(1), never blocks on the
    /// reader.
    pub fn publish(&self, value: T) {
        self.pending.signal(value);
    }

    /// Whether a value has been published since the last take.
    pub fn is_dirty(&self) -> bool {
        self.pending.signaled()
    }

    /// Take the unread value, if any, without waiting.
    pub fn try_take(&self) -> Option<T> {
        let value = self.pending.try_take()?;
        self.observe(value);
        Some(value)
    }

    /// The value most recently handed to the reader.
    pub fn last(&self) -> Option<T> {
        self.last.lock(Cell::get)
    }

    /// Wait until an unread value exists, then take it.
    pub async fn take_wait(&self) -> T {
        let value = self.pending.wait().await;
        self.observe(value);
        value
    }

    /// The unread value if there is one, otherwise the last observed value.
    ///
    /// Only when the mailbox has never held anything does this wait, for at
    /// most `timeout`, returning `None` if nothing arrives.
    pub async fn take_or_last(&self, timeout: Duration) -> Option<T> {
        if let Some(value) = self.try_take() {
            return Some(value);
        }
        if let Some(value) = self.last() {
            return Some(value);
        }
        futures_lite::future::or(async { Some(self.take_wait().await) }, async {
            async_io_mini::Timer::after(timeout).await;
            None
        })
        .await
    }

    fn observe(&self, value: T) {
        self.last.lock(|last| last.set(Some(value)));
    }
}
