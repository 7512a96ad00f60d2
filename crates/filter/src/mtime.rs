//! Modification stamps.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

static CLOCK: AtomicU64 = AtomicU64::new(0);

/// Modification stamp drawn from a process-wide counter.
///
/// Every call to [`ModifiedTime::now`] returns a stamp strictly greater than
/// all earlier ones, so comparing two stamps tells which event came last.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ModifiedTime(u64);

impl ModifiedTime {
    /// Older than every stamp handed out by [`ModifiedTime::now`].
    pub const NEVER: Self = Self(0);

    /// A fresh stamp.
    pub fn now() -> Self {
        Self(CLOCK.fetch_add(1, Ordering::Relaxed) + 1)
    }

    /// Replace with a fresh stamp.
    pub fn modified(&mut self) {
        *self = Self::now();
    }

    /// Raw counter value.
    pub fn get(self) -> u64 {
        self.0
    }
}
