//! Ordering key for the simulation event queue.

use std::time::Duration;

/// Position of an event in the queue.
///
/// Events fire in time order; events scheduled for the same instant fire in
/// the order they were scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventKey {
    /// Virtual time at which the event fires.
    pub time: Duration,
    /// Scheduling sequence number, unique per runner.
    pub sequence: u64,
}

impl EventKey {
    /// Create a new key.
    pub fn new(time: Duration, sequence: u64) -> Self {
        Self { time, sequence }
    }
}
