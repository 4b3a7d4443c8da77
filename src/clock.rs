//! Time sources for the drag controller.
//!
//! Drag disambiguation compares elapsed milliseconds, so the controller reads
//! time through [`Clock`] instead of the wall clock directly.

use std::cell::Cell;
use std::rc::Rc;
use web_time::{Instant, SystemTime, UNIX_EPOCH};

/// Milliseconds on a monotonic timeline.
pub type Millis = u64;

/// A monotonic millisecond clock.
pub trait Clock {
    fn now_ms(&self) -> Millis;
}

/// Real time, measured from when the clock was created.
#[derive(Debug, Clone)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> Millis {
        self.start.elapsed().as_millis() as Millis
    }
}

/// Manually advanced clock. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Millis>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, ms: Millis) {
        self.now.set(ms);
    }

    pub fn advance(&self, ms: Millis) {
        self.now.set(self.now.get() + ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> Millis {
        self.now.get()
    }
}

/// Wall-clock milliseconds since the Unix epoch, used for export file names.
pub fn unix_epoch_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_shared_between_clones() {
        let clock = ManualClock::new();
        let other = clock.clone();
        clock.advance(150);
        other.advance(60);
        assert_eq!(clock.now_ms(), 210);
        clock.set(5);
        assert_eq!(other.now_ms(), 5);
    }

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now_ms();
        let b = clock.now_ms();
        assert!(b >= a);
    }

    #[test]
    fn test_epoch_ms_is_recent() {
        // 2020-01-01 in epoch milliseconds
        assert!(unix_epoch_ms() > 1_577_836_800_000);
    }
}
