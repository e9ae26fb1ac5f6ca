use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// Suppression window for repeated play/pause triggers on one channel.
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(200);

/// Interaction channel a toggle trigger arrived on.
///
/// Channels are deduplicated independently: a pointer click and a key
/// press inside the same window do not suppress each other.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputChannel {
    Pointer,
    Keyboard,
}

/// Per-channel suppression guard for the play/pause toggle.
///
/// The first trigger in a window is accepted and the action runs exactly
/// once; repeats on the same channel inside the window are dropped
/// entirely. Callers pass `now` so the window is testable without timers.
#[derive(Debug)]
pub struct Debouncer {
    window: Duration,
    pointer: Mutex<Option<Instant>>,
    keyboard: Mutex<Option<Instant>>,
}

impl Debouncer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            window: DEBOUNCE_WINDOW,
            pointer: Mutex::new(None),
            keyboard: Mutex::new(None),
        }
    }

    /// Try to claim the channel at `now`. Returns `false` when the trigger
    /// must be dropped.
    pub fn try_acquire(&self, channel: InputChannel, now: Instant) -> bool {
        let slot = match channel {
            InputChannel::Pointer => &self.pointer,
            InputChannel::Keyboard => &self.keyboard,
        };
        let mut last = slot.lock();
        match *last {
            Some(accepted) if now.duration_since(accepted) < self.window => {
                tracing::debug!(?channel, "toggle trigger suppressed");
                false
            }
            _ => {
                *last = Some(now);
                true
            }
        }
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new()
    }
}
