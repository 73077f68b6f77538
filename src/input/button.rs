//! Push-button debouncing.

use std::time::{Duration, Instant};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(20);

/// Reports a press once the contact has been stable in the pressed position for
/// the debounce time. Releases are tracked but not reported.
#[derive(Debug, Clone)]
pub struct Debouncer {
    debounce: Duration,
    stable: bool,
    candidate: bool,
    since: Option<Instant>,
}

impl Debouncer {
    pub fn new(debounce: Duration) -> Self {
        Self {
            debounce,
            stable: false,
            candidate: false,
            since: None,
        }
    }

    /// Feeds the current contact state (`true` = pressed) and returns `true` exactly
    /// once per debounced press.
    pub fn update(&mut self, pressed: bool, now: Instant) -> bool {
        if pressed != self.candidate || self.since.is_none() {
            self.candidate = pressed;
            self.since = Some(now);
        }
        let settled = self
            .since
            .map_or(false, |t| now.duration_since(t) >= self.debounce);
        if self.candidate != self.stable && settled {
            self.stable = self.candidate;
            return self.stable;
        }
        false
    }

    #[cfg(test)]
    pub fn is_pressed(&self) -> bool {
        self.stable
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}
