//! Trailing-edge debouncing on a host-driven clock.
//!
//! The engine never reads wall time. The host passes a monotonic `now`
//! (time since any fixed origin) with each event and each tick.

use std::time::Duration;

/// Viewport events the tour reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewportEvent {
    Resize,
    /// Scrolling has stopped (`scrollend`).
    ScrollEnd,
}

/// Fires once `delay` has elapsed since the latest event.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Duration>,
}

impl Debouncer {
    pub const fn new(delay: Duration) -> Self {
        Self { delay, deadline: None }
    }

    /// Record an event, pushing the deadline back.
    pub fn trigger(&mut self, now: Duration) {
        self.deadline = Some(now.saturating_add(self.delay));
    }

    /// Whether the quiet period is over. Returns `true` at most once per burst.
    pub fn poll(&mut self, now: Duration) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
