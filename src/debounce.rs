//! Debouncing of search-text changes.
//!
//! Each change restarts a quiet-period timer; only the last text is emitted
//! once the timer expires. The debouncer is driven with explicit instants so
//! the caller decides how time advances (a `select!` loop in production,
//! fixed instants in tests).

use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug)]
pub struct Debouncer {
    window: Duration,
    pending: Option<(String, Instant)>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    /// Record a change at `now`, replacing any pending text.
    pub fn push(&mut self, text: String, now: Instant) {
        self.pending = Some((text, now + self.window));
    }

    /// When the pending text becomes due, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, due)| *due)
    }

    /// Take the pending text if its quiet period has elapsed at `now`.
    pub fn take_ready(&mut self, now: Instant) -> Option<String> {
        match self.pending {
            Some((_, due)) if due <= now => self.pending.take().map(|(text, _)| text),
            _ => None,
        }
    }

    /// Take the pending text regardless of its deadline.
    pub fn flush(&mut self) -> Option<String> {
        self.pending.take().map(|(text, _)| text)
    }

    /// Drop the pending text, e.g. when a category switch supersedes it.
    pub fn cancel(&mut self) {
        self.pending = None;
    }
}
