//! Bounded status log for the TUI.

use std::collections::VecDeque;

use chrono::Local;

use adbherd_fleet::FleetEvent;

/// Fixed-capacity log of formatted status lines.
///
/// When full, the oldest line is evicted on each push. Iteration order is
/// oldest → newest. Bounding happens here, in the presentation layer — the
/// event bus itself is unbounded.
#[derive(Debug)]
pub struct StatusLog {
    lines: VecDeque<String>,
    capacity: usize,
}

impl StatusLog {
    /// Creates an empty log keeping at most `capacity` lines.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "StatusLog capacity must be > 0");
        Self {
            lines: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends a line, evicting the oldest when at capacity.
    pub fn push(&mut self, line: String) {
        if self.lines.len() == self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(line);
    }

    /// Formats and appends a fleet event as `[HH:MM:SS] message`.
    pub fn push_event(&mut self, event: &FleetEvent) {
        let stamp = event.at.with_timezone(&Local).format("%H:%M:%S");
        self.push(format!("[{stamp}] {}", event.kind));
    }

    /// Iterates oldest → newest.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    /// The newest `n` lines, oldest first.
    pub fn tail(&self, n: usize) -> impl Iterator<Item = &str> {
        let skip = self.lines.len().saturating_sub(n);
        self.iter().skip(skip)
    }
}
