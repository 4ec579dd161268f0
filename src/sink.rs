//! Narration sink for the behaviors.
//!
//! Behaviors describe what they are doing ("Obstacle at 32.0 cm - avoiding")
//! through [`LogSink`]. The caller decides where the lines go: the `log`
//! facade, a plain vector, or a bounded window for a small display.

use std::collections::VecDeque;

pub trait LogSink {
    fn log(&mut self, message: &str);
}

/// Forwards every line to `log::info!`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogCrateSink;

impl LogSink for LogCrateSink {
    fn log(&mut self, message: &str) {
        log::info!("{message}");
    }
}

impl LogSink for Vec<String> {
    fn log(&mut self, message: &str) {
        self.push(message.to_owned());
    }
}

impl<L: LogSink + ?Sized> LogSink for &mut L {
    fn log(&mut self, message: &str) {
        (**self).log(message);
    }
}

/// Keeps only the most recent `capacity` lines.
#[derive(Debug, Clone)]
pub struct RollingLog {
    lines: VecDeque<String>,
    capacity: usize,
}

impl RollingLog {
    /// Lines that fit on the robot's status display.
    pub const DISPLAY_LINES: usize = 15;

    pub fn new(capacity: usize) -> Self {
        Self {
            lines: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Oldest first.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl Default for RollingLog {
    fn default() -> Self {
        Self::new(Self::DISPLAY_LINES)
    }
}

impl LogSink for RollingLog {
    fn log(&mut self, message: &str) {
        if self.capacity == 0 {
            return;
        }
        if self.lines.len() == self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(message.to_owned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec_collects_in_order() {
        let mut lines: Vec<String> = Vec::new();
        lines.log("a");
        lines.log("b");
        assert_eq!(lines, vec!["a", "b"]);
    }

    #[test]
    fn rolling_log_drops_oldest() {
        let mut log = RollingLog::new(2);
        for line in ["one", "two", "three"] {
            log.log(line);
        }
        assert_eq!(log.lines().collect::<Vec<_>>(), vec!["two", "three"]);
    }

    #[test]
    fn zero_capacity_keeps_nothing() {
        let mut log = RollingLog::new(0);
        log.log("dropped");
        assert!(log.is_empty());
    }

    #[test]
    fn default_fits_display() {
        let mut log = RollingLog::default();
        for i in 0..20 {
            log.log(&format!("line {i}"));
        }
        assert_eq!(log.len(), RollingLog::DISPLAY_LINES);
        assert_eq!(log.lines().next(), Some("line 5"));
    }
}
