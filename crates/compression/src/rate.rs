//! Sliding-window compression rate

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::RateConfig;

/// Timestamps of recent compressions, oldest first
#[derive(Debug, Clone)]
pub struct RateWindow {
    timestamps: VecDeque<Instant>,
    span: Duration,
}

impl RateWindow {
    pub fn new(span: Duration) -> Self {
        Self {
            timestamps: VecDeque::new(),
            span,
        }
    }

    /// Record a compression and drop entries that fell out of the window
    pub fn record(&mut self, at: Instant) {
        self.timestamps.push_back(at);
        self.prune(at);
    }

    /// Keep only timestamps strictly within the window ending at `now`
    pub fn prune(&mut self, now: Instant) {
        while let Some(oldest) = self.timestamps.front() {
            if now.saturating_duration_since(*oldest) < self.span {
                break;
            }
            self.timestamps.pop_front();
        }
    }

    pub fn timestamps(&self) -> impl DoubleEndedIterator<Item = &Instant> + ExactSizeIterator {
        self.timestamps.iter()
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn clear(&mut self) {
        self.timestamps.clear();
    }
}

impl Default for RateWindow {
    fn default() -> Self {
        Self::new(Duration::from_millis(RateConfig::default().window_ms))
    }
}

/// Converts event spacing into cycles per minute
#[derive(Debug, Clone)]
pub struct RateEstimator {
    max_events: usize,
}

impl RateEstimator {
    pub fn new(config: &RateConfig) -> Self {
        Self {
            max_events: config.max_events.max(2),
        }
    }

    /// Rate over the most recent events. Zero with fewer than two events
    /// or when they share a timestamp.
    pub fn rate(&self, window: &RateWindow) -> u32 {
        let n = window.len().min(self.max_events);
        if n < 2 {
            return 0;
        }

        let mut recent = window.timestamps().skip(window.len() - n);
        let (Some(first), Some(last)) = (recent.next(), recent.last()) else {
            return 0;
        };

        let elapsed_ms = last.saturating_duration_since(*first).as_secs_f64() * 1000.0;
        if elapsed_ms <= 0.0 {
            return 0;
        }

        ((n - 1) as f64 / elapsed_ms * 60_000.0).round() as u32
    }
}

impl Default for RateEstimator {
    fn default() -> Self {
        Self::new(&RateConfig::default())
    }
}
