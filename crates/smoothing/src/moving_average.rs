//! Scalar moving average

use std::time::Instant;

use ring_buffer::RingBuffer;

use crate::SmoothingWindow;

/// Sliding-window mean of a scalar signal
#[derive(Debug, Clone)]
pub struct MovingAverage {
    window: SmoothingWindow,
    samples: RingBuffer<(Instant, f64)>,
}

impl MovingAverage {
    /// Create a new moving average with the given window policy
    pub fn new(window: SmoothingWindow) -> Self {
        Self {
            samples: RingBuffer::new(window.capacity()),
            window,
        }
    }

    /// Add a sample and get the current mean
    pub fn update(&mut self, value: f64, now: Instant) -> f64 {
        self.samples.push((now, value));
        self.window.prune(&mut self.samples, now);

        let sum: f64 = self.samples.iter().map(|(_, v)| v).sum();
        sum / self.samples.len() as f64
    }

    /// Number of samples currently averaged
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Reset the filter
    pub fn reset(&mut self) {
        self.samples.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_warmup_uses_available_samples() {
        let mut avg = MovingAverage::new(SmoothingWindow::Frames(3));
        let now = Instant::now();

        assert!((avg.update(3.0, now) - 3.0).abs() < 1e-12);
        assert!((avg.update(6.0, now) - 4.5).abs() < 1e-12);
        assert!((avg.update(9.0, now) - 6.0).abs() < 1e-12);
        // 3.0 drops out
        assert!((avg.update(12.0, now) - 9.0).abs() < 1e-12);
    }

    #[test]
    fn test_span_window() {
        let mut avg = MovingAverage::new(SmoothingWindow::Span {
            span_ms: 100,
            max_frames: 8,
        });
        let start = Instant::now();
        avg.update(10.0, start);
        avg.update(20.0, start + Duration::from_millis(50));
        let mean = avg.update(30.0, start + Duration::from_millis(120));
        assert!((mean - 25.0).abs() < 1e-12);
    }

    #[test]
    fn test_reset() {
        let mut avg = MovingAverage::new(SmoothingWindow::Frames(3));
        let now = Instant::now();
        avg.update(1.0, now);
        avg.reset();
        assert!(avg.is_empty());
        assert!((avg.update(5.0, now) - 5.0).abs() < 1e-12);
    }
}
