//! Per-landmark moving average

use std::ops::Deref;
use std::time::Instant;

use landmarks::LandmarkFrame;
use ring_buffer::RingBuffer;
use serde::{Deserialize, Serialize};

use crate::SmoothingWindow;

/// A frame that has passed through a [`LandmarkSmoother`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SmoothedFrame(LandmarkFrame);

impl SmoothedFrame {
    /// Treat an already-filtered frame as smoothed
    pub fn from_raw(frame: LandmarkFrame) -> Self {
        Self(frame)
    }

    pub fn into_inner(self) -> LandmarkFrame {
        self.0
    }
}

impl Deref for SmoothedFrame {
    type Target = LandmarkFrame;

    fn deref(&self) -> &LandmarkFrame {
        &self.0
    }
}

/// Moving-average filter over recent raw frames.
///
/// x, y and z are averaged per landmark across the window; visibility is
/// always taken from the newest frame.
#[derive(Debug, Clone)]
pub struct LandmarkSmoother {
    window: SmoothingWindow,
    history: RingBuffer<(Instant, LandmarkFrame)>,
}

impl LandmarkSmoother {
    /// Create a smoother with the given window policy
    pub fn new(window: SmoothingWindow) -> Self {
        Self {
            history: RingBuffer::new(window.capacity()),
            window,
        }
    }

    /// Push a raw frame and get the smoothed frame
    pub fn smooth(&mut self, frame: &LandmarkFrame, now: Instant) -> SmoothedFrame {
        self.history.push((now, frame.clone()));
        self.window.prune(&mut self.history, now);

        // Nothing to average against yet
        if self.history.len() == 1 {
            return SmoothedFrame(frame.clone());
        }

        SmoothedFrame(frame.averaged_over(self.history.iter().map(|(_, f)| f)))
    }

    /// Frames currently averaged
    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Reset the smoother
    pub fn reset(&mut self) {
        self.history.clear();
    }
}

impl Default for LandmarkSmoother {
    fn default() -> Self {
        Self::new(SmoothingWindow::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use landmarks::{Landmark, LandmarkId};
    use proptest::prelude::*;
    use std::time::Duration;

    fn frame_with_x(x: f64, visibility: f64) -> LandmarkFrame {
        LandmarkFrame::filled(Landmark::new(x, 0.5, 0.0, visibility)).unwrap()
    }

    #[test]
    fn test_first_frame_passthrough() {
        let mut smoother = LandmarkSmoother::default();
        let frame = frame_with_x(0.123, 0.7);
        let out = smoother.smooth(&frame, Instant::now());
        assert_eq!(*out, frame);
    }

    #[test]
    fn test_mean_over_last_five() {
        let mut smoother = LandmarkSmoother::default();
        let start = Instant::now();

        let mut last = None;
        for (i, x) in [0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7].iter().enumerate() {
            let at = start + Duration::from_millis(33 * i as u64);
            last = Some(smoother.smooth(&frame_with_x(*x, 0.9), at));
        }

        // Window holds 0.3..=0.7
        let out = last.unwrap();
        assert!((out.get(LandmarkId::LeftWrist).x - 0.5).abs() < 1e-12);
        assert_eq!(smoother.len(), 5);
    }

    #[test]
    fn test_visibility_from_newest() {
        let mut smoother = LandmarkSmoother::default();
        let now = Instant::now();
        smoother.smooth(&frame_with_x(0.1, 0.9), now);
        let out = smoother.smooth(&frame_with_x(0.3, 0.2), now);
        assert_eq!(out.get(LandmarkId::Nose).visibility, 0.2);
        assert!((out.get(LandmarkId::Nose).x - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_span_window_drops_stale_frames() {
        let mut smoother = LandmarkSmoother::new(SmoothingWindow::Span {
            span_ms: 150,
            max_frames: 10,
        });
        let start = Instant::now();

        smoother.smooth(&frame_with_x(0.0, 0.9), start);
        smoother.smooth(&frame_with_x(0.2, 0.9), start + Duration::from_millis(100));
        let out = smoother.smooth(&frame_with_x(0.4, 0.9), start + Duration::from_millis(200));

        // The frame at t=0 is 200ms old and falls out
        assert_eq!(smoother.len(), 2);
        assert!((out.get(LandmarkId::Nose).x - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_span_window_keeps_newest_after_gap() {
        let mut smoother = LandmarkSmoother::new(SmoothingWindow::Span {
            span_ms: 100,
            max_frames: 10,
        });
        let start = Instant::now();
        smoother.smooth(&frame_with_x(0.0, 0.9), start);
        let frame = frame_with_x(0.8, 0.9);
        let out = smoother.smooth(&frame, start + Duration::from_secs(5));
        assert_eq!(*out, frame);
    }

    proptest! {
        #[test]
        fn prop_matches_trailing_mean(xs in proptest::collection::vec(0.0f64..1.0, 1..20)) {
            let mut smoother = LandmarkSmoother::default();
            let now = Instant::now();
            for (i, x) in xs.iter().enumerate() {
                let out = smoother.smooth(&frame_with_x(*x, 0.9), now);
                let start = (i + 1).saturating_sub(5);
                let window = &xs[start..=i];
                let expected = window.iter().sum::<f64>() / window.len() as f64;
                prop_assert!((out.get(LandmarkId::LeftShoulder).x - expected).abs() < 1e-9);
            }
        }
    }
}
