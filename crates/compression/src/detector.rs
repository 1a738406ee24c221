//! Hysteresis compression cycle detector

use std::time::Instant;

use landmarks::LandmarkId;
use serde::{Deserialize, Serialize};
use smoothing::{MovingAverage, SmoothedFrame};
use tracing::debug;

use crate::CompressionConfig;

/// Detector phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CyclePhase {
    #[default]
    Neutral,
    /// Shoulders are travelling down
    Compressing,
}

/// A counted compression
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompressionEvent {
    /// When the release was detected
    pub timestamp: Instant,

    /// Shoulder travel for this cycle (fraction of frame height)
    pub depth: f64,

    /// Running total including this event
    pub count: u32,
}

/// Extremes of the current cycle. Y grows downward, so `peak_y` is the
/// highest shoulder position and `trough_y` the lowest.
#[derive(Debug, Clone, Copy)]
struct CycleTrack {
    last_y: f64,
    peak_y: f64,
    trough_y: f64,
}

/// Two-state hysteresis machine over shoulder height
pub struct CompressionCycleDetector {
    config: CompressionConfig,
    shoulder_y: MovingAverage,
    phase: CyclePhase,
    track: Option<CycleTrack>,
    count: u32,
}

impl CompressionCycleDetector {
    /// Create a new detector with configuration
    pub fn new(config: CompressionConfig) -> Self {
        Self {
            shoulder_y: MovingAverage::new(config.shoulder_window),
            phase: CyclePhase::Neutral,
            track: None,
            count: 0,
            config,
        }
    }

    /// Feed one smoothed frame. Returns an event when a cycle completes.
    pub fn observe(
        &mut self,
        frame: &SmoothedFrame,
        posture_valid: bool,
        now: Instant,
    ) -> Option<CompressionEvent> {
        if self.config.require_valid_posture && !posture_valid {
            self.discard();
            return None;
        }

        let avg_shoulder_y = (frame.get(LandmarkId::LeftShoulder).y
            + frame.get(LandmarkId::RightShoulder).y)
            / 2.0;
        let y = self.shoulder_y.update(avg_shoulder_y, now);

        let Some(track) = self.track.as_mut() else {
            self.track = Some(CycleTrack {
                last_y: y,
                peak_y: y,
                trough_y: y,
            });
            return None;
        };

        let delta_y = y - track.last_y;
        let threshold = self.config.motion_threshold;
        let mut event = None;

        if delta_y > threshold && self.phase == CyclePhase::Neutral {
            self.phase = CyclePhase::Compressing;
            track.peak_y = y;
        } else if delta_y < -threshold && self.phase == CyclePhase::Compressing {
            // Depth is judged on the extremes reached before this release sample
            let depth = track.trough_y - track.peak_y;
            self.phase = CyclePhase::Neutral;

            if depth > self.config.min_depth {
                self.count += 1;
                track.trough_y = y;
                debug!("Compression detected (count: {}, depth: {:.4})", self.count, depth);
                event = Some(CompressionEvent {
                    timestamp: now,
                    depth,
                    count: self.count,
                });
            } else {
                debug!("Shallow cycle rejected as noise (depth: {:.4})", depth);
            }
        }

        track.peak_y = track.peak_y.min(y);
        track.trough_y = track.trough_y.max(y);
        track.last_y = y;

        debug_assert!(track.peak_y <= track.trough_y);
        event
    }

    /// Drop any in-progress cycle. The next observed frame re-seeds tracking.
    pub fn discard(&mut self) {
        if self.phase == CyclePhase::Compressing {
            debug!("Discarding in-progress compression");
        }
        self.phase = CyclePhase::Neutral;
        self.track = None;
        self.shoulder_y.reset();
    }

    /// Current phase
    pub fn phase(&self) -> CyclePhase {
        self.phase
    }

    /// Total compressions counted
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Highest shoulder position of the current cycle, if tracking
    pub fn peak_y(&self) -> Option<f64> {
        self.track.map(|t| t.peak_y)
    }

    /// Lowest shoulder position of the current cycle, if tracking
    pub fn trough_y(&self) -> Option<f64> {
        self.track.map(|t| t.trough_y)
    }

    /// Reset detector state and the running count
    pub fn reset(&mut self) {
        self.discard();
        self.count = 0;
    }
}

impl Default for CompressionCycleDetector {
    fn default() -> Self {
        Self::new(CompressionConfig::default())
    }
}
