//! Compression analysis configuration

use serde::{Deserialize, Serialize};
use smoothing::SmoothingWindow;

/// Cycle detector configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressionConfig {
    /// Per-sample shoulder movement that starts or ends a cycle
    /// (fraction of frame height)
    pub motion_threshold: f64,

    /// Minimum trough-to-peak travel for a cycle to count
    pub min_depth: f64,

    /// Smoothing applied to the averaged shoulder height
    pub shoulder_window: SmoothingWindow,

    /// Discard cycles while posture is invalid
    pub require_valid_posture: bool,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            motion_threshold: 0.015,
            min_depth: 0.015,
            shoulder_window: SmoothingWindow::Frames(3),
            require_valid_posture: true,
        }
    }
}

impl CompressionConfig {
    /// Create forgiving config that counts every visible compression
    pub fn emergency() -> Self {
        Self {
            motion_threshold: 0.012,
            min_depth: 0.008,
            require_valid_posture: false,
            ..Default::default()
        }
    }
}

/// Rate window configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateConfig {
    /// How long compression timestamps are kept (milliseconds)
    pub window_ms: u64,

    /// Most recent events used for the rate
    pub max_events: usize,
}

impl Default for RateConfig {
    fn default() -> Self {
        Self {
            window_ms: 10_000,
            max_events: 10,
        }
    }
}

/// Target rhythm configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RhythmConfig {
    /// Target compression rate (cycles per minute)
    pub target_cpm: u32,

    /// Allowed deviation from target (cycles per minute)
    pub tolerance_cpm: u32,
}

impl Default for RhythmConfig {
    fn default() -> Self {
        Self {
            target_cpm: 110,
            tolerance_cpm: 10,
        }
    }
}
