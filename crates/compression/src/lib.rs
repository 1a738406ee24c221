//! Compression Cycle Analysis
//!
//! Turns the vertical shoulder signal into compression counts:
//! - Hysteresis cycle detection on doubly smoothed shoulder height
//! - Sliding-window compression rate (cycles per minute)
//! - Rhythm classification against a target rate

pub mod config;
pub mod detector;
pub mod rate;
pub mod rhythm;

pub use config::{CompressionConfig, RateConfig, RhythmConfig};
pub use detector::{CompressionCycleDetector, CompressionEvent, CyclePhase};
pub use rate::{RateEstimator, RateWindow};
pub use rhythm::RhythmZone;
