//! Signal Smoothing
//!
//! Noise reduction for the pose stream:
//! - Per-landmark moving average over recent frames
//! - Scalar moving average (shoulder height)
//! - Exponentially weighted baselines (spine orientation)

mod ewma;
mod landmark;
mod moving_average;
mod window;

pub use ewma::Ewma;
pub use landmark::{LandmarkSmoother, SmoothedFrame};
pub use moving_average::MovingAverage;
pub use window::SmoothingWindow;
