//! Body Landmark Frames
//!
//! Fixed-shape pose frames as emitted by a 33-keypoint pose estimator:
//! - Named landmark indices
//! - Frame validation (count, finiteness, visibility range)
//! - 2D joint geometry (three-point angles, midpoints, spine tilt)

pub mod frame;
pub mod geometry;

pub use frame::{Landmark, LandmarkFrame};
pub use geometry::{angle_at, midpoint, tilt_from_vertical, Point2};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of landmarks in every frame
pub const LANDMARK_COUNT: usize = 33;

/// Largest accepted absolute coordinate value.
/// Normalized coordinates beyond this are tracker garbage, not off-frame points.
pub const COORDINATE_LIMIT: f64 = 1.0e3;

/// Frame rejection reasons
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MalformedFrameError {
    #[error("Expected {expected} landmarks, got {actual}")]
    WrongLandmarkCount { expected: usize, actual: usize },

    #[error("Landmark {landmark} has non-finite {field}")]
    NonFinite { landmark: usize, field: &'static str },

    #[error("Landmark {landmark} {field} value {value} exceeds coordinate limit")]
    OutOfBounds {
        landmark: usize,
        field: &'static str,
        value: f64,
    },

    #[error("Landmark {landmark} visibility {value} is outside [0, 1]")]
    VisibilityOutOfRange { landmark: usize, value: f64 },
}

/// Landmark indices of the 33-point body topology.
///
/// Only the shoulders, elbows, wrists and hips are read by the analyzer; the
/// rest are kept so frames stay positionally intact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(usize)]
pub enum LandmarkId {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

impl LandmarkId {
    /// Position of this landmark within a frame
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Body side, used to address paired joints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn shoulder(self) -> LandmarkId {
        match self {
            Side::Left => LandmarkId::LeftShoulder,
            Side::Right => LandmarkId::RightShoulder,
        }
    }

    pub fn elbow(self) -> LandmarkId {
        match self {
            Side::Left => LandmarkId::LeftElbow,
            Side::Right => LandmarkId::RightElbow,
        }
    }

    pub fn wrist(self) -> LandmarkId {
        match self {
            Side::Left => LandmarkId::LeftWrist,
            Side::Right => LandmarkId::RightWrist,
        }
    }

    pub fn hip(self) -> LandmarkId {
        match self {
            Side::Left => LandmarkId::LeftHip,
            Side::Right => LandmarkId::RightHip,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landmark_indices() {
        assert_eq!(LandmarkId::LeftShoulder.index(), 11);
        assert_eq!(LandmarkId::RightShoulder.index(), 12);
        assert_eq!(LandmarkId::LeftElbow.index(), 13);
        assert_eq!(LandmarkId::RightElbow.index(), 14);
        assert_eq!(LandmarkId::LeftWrist.index(), 15);
        assert_eq!(LandmarkId::RightWrist.index(), 16);
        assert_eq!(LandmarkId::LeftHip.index(), 23);
        assert_eq!(LandmarkId::RightHip.index(), 24);
        assert_eq!(LandmarkId::RightFootIndex.index(), LANDMARK_COUNT - 1);
    }

    #[test]
    fn test_side_joints() {
        assert_eq!(Side::Left.elbow(), LandmarkId::LeftElbow);
        assert_eq!(Side::Right.wrist(), LandmarkId::RightWrist);
        assert_eq!(Side::Right.hip(), LandmarkId::RightHip);
    }
}
