//! Landmark and frame types

use serde::{Deserialize, Serialize};

use crate::geometry::Point2;
use crate::{LandmarkId, MalformedFrameError, COORDINATE_LIMIT, LANDMARK_COUNT};

/// A single tracked body keypoint
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    /// Horizontal position, normalized to frame width
    pub x: f64,
    /// Vertical position, normalized to frame height (grows downward)
    pub y: f64,
    /// Depth relative to the hips
    pub z: f64,
    /// Detection confidence (0-1)
    pub visibility: f64,
}

impl Landmark {
    pub fn new(x: f64, y: f64, z: f64, visibility: f64) -> Self {
        Self { x, y, z, visibility }
    }

    /// Screen-plane position
    pub fn xy(&self) -> Point2 {
        Point2::new(self.x, self.y)
    }

    /// Whether confidence is strictly above `threshold`
    pub fn is_visible(&self, threshold: f64) -> bool {
        self.visibility > threshold
    }

    fn validate(&self, landmark: usize) -> Result<(), MalformedFrameError> {
        for (field, value) in [("x", self.x), ("y", self.y), ("z", self.z)] {
            if !value.is_finite() {
                return Err(MalformedFrameError::NonFinite { landmark, field });
            }
            if value.abs() > COORDINATE_LIMIT {
                return Err(MalformedFrameError::OutOfBounds {
                    landmark,
                    field,
                    value,
                });
            }
        }

        if !self.visibility.is_finite() {
            return Err(MalformedFrameError::NonFinite {
                landmark,
                field: "visibility",
            });
        }
        if !(0.0..=1.0).contains(&self.visibility) {
            return Err(MalformedFrameError::VisibilityOutOfRange {
                landmark,
                value: self.visibility,
            });
        }

        Ok(())
    }
}

/// A validated frame of exactly [`LANDMARK_COUNT`] landmarks.
///
/// Every coordinate is finite and bounded and every visibility lies in [0, 1];
/// the only way to obtain a frame is through validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Landmark>", into = "Vec<Landmark>")]
pub struct LandmarkFrame {
    points: Vec<Landmark>,
}

impl LandmarkFrame {
    /// Validate raw estimator output into a frame
    pub fn new(points: Vec<Landmark>) -> Result<Self, MalformedFrameError> {
        if points.len() != LANDMARK_COUNT {
            return Err(MalformedFrameError::WrongLandmarkCount {
                expected: LANDMARK_COUNT,
                actual: points.len(),
            });
        }

        for (index, point) in points.iter().enumerate() {
            point.validate(index)?;
        }

        Ok(Self { points })
    }

    /// Frame with every slot set to the same landmark
    pub fn filled(landmark: Landmark) -> Result<Self, MalformedFrameError> {
        Self::new(vec![landmark; LANDMARK_COUNT])
    }

    /// Get a landmark by name
    pub fn get(&self, id: LandmarkId) -> &Landmark {
        &self.points[id.index()]
    }

    /// Replace a single landmark, validating it first
    pub fn set(&mut self, id: LandmarkId, landmark: Landmark) -> Result<(), MalformedFrameError> {
        landmark.validate(id.index())?;
        self.points[id.index()] = landmark;
        Ok(())
    }

    /// All landmarks in index order
    pub fn landmarks(&self) -> &[Landmark] {
        &self.points
    }

    /// Mean x/y/z of `history` per landmark, keeping this frame's visibility.
    ///
    /// Returns a copy of `self` when `history` is empty.
    pub fn averaged_over<'a, I>(&self, history: I) -> LandmarkFrame
    where
        I: IntoIterator<Item = &'a LandmarkFrame>,
    {
        let mut sums = vec![[0.0f64; 3]; LANDMARK_COUNT];
        let mut count = 0usize;

        for frame in history {
            for (sum, point) in sums.iter_mut().zip(frame.points.iter()) {
                sum[0] += point.x;
                sum[1] += point.y;
                sum[2] += point.z;
            }
            count += 1;
        }

        if count == 0 {
            return self.clone();
        }

        let n = count as f64;
        let points = self
            .points
            .iter()
            .zip(sums.iter())
            .map(|(latest, sum)| Landmark {
                x: sum[0] / n,
                y: sum[1] / n,
                z: sum[2] / n,
                visibility: latest.visibility,
            })
            .collect();

        // Means of bounded finite values stay bounded and finite
        Self { points }
    }
}

impl TryFrom<Vec<Landmark>> for LandmarkFrame {
    type Error = MalformedFrameError;

    fn try_from(points: Vec<Landmark>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

impl From<LandmarkFrame> for Vec<Landmark> {
    fn from(frame: LandmarkFrame) -> Self {
        frame.points
    }
}
