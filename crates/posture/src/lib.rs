//! CPR Posture Validation
//!
//! Judges rescuer form from smoothed body landmarks:
//! - Arm straightness (elbow angle)
//! - Spine stability (drift of torso orientation from its baseline)
//! - Hand placement (wrists together, centered under the shoulders)

pub mod analysis;
pub mod config;
pub mod state;

pub use analysis::{ArmReading, HandReading, PostureIssue, PostureState, SpineReading, GOOD_POSTURE_MESSAGE};
pub use config::{PostureConfig, UnseenArmPolicy};
pub use state::{ElbowGrade, ElbowGradeTracker, SpineBaseline, SpineJudgment};

use landmarks::{angle_at, midpoint, tilt_from_vertical, LandmarkFrame, LandmarkId, Side};
use smoothing::SmoothedFrame;
use tracing::debug;

/// Posture validator. Holds the spine baseline and elbow grade history for
/// one session.
pub struct PostureValidator {
    config: PostureConfig,
    spine: SpineBaseline,
    elbow_grade: ElbowGradeTracker,
}

impl PostureValidator {
    /// Create a new validator with configuration
    pub fn new(config: PostureConfig) -> Self {
        Self {
            spine: SpineBaseline::new(config.spine_baseline_alpha),
            elbow_grade: ElbowGradeTracker::new(config.elbow_grade_streak),
            config,
        }
    }

    pub fn config(&self) -> &PostureConfig {
        &self.config
    }

    /// Validate posture for a single smoothed frame
    pub fn validate(&mut self, frame: &SmoothedFrame) -> PostureState {
        let arms = self.check_arms(frame);
        let spine = self.check_spine(frame);
        let hands = self.check_hands(frame);

        let raw_grade = arms
            .worst_angle()
            .map_or(ElbowGrade::Acceptable, |angle| self.grade(angle));
        let elbow_grade = self.elbow_grade.update(raw_grade);

        PostureState::from_readings(arms, spine, hands, elbow_grade, self.config.hands_gate_validity)
    }

    fn visible(&self, frame: &LandmarkFrame, ids: &[LandmarkId]) -> bool {
        ids.iter()
            .all(|id| frame.get(*id).is_visible(self.config.min_visibility))
    }

    fn grade(&self, angle: f64) -> ElbowGrade {
        if angle >= self.config.elbow_straight_degrees {
            ElbowGrade::Good
        } else if angle >= self.config.elbow_acceptable_degrees {
            ElbowGrade::Acceptable
        } else {
            ElbowGrade::Bad
        }
    }

    /// Elbow angle of one arm, or `None` if the arm is not fully visible.
    /// A visible arm with collapsed geometry reports 0 degrees.
    fn elbow_angle(&self, frame: &LandmarkFrame, side: Side) -> Option<f64> {
        if !self.visible(frame, &[side.shoulder(), side.elbow(), side.wrist()]) {
            return None;
        }
        let angle = angle_at(
            frame.get(side.shoulder()).xy(),
            frame.get(side.elbow()).xy(),
            frame.get(side.wrist()).xy(),
        );
        Some(angle.unwrap_or(0.0))
    }

    fn check_arms(&self, frame: &LandmarkFrame) -> ArmReading {
        let left_angle = self.elbow_angle(frame, Side::Left);
        let right_angle = self.elbow_angle(frame, Side::Right);

        if left_angle.is_none() && right_angle.is_none() {
            return ArmReading::default();
        }

        let unseen_passes = self.config.unseen_arm == UnseenArmPolicy::Pass;
        let arm_ok = |angle: Option<f64>| match angle {
            Some(a) => a >= self.config.elbow_straight_degrees,
            None => unseen_passes,
        };

        ArmReading {
            straight: arm_ok(left_angle) && arm_ok(right_angle),
            left_angle,
            right_angle,
            any_visible: true,
        }
    }

    fn check_spine(&mut self, frame: &LandmarkFrame) -> SpineReading {
        let torso = [
            LandmarkId::LeftShoulder,
            LandmarkId::RightShoulder,
            LandmarkId::LeftHip,
            LandmarkId::RightHip,
        ];
        if !self.visible(frame, &torso) {
            return SpineReading::default();
        }

        let shoulders = midpoint(
            frame.get(LandmarkId::LeftShoulder).xy(),
            frame.get(LandmarkId::RightShoulder).xy(),
        );
        let hips = midpoint(
            frame.get(LandmarkId::LeftHip).xy(),
            frame.get(LandmarkId::RightHip).xy(),
        );
        let angle = tilt_from_vertical(shoulders, hips);

        match self.spine.observe(angle) {
            SpineJudgment::Seeded => {
                debug!("Spine baseline seeded at {:.1} deg", angle);
                SpineReading {
                    angle: Some(angle),
                    drift: None,
                    visible: true,
                    stable: true,
                }
            }
            SpineJudgment::Drift(drift) => SpineReading {
                angle: Some(angle),
                drift: Some(drift),
                visible: true,
                stable: drift < self.config.spine_drift_degrees,
            },
        }
    }

    fn check_hands(&self, frame: &LandmarkFrame) -> HandReading {
        let ids = [
            LandmarkId::LeftWrist,
            LandmarkId::RightWrist,
            LandmarkId::LeftShoulder,
            LandmarkId::RightShoulder,
        ];
        // Hands that cannot be seen are not penalized
        if !self.visible(frame, &ids) {
            return HandReading {
                aligned: true,
                ..Default::default()
            };
        }

        let left = frame.get(LandmarkId::LeftWrist).xy();
        let right = frame.get(LandmarkId::RightWrist).xy();
        let wrists = midpoint(left, right);
        let shoulders = midpoint(
            frame.get(LandmarkId::LeftShoulder).xy(),
            frame.get(LandmarkId::RightShoulder).xy(),
        );

        let wrist_distance = (left.x - right.x).abs();
        let center_offset = (wrists.x - shoulders.x).abs();

        HandReading {
            wrist_distance: Some(wrist_distance),
            center_offset: Some(center_offset),
            aligned: wrist_distance < self.config.hand_tolerance
                && center_offset < self.config.hand_tolerance,
        }
    }

    /// Forget the spine baseline and elbow history
    pub fn reset(&mut self) {
        self.spine.reset();
        self.elbow_grade.reset();
    }
}

impl Default for PostureValidator {
    fn default() -> Self {
        Self::new(PostureConfig::default())
    }
}
