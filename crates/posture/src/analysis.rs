//! Posture analysis results

use serde::{Deserialize, Serialize};

use crate::state::ElbowGrade;

/// Posture problems, in feedback priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PostureIssue {
    /// Neither arm is visible to the tracker
    ArmsNotVisible,

    /// At least one elbow is bent
    ArmsBent,

    /// Shoulders or hips are not visible
    TorsoNotVisible,

    /// Spine orientation drifted from its baseline (bending at the back)
    SpineUnstable,

    /// Hands apart or off the chest center
    HandsMisaligned,
}

impl PostureIssue {
    /// Coaching message for this issue
    pub fn message(&self) -> &'static str {
        match self {
            PostureIssue::ArmsNotVisible => "Position yourself so arms are in view",
            PostureIssue::ArmsBent => "Lock your elbows - keep arms straight",
            PostureIssue::TorsoNotVisible => "Keep shoulders and hips in view",
            PostureIssue::SpineUnstable => "Use your shoulders, not your back",
            PostureIssue::HandsMisaligned => "Place both hands at the center of the chest",
        }
    }
}

/// Message shown when no check fails
pub const GOOD_POSTURE_MESSAGE: &str = "Good posture - keep it up";

/// Arm straightness check
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArmReading {
    /// Left elbow angle (if the arm was visible)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left_angle: Option<f64>,

    /// Right elbow angle (if the arm was visible)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right_angle: Option<f64>,

    /// Whether any arm was visible
    pub any_visible: bool,

    /// Both arms straight
    pub straight: bool,
}

impl ArmReading {
    /// The smaller of the visible elbow angles
    pub fn worst_angle(&self) -> Option<f64> {
        match (self.left_angle, self.right_angle) {
            (Some(l), Some(r)) => Some(l.min(r)),
            (Some(a), None) | (None, Some(a)) => Some(a),
            (None, None) => None,
        }
    }
}

/// Spine stability check
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpineReading {
    /// Spine deviation from vertical (degrees)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub angle: Option<f64>,

    /// Difference from the smoothed baseline (degrees)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drift: Option<f64>,

    /// Whether shoulders and hips were visible
    pub visible: bool,

    pub stable: bool,
}

/// Hand placement check
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HandReading {
    /// Horizontal wrist-to-wrist distance
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wrist_distance: Option<f64>,

    /// Horizontal offset of the wrist midpoint from the shoulder midpoint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub center_offset: Option<f64>,

    pub aligned: bool,
}

/// Complete posture verdict for one frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostureState {
    pub arms_straight: bool,
    pub spine_stable: bool,
    pub hands_aligned: bool,

    /// Whether compressions may be counted
    pub is_valid: bool,

    /// Highest priority problem, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue: Option<PostureIssue>,

    /// Human-readable coaching message
    pub feedback_message: String,

    /// Debounced elbow grade (advisory)
    pub elbow_grade: ElbowGrade,

    pub arms: ArmReading,
    pub spine: SpineReading,
    pub hands: HandReading,
}

impl PostureState {
    /// Build the verdict from individual checks
    pub fn from_readings(
        arms: ArmReading,
        spine: SpineReading,
        hands: HandReading,
        elbow_grade: ElbowGrade,
        hands_gate_validity: bool,
    ) -> Self {
        let is_valid = arms.straight && spine.stable && (hands.aligned || !hands_gate_validity);

        // Priority: arms > spine > hands
        let issue = if !arms.straight {
            if arms.any_visible {
                Some(PostureIssue::ArmsBent)
            } else {
                Some(PostureIssue::ArmsNotVisible)
            }
        } else if !spine.stable {
            if spine.visible {
                Some(PostureIssue::SpineUnstable)
            } else {
                Some(PostureIssue::TorsoNotVisible)
            }
        } else if !hands.aligned {
            Some(PostureIssue::HandsMisaligned)
        } else {
            None
        };

        let feedback_message = issue
            .map(|i| i.message())
            .unwrap_or(GOOD_POSTURE_MESSAGE)
            .to_string();

        Self {
            arms_straight: arms.straight,
            spine_stable: spine.stable,
            hands_aligned: hands.aligned,
            is_valid,
            issue,
            feedback_message,
            elbow_grade,
            arms,
            spine,
            hands,
        }
    }
}
