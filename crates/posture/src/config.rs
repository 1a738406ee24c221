//! Posture validation configuration

use serde::{Deserialize, Serialize};

/// What to conclude about an arm the tracker cannot see
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnseenArmPolicy {
    /// Count it as straight as long as the other arm is visible
    #[default]
    Pass,
    /// Count it as bent
    Fail,
}

/// Posture validation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PostureConfig {
    /// Landmarks at or below this visibility are treated as missing
    pub min_visibility: f64,

    /// Elbow angle at or above which an arm counts as locked straight (degrees)
    pub elbow_straight_degrees: f64,

    /// Elbow angle at or above which form is still acceptable (degrees)
    pub elbow_acceptable_degrees: f64,

    /// Consecutive agreeing frames needed to change the reported elbow grade
    pub elbow_grade_streak: usize,

    /// Allowed spine angle drift from baseline (degrees)
    pub spine_drift_degrees: f64,

    /// Weight of each new spine sample in the baseline
    pub spine_baseline_alpha: f64,

    /// Hand placement tolerance (fraction of frame width)
    pub hand_tolerance: f64,

    /// Whether hand placement is part of the validity verdict
    pub hands_gate_validity: bool,

    /// Verdict for an arm whose landmarks are not visible
    pub unseen_arm: UnseenArmPolicy,
}

impl Default for PostureConfig {
    fn default() -> Self {
        Self {
            min_visibility: 0.5,
            elbow_straight_degrees: 160.0,
            elbow_acceptable_degrees: 135.0,
            elbow_grade_streak: 3,
            spine_drift_degrees: 15.0,
            spine_baseline_alpha: 0.1,
            hand_tolerance: 0.1,
            hands_gate_validity: false,
            unseen_arm: UnseenArmPolicy::Pass,
        }
    }
}

impl PostureConfig {
    /// Create forgiving config for untrained bystanders
    pub fn emergency() -> Self {
        Self {
            elbow_straight_degrees: 150.0,
            elbow_acceptable_degrees: 120.0,
            spine_drift_degrees: 25.0,
            hand_tolerance: 0.15,
            ..Default::default()
        }
    }

    /// Create strict config that also requires hands to be placed correctly
    pub fn strict() -> Self {
        Self {
            hands_gate_validity: true,
            unseen_arm: UnseenArmPolicy::Fail,
            ..Default::default()
        }
    }
}
