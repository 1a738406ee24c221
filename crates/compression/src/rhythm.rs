//! Rhythm classification against the target rate

use serde::{Deserialize, Serialize};

use crate::RhythmConfig;

/// Where a compression rate falls relative to the target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RhythmZone {
    TooSlow,
    OnTarget,
    TooFast,
}

impl RhythmZone {
    /// Classify a rate. A zero rate has no rhythm yet.
    pub fn classify(rate_cpm: u32, config: &RhythmConfig) -> Option<Self> {
        if rate_cpm == 0 {
            return None;
        }

        let difference = rate_cpm as i64 - config.target_cpm as i64;
        let tolerance = config.tolerance_cpm as i64;

        Some(if difference.abs() <= tolerance {
            RhythmZone::OnTarget
        } else if difference > tolerance {
            RhythmZone::TooFast
        } else {
            RhythmZone::TooSlow
        })
    }

    /// Coaching message for this zone
    pub fn message(&self) -> &'static str {
        match self {
            RhythmZone::TooSlow => "Push faster - increase your rate",
            RhythmZone::OnTarget => "Good rhythm - keep it steady",
            RhythmZone::TooFast => "Slow down - you're pushing too fast",
        }
    }
}
