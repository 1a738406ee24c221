//! Rescuer state tracked across frames

use ring_buffer::RingBuffer;
use serde::{Deserialize, Serialize};
use smoothing::Ewma;

/// Three-tier elbow classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ElbowGrade {
    #[default]
    Good,
    Acceptable,
    Bad,
}

/// Debounced elbow grade: the reported grade only changes after a full
/// streak of identical classifications.
#[derive(Debug, Clone)]
pub struct ElbowGradeTracker {
    history: RingBuffer<ElbowGrade>,
    current: ElbowGrade,
}

impl ElbowGradeTracker {
    pub fn new(streak: usize) -> Self {
        Self {
            history: RingBuffer::new(streak.max(1)),
            current: ElbowGrade::Good,
        }
    }

    /// Record a raw classification and get the debounced grade
    pub fn update(&mut self, raw: ElbowGrade) -> ElbowGrade {
        self.history.push(raw);
        if self.history.all_equal_to(&raw) {
            self.current = raw;
        }
        self.current
    }

    pub fn current(&self) -> ElbowGrade {
        self.current
    }

    pub fn reset(&mut self) {
        self.history.clear();
        self.current = ElbowGrade::Good;
    }
}

/// Spine orientation baseline
#[derive(Debug, Clone)]
pub struct SpineBaseline {
    baseline: Ewma,
}

/// Result of comparing a spine sample against the baseline
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpineJudgment {
    /// First observation; it became the baseline
    Seeded,
    /// Absolute difference from the baseline before this sample was folded in
    Drift(f64),
}

impl SpineBaseline {
    pub fn new(alpha: f64) -> Self {
        Self {
            baseline: Ewma::new(alpha),
        }
    }

    /// Judge a spine angle against the baseline, then fold it in
    pub fn observe(&mut self, angle: f64) -> SpineJudgment {
        let judgment = match self.baseline.value() {
            Some(baseline) => SpineJudgment::Drift((angle - baseline).abs()),
            None => SpineJudgment::Seeded,
        };
        self.baseline.update(angle);
        judgment
    }

    pub fn value(&self) -> Option<f64> {
        self.baseline.value()
    }

    pub fn reset(&mut self) {
        self.baseline.reset();
    }
}
