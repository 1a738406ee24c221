//! Synthetic rescuer pose generator

use std::time::Duration;

use landmarks::{Landmark, LandmarkFrame, LandmarkId, MalformedFrameError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Rescuer behaviour to simulate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    /// Straight arms, steady torso, centered hands, target rate
    #[default]
    Correct,
    /// Elbows splayed outward
    BentArms,
    /// Torso rocks forward on every push
    BendingBack,
    /// Compressing at 1.5x the target rate
    WrongRhythm,
    /// Hands pushed off the chest center
    WrongHandPosition,
}

const VISIBLE: f64 = 0.99;
const HIDDEN: f64 = 0.1;

/// Straight-arm kneeling pose: shoulder, elbow, wrist per side
const LEFT_ARM: [(f64, f64); 3] = [(0.45, 0.35), (0.47, 0.475), (0.49, 0.60)];
const RIGHT_ARM: [(f64, f64); 3] = [(0.55, 0.35), (0.53, 0.475), (0.51, 0.60)];
const LEFT_HIP: (f64, f64) = (0.45, 0.70);
const RIGHT_HIP: (f64, f64) = (0.55, 0.70);

const ELBOW_SPLAY: f64 = 0.08;
const TORSO_SWAY: f64 = 0.2;
const HAND_SHIFT: f64 = 0.12;

/// Deterministic landmark stream for one scenario
pub struct PoseGenerator {
    scenario: Scenario,
    target_cpm: f64,
    amplitude: f64,
    noise: f64,
    rng: StdRng,
}

impl PoseGenerator {
    /// Create a generator with default stroke settings
    pub fn new(scenario: Scenario, seed: u64) -> Self {
        Self {
            scenario,
            target_cpm: 110.0,
            amplitude: 0.08,
            noise: 0.002,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn with_target_cpm(mut self, cpm: f64) -> Self {
        self.target_cpm = cpm;
        self
    }

    /// Vertical shoulder travel (fraction of frame height)
    pub fn with_amplitude(mut self, amplitude: f64) -> Self {
        self.amplitude = amplitude;
        self
    }

    /// Peak-to-peak jitter added to every visible coordinate
    pub fn with_noise(mut self, noise: f64) -> Self {
        self.noise = noise;
        self
    }

    pub fn scenario(&self) -> Scenario {
        self.scenario
    }

    /// Compression rate this scenario produces
    pub fn stroke_cpm(&self) -> f64 {
        match self.scenario {
            Scenario::WrongRhythm => self.target_cpm * 1.5,
            _ => self.target_cpm,
        }
    }

    /// Pose at `elapsed` into the session
    pub fn frame_at(&mut self, elapsed: Duration) -> Result<LandmarkFrame, MalformedFrameError> {
        let phase = (2.0 * std::f64::consts::PI * self.stroke_cpm() / 60.0 * elapsed.as_secs_f64()).sin();
        let push = self.amplitude * phase;

        let mut frame = LandmarkFrame::filled(Landmark::new(0.5, 0.5, 0.0, HIDDEN))?;

        let mut left = LEFT_ARM;
        let mut right = RIGHT_ARM;
        match self.scenario {
            Scenario::BentArms => {
                left[1].0 -= ELBOW_SPLAY;
                right[1].0 += ELBOW_SPLAY;
            }
            Scenario::BendingBack => {
                let sway = TORSO_SWAY * phase.max(0.0);
                for joint in left.iter_mut().chain(right.iter_mut()) {
                    joint.0 += sway;
                }
            }
            Scenario::WrongHandPosition => {
                for arm in [&mut left, &mut right] {
                    arm[1].0 += HAND_SHIFT / 2.0;
                    arm[2].0 += HAND_SHIFT;
                }
            }
            Scenario::Correct | Scenario::WrongRhythm => {}
        }

        let sides = [
            (left, [LandmarkId::LeftShoulder, LandmarkId::LeftElbow, LandmarkId::LeftWrist]),
            (right, [LandmarkId::RightShoulder, LandmarkId::RightElbow, LandmarkId::RightWrist]),
        ];
        for (joints, ids) in sides {
            for ((x, y), id) in joints.into_iter().zip(ids) {
                let landmark = self.jittered(x, y + push);
                frame.set(id, landmark)?;
            }
        }

        for (id, (x, y)) in [(LandmarkId::LeftHip, LEFT_HIP), (LandmarkId::RightHip, RIGHT_HIP)] {
            let landmark = self.jittered(x, y);
            frame.set(id, landmark)?;
        }

        Ok(frame)
    }

    fn jittered(&mut self, x: f64, y: f64) -> Landmark {
        let dx = (self.rng.gen::<f64>() - 0.5) * self.noise;
        let dy = (self.rng.gen::<f64>() - 0.5) * self.noise;
        Landmark::new(x + dx, y + dy, 0.0, VISIBLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use landmarks::angle_at;

    fn elbow_angle(frame: &LandmarkFrame) -> f64 {
        angle_at(
            frame.get(LandmarkId::LeftShoulder).xy(),
            frame.get(LandmarkId::LeftElbow).xy(),
            frame.get(LandmarkId::LeftWrist).xy(),
        )
        .unwrap()
    }

    #[test]
    fn test_same_seed_same_stream() {
        let mut a = PoseGenerator::new(Scenario::Correct, 7);
        let mut b = PoseGenerator::new(Scenario::Correct, 7);
        for i in 0..10 {
            let t = Duration::from_millis(33 * i);
            assert_eq!(a.frame_at(t).unwrap(), b.frame_at(t).unwrap());
        }
    }

    #[test]
    fn test_unused_landmarks_hidden() {
        let frame = PoseGenerator::new(Scenario::Correct, 1)
            .frame_at(Duration::ZERO)
            .unwrap();
        assert!(!frame.get(LandmarkId::Nose).is_visible(0.5));
        assert!(frame.get(LandmarkId::LeftShoulder).is_visible(0.5));
    }

    #[test]
    fn test_arm_geometry_per_scenario() {
        let at = Duration::from_millis(100);
        let straight = PoseGenerator::new(Scenario::Correct, 1).with_noise(0.0).frame_at(at).unwrap();
        let bent = PoseGenerator::new(Scenario::BentArms, 1).with_noise(0.0).frame_at(at).unwrap();
        let shifted = PoseGenerator::new(Scenario::WrongHandPosition, 1)
            .with_noise(0.0)
            .frame_at(at)
            .unwrap();

        assert!(elbow_angle(&straight) > 179.0);
        assert!(elbow_angle(&bent) < 120.0);
        assert!(elbow_angle(&shifted) > 179.0);
    }

    #[test]
    fn test_wrong_rhythm_is_faster() {
        let generator = PoseGenerator::new(Scenario::WrongRhythm, 1);
        assert_eq!(generator.stroke_cpm(), 165.0);
    }
}
