//! Feedback Controller Implementation

use compression::RhythmZone;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Feedback configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackConfig {
    /// Minimum gap between posture warning tones (milliseconds)
    pub posture_cooldown_ms: u64,
    /// Minimum gap between rhythm advice messages (milliseconds)
    pub rhythm_cooldown_ms: u64,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            posture_cooldown_ms: 3000,
            rhythm_cooldown_ms: 3000,
        }
    }
}

impl FeedbackConfig {
    /// Quieter warnings for untrained bystanders
    pub fn emergency() -> Self {
        Self {
            posture_cooldown_ms: 5000,
            ..Default::default()
        }
    }
}

/// Kinds of coaching cue, each with its own cooldown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cue {
    PostureWarning,
    RhythmAdvice,
}

/// State of a cue
#[derive(Debug, Clone)]
pub struct CueState {
    /// Last time this cue was fired
    pub last_fired: Instant,
    /// Number of times fired
    pub fire_count: usize,
}

/// Rhythm advice for the rescuer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RhythmAdvice {
    pub zone: RhythmZone,
    pub rate_cpm: u32,
    pub message: String,
}

/// Cooldown gate for coaching cues
pub struct FeedbackController {
    config: FeedbackConfig,
    states: HashMap<Cue, CueState>,
}

impl FeedbackController {
    /// Create a new feedback controller
    pub fn new(config: FeedbackConfig) -> Self {
        info!("Creating feedback controller with config: {:?}", config);
        Self {
            config,
            states: HashMap::new(),
        }
    }

    fn cooldown(&self, cue: Cue) -> Duration {
        match cue {
            Cue::PostureWarning => Duration::from_millis(self.config.posture_cooldown_ms),
            Cue::RhythmAdvice => Duration::from_millis(self.config.rhythm_cooldown_ms),
        }
    }

    /// Check whether a cue is out of its cooldown period
    pub fn should_fire(&self, cue: Cue, now: Instant) -> bool {
        if let Some(state) = self.states.get(&cue) {
            if now.saturating_duration_since(state.last_fired) < self.cooldown(cue) {
                debug!("{:?} suppressed: in cooldown period", cue);
                return false;
            }
        }
        true
    }

    /// Record that a cue was fired
    pub fn record_fire(&mut self, cue: Cue, now: Instant) {
        let state = self.states.entry(cue).or_insert(CueState {
            last_fired: now,
            fire_count: 0,
        });
        state.last_fired = now;
        state.fire_count += 1;

        debug!("Cue recorded: {:?} (count: {})", cue, state.fire_count);
    }

    /// Whether a posture warning tone should sound now. Fires only for
    /// invalid posture outside the cooldown, and records the fire.
    pub fn maybe_fire(&mut self, posture_valid: bool, now: Instant) -> bool {
        if posture_valid || !self.should_fire(Cue::PostureWarning, now) {
            return false;
        }
        self.record_fire(Cue::PostureWarning, now);
        true
    }

    /// Rhythm advice for the current rate, if any is due. Advice is only
    /// given while posture is valid and a rate exists.
    pub fn maybe_advise(
        &mut self,
        zone: Option<RhythmZone>,
        rate_cpm: u32,
        posture_valid: bool,
        now: Instant,
    ) -> Option<RhythmAdvice> {
        let zone = zone.filter(|_| posture_valid)?;
        if !self.should_fire(Cue::RhythmAdvice, now) {
            return None;
        }
        self.record_fire(Cue::RhythmAdvice, now);
        Some(RhythmAdvice {
            zone,
            rate_cpm,
            message: zone.message().to_string(),
        })
    }

    /// State of a cue, if it has ever fired
    pub fn state(&self, cue: Cue) -> Option<&CueState> {
        self.states.get(&cue)
    }

    /// Times a cue has fired
    pub fn fire_count(&self, cue: Cue) -> usize {
        self.states.get(&cue).map_or(0, |s| s.fire_count)
    }

    /// Clear all cue states
    pub fn clear(&mut self) {
        self.states.clear();
    }
}

impl Default for FeedbackController {
    fn default() -> Self {
        Self::new(FeedbackConfig::default())
    }
}
