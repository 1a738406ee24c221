//! Tone requests and the rhythm metronome

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::debug;

/// A short sine tone for the host's audio output. Gain decays
/// exponentially from `start_gain` to `end_gain` over the duration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToneRequest {
    pub frequency_hz: f64,
    pub duration_ms: u64,
    pub start_gain: f64,
    pub end_gain: f64,
}

impl ToneRequest {
    /// Posture warning beep
    pub fn posture_warning() -> Self {
        Self {
            frequency_hz: 800.0,
            duration_ms: 200,
            start_gain: 0.3,
            end_gain: 0.01,
        }
    }

    /// Metronome click
    pub fn metronome_beat() -> Self {
        Self {
            frequency_hz: 1000.0,
            duration_ms: 100,
            start_gain: 0.2,
            end_gain: 0.01,
        }
    }

    /// Gain at `elapsed` into the tone. Silent once the tone has ended.
    pub fn gain_at(&self, elapsed: Duration) -> f64 {
        let total = self.duration_ms as f64;
        let t = elapsed.as_secs_f64() * 1000.0;
        if total <= 0.0 || t >= total {
            return 0.0;
        }
        self.start_gain * (self.end_gain / self.start_gain).powf(t / total)
    }
}

/// Polled beat clock at the target compression rate
#[derive(Debug, Clone)]
pub struct Metronome {
    interval: Duration,
    next_beat: Option<Instant>,
    beats: u64,
}

impl Metronome {
    /// Create a stopped metronome at `rate_cpm` beats per minute
    pub fn new(rate_cpm: u32) -> Self {
        Self {
            interval: Duration::from_secs_f64(60.0 / rate_cpm.max(1) as f64),
            next_beat: None,
            beats: 0,
        }
    }

    /// Start beating. The first beat is due one interval after `now`.
    pub fn start(&mut self, now: Instant) {
        if self.next_beat.is_none() {
            debug!("Metronome started ({:?} per beat)", self.interval);
            self.next_beat = Some(now + self.interval);
        }
    }

    pub fn stop(&mut self) {
        self.next_beat = None;
    }

    pub fn is_running(&self) -> bool {
        self.next_beat.is_some()
    }

    /// Beat due at `now`, if any. Missed beats are skipped rather than
    /// replayed in a burst.
    pub fn tick(&mut self, now: Instant) -> Option<ToneRequest> {
        let due = self.next_beat?;
        if now < due {
            return None;
        }

        let mut next = due + self.interval;
        while next <= now {
            next += self.interval;
        }
        self.next_beat = Some(next);
        self.beats += 1;
        Some(ToneRequest::metronome_beat())
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Beats emitted since creation
    pub fn beats(&self) -> u64 {
        self.beats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_tone_envelope() {
        let tone = ToneRequest::posture_warning();
        assert_eq!(tone.frequency_hz, 800.0);
        assert!((tone.gain_at(Duration::ZERO) - 0.3).abs() < 1e-12);

        let mid = tone.gain_at(Duration::from_millis(100));
        assert!(mid < 0.3 && mid > 0.01);
        assert_eq!(tone.gain_at(Duration::from_millis(200)), 0.0);
    }

    #[test]
    fn test_metronome_interval() {
        let metronome = Metronome::new(120);
        assert_eq!(metronome.interval(), Duration::from_millis(500));
    }

    #[test]
    fn test_metronome_beats() {
        let mut metronome = Metronome::new(120);
        let t0 = Instant::now();
        assert!(metronome.tick(t0).is_none());

        metronome.start(t0);
        assert!(metronome.tick(t0 + Duration::from_millis(400)).is_none());
        assert!(metronome.tick(t0 + Duration::from_millis(500)).is_some());
        assert!(metronome.tick(t0 + Duration::from_millis(600)).is_none());
        assert!(metronome.tick(t0 + Duration::from_millis(1000)).is_some());
        assert_eq!(metronome.beats(), 2);
    }

    #[test]
    fn test_metronome_skips_missed_beats() {
        let mut metronome = Metronome::new(120);
        let t0 = Instant::now();
        metronome.start(t0);

        assert!(metronome.tick(t0 + Duration::from_millis(2600)).is_some());
        assert!(metronome.tick(t0 + Duration::from_millis(2700)).is_none());
        assert!(metronome.tick(t0 + Duration::from_millis(3000)).is_some());
        assert_eq!(metronome.beats(), 2);

        metronome.stop();
        assert!(!metronome.is_running());
        assert!(metronome.tick(t0 + Duration::from_secs(10)).is_none());
    }
}
