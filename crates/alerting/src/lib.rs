//! Feedback System
//!
//! Decides when coaching cues should sound. Playback itself belongs to the
//! host; this crate only emits requests.

mod controller;
mod tone;

pub use controller::{Cue, CueState, FeedbackConfig, FeedbackController, RhythmAdvice};
pub use tone::{Metronome, ToneRequest};
