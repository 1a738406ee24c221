//! CPR Coaching Pipeline
//!
//! Turns a stream of body landmark frames into coaching output:
//! - Landmark smoothing
//! - Posture validation (arms, spine, hands)
//! - Compression counting and rate
//! - Cooldown-gated warning tones and rhythm advice

pub mod clock;
pub mod config;
pub mod events;
pub mod session;

pub use clock::{Clock, ManualClock, SystemClock};
pub use crate::config::AnalyzerConfig;
pub use events::{AnalyzerEvent, FrameReport, SessionSummary};
pub use session::{SessionWorker, TimedFrame};

use std::time::{Duration, Instant};

use alerting::{FeedbackController, Metronome, ToneRequest};
use compression::{CompressionCycleDetector, RateEstimator, RateWindow, RhythmZone};
use landmarks::{Landmark, LandmarkFrame, MalformedFrameError};
use posture::PostureValidator;
use smoothing::LandmarkSmoother;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Coaching pipeline error types
#[derive(Error, Debug)]
pub enum CoachError {
    #[error("Malformed frame: {0}")]
    MalformedFrame(#[from] MalformedFrameError),

    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),
}

#[derive(Debug, Default)]
struct SessionStats {
    first_frame: Option<Instant>,
    last_frame: Option<Instant>,
    frames_processed: u64,
    frames_rejected: u64,
    valid_posture_frames: u64,
    warnings_fired: u64,
    rhythm_advice_given: u64,
    last_rate_bpm: u32,
    depth_sum: f64,
}

/// One coaching session. Owns every piece of per-session state; feed it
/// frames in capture order.
pub struct CprAnalyzer<C: Clock = SystemClock> {
    config: AnalyzerConfig,
    clock: C,
    smoother: LandmarkSmoother,
    validator: PostureValidator,
    detector: CompressionCycleDetector,
    rate_window: RateWindow,
    estimator: RateEstimator,
    feedback: FeedbackController,
    metronome: Option<Metronome>,
    stats: SessionStats,
}

impl CprAnalyzer<SystemClock> {
    /// Create a new analyzer on the system clock
    pub fn new(config: AnalyzerConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> CprAnalyzer<C> {
    /// Create a new analyzer with an explicit time source
    pub fn with_clock(config: AnalyzerConfig, clock: C) -> Self {
        info!(
            "Creating CPR analyzer (smoothing: {:?}, posture gating: {})",
            config.smoothing, config.compression.require_valid_posture
        );

        Self {
            smoother: LandmarkSmoother::new(config.smoothing),
            validator: PostureValidator::new(config.posture.clone()),
            detector: CompressionCycleDetector::new(config.compression.clone()),
            rate_window: RateWindow::new(Duration::from_millis(config.rate.window_ms)),
            estimator: RateEstimator::new(&config.rate),
            feedback: FeedbackController::new(config.feedback.clone()),
            metronome: config
                .metronome
                .then(|| Metronome::new(config.rhythm.target_cpm)),
            stats: SessionStats::default(),
            clock,
            config,
        }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Process a frame stamped with the analyzer's clock
    pub fn process(&mut self, frame: &LandmarkFrame) -> FrameReport {
        let now = self.clock.now();
        self.process_at(frame, now)
    }

    /// Validate and process raw landmarks stamped with the analyzer's clock
    pub fn process_raw(&mut self, landmarks: Vec<Landmark>) -> Result<FrameReport, CoachError> {
        let now = self.clock.now();
        self.process_raw_at(landmarks, now)
    }

    /// Validate and process raw landmarks. A malformed frame is rejected
    /// before any analysis state changes.
    pub fn process_raw_at(
        &mut self,
        landmarks: Vec<Landmark>,
        now: Instant,
    ) -> Result<FrameReport, CoachError> {
        match LandmarkFrame::new(landmarks) {
            Ok(frame) => Ok(self.process_at(&frame, now)),
            Err(e) => {
                warn!("Rejected frame: {}", e);
                metrics::counter!("cpr_frames_rejected_total").increment(1);
                self.stats.frames_rejected += 1;
                Err(e.into())
            }
        }
    }

    /// Run one frame through the pipeline
    pub fn process_at(&mut self, frame: &LandmarkFrame, now: Instant) -> FrameReport {
        metrics::counter!("cpr_frames_processed_total").increment(1);

        let smoothed = self.smoother.smooth(frame, now);
        let posture = self.validator.validate(&smoothed);

        let compression = self.detector.observe(&smoothed, posture.is_valid, now);
        if let Some(event) = &compression {
            metrics::counter!("cpr_compressions_total").increment(1);
            self.rate_window.record(event.timestamp);
            self.stats.depth_sum += event.depth;
        }
        self.rate_window.prune(now);
        let rate_bpm = self.estimator.rate(&self.rate_window);
        let compression_count = self.detector.count();

        let mut events = vec![
            AnalyzerEvent::PostureUpdate {
                is_valid: posture.is_valid,
                message: posture.feedback_message.clone(),
            },
            AnalyzerEvent::CompressionUpdate {
                total_count: compression_count,
                rate_bpm,
            },
        ];

        if self.feedback.maybe_fire(posture.is_valid, now) {
            debug!("Posture warning: {}", posture.feedback_message);
            metrics::counter!("cpr_posture_warnings_total").increment(1);
            self.stats.warnings_fired += 1;
            events.push(AnalyzerEvent::WarningTone {
                tone: ToneRequest::posture_warning(),
            });
        }

        let zone = RhythmZone::classify(rate_bpm, &self.config.rhythm);
        if let Some(advice) = self.feedback.maybe_advise(zone, rate_bpm, posture.is_valid, now) {
            debug!("Rhythm advice at {} cpm: {:?}", rate_bpm, advice.zone);
            self.stats.rhythm_advice_given += 1;
            events.push(AnalyzerEvent::RhythmAdvice { advice });
        }

        if let Some(metronome) = self.metronome.as_mut() {
            metronome.start(now);
            if let Some(tone) = metronome.tick(now) {
                events.push(AnalyzerEvent::MetronomeBeat { tone });
            }
        }

        self.stats.first_frame.get_or_insert(now);
        self.stats.last_frame = Some(now);
        self.stats.frames_processed += 1;
        self.stats.last_rate_bpm = rate_bpm;
        if posture.is_valid {
            self.stats.valid_posture_frames += 1;
        }

        FrameReport {
            posture,
            compression_count,
            rate_bpm,
            compression,
            events,
        }
    }

    /// Total compressions so far
    pub fn compression_count(&self) -> u32 {
        self.detector.count()
    }

    /// Statistics for the session so far
    pub fn summary(&self) -> SessionSummary {
        let stats = &self.stats;
        let total_compressions = self.detector.count();

        let valid_posture_ratio = if stats.frames_processed > 0 {
            stats.valid_posture_frames as f64 / stats.frames_processed as f64
        } else {
            0.0
        };

        let duration_ms = match (stats.first_frame, stats.last_frame) {
            (Some(first), Some(last)) => last.saturating_duration_since(first).as_millis() as u64,
            _ => 0,
        };

        SessionSummary {
            total_compressions,
            frames_processed: stats.frames_processed,
            frames_rejected: stats.frames_rejected,
            valid_posture_frames: stats.valid_posture_frames,
            valid_posture_ratio,
            warnings_fired: stats.warnings_fired,
            rhythm_advice_given: stats.rhythm_advice_given,
            last_rate_bpm: stats.last_rate_bpm,
            mean_depth: (total_compressions > 0)
                .then(|| stats.depth_sum / total_compressions as f64),
            duration_ms,
        }
    }
}

impl Default for CprAnalyzer<SystemClock> {
    fn default() -> Self {
        Self::new(AnalyzerConfig::default())
    }
}
