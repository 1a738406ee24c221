//! CPR Pose Simulator
//!
//! Drives the coaching pipeline with synthetic rescuer poses, for demos
//! and tuning without a camera.
//!
//! Configuration is read from an optional TOML file: analyzer settings at
//! the top level, simulator settings under `[simulation]`. Environment
//! variables override both, e.g. `CPR_SIMULATION__SCENARIO=bent_arms`.

pub mod generator;

pub use generator::{PoseGenerator, Scenario};

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use coach::{
    AnalyzerConfig, AnalyzerEvent, Clock, CoachError, CprAnalyzer, ManualClock, SessionSummary,
    SessionWorker, TimedFrame,
};
use landmarks::MalformedFrameError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

/// Simulator error types
#[derive(Error, Debug)]
pub enum SimulatorError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Analyzer error: {0}")]
    Coach(#[from] CoachError),

    #[error("Generated frame rejected: {0}")]
    Frame(#[from] MalformedFrameError),

    #[error("Session worker stopped early")]
    WorkerStopped,

    #[error("Session task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("Serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Simulation run settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub scenario: Scenario,
    pub duration_secs: f64,
    pub fps: f64,

    /// Stroke rate for the generated poses. Also becomes the analyzer's
    /// rhythm target when set; otherwise `[rhythm] target_cpm` is used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_cpm: Option<f64>,

    pub amplitude: f64,
    pub noise: f64,
    pub seed: u64,

    /// Start from the emergency analyzer profile
    pub emergency: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            scenario: Scenario::Correct,
            duration_secs: 30.0,
            fps: 30.0,
            target_cpm: None,
            amplitude: 0.08,
            noise: 0.002,
            seed: 42,
            emergency: false,
        }
    }
}

impl SimulationConfig {
    /// Read the `[simulation]` table from the file and environment
    pub fn load(path: Option<&Path>) -> Result<Self, SimulatorError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        }
        let settings = builder
            .add_source(
                config::Environment::with_prefix(coach::config::ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        match settings.get::<SimulationConfig>("simulation") {
            Ok(config) => Ok(config),
            Err(config::ConfigError::NotFound(_)) => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Analyzer settings for this run, layered over the chosen profile
    pub fn analyzer_config(&self, path: Option<&Path>) -> Result<AnalyzerConfig, SimulatorError> {
        let base = if self.emergency {
            AnalyzerConfig::emergency()
        } else {
            AnalyzerConfig::default()
        };
        let mut config = AnalyzerConfig::load_over(base, path)?;
        if let Some(cpm) = self.target_cpm {
            config.rhythm.target_cpm = cpm.round() as u32;
        }
        Ok(config)
    }

    fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.fps.max(1.0))
    }

    fn frame_count(&self) -> u64 {
        (self.duration_secs.max(0.0) * self.fps.max(1.0)).round() as u64
    }
}

/// Simulation result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationReport {
    pub scenario: Scenario,
    pub summary: SessionSummary,

    /// Most frequent coaching message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dominant_message: Option<String>,

    /// Event counts by kind
    pub events: HashMap<String, u64>,
}

/// Initialize logging
pub fn init_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}

/// Run one simulated session through a session worker
pub async fn run_simulation(
    sim: &SimulationConfig,
    analyzer_config: AnalyzerConfig,
) -> Result<SimulationReport, SimulatorError> {
    info!(
        "Simulating {:?}: {:.0}s at {} fps, seed {}",
        sim.scenario, sim.duration_secs, sim.fps, sim.seed
    );

    let stroke_cpm = sim
        .target_cpm
        .unwrap_or(f64::from(analyzer_config.rhythm.target_cpm));
    let clock = ManualClock::new();
    let analyzer = CprAnalyzer::with_clock(analyzer_config, clock.clone());
    let (frames, mut events, worker) = SessionWorker::channel_with(analyzer, 64);
    let session = tokio::spawn(worker.run());

    let collector = tokio::spawn(async move {
        let mut counts: HashMap<String, u64> = HashMap::new();
        let mut messages: HashMap<String, u64> = HashMap::new();
        while let Some(event) = events.recv().await {
            let kind = match &event {
                AnalyzerEvent::PostureUpdate { message, .. } => {
                    *messages.entry(message.clone()).or_default() += 1;
                    "posture_update"
                }
                AnalyzerEvent::CompressionUpdate { .. } => "compression_update",
                AnalyzerEvent::WarningTone { .. } => "warning_tone",
                AnalyzerEvent::RhythmAdvice { advice } => {
                    debug!("Rhythm advice: {}", advice.message);
                    "rhythm_advice"
                }
                AnalyzerEvent::MetronomeBeat { .. } => "metronome_beat",
            };
            *counts.entry(kind.to_string()).or_default() += 1;
        }
        let dominant = messages
            .into_iter()
            .max_by_key(|(_, n)| *n)
            .map(|(message, _)| message);
        (counts, dominant)
    });

    let mut generator = PoseGenerator::new(sim.scenario, sim.seed)
        .with_target_cpm(stroke_cpm)
        .with_amplitude(sim.amplitude)
        .with_noise(sim.noise);

    let interval = sim.frame_interval();
    for _ in 0..sim.frame_count() {
        let frame = generator.frame_at(clock.elapsed())?;
        frames
            .send(TimedFrame::from((frame, clock.now())))
            .await
            .map_err(|_| SimulatorError::WorkerStopped)?;
        clock.advance(interval);
    }
    drop(frames);

    let summary = session.await?;
    let (events, dominant_message) = collector.await?;

    Ok(SimulationReport {
        scenario: sim.scenario,
        summary,
        dominant_message,
        events,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn short_run(scenario: Scenario) -> SimulationConfig {
        SimulationConfig {
            scenario,
            duration_secs: 12.0,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_correct_form_counts_at_target() {
        let sim = short_run(Scenario::Correct);
        let report = run_simulation(&sim, AnalyzerConfig::default()).await.unwrap();

        let summary = &report.summary;
        assert!(summary.total_compressions >= 18, "{:?}", summary);
        assert!((100..=120).contains(&summary.last_rate_bpm), "{:?}", summary);
        assert!(summary.valid_posture_ratio > 0.95);
        assert_eq!(summary.frames_rejected, 0);
        assert_eq!(report.events.get("posture_update"), Some(&360));
    }

    #[tokio::test]
    async fn test_bent_arms_blocks_counting() {
        let sim = short_run(Scenario::BentArms);
        let report = run_simulation(&sim, AnalyzerConfig::default()).await.unwrap();

        assert_eq!(report.summary.total_compressions, 0);
        assert!(report.summary.warnings_fired >= 3);
        assert_eq!(
            report.dominant_message.as_deref(),
            Some(posture::PostureIssue::ArmsBent.message())
        );
    }

    #[tokio::test]
    async fn test_wrong_rhythm_reads_fast() {
        let sim = short_run(Scenario::WrongRhythm);
        let report = run_simulation(&sim, AnalyzerConfig::default()).await.unwrap();

        assert!(report.summary.last_rate_bpm > 150, "{:?}", report.summary);
        assert!(report.events.get("rhythm_advice").copied().unwrap_or(0) > 0);
    }

    #[tokio::test]
    async fn test_hand_position_is_advisory() {
        let sim = short_run(Scenario::WrongHandPosition);
        let report = run_simulation(&sim, AnalyzerConfig::default()).await.unwrap();

        assert!(report.summary.total_compressions >= 18);
        assert_eq!(
            report.dominant_message.as_deref(),
            Some(posture::PostureIssue::HandsMisaligned.message())
        );
    }

    #[tokio::test]
    async fn test_bending_back_breaks_posture() {
        let sim = short_run(Scenario::BendingBack);
        let report = run_simulation(&sim, AnalyzerConfig::default()).await.unwrap();

        assert!(report.summary.warnings_fired > 0);
        assert!(report.summary.valid_posture_ratio < 1.0);
    }

    #[test]
    fn test_missing_simulation_table_uses_defaults() {
        let config = SimulationConfig::load(None).unwrap();
        assert_eq!(config.fps, SimulationConfig::default().fps);
        assert_eq!(config.target_cpm, None);
    }

    fn write_config(name: &str, body: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("cpr-sim-{}-{}.toml", name, std::process::id()));
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_rhythm_target_from_file_is_kept() {
        let path = write_config("rhythm", "[rhythm]\ntarget_cpm = 100\n");
        let sim = SimulationConfig::load(Some(path.as_path())).unwrap();
        let config = sim.analyzer_config(Some(path.as_path())).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.rhythm.target_cpm, 100);
    }

    #[test]
    fn test_simulation_target_overrides_rhythm() {
        let path = write_config(
            "override",
            "[rhythm]\ntarget_cpm = 100\n\n[simulation]\ntarget_cpm = 120.0\n",
        );
        let sim = SimulationConfig::load(Some(path.as_path())).unwrap();
        let config = sim.analyzer_config(Some(path.as_path())).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(sim.target_cpm, Some(120.0));
        assert_eq!(config.rhythm.target_cpm, 120);
    }
}
