//! Analyzer configuration

use std::path::Path;

use alerting::FeedbackConfig;
use compression::{CompressionConfig, RateConfig, RhythmConfig};
use posture::PostureConfig;
use serde::{Deserialize, Serialize};
use smoothing::SmoothingWindow;
use tracing::info;

use crate::CoachError;

/// Environment variable prefix for overrides, e.g. `CPR_POSTURE__MIN_VISIBILITY`
pub const ENV_PREFIX: &str = "CPR";

/// Complete pipeline configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Landmark smoothing history
    pub smoothing: SmoothingWindow,

    pub posture: PostureConfig,

    pub compression: CompressionConfig,

    pub rate: RateConfig,

    pub rhythm: RhythmConfig,

    pub feedback: FeedbackConfig,

    /// Emit metronome beats at the target rhythm
    pub metronome: bool,
}

impl AnalyzerConfig {
    /// Forgiving profile for untrained bystanders. Compressions count
    /// regardless of posture.
    pub fn emergency() -> Self {
        Self {
            smoothing: SmoothingWindow::Frames(3),
            posture: PostureConfig::emergency(),
            compression: CompressionConfig::emergency(),
            feedback: FeedbackConfig::emergency(),
            metronome: true,
            ..Default::default()
        }
    }

    /// Load configuration: defaults, then an optional TOML file, then
    /// `CPR_`-prefixed environment variables (`__` between sections).
    pub fn load(path: Option<&Path>) -> Result<Self, CoachError> {
        Self::load_over(Self::default(), path)
    }

    /// Like [`AnalyzerConfig::load`], layering onto a preset instead of the
    /// defaults
    pub fn load_over(base: Self, path: Option<&Path>) -> Result<Self, CoachError> {
        let mut builder = config::Config::builder().add_source(config::Config::try_from(&base)?);

        if let Some(path) = path {
            info!("Loading analyzer config from {}", path.display());
            builder = builder.add_source(config::File::from(path));
        }

        let loaded: Self = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        Ok(loaded)
    }
}
