//! Pipeline outputs

use alerting::{RhythmAdvice, ToneRequest};
use compression::CompressionEvent;
use posture::PostureState;
use serde::{Deserialize, Serialize};

/// Something the host should react to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnalyzerEvent {
    /// Posture verdict, once per accepted frame
    PostureUpdate { is_valid: bool, message: String },

    /// Running count and rate, once per accepted frame
    CompressionUpdate { total_count: u32, rate_bpm: u32 },

    /// Play a posture warning
    WarningTone { tone: ToneRequest },

    RhythmAdvice { advice: RhythmAdvice },

    /// Play a metronome click
    MetronomeBeat { tone: ToneRequest },
}

/// Everything the pipeline concluded from one frame
#[derive(Debug, Clone)]
pub struct FrameReport {
    pub posture: PostureState,

    /// Total compressions this session
    pub compression_count: u32,

    /// Current rate (cycles per minute), 0 until two compressions are seen
    pub rate_bpm: u32,

    /// Compression completed on this frame
    pub compression: Option<CompressionEvent>,

    pub events: Vec<AnalyzerEvent>,
}

impl FrameReport {
    /// Whether this frame requested a warning tone
    pub fn warning_fired(&self) -> bool {
        self.events
            .iter()
            .any(|e| matches!(e, AnalyzerEvent::WarningTone { .. }))
    }

    pub fn rhythm_advice(&self) -> Option<&RhythmAdvice> {
        self.events.iter().find_map(|e| match e {
            AnalyzerEvent::RhythmAdvice { advice } => Some(advice),
            _ => None,
        })
    }
}

/// End-of-session statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub total_compressions: u32,
    pub frames_processed: u64,
    pub frames_rejected: u64,
    pub valid_posture_frames: u64,

    /// Share of processed frames with valid posture (0.0 - 1.0)
    pub valid_posture_ratio: f64,

    pub warnings_fired: u64,
    pub rhythm_advice_given: u64,

    /// Rate at the last processed frame
    pub last_rate_bpm: u32,

    /// Mean depth of counted compressions (fraction of frame height)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean_depth: Option<f64>,

    /// Time between the first and last processed frame
    pub duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_wire_format() {
        let event = AnalyzerEvent::CompressionUpdate {
            total_count: 3,
            rate_bpm: 110,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "compression_update");
        assert_eq!(json["total_count"], 3);

        let tone = AnalyzerEvent::WarningTone {
            tone: ToneRequest::posture_warning(),
        };
        let json = serde_json::to_value(&tone).unwrap();
        assert_eq!(json["tone"]["frequency_hz"], 800.0);
    }
}
