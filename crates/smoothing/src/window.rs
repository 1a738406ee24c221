//! Smoothing window policy

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use ring_buffer::RingBuffer;

/// How much history a smoother averages over.
///
/// Serialized externally tagged (`frames = 5` or a `[span]` table). Reading
/// accepts a table holding both keys, as produced when a config file layers
/// `span` over the default `frames`; `span` wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "WindowTable")]
pub enum SmoothingWindow {
    /// The last N samples, regardless of their timing
    Frames(usize),
    /// Samples no older than `span_ms`, capped at `max_frames`
    Span { span_ms: u64, max_frames: usize },
}

impl SmoothingWindow {
    /// Upper bound on retained samples
    pub fn capacity(&self) -> usize {
        match *self {
            SmoothingWindow::Frames(n) => n.max(1),
            SmoothingWindow::Span { max_frames, .. } => max_frames.max(1),
        }
    }

    /// Evict samples that fell out of a time-span window.
    /// The newest sample is always kept.
    pub(crate) fn prune<T>(&self, history: &mut RingBuffer<(Instant, T)>, now: Instant) {
        if let SmoothingWindow::Span { span_ms, .. } = *self {
            let span = Duration::from_millis(span_ms);
            let mut remaining = history.len();
            history.evict_while(|(at, _)| {
                let stale = remaining > 1 && now.saturating_duration_since(*at) > span;
                if stale {
                    remaining -= 1;
                }
                stale
            });
        }
    }
}

#[derive(Debug, Deserialize)]
struct WindowTable {
    frames: Option<usize>,
    span: Option<SpanTable>,
}

#[derive(Debug, Deserialize)]
struct SpanTable {
    span_ms: u64,
    max_frames: Option<usize>,
}

impl TryFrom<WindowTable> for SmoothingWindow {
    type Error = String;

    fn try_from(table: WindowTable) -> Result<Self, Self::Error> {
        match (table.span, table.frames) {
            (Some(span), frames) => Ok(SmoothingWindow::Span {
                span_ms: span.span_ms,
                // Without an explicit cap, keep the frame count already configured
                max_frames: span
                    .max_frames
                    .or(frames)
                    .unwrap_or_else(|| SmoothingWindow::default().capacity()),
            }),
            (None, Some(n)) => Ok(SmoothingWindow::Frames(n)),
            (None, None) => Err("smoothing window needs `frames` or `span`".to_string()),
        }
    }
}

impl Default for SmoothingWindow {
    fn default() -> Self {
        SmoothingWindow::Frames(5)
    }
}
