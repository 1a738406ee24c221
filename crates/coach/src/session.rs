//! Async session worker

use std::time::Instant;

use landmarks::{Landmark, LandmarkFrame};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::{AnalyzerConfig, AnalyzerEvent, Clock, CprAnalyzer, SessionSummary, SystemClock};

/// Raw landmarks from the pose estimator with their capture time
#[derive(Debug, Clone)]
pub struct TimedFrame {
    pub landmarks: Vec<Landmark>,
    pub captured_at: Instant,
}

impl TimedFrame {
    pub fn new(landmarks: Vec<Landmark>, captured_at: Instant) -> Self {
        Self {
            landmarks,
            captured_at,
        }
    }
}

impl From<(LandmarkFrame, Instant)> for TimedFrame {
    fn from((frame, captured_at): (LandmarkFrame, Instant)) -> Self {
        Self::new(frame.into(), captured_at)
    }
}

/// Runs one analyzer as a task: frames in, events out
pub struct SessionWorker<C: Clock = SystemClock> {
    /// Channel receiver for incoming frames
    frames: mpsc::Receiver<TimedFrame>,
    /// Channel sender for analyzer events
    events: mpsc::Sender<AnalyzerEvent>,
    analyzer: CprAnalyzer<C>,
}

impl<C: Clock> SessionWorker<C> {
    /// Create a worker around an existing analyzer
    pub fn new(
        analyzer: CprAnalyzer<C>,
        frames: mpsc::Receiver<TimedFrame>,
        events: mpsc::Sender<AnalyzerEvent>,
    ) -> Self {
        Self {
            frames,
            events,
            analyzer,
        }
    }

    /// Create the channel pairs for a worker. A zero capacity is raised to one.
    pub fn channel_with(
        analyzer: CprAnalyzer<C>,
        capacity: usize,
    ) -> (mpsc::Sender<TimedFrame>, mpsc::Receiver<AnalyzerEvent>, Self) {
        let capacity = capacity.max(1);
        let (frame_tx, frame_rx) = mpsc::channel(capacity);
        // Each frame yields at least two events
        let (event_tx, event_rx) = mpsc::channel(capacity * 4);
        (frame_tx, event_rx, Self::new(analyzer, frame_rx, event_tx))
    }

    /// Run until the frame sender is dropped, then return the session summary
    pub async fn run(mut self) -> SessionSummary {
        info!("Starting coaching session");
        let mut receiver_open = true;

        while let Some(frame) = self.frames.recv().await {
            let report = match self
                .analyzer
                .process_raw_at(frame.landmarks, frame.captured_at)
            {
                Ok(report) => report,
                Err(_) => continue,
            };

            if !receiver_open {
                continue;
            }
            for event in report.events {
                if self.events.send(event).await.is_err() {
                    debug!("Event receiver dropped, continuing without events");
                    receiver_open = false;
                    break;
                }
            }
        }

        let summary = self.analyzer.summary();
        info!(
            "Coaching session ended: {} compressions over {} frames ({} rejected)",
            summary.total_compressions, summary.frames_processed, summary.frames_rejected
        );
        summary
    }
}

impl SessionWorker<SystemClock> {
    /// Create a worker on the system clock along with its channels
    pub fn channel(
        config: AnalyzerConfig,
        capacity: usize,
    ) -> (mpsc::Sender<TimedFrame>, mpsc::Receiver<AnalyzerEvent>, Self) {
        Self::channel_with(CprAnalyzer::new(config), capacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_session_yields_summary_on_close() {
        let (tx, mut events, worker) = SessionWorker::channel(AnalyzerConfig::default(), 16);
        let handle = tokio::spawn(worker.run());

        let start = Instant::now();
        let frame = LandmarkFrame::filled(Landmark::new(0.5, 0.5, 0.0, 0.9)).unwrap();
        for i in 0..3u64 {
            tx.send((frame.clone(), start + Duration::from_millis(33 * i)).into())
                .await
                .unwrap();
        }
        tx.send(TimedFrame::new(vec![Landmark::default(); 5], start))
            .await
            .unwrap();
        drop(tx);

        let summary = handle.await.unwrap();
        assert_eq!(summary.frames_processed, 3);
        assert_eq!(summary.frames_rejected, 1);

        let mut posture_updates = 0;
        while let Some(event) = events.recv().await {
            if matches!(event, AnalyzerEvent::PostureUpdate { .. }) {
                posture_updates += 1;
            }
        }
        assert_eq!(posture_updates, 3);
    }

    #[tokio::test]
    async fn test_session_survives_dropped_event_receiver() {
        let (tx, events, worker) = SessionWorker::channel(AnalyzerConfig::default(), 4);
        drop(events);
        let handle = tokio::spawn(worker.run());

        let start = Instant::now();
        let frame = LandmarkFrame::filled(Landmark::new(0.5, 0.5, 0.0, 0.9)).unwrap();
        for i in 0..20u64 {
            tx.send((frame.clone(), start + Duration::from_millis(50 * i)).into())
                .await
                .unwrap();
        }
        drop(tx);

        assert_eq!(handle.await.unwrap().frames_processed, 20);
    }

    #[tokio::test]
    async fn test_zero_capacity_is_usable() {
        let (tx, mut events, worker) = SessionWorker::channel(AnalyzerConfig::default(), 0);
        let handle = tokio::spawn(worker.run());

        let frame = LandmarkFrame::filled(Landmark::new(0.5, 0.5, 0.0, 0.9)).unwrap();
        tx.send((frame, Instant::now()).into()).await.unwrap();
        drop(tx);

        assert!(events.recv().await.is_some());
        assert_eq!(handle.await.unwrap().frames_processed, 1);
    }
}
