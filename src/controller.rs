//! Scan Controller - The Orchestration Core
//!
//! The controller is the "brain" of a scan: it owns the session state
//! machine (`Idle -> Capturing -> Aggregating -> Presenting`), the sample
//! buffer, and the recommendation slots, and coordinates the sampling loop
//! and the recommendation fan-out.
//!
//! # Design Philosophy
//!
//! The controller is UI-agnostic. It talks to whatever surface is attached
//! through a channel of [`ScanMessage`]s, and the host drives it the same
//! way on every platform: call [`ScanController::start_scan`] on the user's
//! action and [`ScanController::poll`] from the main loop. All asynchronous
//! work reports back as generation-stamped [`ScanEvent`]s; `poll` is the
//! single place they are ingested, so stale results from a restarted
//! session are dropped before they can touch current state.

use std::time::Duration;

use thiserror::Error;
use tokio::sync::mpsc;

use crate::aggregate;
use crate::config::ScanConfig;
use crate::emotion::EmotionLabel;
use crate::messages::ScanMessage;
use crate::recommend::{RecommendationOrchestrator, RecommendationSet, SlotUpdate};
use crate::sampling::{SamplingHandle, SamplingLoop};
use crate::session::{Generation, SampleBuffer, ScanEvent, SessionState};

/// Error when a scan cannot be started
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum StartScanError {
    /// A capture window is already open; overlapping sessions are forbidden
    #[error("A scan is already capturing")]
    SessionAlreadyActive,
}

/// Capacity of the internal event channel
///
/// Bounded well above one window's worth of samples, countdown ticks, and
/// slot results so producers never block in practice.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// The scan controller - headless session orchestration
pub struct ScanController {
    /// Scan timing configuration
    config: ScanConfig,
    /// Capture + classify driver
    sampling: SamplingLoop,
    /// Recommendation fan-out
    orchestrator: RecommendationOrchestrator,
    /// Current state (exactly one active at a time)
    state: SessionState,
    /// Tag for the active session; bumped on every start
    generation: Generation,
    /// Samples collected during the active window
    buffer: SampleBuffer,
    /// The four recommendation slots for the active session
    recommendations: RecommendationSet,
    /// Timers for the open window; dropped (aborted) on every exit path
    sampling_handle: Option<SamplingHandle>,
    /// Ingestion side of the internal event channel
    events_rx: mpsc::Receiver<ScanEvent>,
    /// Producer side, cloned into spawned work
    events_tx: mpsc::Sender<ScanEvent>,
    /// Channel to the presentation surface
    tx: mpsc::Sender<ScanMessage>,
}

impl ScanController {
    /// Create a controller wired to a presentation surface channel
    pub fn new(
        config: ScanConfig,
        sampling: SamplingLoop,
        orchestrator: RecommendationOrchestrator,
        tx: mpsc::Sender<ScanMessage>,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            config,
            sampling,
            orchestrator,
            state: SessionState::Idle,
            generation: Generation::default(),
            buffer: SampleBuffer::new(),
            recommendations: RecommendationSet::new(),
            sampling_handle: None,
            events_rx,
            events_tx,
            tx,
        }
    }

    /// Current session state
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The active session's generation tag
    #[must_use]
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Samples collected so far this session
    #[must_use]
    pub fn buffer(&self) -> &SampleBuffer {
        &self.buffer
    }

    /// The active session's recommendation slots
    #[must_use]
    pub fn recommendations(&self) -> &RecommendationSet {
        &self.recommendations
    }

    /// Start a new scan
    ///
    /// Rejected without any state change while a window is already open.
    /// Otherwise resets the buffer, the recommendation slots, and the
    /// countdown, bumps the generation so stragglers from the previous
    /// session identify themselves, and opens a fresh capture window.
    pub async fn start_scan(&mut self) -> Result<(), StartScanError> {
        if self.state.is_capturing() {
            tracing::warn!(generation = %self.generation, "Rejected scan start: already capturing");
            return Err(StartScanError::SessionAlreadyActive);
        }

        self.generation = self.generation.next();
        self.buffer = SampleBuffer::new();
        self.recommendations = RecommendationSet::new();

        let remaining_secs = self.config.window.as_secs() as u32;
        self.set_state(SessionState::Capturing { remaining_secs })
            .await;
        self.send(ScanMessage::CountdownTick { remaining_secs })
            .await;

        tracing::info!(
            generation = %self.generation,
            window_ms = self.config.window.as_millis() as u64,
            "Scan started"
        );

        // Replacing the handle aborts any timers left from a previous
        // session (none while capturing, but Presenting -> restart reuses
        // this path).
        self.sampling_handle = Some(self.sampling.start(
            self.config.window,
            self.config.sample_interval,
            self.generation,
            &self.events_tx,
        ));

        Ok(())
    }

    /// Process pending events from the sampling loop and providers
    ///
    /// Call this regularly from the host loop. Returns true if any event
    /// was processed.
    pub async fn poll(&mut self) -> bool {
        // Collect first so handling (which may dispatch) can't starve the
        // drain.
        let mut events = Vec::new();
        while let Ok(event) = self.events_rx.try_recv() {
            events.push(event);
        }

        if events.is_empty() {
            return false;
        }

        for event in events {
            if event.generation() != self.generation {
                tracing::debug!(
                    stale = %event.generation(),
                    current = %self.generation,
                    "Dropping stale event"
                );
                continue;
            }
            self.handle_event(event).await;
        }

        true
    }

    /// Handle one current-generation event
    async fn handle_event(&mut self, event: ScanEvent) {
        match event {
            ScanEvent::Sample { label, .. } => {
                // The buffer seals when the window closes: a classification
                // resolving after expiry is discarded even in-generation.
                if !self.state.is_capturing() {
                    tracing::debug!(%label, "Dropping sample after window close");
                    return;
                }
                self.buffer.push(label);
                self.send(ScanMessage::SampleRecorded {
                    label,
                    total: self.buffer.len(),
                })
                .await;
            }

            ScanEvent::Countdown { remaining_secs, .. } => {
                // Purely user feedback; never drives the state machine.
                if self.state.is_capturing() {
                    self.state = SessionState::Capturing { remaining_secs };
                    self.send(ScanMessage::CountdownTick { remaining_secs })
                        .await;
                }
            }

            ScanEvent::WindowElapsed { .. } => {
                // Release the window's timers on this exit path.
                self.sampling_handle = None;

                self.set_state(SessionState::Aggregating).await;
                let dominant = aggregate::dominant(self.buffer.labels());
                tracing::info!(
                    generation = %self.generation,
                    samples = self.buffer.len(),
                    %dominant,
                    "Window closed, dominant emotion computed"
                );

                self.set_state(SessionState::Presenting { dominant }).await;
                self.send(ScanMessage::DominantEmotion { emotion: dominant })
                    .await;

                // Fan out without blocking the transition; the UI is in
                // Presenting before any slot resolves.
                self.orchestrator
                    .dispatch(dominant, self.generation, &self.events_tx);
            }

            ScanEvent::Slot { update, .. } => {
                self.recommendations.apply(update.clone());
                let msg = match update {
                    SlotUpdate::Books(books) => ScanMessage::BooksReady { books },
                    SlotUpdate::Exercise(steps) => ScanMessage::ExerciseReady { steps },
                    SlotUpdate::Videos(urls) => ScanMessage::VideosReady { urls },
                    SlotUpdate::Music(url) => ScanMessage::MusicReady { url },
                };
                self.send(msg).await;
            }
        }
    }

    /// The configured capture window length
    #[must_use]
    pub fn window(&self) -> Duration {
        self.config.window
    }

    /// Set state and notify the surface
    async fn set_state(&mut self, state: SessionState) {
        self.state = state;
        self.send(ScanMessage::State { state }).await;
    }

    /// Send a message to the surface
    async fn send(&self, msg: ScanMessage) {
        if let Err(e) = self.tx.send(msg).await {
            tracing::warn!("Failed to send message to surface: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Arc;

    use crate::detector::EmotionClassifier;
    use crate::frame::{Frame, FrameSource};
    use crate::recommend::{Book, BookProvider, ExerciseProvider, VideoProvider};

    struct AlwaysFrame;

    #[async_trait]
    impl FrameSource for AlwaysFrame {
        async fn capture_frame(&self) -> Option<Frame> {
            Some(Frame::new(b"jpeg".to_vec()))
        }
    }

    struct FixedLabel(EmotionLabel);

    #[async_trait]
    impl EmotionClassifier for FixedLabel {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn classify(&self, _frame: &Frame) -> anyhow::Result<EmotionLabel> {
            Ok(self.0)
        }
    }

    struct NoBooks;

    #[async_trait]
    impl BookProvider for NoBooks {
        async fn search_books(&self, _query: &str) -> anyhow::Result<Vec<Book>> {
            Ok(Vec::new())
        }
    }

    struct NoExercise;

    #[async_trait]
    impl ExerciseProvider for NoExercise {
        async fn suggest_exercises(&self, _prompt: &str) -> anyhow::Result<String> {
            Ok(String::new())
        }
    }

    struct NoVideos;

    #[async_trait]
    impl VideoProvider for NoVideos {
        async fn search_videos(&self, _query: &str) -> anyhow::Result<Vec<String>> {
            Ok(Vec::new())
        }
    }

    fn test_controller(label: EmotionLabel) -> (ScanController, mpsc::Receiver<ScanMessage>) {
        let sampling = SamplingLoop::new(Arc::new(AlwaysFrame), Arc::new(FixedLabel(label)));
        let orchestrator = RecommendationOrchestrator::new(
            Arc::new(NoBooks),
            Arc::new(NoExercise),
            Arc::new(NoVideos),
        );
        let (tx, rx) = mpsc::channel(256);
        let controller = ScanController::new(ScanConfig::default(), sampling, orchestrator, tx);
        (controller, rx)
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_from_idle() {
        let (mut controller, _rx) = test_controller(EmotionLabel::Happy);
        assert_eq!(controller.state(), SessionState::Idle);

        controller.start_scan().await.unwrap();
        assert!(controller.state().is_capturing());
        assert_eq!(controller.generation(), Generation(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_reentrancy_guard_preserves_buffer() {
        let (mut controller, _rx) = test_controller(EmotionLabel::Happy);
        controller.start_scan().await.unwrap();

        // Let a few samples land.
        tokio::time::sleep(Duration::from_millis(5_000)).await;
        controller.poll().await;
        let collected = controller.buffer().len();
        assert!(collected > 0);

        let result = controller.start_scan().await;
        assert_eq!(result, Err(StartScanError::SessionAlreadyActive));

        // The rejected start mutated nothing.
        assert_eq!(controller.generation(), Generation(1));
        assert_eq!(controller.buffer().len(), collected);
        assert!(controller.state().is_capturing());
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_session_reaches_presenting() {
        let (mut controller, _rx) = test_controller(EmotionLabel::Sad);
        controller.start_scan().await.unwrap();

        tokio::time::sleep(Duration::from_millis(21_000)).await;
        controller.poll().await;

        assert_eq!(
            controller.state(),
            SessionState::Presenting {
                dominant: EmotionLabel::Sad
            }
        );
        assert_eq!(controller.buffer().len(), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_from_presenting() {
        let (mut controller, _rx) = test_controller(EmotionLabel::Happy);
        controller.start_scan().await.unwrap();
        tokio::time::sleep(Duration::from_millis(21_000)).await;
        controller.poll().await;
        assert!(matches!(
            controller.state(),
            SessionState::Presenting { .. }
        ));

        // Re-entrant: a new scan from Presenting restarts at Capturing.
        controller.start_scan().await.unwrap();
        assert!(controller.state().is_capturing());
        assert_eq!(controller.generation(), Generation(2));
        assert!(controller.buffer().is_empty());
        assert!(!controller.recommendations().books.is_resolved());
    }
}
