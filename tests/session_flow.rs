//! End-to-end scan session tests
//!
//! These tests drive the controller the way a host loop would — start a
//! scan, pump `poll()` while the paused clock advances — and verify the
//! windowed sampling, aggregation, fan-out isolation, and stale-result
//! discard behavior across whole sessions.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use tokio::sync::mpsc;

use vibesync_core::{
    Book, BookProvider, EmotionClassifier, EmotionLabel, ExerciseProvider, Frame, FrameSource,
    Generation, IntroRotator, RecommendationOrchestrator, SamplingLoop, ScanConfig, ScanController,
    ScanMessage, SessionState, Slot, StartScanError, VideoProvider,
};

// =============================================================================
// Mock collaborators
// =============================================================================

struct CountingFrames {
    captures: AtomicUsize,
}

impl CountingFrames {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            captures: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl FrameSource for CountingFrames {
    async fn capture_frame(&self) -> Option<Frame> {
        self.captures.fetch_add(1, Ordering::SeqCst);
        Some(Frame::new(b"jpeg".to_vec()))
    }
}

struct FixedClassifier(EmotionLabel);

#[async_trait]
impl EmotionClassifier for FixedClassifier {
    fn name(&self) -> &'static str {
        "fixed"
    }

    async fn classify(&self, _frame: &Frame) -> anyhow::Result<EmotionLabel> {
        Ok(self.0)
    }
}

/// Classifier whose results arrive a fixed (paused) time after capture.
struct SlowClassifier {
    delay: Duration,
    label: EmotionLabel,
}

#[async_trait]
impl EmotionClassifier for SlowClassifier {
    fn name(&self) -> &str {
        "slow"
    }

    async fn classify(&self, _frame: &Frame) -> anyhow::Result<EmotionLabel> {
        tokio::time::sleep(self.delay).await;
        Ok(self.label)
    }
}

struct FailingClassifier;

#[async_trait]
impl EmotionClassifier for FailingClassifier {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn classify(&self, _frame: &Frame) -> anyhow::Result<EmotionLabel> {
        anyhow::bail!("no face detected")
    }
}

struct StaticBooks;

#[async_trait]
impl BookProvider for StaticBooks {
    async fn search_books(&self, _query: &str) -> anyhow::Result<Vec<Book>> {
        Ok(vec![Book {
            title: "The Quiet Mind".to_string(),
            authors: Some("A. Writer".to_string()),
            thumbnail: None,
            link: None,
        }])
    }
}

/// Book provider that takes a fixed amount of (paused) time to resolve.
struct SlowBooks {
    delay: Duration,
}

#[async_trait]
impl BookProvider for SlowBooks {
    async fn search_books(&self, _query: &str) -> anyhow::Result<Vec<Book>> {
        tokio::time::sleep(self.delay).await;
        Ok(vec![Book {
            title: "Late Arrival".to_string(),
            authors: None,
            thumbnail: None,
            link: None,
        }])
    }
}

struct BulletedExercise;

#[async_trait]
impl ExerciseProvider for BulletedExercise {
    async fn suggest_exercises(&self, _prompt: &str) -> anyhow::Result<String> {
        Ok("Sure! Try these:\n\n- Child's pose\n1. Box breathing\nHave fun!\n\u{2022} Sun salutation".to_string())
    }
}

struct StaticVideos;

#[async_trait]
impl VideoProvider for StaticVideos {
    async fn search_videos(&self, _query: &str) -> anyhow::Result<Vec<String>> {
        Ok(vec!["vid01".to_string(), "vid02".to_string()])
    }
}

struct FailingVideos;

#[async_trait]
impl VideoProvider for FailingVideos {
    async fn search_videos(&self, _query: &str) -> anyhow::Result<Vec<String>> {
        anyhow::bail!("quota exceeded")
    }
}

// =============================================================================
// Harness
// =============================================================================

fn build_controller(
    frames: Arc<dyn FrameSource>,
    classifier: Arc<dyn EmotionClassifier>,
    books: Arc<dyn BookProvider>,
    videos: Arc<dyn VideoProvider>,
) -> (ScanController, mpsc::Receiver<ScanMessage>) {
    let sampling = SamplingLoop::new(frames, classifier);
    let orchestrator =
        RecommendationOrchestrator::new(books, Arc::new(BulletedExercise), videos);
    let (tx, rx) = mpsc::channel(512);
    let controller = ScanController::new(ScanConfig::default(), sampling, orchestrator, tx);
    (controller, rx)
}

/// Advance the paused clock one second at a time, polling like a host loop.
async fn run_for(controller: &mut ScanController, secs: u64) {
    for _ in 0..secs {
        tokio::time::sleep(Duration::from_secs(1)).await;
        controller.poll().await;
    }
}

fn drain(rx: &mut mpsc::Receiver<ScanMessage>) -> Vec<ScanMessage> {
    let mut messages = Vec::new();
    while let Ok(msg) = rx.try_recv() {
        messages.push(msg);
    }
    messages
}

// =============================================================================
// Full session flow
// =============================================================================

#[tokio::test(start_paused = true)]
async fn full_session_produces_dominant_and_all_slots() {
    let frames = CountingFrames::new();
    let (mut controller, mut rx) = build_controller(
        Arc::clone(&frames) as Arc<dyn FrameSource>,
        Arc::new(FixedClassifier(EmotionLabel::Sad)),
        Arc::new(StaticBooks),
        Arc::new(StaticVideos),
    );

    controller.start_scan().await.unwrap();
    run_for(&mut controller, 22).await;

    // 20s window at 2s interval: exactly 10 capture attempts.
    assert_eq!(frames.captures.load(Ordering::SeqCst), 10);
    assert_eq!(controller.buffer().len(), 10);
    assert_eq!(
        controller.state(),
        SessionState::Presenting {
            dominant: EmotionLabel::Sad
        }
    );

    let set = controller.recommendations();
    assert_eq!(
        set.books,
        Slot::Ready(vec![Book {
            title: "The Quiet Mind".to_string(),
            authors: Some("A. Writer".to_string()),
            thumbnail: None,
            link: None,
        }])
    );
    // Only marker-prefixed lines survive, in original order.
    assert_eq!(
        set.exercise,
        Slot::Ready(vec![
            "- Child's pose".to_string(),
            "1. Box breathing".to_string(),
            "\u{2022} Sun salutation".to_string(),
        ])
    );
    assert_eq!(
        set.videos,
        Slot::Ready(vec![
            "https://www.youtube.com/watch?v=vid01".to_string(),
            "https://www.youtube.com/watch?v=vid02".to_string(),
        ])
    );
    // Sad maps to the fixed sad track.
    assert_eq!(
        set.music,
        Slot::Ready("https://www.youtube.com/watch?v=2Vv-BfVoq4g".to_string())
    );

    let messages = drain(&mut rx);
    assert!(messages
        .iter()
        .any(|m| matches!(m, ScanMessage::DominantEmotion { emotion: EmotionLabel::Sad })));

    // Countdown ran from the full window down to zero, purely for display.
    let ticks: Vec<u32> = messages
        .iter()
        .filter_map(|m| match m {
            ScanMessage::CountdownTick { remaining_secs } => Some(*remaining_secs),
            _ => None,
        })
        .collect();
    assert_eq!(ticks.first(), Some(&20));
    assert!(ticks.windows(2).all(|pair| pair[0] == pair[1] + 1));
    // The final tick and the window deadline coincide; the zero tick may be
    // dropped if the window closes first.
    assert!(ticks.len() >= 20);
}

#[tokio::test(start_paused = true)]
async fn failing_classifier_still_presents_neutral() {
    let frames = CountingFrames::new();
    let (mut controller, _rx) = build_controller(
        Arc::clone(&frames) as Arc<dyn FrameSource>,
        Arc::new(FailingClassifier),
        Arc::new(StaticBooks),
        Arc::new(StaticVideos),
    );

    controller.start_scan().await.unwrap();
    run_for(&mut controller, 22).await;

    // Every tick captured, every classification swallowed.
    assert_eq!(frames.captures.load(Ordering::SeqCst), 10);
    assert!(controller.buffer().is_empty());
    assert_eq!(
        controller.state(),
        SessionState::Presenting {
            dominant: EmotionLabel::Neutral
        }
    );
    // Neutral falls through to the neutral music track.
    assert_eq!(
        controller.recommendations().music,
        Slot::Ready("https://www.youtube.com/watch?v=Lju6h-C37hE".to_string())
    );
}

// =============================================================================
// Re-entrancy and stale-generation discard
// =============================================================================

#[tokio::test(start_paused = true)]
async fn start_during_capture_is_rejected_without_reset() {
    let (mut controller, _rx) = build_controller(
        CountingFrames::new(),
        Arc::new(FixedClassifier(EmotionLabel::Happy)),
        Arc::new(StaticBooks),
        Arc::new(StaticVideos),
    );

    controller.start_scan().await.unwrap();
    run_for(&mut controller, 6).await;

    let samples_before = controller.buffer().len();
    assert!(samples_before > 0);

    assert_eq!(
        controller.start_scan().await,
        Err(StartScanError::SessionAlreadyActive)
    );
    assert_eq!(controller.generation(), Generation(1));
    assert_eq!(controller.buffer().len(), samples_before);

    // The original window still completes on schedule.
    run_for(&mut controller, 16).await;
    assert!(matches!(
        controller.state(),
        SessionState::Presenting { .. }
    ));
}

#[tokio::test(start_paused = true)]
async fn stale_recommendation_result_is_discarded() {
    // Session A's book fetch resolves 5 seconds after dispatch — by which
    // time session B has already taken over.
    let (mut controller, _rx) = build_controller(
        CountingFrames::new(),
        Arc::new(FixedClassifier(EmotionLabel::Happy)),
        Arc::new(SlowBooks {
            delay: Duration::from_secs(5),
        }),
        Arc::new(StaticVideos),
    );

    // Session A runs to completion and dispatches.
    controller.start_scan().await.unwrap();
    run_for(&mut controller, 21).await;
    assert!(matches!(
        controller.state(),
        SessionState::Presenting { .. }
    ));
    assert_eq!(controller.generation(), Generation(1));
    assert!(!controller.recommendations().books.is_resolved());

    // Restart as session B before A's book fetch lands.
    controller.start_scan().await.unwrap();
    assert_eq!(controller.generation(), Generation(2));

    // A's result arrives mid-B and must not touch B's slots.
    run_for(&mut controller, 8).await;
    assert!(controller.state().is_capturing());
    assert_eq!(controller.recommendations().books, Slot::Pending);
    assert!(!controller.buffer().is_empty());

    // B completes and gets its own (also slow) book result.
    run_for(&mut controller, 20).await;
    assert!(matches!(
        controller.state(),
        SessionState::Presenting { .. }
    ));
    assert_eq!(
        controller.recommendations().books,
        Slot::Ready(vec![Book {
            title: "Late Arrival".to_string(),
            authors: None,
            thumbnail: None,
            link: None,
        }])
    );
}

#[tokio::test(start_paused = true)]
async fn late_and_stale_classifications_never_land() {
    // 4.5s of classifier latency: the captures at 16s and 18s resolve only
    // after the 20s window has closed.
    let (mut controller, _rx) = build_controller(
        CountingFrames::new(),
        Arc::new(SlowClassifier {
            delay: Duration::from_millis(4_500),
            label: EmotionLabel::Happy,
        }),
        Arc::new(StaticBooks),
        Arc::new(StaticVideos),
    );

    controller.start_scan().await.unwrap();
    run_for(&mut controller, 21).await;

    // Of 10 captures, only the 8 that resolved in time were recorded; the
    // buffer sealed when the window closed.
    assert_eq!(
        controller.state(),
        SessionState::Presenting {
            dominant: EmotionLabel::Happy
        }
    );
    assert_eq!(controller.buffer().len(), 8);

    // Restart while the final straggler from the first session is still in
    // flight; it resolves mid-capture and must not enter the new buffer.
    controller.start_scan().await.unwrap();
    assert_eq!(controller.generation(), Generation(2));

    run_for(&mut controller, 3).await;
    assert!(controller.state().is_capturing());
    assert!(controller.buffer().is_empty());
}

// =============================================================================
// Provider failure isolation
// =============================================================================

#[tokio::test(start_paused = true)]
async fn video_failure_leaves_other_slots_intact() {
    let (mut controller, _rx) = build_controller(
        CountingFrames::new(),
        Arc::new(FixedClassifier(EmotionLabel::Angry)),
        Arc::new(StaticBooks),
        Arc::new(FailingVideos),
    );

    controller.start_scan().await.unwrap();
    run_for(&mut controller, 22).await;

    let set = controller.recommendations();
    assert_eq!(set.videos, Slot::Empty);
    assert!(matches!(set.books, Slot::Ready(_)));
    assert!(matches!(set.exercise, Slot::Ready(_)));
    assert_eq!(
        set.music,
        Slot::Ready("https://www.youtube.com/watch?v=1ZYbU82GVz4".to_string())
    );
}

// =============================================================================
// Intro rotator independence
// =============================================================================

#[tokio::test(start_paused = true)]
async fn intro_rotates_alongside_a_session_without_touching_it() {
    let (mut controller, mut rx) = build_controller(
        CountingFrames::new(),
        Arc::new(FixedClassifier(EmotionLabel::Happy)),
        Arc::new(StaticBooks),
        Arc::new(StaticVideos),
    );

    // The rotator shares the surface channel but knows nothing about scans.
    let (intro_tx, mut intro_rx) = mpsc::channel(64);
    let _rotator = IntroRotator::spawn(intro_tx);

    controller.start_scan().await.unwrap();
    run_for(&mut controller, 22).await;

    assert!(matches!(
        controller.state(),
        SessionState::Presenting { .. }
    ));

    let mut intro_messages = Vec::new();
    while let Ok(msg) = intro_rx.try_recv() {
        intro_messages.push(msg);
    }
    let rotations = intro_messages
        .iter()
        .filter(|m| matches!(m, ScanMessage::IntroMessage { .. }))
        .count();
    assert_eq!(rotations, 5);
    assert!(matches!(
        intro_messages.last(),
        Some(ScanMessage::IntroFinished)
    ));

    // Scan messages flowed on their own channel, untouched by the intro.
    let scan_messages = drain(&mut rx);
    assert!(scan_messages
        .iter()
        .all(|m| !matches!(m, ScanMessage::IntroMessage { .. })));
}
