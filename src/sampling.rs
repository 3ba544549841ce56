//! Sampling Loop
//!
//! Drives periodic capture + classify for a fixed window. Tick scheduling
//! is strictly periodic; tick completion is not — each frame's
//! classification runs in its own task so a slow detector never delays the
//! next capture. Results flow back as generation-stamped samples.
//!
//! # Timing
//!
//! The capture ticker and the window deadline race inside one task. The
//! select is biased toward the deadline, so a tick landing on the exact
//! expiry instant loses and a 20 000 ms window at 2 000 ms yields exactly
//! 10 capture attempts. A separate 1 Hz countdown ticks purely for user
//! feedback; the deadline alone is authoritative.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::detector::EmotionClassifier;
use crate::frame::FrameSource;
use crate::session::{Generation, ScanEvent};

/// Periodic capture + classify driver for one scan window
pub struct SamplingLoop {
    frames: Arc<dyn FrameSource>,
    classifier: Arc<dyn EmotionClassifier>,
}

impl SamplingLoop {
    /// Create a sampling loop over a frame source and classifier
    pub fn new(frames: Arc<dyn FrameSource>, classifier: Arc<dyn EmotionClassifier>) -> Self {
        Self { frames, classifier }
    }

    /// Open a capture window
    ///
    /// Spawns the capture task and the countdown task; both send
    /// generation-stamped events into `events_tx`. The returned handle owns
    /// both timers and aborts them when dropped, so every exit path —
    /// natural expiry, restart, teardown — releases them.
    pub fn start(
        &self,
        window: Duration,
        interval: Duration,
        generation: Generation,
        events_tx: &mpsc::Sender<ScanEvent>,
    ) -> SamplingHandle {
        let frames = Arc::clone(&self.frames);
        let classifier = Arc::clone(&self.classifier);
        let tx = events_tx.clone();

        let capture = tokio::spawn(async move {
            let deadline = tokio::time::Instant::now() + window;
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    biased;

                    () = tokio::time::sleep_until(deadline) => {
                        let _ = tx.send(ScanEvent::WindowElapsed { generation }).await;
                        return;
                    }

                    _ = ticker.tick() => {
                        let Some(frame) = frames.capture_frame().await else {
                            tracing::debug!(%generation, "No frame available, skipping tick");
                            continue;
                        };

                        // Detached: a slow classification from this tick may
                        // still be in flight when the next tick fires.
                        let classifier = Arc::clone(&classifier);
                        let tx = tx.clone();
                        tokio::spawn(async move {
                            match classifier.classify(&frame).await {
                                Ok(label) => {
                                    let _ = tx
                                        .send(ScanEvent::Sample { generation, label })
                                        .await;
                                }
                                Err(e) => {
                                    tracing::warn!(
                                        classifier = classifier.name(),
                                        %generation,
                                        error = %e,
                                        "Classification failed, skipping tick"
                                    );
                                }
                            }
                        });
                    }
                }
            }
        });

        let tx = events_tx.clone();
        let window_secs = window.as_secs() as u32;
        let countdown = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(
                tokio::time::Instant::now() + Duration::from_secs(1),
                Duration::from_secs(1),
            );
            for remaining in (0..window_secs).rev() {
                ticker.tick().await;
                let _ = tx
                    .send(ScanEvent::Countdown {
                        generation,
                        remaining_secs: remaining,
                    })
                    .await;
            }
        });

        SamplingHandle { capture, countdown }
    }
}

/// Scoped handle over one window's timers
///
/// Dropping the handle aborts the capture ticker, the window deadline, and
/// the countdown. In-flight classification tasks are not aborted; their
/// results carry the window's generation and are filtered at ingestion.
pub struct SamplingHandle {
    capture: JoinHandle<()>,
    countdown: JoinHandle<()>,
}

impl Drop for SamplingHandle {
    fn drop(&mut self) {
        self.capture.abort();
        self.countdown.abort();
    }
}
