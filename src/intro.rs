//! Intro Message Rotation
//!
//! A small, fully independent ticker that rotates a welcome message every
//! few seconds for a fixed lifetime after initial load, then disables
//! itself permanently. It never touches session state; it only emits
//! [`ScanMessage::IntroMessage`] and a final [`ScanMessage::IntroFinished`].

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::messages::ScanMessage;

/// How often the displayed message advances
const ROTATION_INTERVAL: Duration = Duration::from_secs(4);

/// How long the intro stays alive before disabling itself
const INTRO_LIFETIME: Duration = Duration::from_secs(20);

/// The rotating welcome messages
const INTRO_MESSAGES: [&str; 5] = [
    "Let's reflect on your emotions...",
    "We care about your mental well-being",
    "Your mind matters. Always.",
    "Mental health is our responsibility",
    "Feel, reflect, and vibe freely",
];

/// Scoped handle over the intro rotation
///
/// Dropping the handle cancels both the rotation interval and the lifetime
/// timer, so tearing down the hosting surface early leaves no orphaned
/// work behind.
pub struct IntroRotator {
    task: JoinHandle<()>,
}

impl IntroRotator {
    /// Start rotating intro messages into the surface channel
    ///
    /// Emits the first message immediately, advances every 4 seconds, and
    /// after a fixed 20-second lifetime emits [`ScanMessage::IntroFinished`]
    /// and stops for good.
    pub fn spawn(tx: mpsc::Sender<ScanMessage>) -> Self {
        let task = tokio::spawn(async move {
            let deadline = tokio::time::Instant::now() + INTRO_LIFETIME;
            let mut ticker = tokio::time::interval(ROTATION_INTERVAL);
            let mut current = 0usize;

            loop {
                tokio::select! {
                    biased;

                    () = tokio::time::sleep_until(deadline) => {
                        let _ = tx.send(ScanMessage::IntroFinished).await;
                        return;
                    }

                    _ = ticker.tick() => {
                        let text = INTRO_MESSAGES[current % INTRO_MESSAGES.len()].to_string();
                        if tx.send(ScanMessage::IntroMessage { text }).await.is_err() {
                            // Surface went away; nothing left to rotate for.
                            return;
                        }
                        current += 1;
                    }
                }
            }
        });

        Self { task }
    }
}

impl Drop for IntroRotator {
    fn drop(&mut self) {
        self.task.abort();
    }
}
