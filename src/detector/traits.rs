//! Emotion Classifier Trait
//!
//! Trait seam between the sampling loop and whatever model actually
//! classifies faces. Implementations handle service-specific details
//! (encoding, endpoints, auth); the core treats any non-success as
//! "no label for this tick".

use async_trait::async_trait;

use crate::emotion::EmotionLabel;
use crate::frame::Frame;

/// Classifies a still image into one emotion label
#[async_trait]
pub trait EmotionClassifier: Send + Sync {
    /// Classifier name for logging (e.g., "fer-http")
    fn name(&self) -> &str;

    /// Classify one frame
    ///
    /// Errors are swallowed by the sampling loop: a failed classification
    /// contributes nothing to the sample buffer and never aborts the scan.
    async fn classify(&self, frame: &Frame) -> anyhow::Result<EmotionLabel>;
}
