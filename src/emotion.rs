//! Emotion Labels
//!
//! The closed set of emotion labels the detector can produce. Labels are
//! immutable values; the core never invents one except for the `Neutral`
//! default used when no data exists.

use serde::{Deserialize, Serialize};

/// A discrete emotion classification
///
/// This is the full label set of the facial-expression detector. Anything
/// the detector reports outside this set parses to [`EmotionLabel::Neutral`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmotionLabel {
    /// Positive affect
    Happy,
    /// Negative affect
    Sad,
    /// Anger
    Angry,
    /// Disgust
    Disgust,
    /// Fear
    Fear,
    /// Surprise
    Surprise,
    /// No strong expression; also the default when nothing was detected
    Neutral,
}

impl EmotionLabel {
    /// Parse a label from a detector response string
    ///
    /// Unknown or empty strings map to `Neutral` rather than failing; a
    /// detector that reports a label we don't know is treated as "no strong
    /// expression".
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "happy" => Self::Happy,
            "sad" => Self::Sad,
            "angry" => Self::Angry,
            "disgust" => Self::Disgust,
            "fear" => Self::Fear,
            "surprise" => Self::Surprise,
            _ => Self::Neutral,
        }
    }

    /// Wire/display form of the label
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Happy => "happy",
            Self::Sad => "sad",
            Self::Angry => "angry",
            Self::Disgust => "disgust",
            Self::Fear => "fear",
            Self::Surprise => "surprise",
            Self::Neutral => "neutral",
        }
    }
}

impl Default for EmotionLabel {
    fn default() -> Self {
        Self::Neutral
    }
}

impl std::fmt::Display for EmotionLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
