//! Scan Messages
//!
//! Messages sent from the core to a presentation surface. Surfaces are pure
//! renderers: they display countdowns, samples, the dominant emotion, and
//! recommendation slots as they arrive, and never run business logic.
//!
//! # Design Philosophy
//!
//! Slots resolve in no particular order, so each gets its own message and
//! the surface must treat every category independently as "not yet
//! available" vs "available" vs "empty". Category selection (books /
//! exercise / music tabs) is entirely a surface concern.

use serde::{Deserialize, Serialize};

use crate::emotion::EmotionLabel;
use crate::recommend::Book;
use crate::session::SessionState;

/// Messages from the scan core to a presentation surface
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum ScanMessage {
    /// Session state changed
    State {
        /// The new state
        state: SessionState,
    },

    /// User-visible countdown ticked
    CountdownTick {
        /// Seconds remaining in the capture window
        remaining_secs: u32,
    },

    /// A sample was classified and recorded
    SampleRecorded {
        /// The classified label
        label: EmotionLabel,
        /// Samples collected so far this session
        total: usize,
    },

    /// The window closed and a dominant emotion was computed
    DominantEmotion {
        /// The session's dominant emotion
        emotion: EmotionLabel,
    },

    /// The book slot resolved
    BooksReady {
        /// Recommended books; empty means no results for this category
        books: Vec<Book>,
    },

    /// The exercise slot resolved
    ExerciseReady {
        /// Extracted exercise steps; empty means no results
        steps: Vec<String>,
    },

    /// The video slot resolved
    VideosReady {
        /// Watch URLs; empty means no results
        urls: Vec<String>,
    },

    /// The music slot resolved
    MusicReady {
        /// The track URL for the dominant emotion
        url: String,
    },

    /// The intro rotator advanced to the next message
    IntroMessage {
        /// The message to display
        text: String,
    },

    /// The intro rotator's lifetime elapsed; hide the intro permanently
    IntroFinished,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_serde_round_trip() {
        let msg = ScanMessage::DominantEmotion {
            emotion: EmotionLabel::Happy,
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("happy"));

        let back: ScanMessage = serde_json::from_str(&json).unwrap();
        assert!(matches!(
            back,
            ScanMessage::DominantEmotion {
                emotion: EmotionLabel::Happy
            }
        ));
    }
}
