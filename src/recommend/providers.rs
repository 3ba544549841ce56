//! Recommendation Provider Traits and Pure Mappings
//!
//! Trait seams for the three networked providers plus the pure functions
//! the orchestrator keys off an emotion: search queries, the coach prompt,
//! the static music lookup, and the bullet-line filter applied to the
//! coach's free-text response.

use async_trait::async_trait;

use super::Book;
use crate::emotion::EmotionLabel;

/// Looks up reading material for a text query
#[async_trait]
pub trait BookProvider: Send + Sync {
    /// Fetch zero or more books; an empty result is valid, not an error
    async fn search_books(&self, query: &str) -> anyhow::Result<Vec<Book>>;
}

/// Generates free-text exercise guidance from a natural-language prompt
#[async_trait]
pub trait ExerciseProvider: Send + Sync {
    /// Fetch the raw suggestion text; the orchestrator extracts line items
    async fn suggest_exercises(&self, prompt: &str) -> anyhow::Result<String>;
}

/// Searches for video content, returning bare video identifiers
#[async_trait]
pub trait VideoProvider: Send + Sync {
    /// Fetch zero or more video IDs; the core maps them to watch URLs
    async fn search_videos(&self, query: &str) -> anyhow::Result<Vec<String>>;
}

/// Book search query for an emotion
#[must_use]
pub fn book_query(emotion: EmotionLabel) -> &'static str {
    match emotion {
        EmotionLabel::Sad => "self-help+mindfulness",
        EmotionLabel::Angry => "calm+meditation",
        EmotionLabel::Happy => "inspirational+stories",
        _ => "emotional+balance",
    }
}

/// Video search query for an emotion
#[must_use]
pub fn video_query(emotion: EmotionLabel) -> String {
    format!("yoga for {emotion} mood")
}

/// Coach prompt for an emotion
#[must_use]
pub fn exercise_prompt(emotion: EmotionLabel) -> String {
    format!(
        "Suggest 5 short, practical yoga or exercise routines suitable for \
         someone feeling {emotion}. Make sure they can be done at home, \
         without equipment. List them as bullet points."
    )
}

/// Fixed music link for an emotion, falling back to the neutral track
///
/// Pure static mapping; the only provider with no network boundary.
#[must_use]
pub fn music_url(emotion: EmotionLabel) -> &'static str {
    match emotion {
        EmotionLabel::Sad => "https://www.youtube.com/watch?v=2Vv-BfVoq4g",
        EmotionLabel::Angry => "https://www.youtube.com/watch?v=1ZYbU82GVz4",
        EmotionLabel::Happy => "https://www.youtube.com/watch?v=ZbZSe6N_BXs",
        _ => "https://www.youtube.com/watch?v=Lju6h-C37hE",
    }
}

/// Extract discrete exercise steps from the coach's free-text response
///
/// Keeps only non-blank lines that start with a bullet or number marker
/// (`-`, `•`, or an ASCII digit), in original order. Prose and blank lines
/// are dropped silently.
#[must_use]
pub fn extract_steps(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| {
            !line.is_empty()
                && line
                    .chars()
                    .next()
                    .is_some_and(|c| c == '-' || c == '\u{2022}' || c.is_ascii_digit())
        })
        .map(ToString::to_string)
        .collect()
}
