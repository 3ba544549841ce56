//! Recommendation Fan-Out
//!
//! Given a dominant emotion, the orchestrator issues four logically
//! independent lookups: books, AI-generated exercise steps, video search,
//! and a static music mapping. Each networked lookup runs in its own task;
//! a failure or empty result resolves only that provider's slot and never
//! delays or aborts the others.
//!
//! # Design Philosophy
//!
//! The orchestrator never mutates shared state. Every result is delivered
//! as a generation-stamped [`ScanEvent::Slot`] back to the controller, which
//! is the single owner of the [`RecommendationSet`] and drops anything from
//! a session that has since been restarted.

mod http;
mod providers;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

pub use http::{ChatExerciseProvider, GoogleBooksProvider, VideoSearchProvider};
pub use providers::{
    book_query, exercise_prompt, extract_steps, music_url, video_query, BookProvider,
    ExerciseProvider, VideoProvider,
};

use crate::emotion::EmotionLabel;
use crate::session::{Generation, ScanEvent};

/// A recommended book
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Book title
    pub title: String,
    /// Comma-joined author names, if known
    pub authors: Option<String>,
    /// Cover thumbnail URL, if available
    pub thumbnail: Option<String>,
    /// Link to more information, if available
    pub link: Option<String>,
}

/// Lifecycle of one recommendation slot
///
/// Presentation must treat each slot independently: a fetch still in
/// flight (`Pending`), results to show (`Ready`), or nothing for this
/// category (`Empty`) — whether because the provider failed or genuinely
/// returned no results.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Slot<T> {
    /// Fetch not yet resolved
    Pending,
    /// Results available
    Ready(T),
    /// Resolved with nothing to show
    Empty,
}

impl<T> Slot<T> {
    /// Whether the fetch has resolved (ready or empty)
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// The contents, if ready
    #[must_use]
    pub fn as_ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self::Pending
    }
}

/// The four independent recommendation result slots for one session
///
/// Reset to all-`Pending` at session start; each slot is populated at most
/// once per session, in whatever order the providers happen to resolve.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RecommendationSet {
    /// Reading material
    pub books: Slot<Vec<Book>>,
    /// Guided exercise steps extracted from the coach's response
    pub exercise: Slot<Vec<String>>,
    /// Video watch URLs
    pub videos: Slot<Vec<String>>,
    /// Music track URL
    pub music: Slot<String>,
}

impl RecommendationSet {
    /// A fresh set with every slot pending
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one resolved slot
    pub fn apply(&mut self, update: SlotUpdate) {
        match update {
            SlotUpdate::Books(books) => {
                self.books = if books.is_empty() {
                    Slot::Empty
                } else {
                    Slot::Ready(books)
                };
            }
            SlotUpdate::Exercise(steps) => {
                self.exercise = if steps.is_empty() {
                    Slot::Empty
                } else {
                    Slot::Ready(steps)
                };
            }
            SlotUpdate::Videos(urls) => {
                self.videos = if urls.is_empty() {
                    Slot::Empty
                } else {
                    Slot::Ready(urls)
                };
            }
            SlotUpdate::Music(url) => {
                self.music = Slot::Ready(url);
            }
        }
    }
}

/// One resolved provider result
///
/// An empty collection means the provider failed or found nothing; the
/// distinction lives in the logs only.
#[derive(Clone, Debug)]
pub enum SlotUpdate {
    /// Book search outcome
    Books(Vec<Book>),
    /// Extracted exercise steps
    Exercise(Vec<String>),
    /// Video watch URLs
    Videos(Vec<String>),
    /// Music track URL
    Music(String),
}

/// Coordinates the four independent recommendation lookups
pub struct RecommendationOrchestrator {
    books: Arc<dyn BookProvider>,
    exercise: Arc<dyn ExerciseProvider>,
    videos: Arc<dyn VideoProvider>,
}

impl RecommendationOrchestrator {
    /// Create an orchestrator over the three networked providers
    pub fn new(
        books: Arc<dyn BookProvider>,
        exercise: Arc<dyn ExerciseProvider>,
        videos: Arc<dyn VideoProvider>,
    ) -> Self {
        Self {
            books,
            exercise,
            videos,
        }
    }

    /// Trigger all four lookups for a dominant emotion
    ///
    /// Returns immediately; each networked lookup runs detached and reports
    /// back as a generation-stamped [`ScanEvent::Slot`]. The music lookup is
    /// pure and resolves synchronously through the same channel so that all
    /// four slots share one ingestion path.
    pub fn dispatch(
        &self,
        emotion: EmotionLabel,
        generation: Generation,
        events_tx: &mpsc::Sender<ScanEvent>,
    ) {
        tracing::info!(%emotion, %generation, "Dispatching recommendation lookups");

        let books = Arc::clone(&self.books);
        let tx = events_tx.clone();
        tokio::spawn(async move {
            let query = book_query(emotion);
            let result = match books.search_books(query).await {
                Ok(books) => books,
                Err(e) => {
                    tracing::warn!(query, error = %e, "Book lookup failed");
                    Vec::new()
                }
            };
            let _ = tx
                .send(ScanEvent::Slot {
                    generation,
                    update: SlotUpdate::Books(result),
                })
                .await;
        });

        let exercise = Arc::clone(&self.exercise);
        let tx = events_tx.clone();
        tokio::spawn(async move {
            let prompt = exercise_prompt(emotion);
            let steps = match exercise.suggest_exercises(&prompt).await {
                Ok(text) => extract_steps(&text),
                Err(e) => {
                    tracing::warn!(%emotion, error = %e, "Exercise suggestion failed");
                    Vec::new()
                }
            };
            let _ = tx
                .send(ScanEvent::Slot {
                    generation,
                    update: SlotUpdate::Exercise(steps),
                })
                .await;
        });

        let videos = Arc::clone(&self.videos);
        let tx = events_tx.clone();
        tokio::spawn(async move {
            let query = video_query(emotion);
            let urls = match videos.search_videos(&query).await {
                Ok(ids) => ids
                    .into_iter()
                    .map(|id| format!("https://www.youtube.com/watch?v={id}"))
                    .collect(),
                Err(e) => {
                    tracing::warn!(query = %query, error = %e, "Video search failed");
                    Vec::new()
                }
            };
            let _ = tx
                .send(ScanEvent::Slot {
                    generation,
                    update: SlotUpdate::Videos(urls),
                })
                .await;
        });

        // Static lookup; no network boundary and no failure mode.
        let tx = events_tx.clone();
        let url = music_url(emotion).to_string();
        tokio::spawn(async move {
            let _ = tx
                .send(ScanEvent::Slot {
                    generation,
                    update: SlotUpdate::Music(url),
                })
                .await;
        });
    }
}
