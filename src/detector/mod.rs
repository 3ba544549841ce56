//! Emotion Detection
//!
//! Classifier abstraction and reference implementations. The core only
//! depends on the [`EmotionClassifier`] trait; the HTTP adapter talks to an
//! external facial-expression-recognition service.

mod http;
mod traits;

pub use http::HttpEmotionDetector;
pub use traits::EmotionClassifier;
