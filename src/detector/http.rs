//! HTTP Emotion Detector
//!
//! Adapter for a facial-expression-recognition service exposing a single
//! JSON endpoint: POST `{"image": <encoded frame>}`, receive
//! `{"emotion": "<label>"}`. A response without a usable label is an error;
//! the sampling loop turns that into a skipped tick.

use std::time::Duration;

use async_trait::async_trait;

use super::traits::EmotionClassifier;
use crate::emotion::EmotionLabel;
use crate::frame::Frame;

/// Emotion classifier backed by an HTTP detection service
#[derive(Clone)]
pub struct HttpEmotionDetector {
    /// Detection endpoint URL
    endpoint: String,
    /// HTTP client
    http_client: reqwest::Client,
}

impl HttpEmotionDetector {
    /// Create a detector for the given endpoint
    ///
    /// # Panics
    ///
    /// Panics if the underlying HTTP client cannot be constructed, which
    /// only happens when TLS initialization fails at process start.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            http_client: reqwest::Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .expect("Failed to create HTTP client"),
        }
    }

    /// Create a detector reusing an existing HTTP client
    pub fn with_client(endpoint: impl Into<String>, http_client: reqwest::Client) -> Self {
        Self {
            endpoint: endpoint.into(),
            http_client,
        }
    }
}

#[async_trait]
impl EmotionClassifier for HttpEmotionDetector {
    fn name(&self) -> &'static str {
        "fer-http"
    }

    async fn classify(&self, frame: &Frame) -> anyhow::Result<EmotionLabel> {
        let image = String::from_utf8_lossy(frame.bytes()).into_owned();

        let response = self
            .http_client
            .post(&self.endpoint)
            .json(&serde_json::json!({ "image": image }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Detector returned {status}: {body}");
        }

        let data: serde_json::Value = response.json().await?;

        let label = data
            .get("emotion")
            .and_then(|e| e.as_str())
            .ok_or_else(|| anyhow::anyhow!("Detector response missing emotion field"))?;

        Ok(EmotionLabel::parse(label))
    }
}
