//! HTTP Provider Adapters
//!
//! Reference implementations of the three networked provider traits:
//! a volume-search book API, an OpenAI-style chat-completions endpoint for
//! exercise suggestions, and a video search API. All share one HTTP client
//! with a request timeout; provider-specific wire details stay here.

use std::time::Duration;

use async_trait::async_trait;

use super::providers::{BookProvider, ExerciseProvider, VideoProvider};
use super::Book;
use crate::config::ProvidersConfig;

/// Shared HTTP client with the provider request timeout applied
///
/// # Panics
///
/// Panics only if TLS initialization fails at process start.
fn build_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(15))
        .build()
        .expect("Failed to create HTTP client")
}

/// Book provider backed by a Google-Books-style volume search API
#[derive(Clone)]
pub struct GoogleBooksProvider {
    endpoint: String,
    max_results: u32,
    http_client: reqwest::Client,
}

impl GoogleBooksProvider {
    /// Create a provider for the given volume-search endpoint
    pub fn new(endpoint: impl Into<String>, max_results: u32) -> Self {
        Self {
            endpoint: endpoint.into(),
            max_results,
            http_client: build_client(),
        }
    }

    /// Create a provider from configuration
    #[must_use]
    pub fn from_config(config: &ProvidersConfig) -> Self {
        Self::new(config.books_endpoint.clone(), config.books_max_results)
    }
}

#[async_trait]
impl BookProvider for GoogleBooksProvider {
    async fn search_books(&self, query: &str) -> anyhow::Result<Vec<Book>> {
        let url = format!(
            "{}?q={}&maxResults={}",
            self.endpoint, query, self.max_results
        );

        let response = self.http_client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Book search returned {status}: {body}");
        }

        let data: serde_json::Value = response.json().await?;

        let books = data
            .get("items")
            .and_then(|i| i.as_array())
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| {
                        let info = item.get("volumeInfo")?;
                        let title = info.get("title")?.as_str()?.to_string();
                        let authors = info.get("authors").and_then(|a| a.as_array()).map(|a| {
                            a.iter()
                                .filter_map(|v| v.as_str())
                                .collect::<Vec<_>>()
                                .join(", ")
                        });
                        let thumbnail = info
                            .get("imageLinks")
                            .and_then(|l| l.get("thumbnail"))
                            .and_then(|t| t.as_str())
                            .map(String::from);
                        let link = info
                            .get("infoLink")
                            .and_then(|l| l.as_str())
                            .map(String::from);

                        Some(Book {
                            title,
                            authors,
                            thumbnail,
                            link,
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(books)
    }
}

/// Exercise provider backed by an OpenAI-style chat-completions endpoint
#[derive(Clone)]
pub struct ChatExerciseProvider {
    endpoint: String,
    model: String,
    api_key: Option<String>,
    http_client: reqwest::Client,
}

impl ChatExerciseProvider {
    /// Create a provider for the given chat-completions endpoint
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            model: model.into(),
            api_key,
            http_client: build_client(),
        }
    }

    /// Create a provider from configuration
    #[must_use]
    pub fn from_config(config: &ProvidersConfig) -> Self {
        Self::new(
            config.chat_endpoint.clone(),
            config.chat_model.clone(),
            config.chat_api_key.clone(),
        )
    }
}

#[async_trait]
impl ExerciseProvider for ChatExerciseProvider {
    async fn suggest_exercises(&self, prompt: &str) -> anyhow::Result<String> {
        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": "You are a mindful fitness coach." },
                { "role": "user", "content": prompt }
            ]
        });

        let mut request = self.http_client.post(&self.endpoint).json(&body);
        if let Some(ref key) = self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Exercise suggestion returned {status}: {body}");
        }

        let data: serde_json::Value = response.json().await?;

        let content = data
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .ok_or_else(|| anyhow::anyhow!("Chat response missing message content"))?;

        Ok(content.to_string())
    }
}

/// Video provider backed by a YouTube-style search API
#[derive(Clone)]
pub struct VideoSearchProvider {
    endpoint: String,
    api_key: Option<String>,
    max_results: u32,
    http_client: reqwest::Client,
}

impl VideoSearchProvider {
    /// Create a provider for the given search endpoint
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>, max_results: u32) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key,
            max_results,
            http_client: build_client(),
        }
    }

    /// Create a provider from configuration
    #[must_use]
    pub fn from_config(config: &ProvidersConfig) -> Self {
        Self::new(
            config.video_endpoint.clone(),
            config.video_api_key.clone(),
            config.video_max_results,
        )
    }
}

#[async_trait]
impl VideoProvider for VideoSearchProvider {
    async fn search_videos(&self, query: &str) -> anyhow::Result<Vec<String>> {
        let mut url = format!(
            "{}?part=snippet&q={}&type=video&maxResults={}",
            self.endpoint, query, self.max_results
        );
        if let Some(ref key) = self.api_key {
            url.push_str("&key=");
            url.push_str(key);
        }

        let response = self.http_client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Video search returned {status}: {body}");
        }

        let data: serde_json::Value = response.json().await?;

        let ids = data
            .get("items")
            .and_then(|i| i.as_array())
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| {
                        item.get("id")
                            .and_then(|id| id.get("videoId"))
                            .and_then(|v| v.as_str())
                            .map(String::from)
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(ids)
    }
}
