//! VibeSync Core - Headless Emotion-Scan Orchestration
//!
//! This crate provides the core orchestration logic for VibeSync,
//! completely independent of any UI framework. It samples a user's facial
//! expression over a fixed window, aggregates the samples into one dominant
//! emotion, and fans out to four independent recommendation providers keyed
//! by that emotion.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Presentation Surface                          │
//! │        (webcam view, countdown, category tabs — out of scope)    │
//! │                           │                                      │
//! │                 start_scan() (up)                                │
//! │                 ScanMessage (down)                               │
//! │                           │                                      │
//! └───────────────────────────┼──────────────────────────────────────┘
//!                             │
//! ┌───────────────────────────┼──────────────────────────────────────┐
//! │                     SCAN CORE                                    │
//! │  ┌────────────────────────┴────────────────────────────────────┐ │
//! │  │                   ScanController                             │ │
//! │  │  ┌──────────┐  ┌──────────┐  ┌───────────┐  ┌─────────────┐ │ │
//! │  │  │ Sampling │  │  Sample  │  │ Aggregate │  │ Recommend   │ │ │
//! │  │  │   Loop   │  │  Buffer  │  │           │  │ Orchestrator│ │ │
//! │  │  └────┬─────┘  └──────────┘  └───────────┘  └──────┬──────┘ │ │
//! │  └───────┼─────────────────────────────────────────────┼───────┘ │
//! │          │                                              │         │
//! │   FrameSource / EmotionClassifier          Book / Exercise /      │
//! │        (camera + detector)                 Video providers        │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`ScanController`]: the session state machine that coordinates everything
//! - [`SamplingLoop`]: periodic capture + classify for one window
//! - [`RecommendationOrchestrator`]: independent four-way fan-out
//! - [`ScanMessage`]: messages sent from the core to a presentation surface
//! - [`EmotionLabel`]: the closed set of detector labels
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use tokio::sync::mpsc;
//! use vibesync_core::{
//!     load_config, ChatExerciseProvider, GoogleBooksProvider, HttpEmotionDetector,
//!     RecommendationOrchestrator, SamplingLoop, ScanController, VideoSearchProvider,
//! };
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = load_config();
//!     let (tx, mut rx) = mpsc::channel(100);
//!
//!     let sampling = SamplingLoop::new(
//!         Arc::new(my_camera),
//!         Arc::new(HttpEmotionDetector::new(&config.providers.detector_endpoint)),
//!     );
//!     let orchestrator = RecommendationOrchestrator::new(
//!         Arc::new(GoogleBooksProvider::from_config(&config.providers)),
//!         Arc::new(ChatExerciseProvider::from_config(&config.providers)),
//!         Arc::new(VideoSearchProvider::from_config(&config.providers)),
//!     );
//!     let mut controller = ScanController::new(config.scan, sampling, orchestrator, tx);
//!
//!     // On the user's start action:
//!     controller.start_scan().await.unwrap();
//!
//!     // Main loop: render messages and pump the controller.
//!     loop {
//!         while let Ok(msg) = rx.try_recv() {
//!             // Render countdown / samples / recommendation slots.
//!         }
//!         controller.poll().await;
//!     }
//! }
//! ```
//!
//! # Module Overview
//!
//! - [`emotion`]: the closed label set
//! - [`frame`]: camera capability contract
//! - [`detector`]: classifier trait + HTTP adapter
//! - [`sampling`]: the windowed capture loop and its scoped timers
//! - [`aggregate`]: dominant-label reduction
//! - [`session`]: buffer, state machine values, generation tags
//! - [`recommend`]: slots, fan-out orchestration, provider adapters
//! - [`controller`]: the session controller
//! - [`intro`]: the independent intro-message rotator
//! - [`messages`]: the surface protocol
//! - [`config`]: TOML + environment configuration
//!
//! # No UI Dependencies
//!
//! This crate has **zero** dependencies on any rendering or capture
//! framework. The camera is a [`FrameSource`] trait and the UI is an mpsc
//! channel; it can drive a web surface, a desktop shell, or run headless
//! under test.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod aggregate;
pub mod config;
pub mod controller;
pub mod detector;
pub mod emotion;
pub mod frame;
pub mod intro;
pub mod messages;
pub mod recommend;
pub mod sampling;
pub mod session;

// Re-exports for convenience
pub use aggregate::dominant;
pub use config::{
    load_config, load_config_from_path, ConfigError, ProvidersConfig, ScanConfig, VibeSyncConfig,
};
pub use controller::{ScanController, StartScanError};
pub use detector::{EmotionClassifier, HttpEmotionDetector};
pub use emotion::EmotionLabel;
pub use frame::{Frame, FrameSource};
pub use intro::IntroRotator;
pub use messages::ScanMessage;
pub use recommend::{
    Book, BookProvider, ChatExerciseProvider, ExerciseProvider, GoogleBooksProvider,
    RecommendationOrchestrator, RecommendationSet, Slot, SlotUpdate, VideoProvider,
    VideoSearchProvider,
};
pub use sampling::{SamplingHandle, SamplingLoop};
pub use session::{Generation, SampleBuffer, ScanEvent, SessionState};
