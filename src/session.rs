//! Scan Session State
//!
//! Types owned by the controller for exactly one scan at a time: the sample
//! buffer being filled, the session state machine value, and the generation
//! tag that lets late asynchronous results be identified and discarded.
//!
//! # Design Philosophy
//!
//! All mutable session state has a single owner (the controller). Everything
//! asynchronous — classifications, countdown ticks, window expiry, provider
//! results — flows back to that owner as a generation-stamped [`ScanEvent`],
//! so no locks are needed and a restarted session can never be corrupted by
//! a straggler from the previous one.

use serde::{Deserialize, Serialize};

use crate::emotion::EmotionLabel;
use crate::recommend::SlotUpdate;

/// Tag identifying which scan session an asynchronous result belongs to
///
/// Monotonically increasing; bumped on every `start_scan`. Results carrying
/// a stale generation are dropped at the single point of ingestion.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Generation(pub u64);

impl Generation {
    /// The next generation tag
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl std::fmt::Display for Generation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "gen_{}", self.0)
    }
}

/// Scan session state
///
/// Exactly one value is active at a time; owned by the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// No scan in progress
    Idle,
    /// Capture window is open; ticking down for user feedback
    Capturing {
        /// Seconds left on the user-visible countdown
        remaining_secs: u32,
    },
    /// Window closed, reducing the buffer to a dominant label
    Aggregating,
    /// Dominant emotion known; recommendation slots filling independently
    Presenting {
        /// The dominant emotion for this session
        dominant: EmotionLabel,
    },
}

impl SessionState {
    /// Whether a scan is currently capturing (re-entrancy guard)
    #[must_use]
    pub fn is_capturing(&self) -> bool {
        matches!(self, Self::Capturing { .. })
    }

    /// Human-readable description
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Capturing { .. } => "Analyzing...",
            Self::Aggregating => "Aggregating...",
            Self::Presenting { .. } => "Results ready",
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::Idle
    }
}

/// Ordered, append-only sequence of labels collected during one window
///
/// Owned by the active session; replaced wholesale when a new scan starts.
/// Order records arrival, but aggregation only uses it as a multiset plus
/// first-appearance order for tie-breaking.
#[derive(Clone, Debug, Default)]
pub struct SampleBuffer {
    labels: Vec<EmotionLabel>,
}

impl SampleBuffer {
    /// Create an empty buffer
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one classified sample
    pub fn push(&mut self, label: EmotionLabel) {
        self.labels.push(label);
    }

    /// Number of samples collected
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether no samples were collected
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// The collected labels in arrival order
    #[must_use]
    pub fn labels(&self) -> &[EmotionLabel] {
        &self.labels
    }
}

/// Internal events flowing back to the controller
///
/// Every variant carries the generation it was produced under; the
/// controller drops anything that doesn't match the current scan.
#[derive(Clone, Debug)]
pub enum ScanEvent {
    /// A classification completed for one tick
    Sample {
        /// Session the sample belongs to
        generation: Generation,
        /// The classified label
        label: EmotionLabel,
    },
    /// One second elapsed on the user-visible countdown
    Countdown {
        /// Session the tick belongs to
        generation: Generation,
        /// Seconds remaining (down to 0)
        remaining_secs: u32,
    },
    /// The capture window's duration timer elapsed
    WindowElapsed {
        /// Session whose window closed
        generation: Generation,
    },
    /// One recommendation slot resolved
    Slot {
        /// Session the result belongs to
        generation: Generation,
        /// The resolved slot contents
        update: SlotUpdate,
    },
}

impl ScanEvent {
    /// The generation this event was produced under
    #[must_use]
    pub fn generation(&self) -> Generation {
        match self {
            Self::Sample { generation, .. }
            | Self::Countdown { generation, .. }
            | Self::WindowElapsed { generation }
            | Self::Slot { generation, .. } => *generation,
        }
    }
}
