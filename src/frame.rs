//! Frame Source
//!
//! Abstraction over the device camera. The core never touches capture
//! mechanics; it only asks a [`FrameSource`] for the latest still image.
//! The camera is exclusively owned by the frame source and is only queried
//! by the sampling loop while a scan is capturing.

use async_trait::async_trait;

/// An encoded still image captured from the camera
///
/// The core treats frame contents as opaque bytes (typically a JPEG data
/// URL or raw JPEG); only the detector interprets them.
#[derive(Clone, Debug)]
pub struct Frame(pub Vec<u8>);

impl Frame {
    /// Create a frame from encoded image bytes
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// The encoded image bytes
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.0
    }
}

/// Capability contract for anything that can produce still images on demand
///
/// Returning `None` means no frame is currently available (camera warming
/// up, user looked away, permission not yet granted). That is not an error;
/// the sampling tick is simply skipped.
#[async_trait]
pub trait FrameSource: Send + Sync {
    /// Capture one still image, or report that none is available
    async fn capture_frame(&self) -> Option<Frame>;
}
