//! Capabilities the sampler drives: a frame source and a detection engine

use crate::error::VisionError;
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use emolens_core::Detection;

/// Snapshot of the stream handed to the detection engine
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Monotonic frame number assigned by the source
    pub sequence: u64,
    pub width: u32,
    pub height: u32,
    pub captured_at: DateTime<Utc>,
    /// Raw pixel payload; format is a contract between source and detector
    pub data: Bytes,
}

/// Playback state of a stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamStatus {
    Playing,
    Paused,
    Ended,
}

impl StreamStatus {
    /// Paused and ended streams stop the sampler
    pub fn is_halted(self) -> bool {
        !matches!(self, StreamStatus::Playing)
    }
}

/// Video stream feeding the sampler
#[async_trait]
pub trait StreamSource: Send + Sync {
    /// Resolve once the stream starts playing; an error means acquisition
    /// failed and is terminal for the session.
    async fn ready(&self) -> Result<(), VisionError>;

    fn status(&self) -> StreamStatus;

    /// Frame dimensions (width, height)
    fn dimensions(&self) -> (u32, u32);

    /// Current frame
    fn frame(&self) -> Frame;
}

/// Face detection and expression classification engine
#[async_trait]
pub trait Detector: Send + Sync {
    /// Detect every entity in `frame` together with its category scores.
    /// An empty result is a valid zero-entity frame, not an error.
    async fn detect(&self, frame: Frame) -> Result<Vec<Detection>, VisionError>;
}
