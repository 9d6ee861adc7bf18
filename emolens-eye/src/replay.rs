//! Detector that replays recorded detection frames

use crate::engine::{Detector, Frame};
use crate::error::VisionError;
use async_trait::async_trait;
use emolens_core::Detection;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::{debug, info};

/// Replays a recording, one recorded frame per `detect` call, wrapping
/// around at the end.
///
/// Recordings are JSON Lines: each non-blank line is a JSON array of
/// detections (`[]` is a frame without faces).
pub struct ReplayDetector {
    frames: Vec<Vec<Detection>>,
    cursor: AtomicUsize,
    latency: Duration,
}

impl ReplayDetector {
    pub fn new(frames: Vec<Vec<Detection>>) -> Self {
        Self {
            frames,
            cursor: AtomicUsize::new(0),
            latency: Duration::ZERO,
        }
    }

    /// Delay every call by `latency` to imitate inference time
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, VisionError> {
        let mut frames = Vec::new();
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let frame: Vec<Detection> = serde_json::from_str(&line).map_err(|e| {
                VisionError::Detection(format!("recording line {}: {}", index + 1, e))
            })?;
            frames.push(frame);
        }
        Ok(Self::new(frames))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, VisionError> {
        let path = path.as_ref();
        let detector = Self::from_reader(BufReader::new(File::open(path)?))?;
        info!("Loaded {} recorded frames from {:?}", detector.len(), path);
        Ok(detector)
    }

    /// Number of recorded frames
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Number of `detect` calls served so far
    pub fn calls(&self) -> usize {
        self.cursor.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Detector for ReplayDetector {
    async fn detect(&self, frame: Frame) -> Result<Vec<Detection>, VisionError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let call = self.cursor.fetch_add(1, Ordering::Relaxed);
        if self.frames.is_empty() {
            return Ok(Vec::new());
        }
        let recorded = &self.frames[call % self.frames.len()];
        debug!(
            "Replaying {} detections for frame {}",
            recorded.len(),
            frame.sequence
        );
        Ok(recorded.clone())
    }
}
