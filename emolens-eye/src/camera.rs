//! In-process camera whose playback state is driven by the caller

use crate::config::frame_len;
use crate::engine::{Frame, StreamSource, StreamStatus};
use crate::error::VisionError;
use async_trait::async_trait;
use bytes::Bytes;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
enum CameraState {
    Waiting,
    Playing,
    Paused,
    Ended,
    Failed(String),
}

struct Inner {
    width: u32,
    height: u32,
    state: watch::Sender<CameraState>,
    sequence: AtomicU64,
    blank: Bytes,
}

/// Stream source that serves blank RGB frames of a fixed size.
///
/// Starts out waiting; call [`VirtualCamera::play`] to make it ready.
/// Clones share the same state, so one clone can be handed to the sampler
/// while another pauses or ends playback.
#[derive(Clone)]
pub struct VirtualCamera {
    inner: Arc<Inner>,
}

impl VirtualCamera {
    /// Fails if the frame size is zero or beyond [`crate::config::MAX_RESOLUTION`]
    pub fn new(width: u32, height: u32) -> Result<Self, VisionError> {
        let len = frame_len(width, height)?;
        let (state, _) = watch::channel(CameraState::Waiting);
        Ok(Self {
            inner: Arc::new(Inner {
                width,
                height,
                state,
                sequence: AtomicU64::new(0),
                blank: Bytes::from(vec![0u8; len]),
            }),
        })
    }

    pub fn play(&self) {
        self.set(CameraState::Playing);
    }

    pub fn pause(&self) {
        self.set(CameraState::Paused);
    }

    pub fn end(&self) {
        self.set(CameraState::Ended);
    }

    /// Simulate an acquisition failure (e.g. permission denied)
    pub fn fail(&self, reason: impl Into<String>) {
        self.set(CameraState::Failed(reason.into()));
    }

    /// Number of frames handed out so far
    pub fn frames_served(&self) -> u64 {
        self.inner.sequence.load(Ordering::Relaxed)
    }

    fn set(&self, state: CameraState) {
        info!("Virtual camera -> {:?}", state);
        self.inner.state.send_replace(state);
    }
}

#[async_trait]
impl StreamSource for VirtualCamera {
    async fn ready(&self) -> Result<(), VisionError> {
        let mut rx = self.inner.state.subscribe();
        loop {
            let outcome = match &*rx.borrow_and_update() {
                CameraState::Playing => Some(Ok(())),
                CameraState::Failed(reason) => Some(Err(VisionError::Stream(reason.clone()))),
                CameraState::Ended => Some(Err(VisionError::Stream(
                    "stream ended before playback started".to_string(),
                ))),
                CameraState::Waiting | CameraState::Paused => None,
            };
            if let Some(outcome) = outcome {
                return outcome;
            }
            rx.changed()
                .await
                .map_err(|_| VisionError::Stream("camera dropped".to_string()))?;
        }
    }

    fn status(&self) -> StreamStatus {
        match &*self.inner.state.borrow() {
            CameraState::Playing => StreamStatus::Playing,
            CameraState::Waiting | CameraState::Paused => StreamStatus::Paused,
            CameraState::Ended | CameraState::Failed(_) => StreamStatus::Ended,
        }
    }

    fn dimensions(&self) -> (u32, u32) {
        (self.inner.width, self.inner.height)
    }

    fn frame(&self) -> Frame {
        Frame {
            sequence: self.inner.sequence.fetch_add(1, Ordering::Relaxed),
            width: self.inner.width,
            height: self.inner.height,
            captured_at: chrono::Utc::now(),
            data: self.inner.blank.clone(),
        }
    }
}
