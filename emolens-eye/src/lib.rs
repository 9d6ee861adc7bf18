//! emolens-eye: live expression sampling for emolens
//!
//! A [`FrameSampler`] polls a [`StreamSource`] on a fixed period, hands each
//! frame to a [`Detector`], reduces the result with
//! [`emolens_core::summarize`] and fans the summary out to an overlay sink and
//! a distribution chart sink.

pub mod camera;
pub mod config;
pub mod engine;
pub mod error;
pub mod replay;
pub mod sampler;
pub mod shutdown;
pub mod sinks;

pub use camera::VirtualCamera;
pub use config::{EyeConfig, OverlayConfig, MAX_RESOLUTION};
pub use engine::{Detector, Frame, StreamSource, StreamStatus};
pub use error::VisionError;
pub use replay::ReplayDetector;
pub use sampler::{FrameSampler, SamplerHandle, SamplerReport, SamplerState, SamplerStats};
pub use shutdown::{wait_for_stop, StopReason};
pub use sinks::{ChartSink, ChartState, OverlayRenderer, OverlaySink, OverlayState};
