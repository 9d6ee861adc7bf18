//! Output sinks fed from each frame summary

pub mod chart;
pub mod overlay;

pub use chart::{ChartSink, ChartState, DATASET_LABEL};
pub use overlay::{DrawCommand, OverlayRenderer, OverlaySink, OverlayState};
