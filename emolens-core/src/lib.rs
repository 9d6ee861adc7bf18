//! emolens-core: expression categories, detections and per-frame aggregation
//!
//! Everything here is pure data and pure functions. The sampling loop and the
//! output sinks live in `emolens-eye`.

pub mod aggregate;
pub mod detection;
pub mod error;
pub mod palette;

pub use aggregate::{summarize, Distribution, EntitySummary, FrameSummary};
pub use detection::{BoundingBox, Detection, Scores};
pub use error::{Error, Result};
pub use palette::{Category, Color, Palette, CATEGORY_COUNT};
