//! Configuration for emolens-eye

use crate::error::VisionError;
use emolens_core::{Category, Color, Palette};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

/// Environment variable overriding [`EyeConfig::interval_ms`]
pub const ENV_INTERVAL_MS: &str = "EMOLENS_INTERVAL_MS";
/// Environment variable overriding [`EyeConfig::detect_timeout_ms`] (`0` disables)
pub const ENV_DETECT_TIMEOUT_MS: &str = "EMOLENS_DETECT_TIMEOUT_MS";

const MAX_PERIOD_MS: u64 = 60_000;

/// Largest supported frame size (8K UHD)
pub const MAX_RESOLUTION: (u32, u32) = (7680, 4320);

/// Sampler and sink configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EyeConfig {
    /// Time between sampler ticks
    pub interval_ms: u64,
    /// Camera frame size (width, height)
    pub resolution: (u32, u32),
    /// Upper bound on a single detection call (None = wait indefinitely)
    pub detect_timeout_ms: Option<u64>,
    /// Overlay drawing style
    pub overlay: OverlayConfig,
    /// Per-category color overrides on top of the default palette
    pub palette: BTreeMap<Category, Color>,
}

/// Overlay drawing style
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Box stroke width in pixels
    pub line_width: f32,
    /// Caption font
    pub font: String,
    /// Caption distance above the box
    pub label_offset: f32,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            line_width: 3.0,
            font: "16px Arial".to_string(),
            label_offset: 5.0,
        }
    }
}

impl Default for EyeConfig {
    fn default() -> Self {
        Self {
            interval_ms: 200,
            resolution: (640, 480),
            detect_timeout_ms: None,
            overlay: OverlayConfig::default(),
            palette: BTreeMap::new(),
        }
    }
}

impl EyeConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn detect_timeout(&self) -> Option<Duration> {
        self.detect_timeout_ms.map(Duration::from_millis)
    }

    /// Default palette with this config's overrides applied
    pub fn palette(&self) -> Result<Palette, VisionError> {
        Ok(Palette::with_overrides(&self.palette)?)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), VisionError> {
        if self.interval_ms == 0 || self.interval_ms > MAX_PERIOD_MS {
            return Err(VisionError::Config(format!(
                "interval_ms must be between 1 and {}",
                MAX_PERIOD_MS
            )));
        }

        if let Some(timeout) = self.detect_timeout_ms {
            if timeout == 0 || timeout > MAX_PERIOD_MS {
                return Err(VisionError::Config(format!(
                    "detect_timeout_ms must be between 1 and {}",
                    MAX_PERIOD_MS
                )));
            }
        }

        frame_len(self.resolution.0, self.resolution.1)?;

        let overlay = &self.overlay;
        if !overlay.line_width.is_finite() || overlay.line_width <= 0.0 || overlay.line_width > 100.0 {
            return Err(VisionError::Config(
                "overlay.line_width must be in (0, 100]".to_string(),
            ));
        }
        if !overlay.label_offset.is_finite() {
            return Err(VisionError::Config(
                "overlay.label_offset must be finite".to_string(),
            ));
        }
        if overlay.font.trim().is_empty() {
            return Err(VisionError::Config("overlay.font must not be empty".to_string()));
        }

        self.palette()?;
        Ok(())
    }

    /// Load configuration from a JSON or TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, VisionError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        content.parse()
    }

    /// Apply environment overrides
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary key lookup. Unparseable values are
    /// logged and ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_INTERVAL_MS) {
            match raw.trim().parse::<u64>() {
                Ok(ms) => self.interval_ms = ms,
                Err(_) => warn!("Ignoring {}={:?}: not an integer", ENV_INTERVAL_MS, raw),
            }
        }

        if let Some(raw) = lookup(ENV_DETECT_TIMEOUT_MS) {
            match raw.trim().parse::<u64>() {
                Ok(0) => self.detect_timeout_ms = None,
                Ok(ms) => self.detect_timeout_ms = Some(ms),
                Err(_) => warn!("Ignoring {}={:?}: not an integer", ENV_DETECT_TIMEOUT_MS, raw),
            }
        }
    }
}

/// Byte length of one RGB frame, rejecting empty, oversized or overflowing sizes
pub fn frame_len(width: u32, height: u32) -> Result<usize, VisionError> {
    if width == 0 || height == 0 {
        return Err(VisionError::Config("Resolution must be non-zero".to_string()));
    }

    let (max_width, max_height) = MAX_RESOLUTION;
    if width > max_width || height > max_height {
        return Err(VisionError::Config(format!(
            "Resolution {}x{} too large (max {}x{})",
            width, height, max_width, max_height
        )));
    }

    (width as usize)
        .checked_mul(height as usize)
        .and_then(|pixels| pixels.checked_mul(3))
        .ok_or_else(|| VisionError::Config("Resolution would cause integer overflow".to_string()))
}

/// Parses JSON when the content is a JSON object, TOML otherwise
impl FromStr for EyeConfig {
    type Err = VisionError;

    fn from_str(content: &str) -> Result<Self, Self::Err> {
        if content.trim_start().starts_with('{') {
            Ok(serde_json::from_str(content)?)
        } else {
            Ok(toml::from_str(content)?)
        }
    }
}
