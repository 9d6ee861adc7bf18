//! Error types for emolens-eye

use emolens_core::Error as CoreError;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VisionError {
    #[error("Stream error: {0}")]
    Stream(String),

    #[error("Detection error: {0}")]
    Detection(String),

    #[error("Detection timed out after {0:?}")]
    Timeout(Duration),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Core error: {0}")]
    Core(#[from] CoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vision_error_display() {
        let err = VisionError::Stream("camera unplugged".to_string());
        assert!(err.to_string().contains("Stream error"));
        assert!(err.to_string().contains("camera unplugged"));

        let err = VisionError::Timeout(Duration::from_millis(250));
        assert_eq!(err.to_string(), "Detection timed out after 250ms");
    }

    #[test]
    fn test_vision_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let vision_err: VisionError = io_err.into();
        match vision_err {
            VisionError::Io(_) => {}
            _ => panic!("Expected Io error"),
        }
    }

    #[test]
    fn test_vision_error_from_core() {
        let err: VisionError = CoreError::InvalidColor("#zz".to_string()).into();
        match err {
            VisionError::Core(CoreError::InvalidColor(s)) => assert_eq!(s, "#zz"),
            _ => panic!("Expected Core error"),
        }
    }
}
