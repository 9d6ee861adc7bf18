//! Error types for emolens-core

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Palette error: {0}")]
    Palette(String),
}

pub type Result<T> = std::result::Result<T, Error>;
