//! Error types for the painting crate.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PaintingError {
    #[error("Invalid surface dimensions: {width}x{height} at density {pixel_density}")]
    InvalidDimensions {
        width: u32,
        height: u32,
        pixel_density: f32,
    },

    #[error("Surface has not been initialized")]
    NoSurface,

    #[error("Snapshot encoding failed: {0}")]
    Encode(#[from] image::ImageError),

    #[error("Malformed data URI: {0}")]
    DataUri(String),

    #[error("Failed to read font {path}: {source}")]
    FontIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid font data")]
    Font(#[from] ab_glyph::InvalidFont),

    #[error("Preference store error: {0}")]
    Config(#[from] sumi_config::ConfigError),
}
