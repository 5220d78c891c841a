//! Shared configuration for Sumi
//!
//! This crate provides the single source of truth for paper dimensions,
//! pixel density, and the user preferences that persist between sessions
//! (stamp text, artist name, stamp font).

mod error;
mod preferences;
mod store;

pub use error::ConfigError;
pub use preferences::{DEFAULT_STAMP_TEXT, Preferences};
pub use store::{JsonFileStore, MemoryStore, PreferenceStore};

use serde::{Deserialize, Serialize};

/// Default paper width in logical pixels
pub const DEFAULT_WIDTH: u32 = 800;

/// Default paper height in logical pixels (roughly hanshi ratio)
pub const DEFAULT_HEIGHT: u32 = 1100;

/// Default pixel density (1.0 = one device pixel per logical pixel)
pub const DEFAULT_PIXEL_DENSITY: f32 = 1.0;

/// Environment variable overriding the pixel density
pub const PIXEL_DENSITY_ENV: &str = "SUMI_PIXEL_DENSITY";

/// Surface configuration for the drawing canvas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceConfig {
    /// Surface width in logical pixels
    pub width: u32,
    /// Surface height in logical pixels
    pub height: u32,
    /// Device pixels per logical pixel
    pub pixel_density: f32,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            pixel_density: DEFAULT_PIXEL_DENSITY,
        }
    }
}

impl SurfaceConfig {
    /// Create a new surface config with the given logical dimensions
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixel_density: DEFAULT_PIXEL_DENSITY,
        }
    }

    /// Default config with the pixel density taken from `SUMI_PIXEL_DENSITY`
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(raw) = std::env::var(PIXEL_DENSITY_ENV) {
            match raw.parse::<f32>() {
                Ok(density) if density.is_finite() && density > 0.0 => {
                    config.pixel_density = density;
                }
                _ => tracing::warn!("Ignoring invalid {}={:?}", PIXEL_DENSITY_ENV, raw),
            }
        }
        config
    }

    /// Builder-style pixel density override
    pub fn with_pixel_density(mut self, pixel_density: f32) -> Self {
        self.pixel_density = pixel_density;
        self
    }

    /// Width in device pixels
    pub fn device_width(&self) -> u32 {
        (self.width as f32 * self.pixel_density).round() as u32
    }

    /// Height in device pixels
    pub fn device_height(&self) -> u32 {
        (self.height as f32 * self.pixel_density).round() as u32
    }
}
