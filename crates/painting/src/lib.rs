//! Sumi painting engine - ink-brush strokes on a raster surface
//!
//! This crate provides the core of the calligraphy surface:
//! - [`stroke`] - Stroke state machine with dwell growth and velocity damping
//! - [`timer`] - Polled growth schedule with per-gesture tokens
//! - [`brush`] - Brush and stamp profile table
//! - [`stamp`] - Seal stamp renderer
//! - [`surface`] - Device-resolution RGBA surface
//! - [`snapshot`] - JPEG/PNG encoding and data URIs
//! - [`input`] - Mouse/touch normalization
//! - [`canvas`] - The facade a host drives

pub mod brush;
pub mod canvas;
pub mod constants;
pub mod error;
pub mod geometry;
pub mod input;
pub mod snapshot;
pub mod stamp;
pub mod stroke;
pub mod surface;
pub mod timer;
pub mod types;

pub use brush::*;
pub use canvas::*;
pub use constants::*;
pub use error::*;
pub use input::*;
pub use snapshot::*;
pub use stamp::*;
pub use stroke::*;
pub use surface::*;
pub use timer::*;
pub use types::*;
