use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Straight-alpha RGBA color, components in 0.0-1.0
pub type Rgba = [f32; 4];

/// Opaque color from 8-bit channels
pub const fn rgb8(r: u8, g: u8, b: u8) -> Rgba {
    [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0]
}

/// Color from 8-bit channels and a fractional alpha
pub const fn rgba8(r: u8, g: u8, b: u8, a: f32) -> Rgba {
    [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, a]
}

/// Tools the caller can select
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Tool {
    /// Futo-fude: wide brush that pools ink quickly
    #[default]
    ThickBrush,
    /// Hoso-fude: fine brush for detail strokes
    ThinBrush,
    /// Tenkoku seal stamp
    Stamp,
}

impl Tool {
    /// Whether the tool produces strokes (as opposed to a one-shot stamp)
    pub fn is_brush(self) -> bool {
        matches!(self, Tool::ThickBrush | Tool::ThinBrush)
    }
}

/// A single point in a stroke's history
///
/// Positions are in logical (density-independent) pixels relative to the
/// surface's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub x: f32,
    pub y: f32,
    /// Brush diameter at this sample
    pub width: f32,
    pub timestamp_ms: u64,
}

impl Sample {
    pub fn new(x: f32, y: f32, width: f32, timestamp_ms: u64) -> Self {
        Self {
            x,
            y,
            width,
            timestamp_ms,
        }
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// A normalized pointer sample produced by the input adapter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerSample {
    pub x: f32,
    pub y: f32,
    pub timestamp_ms: u64,
}

impl PointerSample {
    pub fn new(x: f32, y: f32, timestamp_ms: u64) -> Self {
        Self { x, y, timestamp_ms }
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb8_is_opaque() {
        let color = rgb8(255, 0, 51);
        assert_eq!(color, [1.0, 0.0, 0.2, 1.0]);
    }

    #[test]
    fn test_tool_kinds() {
        assert!(Tool::ThickBrush.is_brush());
        assert!(Tool::ThinBrush.is_brush());
        assert!(!Tool::Stamp.is_brush());
        assert_eq!(Tool::default(), Tool::ThickBrush);
    }
}
