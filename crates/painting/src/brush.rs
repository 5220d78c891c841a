//! Brush profile table
//!
//! Static per-tool parameters consulted by the stroke machine and the stamp
//! renderer. Profiles are immutable once built and shared by reference.

use serde::{Deserialize, Serialize};

use crate::constants::{CINNABAR_COLOR, INK_COLOR, STAMP_SHADOW_COLOR, STAMP_TEXT_COLOR};
use crate::types::{Rgba, Tool};

/// Physics parameters for a brush tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrushProfile {
    /// Diameter at first contact and under fast movement
    pub min_width: f32,
    /// Diameter ceiling reached by dwell growth
    pub max_width: f32,
    /// Diameter added per growth tick while the brush rests
    pub growth_rate_per_tick: f32,
    /// How strongly speed (px/ms) thins the stroke
    pub velocity_to_width_factor: f32,
    pub color: Rgba,
}

impl BrushProfile {
    /// Create a profile, normalizing the width range
    pub fn new(
        min_width: f32,
        max_width: f32,
        growth_rate_per_tick: f32,
        velocity_to_width_factor: f32,
        color: Rgba,
    ) -> Self {
        let min_width = min_width.max(0.0);
        Self {
            min_width,
            max_width: max_width.max(min_width),
            growth_rate_per_tick: growth_rate_per_tick.max(0.0),
            velocity_to_width_factor: velocity_to_width_factor.max(0.0),
            color,
        }
    }

    /// Futo-fude defaults
    pub fn thick() -> Self {
        Self::new(8.0, 45.0, 1.5, 0.15, INK_COLOR)
    }

    /// Hoso-fude defaults
    pub fn thin() -> Self {
        Self::new(2.0, 12.0, 0.5, 0.08, INK_COLOR)
    }

    /// Clamp a width into this profile's range
    #[inline]
    pub fn clamp_width(&self, width: f32) -> f32 {
        width.clamp(self.min_width, self.max_width)
    }
}

/// Soft shadow drawn under the stamp box to imitate paste bleeding into paper
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StampShadow {
    pub color: Rgba,
    /// Blur radius in logical pixels
    pub blur: f32,
    pub offset: [f32; 2],
}

impl Default for StampShadow {
    fn default() -> Self {
        Self {
            color: STAMP_SHADOW_COLOR,
            blur: 4.0,
            offset: [1.0, 1.0],
        }
    }
}

/// Seal stamp appearance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StampProfile {
    /// Edge length of the square box in logical pixels
    pub box_size: f32,
    pub corner_radius: f32,
    pub color: Rgba,
    pub text_color: Rgba,
    pub shadow: StampShadow,
}

impl Default for StampProfile {
    fn default() -> Self {
        Self {
            box_size: 60.0,
            corner_radius: 4.0,
            color: CINNABAR_COLOR,
            text_color: STAMP_TEXT_COLOR,
            shadow: StampShadow::default(),
        }
    }
}

/// The full tool table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileTable {
    pub thick: BrushProfile,
    pub thin: BrushProfile,
    pub stamp: StampProfile,
}

impl Default for ProfileTable {
    fn default() -> Self {
        Self {
            thick: BrushProfile::thick(),
            thin: BrushProfile::thin(),
            stamp: StampProfile::default(),
        }
    }
}

impl ProfileTable {
    /// Brush profile for a tool, or None for the stamp
    pub fn brush(&self, tool: Tool) -> Option<&BrushProfile> {
        match tool {
            Tool::ThickBrush => Some(&self.thick),
            Tool::ThinBrush => Some(&self.thin),
            Tool::Stamp => None,
        }
    }

    pub fn stamp(&self) -> &StampProfile {
        &self.stamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table() {
        let table = ProfileTable::default();
        let thick = table.brush(Tool::ThickBrush).unwrap();
        assert_eq!(thick.min_width, 8.0);
        assert_eq!(thick.max_width, 45.0);

        let thin = table.brush(Tool::ThinBrush).unwrap();
        assert_eq!(thin.min_width, 2.0);
        assert_eq!(thin.max_width, 12.0);

        assert!(table.brush(Tool::Stamp).is_none());
        assert_eq!(table.stamp().box_size, 60.0);
    }

    #[test]
    fn test_new_normalizes_inverted_range() {
        let profile = BrushProfile::new(10.0, 4.0, -1.0, 0.1, INK_COLOR);
        assert_eq!(profile.min_width, 10.0);
        assert_eq!(profile.max_width, 10.0);
        assert_eq!(profile.growth_rate_per_tick, 0.0);
    }

    #[test]
    fn test_clamp_width() {
        let profile = BrushProfile::thin();
        assert_eq!(profile.clamp_width(0.5), 2.0);
        assert_eq!(profile.clamp_width(7.0), 7.0);
        assert_eq!(profile.clamp_width(99.0), 12.0);
    }

    #[test]
    fn test_table_deserializes_overrides() {
        let mut json = serde_json::to_value(ProfileTable::default()).unwrap();
        json["thin"]["max_width"] = serde_json::json!(20.0);
        let table: ProfileTable = serde_json::from_value(json).unwrap();
        assert_eq!(table.thin.max_width, 20.0);
    }
}
