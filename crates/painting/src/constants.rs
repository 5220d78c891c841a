use crate::types::{Rgba, rgb8, rgba8};

/// Interval between dwell-growth ticks (roughly one 60 Hz frame).
pub const GROWTH_TICK_MS: u64 = 16;

/// Movement below this distance (logical px) is treated as jitter.
pub const NOISE_THRESHOLD: f32 = 2.0;

/// Scale applied to `velocity * velocity_to_width_factor`.
pub const VELOCITY_WIDTH_SCALE: f32 = 20.0;

/// Weight of the previous width in the exponential smoothing step.
pub const WIDTH_SMOOTHING: f32 = 0.7;

/// Smallest time delta used for velocity, in milliseconds.
pub const MIN_TIME_DELTA_MS: u64 = 1;

/// Paper background. Every surface is filled with this before any ink lands.
pub const PAPER_COLOR: Rgba = rgb8(0xfd, 0xfb, 0xf7);

/// Sumi ink is rarely pure black.
pub const INK_COLOR: Rgba = rgb8(0x1a, 0x1a, 0x1a);

/// Cinnabar red seal paste.
pub const CINNABAR_COLOR: Rgba = rgb8(0xbd, 0x2c, 0x2c);

pub const STAMP_TEXT_COLOR: Rgba = rgb8(0xff, 0xff, 0xff);

pub const STAMP_SHADOW_COLOR: Rgba = rgba8(189, 44, 44, 0.3);

/// Default JPEG snapshot quality (0.0-1.0).
pub const SNAPSHOT_QUALITY: f32 = 0.8;

/// Curve flattening step in device pixels.
pub const CURVE_FLATTEN_STEP: f32 = 2.0;
