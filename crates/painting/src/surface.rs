//! Raster surface for painting
//!
//! One mutable RGBA buffer at device-pixel resolution. All drawing calls
//! take logical (density-independent) coordinates and are scaled by the
//! pixel density before rasterization. The buffer is filled with an opaque
//! background on creation and on clear, so exports never carry transparency.

use glam::Vec2;
use sumi_config::SurfaceConfig;
use tracing::{debug, info};

use crate::constants::CURVE_FLATTEN_STEP;
use crate::error::PaintingError;
use crate::geometry::{distance_to_segment, flatten_quadratic};
use crate::stroke::PaintOp;
use crate::types::Rgba;

/// Affected region in device pixels: (x, y, width, height)
pub type PixelBounds = (u32, u32, u32, u32);

/// Device-resolution RGBA surface with a logical coordinate space
pub struct Surface {
    /// Device pixel dimensions
    pub width: u32,
    pub height: u32,
    logical_width: u32,
    logical_height: u32,
    pixel_density: f32,
    background: Rgba,
    /// Row-major pixels, straight alpha
    pixels: Vec<[f32; 4]>,
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("logical_width", &self.logical_width)
            .field("logical_height", &self.logical_height)
            .field("pixel_density", &self.pixel_density)
            .finish()
    }
}

impl Surface {
    /// Allocate a surface of `logical * pixel_density` device pixels and fill
    /// it with `background` (forced opaque)
    pub fn new(
        logical_width: u32,
        logical_height: u32,
        pixel_density: f32,
        background: Rgba,
    ) -> Result<Self, PaintingError> {
        let invalid = || PaintingError::InvalidDimensions {
            width: logical_width,
            height: logical_height,
            pixel_density,
        };
        if !pixel_density.is_finite() || pixel_density <= 0.0 {
            return Err(invalid());
        }

        let width = (logical_width as f32 * pixel_density).round() as u32;
        let height = (logical_height as f32 * pixel_density).round() as u32;
        if width == 0 || height == 0 {
            return Err(invalid());
        }

        let background = [background[0], background[1], background[2], 1.0];
        let pixel_count = (width as usize) * (height as usize);

        info!(
            "Surface::new: {}x{} logical -> {}x{} device (density {:.2})",
            logical_width, logical_height, width, height, pixel_density
        );

        Ok(Self {
            width,
            height,
            logical_width,
            logical_height,
            pixel_density,
            background,
            pixels: vec![background; pixel_count],
        })
    }

    pub fn from_config(config: &SurfaceConfig, background: Rgba) -> Result<Self, PaintingError> {
        Self::new(config.width, config.height, config.pixel_density, background)
    }

    #[inline]
    pub fn logical_size(&self) -> (u32, u32) {
        (self.logical_width, self.logical_height)
    }

    #[inline]
    pub fn pixel_density(&self) -> f32 {
        self.pixel_density
    }

    #[inline]
    pub fn background(&self) -> Rgba {
        self.background
    }

    /// Refill the whole buffer with the background color
    pub fn clear(&mut self) {
        self.pixels.fill(self.background);
    }

    /// True when no pixel differs from the background
    pub fn is_blank(&self) -> bool {
        self.pixels.iter().all(|p| *p == self.background)
    }

    /// Get a pixel at device coordinates
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[f32; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[self.index(x, y)])
    }

    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.pixels.len()
    }

    #[inline]
    pub fn pixels(&self) -> &[[f32; 4]] {
        &self.pixels
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.width as usize) + (x as usize)
    }

    /// Blend a color onto a pixel: out = src * alpha + dst * (1 - alpha)
    #[inline]
    pub fn blend_pixel(&mut self, x: u32, y: u32, color: Rgba, opacity: f32) {
        if x >= self.width || y >= self.height {
            return;
        }
        let index = self.index(x, y);
        let dst = self.pixels[index];

        let src_alpha = (color[3] * opacity).clamp(0.0, 1.0);
        let inv_src_alpha = 1.0 - src_alpha;

        self.pixels[index] = [
            color[0] * src_alpha + dst[0] * inv_src_alpha,
            color[1] * src_alpha + dst[1] * inv_src_alpha,
            color[2] * src_alpha + dst[2] * inv_src_alpha,
            src_alpha + dst[3] * inv_src_alpha,
        ];
    }

    /// Blend with a coverage value at signed device coordinates (glyph output)
    #[inline]
    pub fn blend_coverage(&mut self, x: i32, y: i32, color: Rgba, coverage: f32) {
        if x < 0 || y < 0 || coverage <= 0.0 {
            return;
        }
        self.blend_pixel(x as u32, y as u32, color, coverage.min(1.0));
    }

    /// Apply a paint instruction emitted by the stroke machine
    pub fn apply(&mut self, op: &PaintOp) -> Option<PixelBounds> {
        match *op {
            PaintOp::Disc {
                center,
                diameter,
                color,
            } => self.fill_disc(center, diameter, color),
            PaintOp::Curve {
                start,
                control,
                end,
                width,
                color,
            } => self.stroke_quadratic(start, control, end, width, color),
        }
    }

    /// Fill a circle of `diameter` centered at `center` (logical units)
    pub fn fill_disc(&mut self, center: Vec2, diameter: f32, color: Rgba) -> Option<PixelBounds> {
        let radius = diameter * self.pixel_density / 2.0;
        self.stroke_device_polyline(&[center * self.pixel_density], radius, color)
    }

    /// Stroke the quadratic curve `start -> control -> end` with round caps
    pub fn stroke_quadratic(
        &mut self,
        start: Vec2,
        control: Vec2,
        end: Vec2,
        width: f32,
        color: Rgba,
    ) -> Option<PixelBounds> {
        let d = self.pixel_density;
        let points = flatten_quadratic(start * d, control * d, end * d, CURVE_FLATTEN_STEP);
        self.stroke_device_polyline(&points, width * d / 2.0, color)
    }

    /// Fill a rounded rectangle centered at `center` (logical units)
    ///
    /// `feather` widens the edge into a smooth ramp of that many logical
    /// pixels on each side; 0.0 gives a crisp antialiased edge.
    pub fn fill_rounded_rect(
        &mut self,
        center: Vec2,
        size: Vec2,
        corner_radius: f32,
        color: Rgba,
        feather: f32,
    ) -> Option<PixelBounds> {
        let d = self.pixel_density;
        let center = center * d;
        let half = (size * d / 2.0).max(Vec2::ZERO);
        let radius = (corner_radius * d).clamp(0.0, half.min_element());
        let feather = (feather * d).max(0.0);

        if half.min_element() <= 0.0 {
            return None;
        }

        let reach = half + Vec2::splat(feather + 1.0);
        self.rasterize(center - reach, center + reach, color, |p| {
            soft_coverage(rounded_box_distance(p - center, half, radius), feather)
        })
    }

    /// Round-capped polyline in device space; a single point is a disc
    ///
    /// Each segment only visits pixels inside its own capsule bounds and
    /// writes the max coverage into a scratch mask, so overlapping joints
    /// are blended once.
    fn stroke_device_polyline(
        &mut self,
        points: &[Vec2],
        radius: f32,
        color: Rgba,
    ) -> Option<PixelBounds> {
        if radius <= 0.0 || color[3] <= 0.0 {
            debug!("  -> skipped: invalid radius or transparent color");
            return None;
        }
        let (first, rest) = points.split_first()?;
        let (min, max) = rest
            .iter()
            .fold((*first, *first), |(min, max), p| (min.min(*p), max.max(*p)));
        let reach = Vec2::splat(radius + 1.0);

        let Some(bounds) = self.clip_box(min - reach, max + reach) else {
            debug!("  -> stroke outside surface bounds");
            return None;
        };
        let (bx, by, bw, bh) = bounds;
        let mut mask = vec![0.0f32; (bw as usize) * (bh as usize)];

        let single = [*first, *first];
        let segments = if rest.is_empty() {
            single.windows(2)
        } else {
            points.windows(2)
        };

        for seg in segments {
            let (a, b) = (seg[0], seg[1]);
            let Some((x0, y0, w, h)) = self.clip_box(a.min(b) - reach, a.max(b) + reach) else {
                continue;
            };
            for py in y0..y0 + h {
                for px in x0..x0 + w {
                    let p = Vec2::new(px as f32 + 0.5, py as f32 + 0.5);
                    // Antialias across one pixel at the edge
                    let cov = (radius - distance_to_segment(p, a, b) + 0.5).clamp(0.0, 1.0);
                    let slot = &mut mask[((py - by) * bw + (px - bx)) as usize];
                    *slot = slot.max(cov);
                }
            }
        }

        for row in 0..bh {
            for col in 0..bw {
                let cov = mask[(row * bw + col) as usize];
                if cov > 0.0 {
                    self.blend_pixel(bx + col, by + row, color, cov);
                }
            }
        }
        Some(bounds)
    }

    /// Clamp a device-space box to the surface, or None if nothing is left
    fn clip_box(&self, min: Vec2, max: Vec2) -> Option<PixelBounds> {
        let x_min = (min.x.floor().max(0.0) as u32).min(self.width);
        let y_min = (min.y.floor().max(0.0) as u32).min(self.height);
        let x_max = (max.x.ceil().max(0.0) as u32).min(self.width);
        let y_max = (max.y.ceil().max(0.0) as u32).min(self.height);

        if x_min >= x_max || y_min >= y_max {
            return None;
        }
        Some((x_min, y_min, x_max - x_min, y_max - y_min))
    }

    /// Blend `color` over every pixel in the device-space box whose center
    /// receives non-zero coverage
    fn rasterize<F>(
        &mut self,
        min: Vec2,
        max: Vec2,
        color: Rgba,
        coverage: F,
    ) -> Option<PixelBounds>
    where
        F: Fn(Vec2) -> f32,
    {
        let (x, y, w, h) = self.clip_box(min, max)?;

        for py in y..y + h {
            for px in x..x + w {
                let cov = coverage(Vec2::new(px as f32 + 0.5, py as f32 + 0.5));
                if cov > 0.0 {
                    self.blend_pixel(px, py, color, cov);
                }
            }
        }

        Some((x, y, w, h))
    }

    /// Flatten to 8-bit RGB over the background
    pub fn to_rgb8(&self) -> Vec<[u8; 3]> {
        let bg = self.background;
        let quantize = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        self.pixels
            .iter()
            .map(|p| {
                let a = p[3].clamp(0.0, 1.0);
                [
                    quantize(p[0] * a + bg[0] * (1.0 - a)),
                    quantize(p[1] * a + bg[1] * (1.0 - a)),
                    quantize(p[2] * a + bg[2] * (1.0 - a)),
                ]
            })
            .collect()
    }
}

/// Signed distance from `p` (relative to the box center) to a rounded box
#[inline]
fn rounded_box_distance(p: Vec2, half: Vec2, radius: f32) -> f32 {
    let q = p.abs() - (half - Vec2::splat(radius));
    q.max(Vec2::ZERO).length() + q.x.max(q.y).min(0.0) - radius
}

/// Coverage for a signed distance, with a smoothstep ramp of `feather`
#[inline]
fn soft_coverage(distance: f32, feather: f32) -> f32 {
    if feather <= 0.0 {
        return (0.5 - distance).clamp(0.0, 1.0);
    }
    let t = ((distance + feather) / (2.0 * feather)).clamp(0.0, 1.0);
    1.0 - t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgba = [1.0, 1.0, 1.0, 1.0];
    const BLACK: Rgba = [0.0, 0.0, 0.0, 1.0];
    const RED: Rgba = [1.0, 0.0, 0.0, 1.0];

    fn white_surface(w: u32, h: u32) -> Surface {
        Surface::new(w, h, 1.0, WHITE).unwrap()
    }

    #[test]
    fn test_new_surface_scales_by_density() {
        let surface = Surface::new(100, 50, 2.0, WHITE).unwrap();
        assert_eq!((surface.width, surface.height), (200, 100));
        assert_eq!(surface.logical_size(), (100, 50));
        assert_eq!(surface.pixel_count(), 20_000);
        assert!(surface.is_blank());
    }

    #[test]
    fn test_invalid_dimensions() {
        assert!(matches!(
            Surface::new(0, 10, 1.0, WHITE),
            Err(PaintingError::InvalidDimensions { .. })
        ));
        assert!(Surface::new(10, 10, 0.0, WHITE).is_err());
        assert!(Surface::new(10, 10, f32::NAN, WHITE).is_err());
    }

    #[test]
    fn test_background_is_forced_opaque() {
        let surface = Surface::new(4, 4, 1.0, [0.5, 0.5, 0.5, 0.0]).unwrap();
        assert_eq!(surface.get_pixel(0, 0), Some([0.5, 0.5, 0.5, 1.0]));
    }

    #[test]
    fn test_fill_disc() {
        let mut surface = white_surface(100, 100);
        let result = surface.fill_disc(Vec2::new(50.0, 50.0), 10.0, BLACK);
        assert!(result.is_some());

        assert_eq!(surface.get_pixel(50, 50), Some(BLACK));
        assert_eq!(surface.get_pixel(60, 50), Some(WHITE));
        // Alpha stays opaque after compositing
        assert_eq!(surface.get_pixel(52, 52).unwrap()[3], 1.0);
    }

    #[test]
    fn test_fill_disc_uses_logical_coordinates() {
        let mut surface = Surface::new(50, 50, 2.0, WHITE).unwrap();
        surface.fill_disc(Vec2::new(25.0, 25.0), 10.0, BLACK);

        // Device radius is 10 around (50, 50)
        assert_eq!(surface.get_pixel(50, 50), Some(BLACK));
        assert_eq!(surface.get_pixel(58, 50), Some(BLACK));
        assert_eq!(surface.get_pixel(62, 50), Some(WHITE));
    }

    #[test]
    fn test_paint_outside_is_clipped() {
        let mut surface = white_surface(20, 20);
        assert!(surface.fill_disc(Vec2::new(-50.0, -50.0), 10.0, BLACK).is_none());
        assert!(surface.is_blank());

        let (x, y, w, h) = surface.fill_disc(Vec2::new(0.0, 0.0), 10.0, BLACK).unwrap();
        assert_eq!((x, y), (0, 0));
        assert!(w <= 20 && h <= 20);
        assert_eq!(surface.get_pixel(0, 0), Some(BLACK));
    }

    #[test]
    fn test_zero_width_paints_nothing() {
        let mut surface = white_surface(20, 20);
        assert!(surface.fill_disc(Vec2::new(10.0, 10.0), 0.0, BLACK).is_none());
        assert!(surface.is_blank());
    }

    #[test]
    fn test_stroke_quadratic() {
        let mut surface = white_surface(100, 100);
        surface.stroke_quadratic(
            Vec2::new(10.0, 50.0),
            Vec2::new(50.0, 50.0),
            Vec2::new(90.0, 50.0),
            6.0,
            BLACK,
        );

        assert_eq!(surface.get_pixel(50, 50), Some(BLACK));
        assert_eq!(surface.get_pixel(20, 50), Some(BLACK));
        assert_eq!(surface.get_pixel(50, 60), Some(WHITE));
        // Round cap reaches slightly past the end point
        assert_eq!(surface.get_pixel(91, 50), Some(BLACK));
    }

    #[test]
    fn test_long_curve_joints_blend_once() {
        let mut surface = white_surface(800, 200);
        let half_ink = [0.0, 0.0, 0.0, 0.5];
        // Spans hundreds of flattened segments
        surface.stroke_quadratic(
            Vec2::new(10.0, 100.0),
            Vec2::new(400.0, 100.0),
            Vec2::new(790.0, 100.0),
            8.0,
            half_ink,
        );

        // Overlapping segment capsules must not darken the interior twice
        for x in [11, 200, 400, 650, 789] {
            let p = surface.get_pixel(x, 100).unwrap();
            assert!((p[0] - 0.5).abs() < 1e-5, "x={} red={}", x, p[0]);
        }
        assert_eq!(surface.get_pixel(400, 110), Some(WHITE));
    }

    #[test]
    fn test_apply_paint_ops() {
        let mut surface = white_surface(40, 40);
        let op = PaintOp::Disc {
            center: Vec2::new(20.0, 20.0),
            diameter: 6.0,
            color: RED,
        };
        assert!(surface.apply(&op).is_some());
        assert_eq!(surface.get_pixel(20, 20), Some(RED));
    }

    #[test]
    fn test_rounded_rect_corners() {
        let mut surface = white_surface(100, 100);
        surface.fill_rounded_rect(Vec2::new(50.0, 50.0), Vec2::new(20.0, 20.0), 4.0, RED, 0.0);

        assert_eq!(surface.get_pixel(50, 50), Some(RED));
        assert_eq!(surface.get_pixel(41, 50), Some(RED));
        // The square corner is cut by the radius
        assert_eq!(surface.get_pixel(40, 40), Some(WHITE));
        assert_eq!(surface.get_pixel(62, 50), Some(WHITE));
    }

    #[test]
    fn test_feathered_rect_has_soft_edge() {
        let mut surface = white_surface(100, 100);
        surface.fill_rounded_rect(Vec2::new(50.0, 50.0), Vec2::new(20.0, 20.0), 4.0, RED, 4.0);

        let edge = surface.get_pixel(61, 50).unwrap();
        assert!(edge[1] > 0.2 && edge[1] < 0.99, "edge green = {}", edge[1]);
        assert_eq!(surface.get_pixel(50, 50), Some(RED));
    }

    #[test]
    fn test_clear_restores_background() {
        let mut surface = white_surface(30, 30);
        surface.fill_disc(Vec2::new(15.0, 15.0), 20.0, BLACK);
        assert!(!surface.is_blank());

        surface.clear();
        assert!(surface.is_blank());
    }

    #[test]
    fn test_to_rgb8() {
        let mut surface = Surface::new(2, 1, 1.0, WHITE).unwrap();
        surface.blend_pixel(1, 0, BLACK, 1.0);
        assert_eq!(surface.to_rgb8(), vec![[255, 255, 255], [0, 0, 0]]);
    }

    #[test]
    fn test_blend_coverage_ignores_negative_coordinates() {
        let mut surface = white_surface(4, 4);
        surface.blend_coverage(-1, 2, BLACK, 1.0);
        surface.blend_coverage(2, 2, BLACK, 0.5);
        assert!((surface.get_pixel(2, 2).unwrap()[0] - 0.5).abs() < 1e-6);
        assert_eq!(surface.get_pixel(0, 2), Some(WHITE));
    }
}
