//! Pure geometry helpers shared by the stroke machine and the rasterizer

use glam::Vec2;

use crate::types::Sample;

/// Euclidean distance between two samples
#[inline]
pub fn distance(a: &Sample, b: &Sample) -> f32 {
    a.position().distance(b.position())
}

/// Midpoint of two samples; width and timestamp are interpolated as well
pub fn midpoint(a: &Sample, b: &Sample) -> Sample {
    let mid = a.position().lerp(b.position(), 0.5);
    Sample {
        x: mid.x,
        y: mid.y,
        width: interpolate_width(a, b, 0.5),
        timestamp_ms: a.timestamp_ms + b.timestamp_ms.saturating_sub(a.timestamp_ms) / 2,
    }
}

/// Width at fraction `t` (0.0-1.0) of the way from `a` to `b`
#[inline]
pub fn interpolate_width(a: &Sample, b: &Sample, t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    a.width + (b.width - a.width) * t
}

/// Point on the quadratic Bezier `start -> control -> end` at `t`
#[inline]
pub fn quadratic_point(start: Vec2, control: Vec2, end: Vec2, t: f32) -> Vec2 {
    let u = 1.0 - t;
    start * (u * u) + control * (2.0 * u * t) + end * (t * t)
}

/// Flatten a quadratic Bezier into a polyline with roughly `step` spacing
pub fn flatten_quadratic(start: Vec2, control: Vec2, end: Vec2, step: f32) -> Vec<Vec2> {
    // The control polygon bounds the arc length from above.
    let hull = start.distance(control) + control.distance(end);
    let segments = ((hull / step.max(0.01)).ceil() as usize).clamp(1, 256);

    (0..=segments)
        .map(|i| quadratic_point(start, control, end, i as f32 / segments as f32))
        .collect()
}

/// Shortest distance from `p` to the segment `a..b`
#[inline]
pub fn distance_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f32::EPSILON {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance() {
        let a = Sample::new(0.0, 0.0, 1.0, 0);
        let b = Sample::new(3.0, 4.0, 1.0, 10);
        assert!((distance(&a, &b) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_midpoint_interpolates_all_fields() {
        let a = Sample::new(0.0, 10.0, 4.0, 100);
        let b = Sample::new(10.0, 20.0, 8.0, 200);
        let mid = midpoint(&a, &b);
        assert_eq!(mid.x, 5.0);
        assert_eq!(mid.y, 15.0);
        assert_eq!(mid.width, 6.0);
        assert_eq!(mid.timestamp_ms, 150);
    }

    #[test]
    fn test_interpolate_width_clamps_t() {
        let a = Sample::new(0.0, 0.0, 2.0, 0);
        let b = Sample::new(1.0, 0.0, 10.0, 0);
        assert_eq!(interpolate_width(&a, &b, 0.25), 4.0);
        assert_eq!(interpolate_width(&a, &b, 2.0), 10.0);
        assert_eq!(interpolate_width(&a, &b, -1.0), 2.0);
    }

    #[test]
    fn test_quadratic_endpoints() {
        let start = Vec2::new(0.0, 0.0);
        let control = Vec2::new(5.0, 10.0);
        let end = Vec2::new(10.0, 0.0);
        assert_eq!(quadratic_point(start, control, end, 0.0), start);
        assert_eq!(quadratic_point(start, control, end, 1.0), end);
        assert_eq!(quadratic_point(start, control, end, 0.5), Vec2::new(5.0, 5.0));
    }

    #[test]
    fn test_flatten_keeps_endpoints() {
        let start = Vec2::new(0.0, 0.0);
        let end = Vec2::new(20.0, 0.0);
        let points = flatten_quadratic(start, Vec2::new(10.0, 0.0), end, 2.0);
        assert_eq!(points.first(), Some(&start));
        assert_eq!(points.last(), Some(&end));
        assert_eq!(points.len(), 11);
    }

    #[test]
    fn test_distance_to_segment() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, 0.0);
        assert!((distance_to_segment(Vec2::new(5.0, 3.0), a, b) - 3.0).abs() < 1e-6);
        assert!((distance_to_segment(Vec2::new(-4.0, 3.0), a, b) - 5.0).abs() < 1e-6);
        // Degenerate segment behaves like a point
        assert!((distance_to_segment(Vec2::new(0.0, 2.0), a, a) - 2.0).abs() < 1e-6);
    }
}
