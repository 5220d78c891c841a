//! Stroke state machine
//!
//! Tracks one in-progress gesture: its sample history, the current brush
//! width, and the dwell-growth timer. The machine never touches pixels; like
//! the brush engine in a dab pipeline it emits [`PaintOp`]s and the caller
//! applies them to the surface.
//!
//! Width model:
//! - at contact the width is `min_width`
//! - while the brush rests, each growth tick adds `growth_rate_per_tick`
//! - movement computes `velocity = dist / dt` and pulls the width toward
//!   `current - velocity * factor * 20`, smoothed 70/30 with the old width

use glam::Vec2;
use tracing::debug;

use crate::brush::BrushProfile;
use crate::constants::{
    GROWTH_TICK_MS, MIN_TIME_DELTA_MS, NOISE_THRESHOLD, VELOCITY_WIDTH_SCALE, WIDTH_SMOOTHING,
};
use crate::geometry::{distance, midpoint};
use crate::timer::{GrowthTimer, TimerToken};
use crate::types::{PointerSample, Rgba, Sample};

/// A single paint instruction in logical coordinates
#[derive(Debug, Clone, PartialEq)]
pub enum PaintOp {
    /// Filled circle
    Disc {
        center: Vec2,
        diameter: f32,
        color: Rgba,
    },
    /// Quadratic curve stroked with round caps
    Curve {
        start: Vec2,
        control: Vec2,
        end: Vec2,
        width: f32,
        color: Rgba,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeState {
    Idle,
    Active,
}

/// Per-gesture brush physics
#[derive(Debug)]
pub struct StrokeMachine {
    /// Sample history of the live stroke (empty while idle)
    samples: Vec<Sample>,
    /// Scratch width, reset at every `begin`
    current_width: f32,
    /// Profile captured at `begin` (None while idle)
    profile: Option<BrushProfile>,
    /// Pending growth schedule; cleared by movement and by `end`
    timer: Option<GrowthTimer>,
    next_token: u64,
    tick_interval_ms: u64,
}

impl Default for StrokeMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl StrokeMachine {
    pub fn new() -> Self {
        Self::with_tick_interval(GROWTH_TICK_MS)
    }

    /// Create a machine with a custom growth interval
    pub fn with_tick_interval(tick_interval_ms: u64) -> Self {
        Self {
            samples: Vec::new(),
            current_width: 0.0,
            profile: None,
            timer: None,
            next_token: 0,
            tick_interval_ms: tick_interval_ms.max(1),
        }
    }

    pub fn state(&self) -> StrokeState {
        if self.profile.is_some() {
            StrokeState::Active
        } else {
            StrokeState::Idle
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.profile.is_some()
    }

    /// History of the live stroke
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn current_width(&self) -> f32 {
        self.current_width
    }

    /// Token of the pending growth timer, if one is scheduled
    pub fn growth_token(&self) -> Option<TimerToken> {
        self.timer.as_ref().map(GrowthTimer::token)
    }

    /// Start a gesture at `point`
    ///
    /// Returns the initial dot so that a tap without movement still leaves
    /// a mark. A gesture already in progress is discarded first.
    pub fn begin(&mut self, point: PointerSample, profile: &BrushProfile) -> Vec<PaintOp> {
        if self.is_active() {
            debug!("StrokeMachine::begin: discarding unfinished gesture");
            self.discard();
        }

        self.next_token += 1;
        let token = TimerToken::new(self.next_token);

        self.current_width = profile.min_width;
        self.samples.clear();
        self.samples.push(Sample::new(
            point.x,
            point.y,
            profile.min_width,
            point.timestamp_ms,
        ));
        self.timer = Some(GrowthTimer::start(
            token,
            point.timestamp_ms,
            self.tick_interval_ms,
        ));
        self.profile = Some(profile.clone());

        debug!(
            "StrokeMachine::begin: ({:.1}, {:.1}) width={:.1} token={}",
            point.x,
            point.y,
            profile.min_width,
            token.id()
        );

        vec![PaintOp::Disc {
            center: point.position(),
            diameter: profile.min_width,
            color: profile.color,
        }]
    }

    /// Fire every growth tick due at or before `now_ms`
    pub fn poll_timers(&mut self, now_ms: u64) -> Vec<PaintOp> {
        let Some(timer) = self.timer.as_mut() else {
            return Vec::new();
        };
        let token = timer.token();
        let due = timer.take_due(now_ms);

        let mut ops = Vec::new();
        for _ in 0..due {
            match self.growth_tick(token) {
                Some(op) => ops.push(op),
                // Already at max_width: further ticks are no-ops
                None => break,
            }
        }
        ops
    }

    /// One dwell-growth step for the gesture identified by `token`
    ///
    /// Returns None for stale tokens, idle machines, or when the width has
    /// already reached the ceiling.
    pub fn growth_tick(&mut self, token: TimerToken) -> Option<PaintOp> {
        if self.growth_token() != Some(token) {
            debug!("growth_tick: stale token {}, ignoring", token.id());
            return None;
        }
        let profile = self.profile.as_ref()?;
        // Ticks that cannot change the width paint nothing
        if profile.growth_rate_per_tick <= 0.0 || self.current_width >= profile.max_width {
            return None;
        }

        self.current_width =
            (self.current_width + profile.growth_rate_per_tick).min(profile.max_width);
        let last = self.samples.last_mut()?;
        last.width = self.current_width;

        Some(PaintOp::Disc {
            center: last.position(),
            diameter: self.current_width,
            color: profile.color,
        })
    }

    /// Feed a movement sample
    ///
    /// Any movement cancels dwell growth, even movement small enough to be
    /// rejected as jitter.
    pub fn extend(&mut self, point: PointerSample) -> Vec<PaintOp> {
        let Some(profile) = self.profile.as_ref() else {
            return Vec::new();
        };
        if self.timer.take().is_some() {
            debug!("StrokeMachine::extend: movement cancelled growth timer");
        }
        let Some(last) = self.samples.last().copied() else {
            return Vec::new();
        };

        let candidate = Sample::new(point.x, point.y, self.current_width, point.timestamp_ms);
        let dist = distance(&last, &candidate);
        if dist < NOISE_THRESHOLD {
            return Vec::new();
        }

        let dt = point
            .timestamp_ms
            .saturating_sub(last.timestamp_ms)
            .max(MIN_TIME_DELTA_MS);
        let velocity = dist / dt as f32;

        // Faster motion means less ink contact
        let target = profile.clamp_width(
            self.current_width - velocity * profile.velocity_to_width_factor * VELOCITY_WIDTH_SCALE,
        );
        self.current_width = profile.clamp_width(
            self.current_width * WIDTH_SMOOTHING + target * (1.0 - WIDTH_SMOOTHING),
        );

        self.samples.push(Sample {
            width: self.current_width,
            ..candidate
        });

        let n = self.samples.len();
        if n < 3 {
            return Vec::new();
        }
        let (p0, p1, p2) = (
            &self.samples[n - 3],
            &self.samples[n - 2],
            &self.samples[n - 1],
        );
        let mid0 = midpoint(p0, p1);
        let mid1 = midpoint(p1, p2);

        debug!(
            "StrokeMachine::extend: v={:.3}px/ms width={:.2} segment width={:.2}",
            velocity, self.current_width, p1.width
        );

        vec![
            PaintOp::Curve {
                start: mid0.position(),
                control: p1.position(),
                end: mid1.position(),
                width: p1.width,
                color: profile.color,
            },
            // Masks the seam where consecutive segments change width
            PaintOp::Disc {
                center: p1.position(),
                diameter: p1.width,
                color: profile.color,
            },
        ]
    }

    /// Finish the gesture, returning its history
    ///
    /// Returns None when no gesture was active.
    pub fn end(&mut self) -> Option<Vec<Sample>> {
        self.profile.as_ref()?;
        self.timer = None;
        self.profile = None;
        let samples = std::mem::take(&mut self.samples);
        debug!("StrokeMachine::end: {} samples", samples.len());
        Some(samples)
    }

    /// Drop the gesture without completing it (surface cleared or resized)
    pub fn discard(&mut self) {
        self.timer = None;
        self.profile = None;
        self.samples.clear();
    }
}
