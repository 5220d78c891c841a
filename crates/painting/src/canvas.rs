//! Caller-facing canvas
//!
//! Wires the input adapter, stroke machine, stamp renderer and surface
//! together. The host drives it with pointer events and periodic
//! [`InkCanvas::poll_timers`] calls, and receives a data URI through the
//! snapshot listeners whenever a stroke ends or a stamp lands.

use std::sync::Arc;

use ab_glyph::FontArc;
use glam::Vec2;
use sumi_config::{PreferenceStore, SurfaceConfig};
use tracing::{debug, info, warn};

use crate::brush::ProfileTable;
use crate::constants::{PAPER_COLOR, SNAPSHOT_QUALITY};
use crate::error::PaintingError;
use crate::input::{InputAction, InputAdapter, PointerEvent};
use crate::snapshot::{Snapshot, SnapshotFormat, encode_snapshot};
use crate::stamp::{GlyphPlacement, load_font, load_system_stamp_font, render_stamp};
use crate::stroke::{PaintOp, StrokeMachine};
use crate::surface::Surface;
use crate::types::{PointerSample, Sample, Tool};

/// Stamp text longer than this still renders, using the centered fallback
const RECOMMENDED_STAMP_CHARS: usize = 4;

type SnapshotListener = Box<dyn FnMut(&str)>;

pub struct InkCanvas {
    surface: Option<Surface>,
    profiles: ProfileTable,
    tool: Tool,
    stroke: StrokeMachine,
    input: InputAdapter,
    store: Arc<dyn PreferenceStore>,
    font: Option<FontArc>,
    snapshot_listeners: Vec<SnapshotListener>,
}

impl std::fmt::Debug for InkCanvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InkCanvas")
            .field("surface", &self.surface)
            .field("tool", &self.tool)
            .field("stroke", &self.stroke.state())
            .field("has_font", &self.font.is_some())
            .field("listener_count", &self.snapshot_listeners.len())
            .finish()
    }
}

impl InkCanvas {
    /// Create a canvas reading preferences from `store`
    ///
    /// The stamp font named in the preferences is loaded now. Without one,
    /// or if it fails to load, a system serif font is used instead; only
    /// when that lookup also fails are stamps drawn without glyphs.
    pub fn new(store: Arc<dyn PreferenceStore>) -> Self {
        let font = store
            .load()
            .stamp_font
            .and_then(|path| match load_font(&path) {
                Ok(font) => Some(font),
                Err(e) => {
                    warn!("Configured stamp font unavailable: {}", e);
                    None
                }
            })
            .or_else(load_system_stamp_font);
        if font.is_none() {
            warn!("No stamp font found, stamp glyphs will be skipped");
        }

        Self {
            surface: None,
            profiles: ProfileTable::default(),
            tool: Tool::default(),
            stroke: StrokeMachine::new(),
            input: InputAdapter::default(),
            store,
            font,
            snapshot_listeners: Vec::new(),
        }
    }

    /// Replace the default profile table
    pub fn with_profiles(mut self, profiles: ProfileTable) -> Self {
        self.profiles = profiles;
        self
    }

    pub fn set_font(&mut self, font: Option<FontArc>) {
        self.font = font;
    }

    /// Allocate (or reallocate) the surface, discarding all prior content
    pub fn initialize(
        &mut self,
        logical_width: u32,
        logical_height: u32,
        pixel_density: f32,
    ) -> Result<(), PaintingError> {
        let surface = Surface::new(logical_width, logical_height, pixel_density, PAPER_COLOR)?;
        if self.stroke.is_active() {
            debug!("InkCanvas::initialize: discarding in-progress stroke");
        }
        self.stroke.discard();
        self.surface = Some(surface);
        Ok(())
    }

    pub fn initialize_with(&mut self, config: &SurfaceConfig) -> Result<(), PaintingError> {
        self.initialize(config.width, config.height, config.pixel_density)
    }

    pub fn surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }

    pub fn stroke(&self) -> &StrokeMachine {
        &self.stroke
    }

    pub fn profiles(&self) -> &ProfileTable {
        &self.profiles
    }

    /// Select the active tool; a gesture already in progress keeps its brush
    pub fn select_tool(&mut self, tool: Tool) {
        debug!("InkCanvas::select_tool: {:?} -> {:?}", self.tool, tool);
        self.tool = tool;
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Persist new stamp text through the preference store
    pub fn set_stamp_text(&mut self, text: &str) -> Result<(), PaintingError> {
        let len = text.chars().count();
        if len > RECOMMENDED_STAMP_CHARS {
            debug!(
                "Stamp text {:?} has {} chars, only the first 3 will be drawn",
                text, len
            );
        }
        self.store.set_stamp_text(text)?;
        Ok(())
    }

    pub fn stamp_text(&self) -> String {
        self.store.stamp_text()
    }

    /// Refill the surface with paper and drop any in-progress stroke
    pub fn clear_surface(&mut self) {
        self.stroke.discard();
        match self.surface.as_mut() {
            Some(surface) => {
                surface.clear();
                info!("InkCanvas::clear_surface");
            }
            None => debug!("InkCanvas::clear_surface: no surface"),
        }
    }

    /// Register a callback receiving a JPEG data URI after every stroke and stamp
    pub fn on_snapshot<F>(&mut self, listener: F)
    where
        F: FnMut(&str) + 'static,
    {
        self.snapshot_listeners.push(Box::new(listener));
    }

    /// Where the surface's top-left sits in client coordinates
    pub fn set_surface_origin(&mut self, origin: Vec2) {
        self.input.set_origin(origin);
    }

    /// Route a platform pointer event
    ///
    /// Growth ticks due before the event's timestamp are delivered first so
    /// that dwell growth and movement interleave in time order.
    pub fn handle_pointer(&mut self, event: &PointerEvent) {
        let Some(action) = self.input.normalize(event) else {
            debug!("InkCanvas::handle_pointer: discarded {:?}", event);
            return;
        };
        self.poll_timers(event.timestamp_ms());

        match action {
            InputAction::Press(sample) => {
                if self.tool.is_brush() {
                    self.begin_stroke(sample);
                } else {
                    self.stamp_at(sample.position());
                }
            }
            InputAction::Move(sample) => {
                if self.tool.is_brush() {
                    self.extend_stroke(sample);
                }
            }
            InputAction::Release => {
                self.end_stroke();
            }
        }
    }

    /// Start a stroke with the current brush; no-op while the stamp is selected
    pub fn begin_stroke(&mut self, sample: PointerSample) {
        let Some(profile) = self.profiles.brush(self.tool) else {
            return;
        };
        let ops = self.stroke.begin(sample, profile);
        self.paint(&ops);
    }

    pub fn extend_stroke(&mut self, sample: PointerSample) {
        let ops = self.stroke.extend(sample);
        self.paint(&ops);
    }

    /// Finish the stroke and notify snapshot listeners
    ///
    /// Returns the stroke history, or None if no stroke was in progress.
    pub fn end_stroke(&mut self) -> Option<Vec<Sample>> {
        let history = self.stroke.end()?;
        self.emit_snapshot();
        Some(history)
    }

    /// Deliver dwell-growth ticks due at or before `now_ms`
    pub fn poll_timers(&mut self, now_ms: u64) {
        let ops = self.stroke.poll_timers(now_ms);
        self.paint(&ops);
    }

    /// Press a seal at `point` (logical units) and notify snapshot listeners
    pub fn stamp_at(&mut self, point: Vec2) -> Vec<GlyphPlacement> {
        let Some(surface) = self.surface.as_mut() else {
            debug!("InkCanvas::stamp_at: no surface, skipping");
            return Vec::new();
        };
        let text = self.store.stamp_text();
        let layout = render_stamp(
            surface,
            point,
            &text,
            self.profiles.stamp(),
            self.font.as_ref(),
        );
        self.emit_snapshot();
        layout
    }

    /// Encode the surface as it is right now
    pub fn export_snapshot(
        &self,
        format: SnapshotFormat,
        quality: f32,
    ) -> Result<Snapshot, PaintingError> {
        let surface = self.surface.as_ref().ok_or(PaintingError::NoSurface)?;
        encode_snapshot(surface, format, quality)
    }

    fn paint(&mut self, ops: &[PaintOp]) {
        if ops.is_empty() {
            return;
        }
        let Some(surface) = self.surface.as_mut() else {
            debug!("InkCanvas::paint: no surface, dropping {} ops", ops.len());
            return;
        };
        for op in ops {
            surface.apply(op);
        }
    }

    fn emit_snapshot(&mut self) {
        if self.snapshot_listeners.is_empty() {
            return;
        }
        let uri = match self.export_snapshot(SnapshotFormat::Jpeg, SNAPSHOT_QUALITY) {
            Ok(snapshot) => snapshot.to_data_uri(),
            Err(e) => {
                warn!("Snapshot skipped: {}", e);
                return;
            }
        };
        for listener in self.snapshot_listeners.iter_mut() {
            listener(&uri);
        }
    }
}
