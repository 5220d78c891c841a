//! Recorded pointer scripts
//!
//! A script is a JSON array of steps, e.g.
//!
//! ```json
//! [
//!   { "op": "select_tool", "tool": "ThinBrush" },
//!   { "op": "pointer", "event": { "type": "mouse_down", "client_x": 40, "client_y": 40, "timestamp_ms": 0 } },
//!   { "op": "tick", "now_ms": 300 },
//!   { "op": "pointer", "event": { "type": "mouse_up", "timestamp_ms": 300 } }
//! ]
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use painting::{InkCanvas, PointerEvent, ProfileTable, Tool};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ScriptStep {
    SelectTool { tool: Tool },
    StampText { text: String },
    Pointer { event: PointerEvent },
    /// Advance the growth clock without input
    Tick { now_ms: u64 },
    Clear,
    /// Re-initialize the surface; prior strokes are lost
    Resize {
        width: u32,
        height: u32,
        #[serde(default)]
        pixel_density: Option<f32>,
    },
}

/// Counters from one replay
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReplayReport {
    pub steps: usize,
    pub pointer_events: usize,
    pub strokes: usize,
}

pub fn load_script(path: &Path) -> Result<Vec<ScriptStep>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read script {}", path.display()))?;
    let steps: Vec<ScriptStep> = serde_json::from_str(&contents)
        .with_context(|| format!("Malformed script {}", path.display()))?;
    info!("Loaded {} steps from {}", steps.len(), path.display());
    Ok(steps)
}

/// Read a profile table override
pub fn load_profiles(path: &Path) -> Result<ProfileTable> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read profiles {}", path.display()))?;
    let profiles = serde_json::from_str(&contents)
        .with_context(|| format!("Malformed profiles {}", path.display()))?;
    info!("Loaded brush profiles from {}", path.display());
    Ok(profiles)
}

/// Feed every step into `canvas` in order
pub fn replay(canvas: &mut InkCanvas, steps: &[ScriptStep]) -> Result<ReplayReport> {
    let mut report = ReplayReport::default();

    for step in steps {
        debug!("replay: {:?}", step);
        match step {
            ScriptStep::SelectTool { tool } => canvas.select_tool(*tool),
            ScriptStep::StampText { text } => canvas.set_stamp_text(text)?,
            ScriptStep::Pointer { event } => {
                let was_active = canvas.stroke().is_active();
                canvas.handle_pointer(event);
                if was_active && !canvas.stroke().is_active() {
                    report.strokes += 1;
                }
                report.pointer_events += 1;
            }
            ScriptStep::Tick { now_ms } => canvas.poll_timers(*now_ms),
            ScriptStep::Clear => canvas.clear_surface(),
            ScriptStep::Resize {
                width,
                height,
                pixel_density,
            } => {
                let density = pixel_density
                    .or_else(|| canvas.surface().map(|s| s.pixel_density()))
                    .unwrap_or(sumi_config::DEFAULT_PIXEL_DENSITY);
                canvas.initialize(*width, *height, density)?;
            }
        }
        report.steps += 1;
    }

    Ok(report)
}
