//! Seal stamp renderer
//!
//! Stateless: every call paints one complete stamp (shadow, box, glyphs)
//! directly onto the surface. Layout is keyed by the number of characters:
//!
//! ```text
//!  4 chars        2 chars      anything else
//! +-------+      +-------+      +-------+
//! | A   B |      |   A   |      |       |
//! |       |      |       |      |  ABC  |
//! | C   D |      |   B   |      |       |
//! +-------+      +-------+      +-------+
//! ```

use std::path::Path;

use ab_glyph::{Font, FontArc, FontVec, PxScale, ScaleFont, point};
use font_kit::family_name::FamilyName;
use font_kit::handle::Handle;
use font_kit::properties::{Properties, Weight};
use font_kit::source::SystemSource;
use glam::Vec2;
use tracing::{debug, info};

use crate::brush::StampProfile;
use crate::error::PaintingError;
use crate::surface::Surface;
use crate::types::Rgba;

/// Longest run drawn by the centered fallback layout
const MAX_CENTERED_CHARS: usize = 3;

/// Where one run of stamp text goes, relative to the stamp center
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphPlacement {
    pub text: String,
    pub offset: Vec2,
    pub font_size: f32,
}

/// Lay out stamp text inside a box of `box_size`
pub fn layout_stamp_text(text: &str, box_size: f32) -> Vec<GlyphPlacement> {
    let chars: Vec<char> = text.chars().collect();
    let font_size = if chars.len() > 2 {
        box_size / 2.2
    } else {
        box_size / 1.6
    };
    let q = box_size / 4.0;
    let place = |c: &[char], x: f32, y: f32| GlyphPlacement {
        text: c.iter().collect(),
        offset: Vec2::new(x, y),
        font_size,
    };

    match chars.len() {
        4 => vec![
            place(&chars[0..1], -q, -q),
            place(&chars[1..2], q, -q),
            place(&chars[2..3], -q, q),
            place(&chars[3..4], q, q),
        ],
        2 => vec![place(&chars[0..1], 0.0, -q), place(&chars[1..2], 0.0, q)],
        0 => Vec::new(),
        n => vec![place(&chars[..n.min(MAX_CENTERED_CHARS)], 0.0, 0.0)],
    }
}

/// Load a font file for stamp glyphs
pub fn load_font(path: impl AsRef<Path>) -> Result<FontArc, PaintingError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| PaintingError::FontIo {
        path: path.to_path_buf(),
        source,
    })?;
    let font = FontArc::try_from_vec(bytes)?;
    info!("Loaded stamp font {}", path.display());
    Ok(font)
}

/// Mincho-style families preferred for seal text, best first
const STAMP_FONT_FAMILIES: &[&str] = &[
    "Noto Serif JP",
    "Noto Serif CJK JP",
    "Source Han Serif JP",
    "Hiragino Mincho ProN",
    "Yu Mincho",
    "MS Mincho",
    "Noto Sans CJK JP",
];

/// Well-known font files tried when the system font source finds nothing
const FALLBACK_FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/opentype/noto/NotoSerifCJK-Bold.ttc",
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/truetype/wqy/wqy-microhei.ttc",
    "/usr/share/fonts/truetype/droid/DroidSansFallbackFull.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSerif-Bold.ttf",
    "/System/Library/Fonts/Hiragino Sans GB.ttc",
    "C:\\Windows\\Fonts\\msmincho.ttc",
    "C:\\Windows\\Fonts\\msyh.ttc",
];

/// Find a bold serif (ideally CJK) font installed on this machine
///
/// Used when the preferences do not name a stamp font. Returns None when
/// neither the system font source nor the fallback paths yield a font.
pub fn load_system_stamp_font() -> Option<FontArc> {
    let mut families: Vec<FamilyName> = STAMP_FONT_FAMILIES
        .iter()
        .map(|family| FamilyName::Title(family.to_string()))
        .collect();
    families.push(FamilyName::Serif);

    let mut props = Properties::new();
    props.weight = Weight::BOLD;

    let from_source = SystemSource::new()
        .select_best_match(&families, &props)
        .ok()
        .and_then(font_from_handle);
    if let Some(font) = from_source {
        info!("Using system stamp font");
        return Some(font);
    }

    FALLBACK_FONT_PATHS
        .iter()
        .filter(|path| Path::new(path).exists())
        .find_map(|path| match load_font(path) {
            Ok(font) => Some(font),
            Err(e) => {
                debug!("Skipping fallback font: {}", e);
                None
            }
        })
}

fn font_from_handle(handle: Handle) -> Option<FontArc> {
    let (bytes, index) = match handle {
        Handle::Path { path, font_index } => (std::fs::read(path).ok()?, font_index),
        Handle::Memory { bytes, font_index } => ((*bytes).clone(), font_index),
    };
    FontVec::try_from_vec_and_index(bytes, index)
        .ok()
        .map(FontArc::new)
}

/// Paint a stamp centered at `center` (logical units)
///
/// Returns the glyph layout. Glyphs are only rasterized when a font is
/// available; the box and its shadow are always painted.
pub fn render_stamp(
    surface: &mut Surface,
    center: Vec2,
    text: &str,
    profile: &StampProfile,
    font: Option<&FontArc>,
) -> Vec<GlyphPlacement> {
    let size = Vec2::splat(profile.box_size);
    let shadow = &profile.shadow;

    surface.fill_rounded_rect(
        center + Vec2::from(shadow.offset),
        size,
        profile.corner_radius,
        shadow.color,
        shadow.blur,
    );
    surface.fill_rounded_rect(center, size, profile.corner_radius, profile.color, 0.0);

    let layout = layout_stamp_text(text, profile.box_size);
    match font {
        Some(font) => {
            for glyph in &layout {
                draw_text_centered(
                    surface,
                    font,
                    &glyph.text,
                    center + glyph.offset,
                    glyph.font_size,
                    profile.text_color,
                );
            }
        }
        None if !layout.is_empty() => {
            debug!("render_stamp: no font loaded, skipping {} glyph runs", layout.len());
        }
        None => {}
    }

    debug!(
        "render_stamp: {:?} at ({:.1}, {:.1}), {} runs",
        text,
        center.x,
        center.y,
        layout.len()
    );
    layout
}

/// Draw a run of text centered on `center` both horizontally and vertically
fn draw_text_centered(
    surface: &mut Surface,
    font: &FontArc,
    text: &str,
    center: Vec2,
    font_size: f32,
    color: Rgba,
) {
    let density = surface.pixel_density();
    let scale = PxScale::from(font_size * density);
    let scaled = font.as_scaled(scale);

    let ids: Vec<_> = text.chars().map(|c| font.glyph_id(c)).collect();
    let advance: f32 = ids.iter().map(|id| scaled.h_advance(*id)).sum();

    let device_center = center * density;
    let mut caret_x = device_center.x - advance / 2.0;
    // Middle baseline: halfway between ascent and descent
    let baseline_y = device_center.y + (scaled.ascent() + scaled.descent()) / 2.0;

    for id in ids {
        let glyph = id.with_scale_and_position(scale, point(caret_x, baseline_y));
        caret_x += scaled.h_advance(id);

        let Some(outlined) = font.outline_glyph(glyph) else {
            continue;
        };
        let bounds = outlined.px_bounds();
        let (origin_x, origin_y) = (bounds.min.x as i32, bounds.min.y as i32);
        outlined.draw(|gx, gy, coverage| {
            surface.blend_coverage(origin_x + gx as i32, origin_y + gy as i32, color, coverage);
        });
    }
}
