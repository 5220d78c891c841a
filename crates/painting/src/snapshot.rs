//! Still-image snapshots of the surface
//!
//! Exports are synchronous: the encoder reads the buffer as it is at the
//! moment of the call, so every paint committed before it is included.

use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::PaintingError;
use crate::surface::Surface;

/// Encoded image format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SnapshotFormat {
    /// Lossy, used for previews and posting
    #[default]
    Jpeg,
    /// Lossless, for archival exports
    Png,
}

impl SnapshotFormat {
    pub fn mime_type(self) -> &'static str {
        match self {
            SnapshotFormat::Jpeg => "image/jpeg",
            SnapshotFormat::Png => "image/png",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            SnapshotFormat::Jpeg => "jpg",
            SnapshotFormat::Png => "png",
        }
    }
}

/// An encoded still image of the surface
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub format: SnapshotFormat,
    /// Device pixel dimensions
    pub width: u32,
    pub height: u32,
    pub bytes: Vec<u8>,
}

impl Snapshot {
    /// `data:<mime>;base64,<payload>`
    pub fn to_data_uri(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.format.mime_type(),
            base64::engine::general_purpose::STANDARD.encode(&self.bytes)
        )
    }
}

/// Encode the current surface contents
///
/// `quality` is in 0.0-1.0 and only affects JPEG.
pub fn encode_snapshot(
    surface: &Surface,
    format: SnapshotFormat,
    quality: f32,
) -> Result<Snapshot, PaintingError> {
    let rgb = surface.to_rgb8();
    let raw: &[u8] = bytemuck::cast_slice(&rgb);
    let mut bytes = Vec::new();

    match format {
        SnapshotFormat::Jpeg => {
            let quality = jpeg_quality(quality);
            JpegEncoder::new_with_quality(&mut bytes, quality).write_image(
                raw,
                surface.width,
                surface.height,
                ExtendedColorType::Rgb8,
            )?;
        }
        SnapshotFormat::Png => {
            PngEncoder::new(&mut bytes).write_image(
                raw,
                surface.width,
                surface.height,
                ExtendedColorType::Rgb8,
            )?;
        }
    }

    debug!(
        "encode_snapshot: {:?} {}x{} -> {} bytes",
        format,
        surface.width,
        surface.height,
        bytes.len()
    );

    Ok(Snapshot {
        format,
        width: surface.width,
        height: surface.height,
        bytes,
    })
}

/// Map a 0.0-1.0 quality onto the encoder's 1-100 scale
fn jpeg_quality(quality: f32) -> u8 {
    if !quality.is_finite() {
        return 80;
    }
    (quality.clamp(0.0, 1.0) * 100.0).round().clamp(1.0, 100.0) as u8
}

/// Split a base64 data URI into its mime type and decoded payload
pub fn decode_data_uri(uri: &str) -> Result<(String, Vec<u8>), PaintingError> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| PaintingError::DataUri("missing data: prefix".to_string()))?;
    let (mime, payload) = rest
        .split_once(";base64,")
        .ok_or_else(|| PaintingError::DataUri("missing ;base64, marker".to_string()))?;
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| PaintingError::DataUri(e.to_string()))?;
    Ok((mime.to_string(), bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    const PAPER: [f32; 4] = [0.99, 0.98, 0.97, 1.0];

    #[test]
    fn test_jpeg_quality_mapping() {
        assert_eq!(jpeg_quality(0.8), 80);
        assert_eq!(jpeg_quality(0.0), 1);
        assert_eq!(jpeg_quality(7.0), 100);
        assert_eq!(jpeg_quality(f32::NAN), 80);
    }

    #[test]
    fn test_jpeg_data_uri() {
        let surface = Surface::new(32, 16, 1.0, PAPER).unwrap();
        let snapshot = encode_snapshot(&surface, SnapshotFormat::Jpeg, 0.8).unwrap();
        assert_eq!((snapshot.width, snapshot.height), (32, 16));

        let uri = snapshot.to_data_uri();
        assert!(uri.starts_with("data:image/jpeg;base64,"));

        let (mime, bytes) = decode_data_uri(&uri).unwrap();
        assert_eq!(mime, "image/jpeg");
        assert_eq!(bytes, snapshot.bytes);
        // JPEG SOI marker
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_png_preserves_pixels() {
        let mut surface = Surface::new(10, 10, 1.0, PAPER).unwrap();
        surface.fill_disc(Vec2::new(5.0, 5.0), 4.0, [0.0, 0.0, 0.0, 1.0]);

        let snapshot = encode_snapshot(&surface, SnapshotFormat::Png, 1.0).unwrap();
        let decoded = image::load_from_memory(&snapshot.bytes).unwrap().to_rgb8();

        assert_eq!(decoded.get_pixel(5, 5).0, [0, 0, 0]);
        assert_eq!(decoded.get_pixel(0, 0).0, [252, 250, 247]);
    }

    #[test]
    fn test_snapshot_reflects_latest_paint() {
        let mut surface = Surface::new(16, 16, 1.0, PAPER).unwrap();
        let before = encode_snapshot(&surface, SnapshotFormat::Png, 1.0).unwrap();
        surface.fill_disc(Vec2::new(8.0, 8.0), 6.0, [0.0, 0.0, 0.0, 1.0]);
        let after = encode_snapshot(&surface, SnapshotFormat::Png, 1.0).unwrap();
        assert_ne!(before.bytes, after.bytes);
    }

    #[test]
    fn test_decode_rejects_plain_strings() {
        assert!(matches!(
            decode_data_uri("iVBORw0KGgo"),
            Err(PaintingError::DataUri(_))
        ));
        assert!(decode_data_uri("data:image/png,abc").is_err());
    }
}
