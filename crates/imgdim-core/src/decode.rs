//! Natural image size from files on disk.
//!
//! Raster formats are probed through `image`, which reads only the header.
//! SVG size comes from the root element's `width`/`height`, or its `viewBox`
//! when those are missing or relative.

use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::host::{DecodeError, ImageDecoder};
use crate::model::ImageDimensions;

#[derive(Debug, Default, Clone, Copy)]
pub struct FsImageDecoder;

impl FsImageDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl ImageDecoder for FsImageDecoder {
    fn dimensions(&self, path: &Path) -> Result<ImageDimensions, DecodeError> {
        let display = path.display().to_string();
        let is_svg = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("svg"));

        let (width, height) = if is_svg {
            let bytes = std::fs::read(path).map_err(|source| DecodeError::Io {
                path: display.clone(),
                source,
            })?;
            svg_dimensions(&bytes).ok_or_else(|| DecodeError::SvgSize {
                path: display.clone(),
            })?
        } else {
            image::image_dimensions(path).map_err(|source| match source {
                image::ImageError::IoError(source) => DecodeError::Io {
                    path: display.clone(),
                    source,
                },
                source => DecodeError::Image {
                    path: display.clone(),
                    source,
                },
            })?
        };

        if width == 0 || height == 0 {
            return Err(DecodeError::Empty { path: display });
        }
        Ok(ImageDimensions { width, height })
    }
}

/// Pixel size of the root `<svg>` element, rounded to whole pixels.
pub fn svg_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    let mut reader = Reader::from_reader(bytes);
    let mut buf = Vec::with_capacity(64);
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                let name = e.local_name();
                if !name.as_ref().eq_ignore_ascii_case(b"svg") {
                    // First element is the root; anything else is not an svg.
                    return None;
                }
                let mut width = None;
                let mut height = None;
                let mut view_box = None;
                for attr in e.attributes().flatten() {
                    let key = String::from_utf8_lossy(attr.key.local_name().as_ref())
                        .to_ascii_lowercase();
                    let Ok(value) = attr.unescape_value() else {
                        continue;
                    };
                    match key.as_str() {
                        "width" => width = parse_svg_length_px(&value),
                        "height" => height = parse_svg_length_px(&value),
                        "viewbox" => view_box = parse_svg_view_box(&value),
                        _ => {}
                    }
                }
                let (w, h) = match (width, height, view_box) {
                    (Some(w), Some(h), _) => (w, h),
                    (Some(w), None, Some((vw, vh))) => (w, w * vh / vw),
                    (None, Some(h), Some((vw, vh))) => (h * vw / vh, h),
                    (_, _, Some(vb)) => vb,
                    _ => return None,
                };
                return Some((to_px(w)?, to_px(h)?));
            }
            Ok(Event::Eof) | Err(_) => return None,
            Ok(_) => {}
        }
        buf.clear();
    }
}

fn to_px(v: f32) -> Option<u32> {
    let rounded = v.round();
    if !rounded.is_finite() || rounded < 1.0 || rounded > u32::MAX as f32 {
        return None;
    }
    Some(rounded as u32)
}

/// Absolute CSS length in px. Percentages and font-relative units are `None`.
fn parse_svg_length_px(raw: &str) -> Option<f32> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.ends_with('%') {
        return None;
    }
    let boundary = trimmed
        .char_indices()
        .find(|&(_, ch)| !(ch.is_ascii_digit() || matches!(ch, '+' | '-' | '.' | 'e' | 'E')))
        .map_or(trimmed.len(), |(idx, _)| idx);
    if boundary == 0 {
        return None;
    }
    let value = trimmed[..boundary].parse::<f32>().ok()?;
    let factor = match trimmed[boundary..].trim().to_ascii_lowercase().as_str() {
        "" | "px" => 1.0,
        "pt" => 96.0 / 72.0,
        "pc" => 16.0,
        "in" => 96.0,
        "cm" => 96.0 / 2.54,
        "mm" => 96.0 / 25.4,
        "q" => 96.0 / 101.6,
        _ => return None,
    };
    Some(value * factor)
}

fn parse_svg_view_box(raw: &str) -> Option<(f32, f32)> {
    let mut nums = raw
        .split(|ch: char| ch.is_whitespace() || ch == ',')
        .filter(|part| !part.is_empty())
        .map(str::parse::<f32>);
    let _min_x = nums.next()?.ok()?;
    let _min_y = nums.next()?.ok()?;
    let width = nums.next()?.ok()?;
    let height = nums.next()?.ok()?;
    if width <= 0.0 || height <= 0.0 {
        return None;
    }
    Some((width, height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn svg_width_height() {
        let svg = br#"<?xml version="1.0"?>
<!-- logo -->
<svg xmlns="http://www.w3.org/2000/svg" width="120" height="48px"></svg>"#;
        assert_eq!(svg_dimensions(svg), Some((120, 48)));
    }

    #[test]
    fn svg_view_box_fallback() {
        let svg = br#"<svg viewBox="0 0 64 32" width="100%"/>"#;
        assert_eq!(svg_dimensions(svg), Some((64, 32)));
    }

    #[test]
    fn svg_one_side_scaled_by_view_box() {
        let svg = br#"<svg viewBox="0,0,200,100" width="50"/>"#;
        assert_eq!(svg_dimensions(svg), Some((50, 25)));
    }

    #[test]
    fn svg_units() {
        let svg = br#"<svg width="1in" height="72pt"/>"#;
        assert_eq!(svg_dimensions(svg), Some((96, 96)));
        let svg = br#"<svg width="2em" height="10"/>"#;
        assert_eq!(svg_dimensions(svg), None);
    }

    #[test]
    fn not_svg() {
        assert_eq!(svg_dimensions(b"<html><svg width='1' height='1'/></html>"), None);
        assert_eq!(svg_dimensions(b"not xml at all"), None);
        assert_eq!(svg_dimensions(br#"<svg width="0" height="5"/>"#), None);
    }

    #[test]
    fn decode_png_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pic.png");
        image::RgbImage::new(320, 240).save(&path).unwrap();
        let dims = FsImageDecoder::new().dimensions(&path).unwrap();
        assert_eq!(
            dims,
            ImageDimensions {
                width: 320,
                height: 240
            }
        );
    }

    #[test]
    fn decode_svg_file_uppercase_extension() {
        let mut f = tempfile::Builder::new().suffix(".SVG").tempfile().unwrap();
        f.write_all(br#"<svg width="10" height="20"/>"#).unwrap();
        f.flush().unwrap();
        let dims = FsImageDecoder::new().dimensions(f.path()).unwrap();
        assert_eq!((dims.width, dims.height), (10, 20));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = FsImageDecoder::new()
            .dimensions(&dir.path().join("absent.png"))
            .unwrap_err();
        assert!(matches!(err, DecodeError::Io { .. }), "{err}");
    }

    #[test]
    fn garbage_png_is_decode_error() {
        let mut f = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        f.write_all(b"definitely not a png").unwrap();
        f.flush().unwrap();
        assert!(FsImageDecoder::new().dimensions(f.path()).is_err());
    }
}
