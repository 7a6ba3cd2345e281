//! Header probing for details the decoder does not report
//!
//! Reads the embedded resolution of JPEG (JFIF APP0 density) and PNG (`pHYs`
//! chunk) files, and the component count of a JPEG frame. Probing never
//! fails: malformed or missing headers simply yield `None`.

use crate::source::ImageFormat;

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";
const INCHES_PER_METER: f64 = 39.3701;
const CM_PER_INCH: f64 = 2.54;
/// Densities below this are treated as absent; they would give pages far
/// beyond the 14400 pt PDF page limit
const MIN_DPI: f64 = 10.0;

/// Embedded resolution as (horizontal, vertical) dots per inch
pub fn resolution(format: ImageFormat, data: &[u8]) -> Option<(f64, f64)> {
    let dpi = match format {
        ImageFormat::Jpeg => jfif_density(data),
        ImageFormat::Png => png_physical_size(data),
        ImageFormat::Gif => None,
    }?;

    (dpi.0 >= MIN_DPI && dpi.1 >= MIN_DPI).then_some(dpi)
}

/// Number of colour components declared by the JPEG frame header
pub fn jpeg_components(data: &[u8]) -> Option<u8> {
    jpeg_segments(data)
        .find(|(marker, _)| is_start_of_frame(*marker))
        .and_then(|(_, body)| body.get(5).copied())
}

fn jfif_density(data: &[u8]) -> Option<(f64, f64)> {
    let (_, body) = jpeg_segments(data)
        .find(|(marker, body)| *marker == 0xE0 && body.starts_with(b"JFIF\0"))?;

    // JFIF\0, version (2), units (1), x density (2), y density (2)
    let units = *body.get(7)?;
    let x = u16::from_be_bytes([*body.get(8)?, *body.get(9)?]) as f64;
    let y = u16::from_be_bytes([*body.get(10)?, *body.get(11)?]) as f64;

    match units {
        1 => Some((x, y)),
        2 => Some((x * CM_PER_INCH, y * CM_PER_INCH)),
        _ => None,
    }
}

fn is_start_of_frame(marker: u8) -> bool {
    matches!(marker, 0xC0..=0xCF) && !matches!(marker, 0xC4 | 0xC8 | 0xCC)
}

/// Iterate `(marker, body)` over JPEG header segments up to the scan data
fn jpeg_segments(data: &[u8]) -> impl Iterator<Item = (u8, &[u8])> {
    let mut pos = if data.starts_with(&[0xFF, 0xD8]) { 2 } else { data.len() };

    std::iter::from_fn(move || loop {
        if data.get(pos) != Some(&0xFF) {
            return None;
        }
        // Fill bytes may precede a marker
        while data.get(pos) == Some(&0xFF) {
            pos += 1;
        }
        let marker = *data.get(pos)?;
        pos += 1;

        match marker {
            0xD9 | 0xDA => return None,
            0x01 | 0xD0..=0xD7 => continue,
            _ => {}
        }

        let len = u16::from_be_bytes([*data.get(pos)?, *data.get(pos + 1)?]) as usize;
        if len < 2 {
            return None;
        }
        let body = data.get(pos + 2..pos + len)?;
        pos += len;
        return Some((marker, body));
    })
}

fn png_physical_size(data: &[u8]) -> Option<(f64, f64)> {
    let mut pos = PNG_SIGNATURE.len();
    if !data.starts_with(PNG_SIGNATURE) {
        return None;
    }

    loop {
        let len = u32::from_be_bytes(data.get(pos..pos + 4)?.try_into().ok()?) as usize;
        let kind = data.get(pos + 4..pos + 8)?;
        let body = data.get(pos + 8..pos + 8 + len)?;

        match kind {
            b"pHYs" if len >= 9 => {
                let x = u32::from_be_bytes(body[0..4].try_into().ok()?) as f64;
                let y = u32::from_be_bytes(body[4..8].try_into().ok()?) as f64;
                // Unit 0 only gives the aspect ratio
                return (body[8] == 1).then(|| (x / INCHES_PER_METER, y / INCHES_PER_METER));
            }
            b"IDAT" | b"IEND" => return None,
            _ => {}
        }

        // length, type, data, crc
        pos += 12 + len;
    }
}
