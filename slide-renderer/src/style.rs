//! CSS colour parsing for the raster surface.

use tiny_skia::Color;

/// Parse a CSS colour: `#rgb`, `#rrggbb`, `#rrggbbaa` or a basic named colour.
#[must_use]
pub fn parse_color(css: &str) -> Option<Color> {
    let css = css.trim();
    if let Some(hex) = css.strip_prefix('#') {
        return parse_hex(hex);
    }
    let rgba = match css.to_ascii_lowercase().as_str() {
        "black" => [0, 0, 0, 255],
        "white" => [255, 255, 255, 255],
        "red" => [255, 0, 0, 255],
        "green" => [0, 128, 0, 255],
        "blue" => [0, 0, 255, 255],
        "gray" | "grey" => [128, 128, 128, 255],
        "transparent" => [0, 0, 0, 0],
        _ => return None,
    };
    Some(Color::from_rgba8(rgba[0], rgba[1], rgba[2], rgba[3]))
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 => {
            let mut rgb = [0u8; 3];
            for (slot, c) in rgb.iter_mut().zip(hex.chars()) {
                let v = channel(&c.to_string())?;
                *slot = v * 17;
            }
            Some(Color::from_rgba8(rgb[0], rgb[1], rgb[2], 255))
        }
        6 | 8 => {
            let r = channel(&hex[0..2])?;
            let g = channel(&hex[2..4])?;
            let b = channel(&hex[4..6])?;
            let a = if hex.len() == 8 {
                channel(&hex[6..8])?
            } else {
                255
            };
            Some(Color::from_rgba8(r, g, b, a))
        }
        _ => None,
    }
}

/// Escape special XML characters for SVG text and attribute values.
pub(crate) fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
