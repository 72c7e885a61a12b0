//! Color conversions used by the shadow color picker.
//!
//! Pickers hand out `#rrggbb`; shadows are stored as `rgba(r,g,b,a)` so the
//! alpha survives. Parsing accepts any CSS color `csscolorparser` does.

use csscolorparser::Color;

use crate::value::format_number;

fn rgba8(input: &str) -> Option<[u8; 4]> {
    let parsed: Color = input.trim().parse().ok()?;
    Some(parsed.to_rgba8())
}

/// Convert a color to `rgba(r,g,b,alpha)` with the given alpha.
///
/// ```
/// use stylekit_core::color::hex_to_rgba;
///
/// assert_eq!(hex_to_rgba("#ff8000", 0.1).as_deref(), Some("rgba(255,128,0,0.1)"));
/// assert_eq!(hex_to_rgba("nope", 0.5), None);
/// ```
#[must_use]
pub fn hex_to_rgba(hex: &str, alpha: f64) -> Option<String> {
    let [r, g, b, _] = rgba8(hex)?;
    let alpha = format_number(alpha.clamp(0.0, 1.0));
    Some(format!("rgba({r},{g},{b},{alpha})"))
}

/// Convert a color to `#rrggbb`, dropping alpha.
#[must_use]
pub fn rgba_to_hex(color: &str) -> Option<String> {
    let [r, g, b, _] = rgba8(color)?;
    Some(format!("#{r:02x}{g:02x}{b:02x}"))
}
