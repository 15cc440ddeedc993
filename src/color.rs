//! Canonical color parsing and formatting.
//!
//! Color-bearing attributes and style declarations can spell the same color
//! many ways (`#D9D9D9`, `#d9d9d9`, `rgb(217, 217, 217)`, `gainsboro`...).
//! [`Color`] parses any of those and [`Color::to_canonical`] turns them into a
//! single comparable string, which is what palette keys are matched against
//! when an exact match fails.

use lightningcss::traits::Parse;
use lightningcss::values::color::{CssColor, SRGB};
use palette::Srgb;

// ============================================================================
// Color
// ============================================================================

/// An sRGB color with straight (non-premultiplied) alpha.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    /// Opacity in the 0.0-1.0 range.
    pub alpha: f32,
}

impl Color {
    /// Creates an opaque color.
    pub fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    /// Creates a color with the given alpha, clamped to 0.0-1.0.
    pub fn rgba(red: u8, green: u8, blue: u8, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha: alpha.clamp(0.0, 1.0),
        }
    }

    /// Parses a CSS color value.
    ///
    /// Returns `None` for anything that is not a concrete color, including
    /// keywords such as `none`, `currentColor` and `inherit`, and paint server
    /// references like `url(#gradient)`.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }

        let color = CssColor::parse_string(value).ok()?;
        // currentColor, system colors and light-dark() have no sRGB value
        let srgb = SRGB::try_from(&color).ok()?;
        let rgb: Srgb<u8> = Srgb::new(srgb.r, srgb.g, srgb.b).into_format();

        let alpha = if srgb.alpha.is_nan() { 1.0 } else { srgb.alpha };
        Some(Self::rgba(rgb.red, rgb.green, rgb.blue, alpha))
    }

    /// Returns `true` if the color is fully opaque.
    pub fn is_opaque(&self) -> bool {
        self.alpha >= 1.0
    }

    /// Formats the color in its canonical, comparable form.
    ///
    /// Opaque colors become lowercase hex, shortened to three digits when
    /// possible. Translucent colors become `rgba(r,g,b,a)`.
    pub fn to_canonical(&self) -> String {
        if !self.is_opaque() {
            return format!(
                "rgba({},{},{},{})",
                self.red,
                self.green,
                self.blue,
                format_alpha(self.alpha)
            );
        }

        let channels = [self.red, self.green, self.blue];
        if channels.iter().all(|c| (c >> 4) == (c & 0x0f)) {
            format!(
                "#{:x}{:x}{:x}",
                self.red & 0x0f,
                self.green & 0x0f,
                self.blue & 0x0f
            )
        } else {
            format!("#{:x}", Srgb::new(self.red, self.green, self.blue))
        }
    }
}

impl From<Srgb<u8>> for Color {
    fn from(color: Srgb<u8>) -> Self {
        Self::rgb(color.red, color.green, color.blue)
    }
}

/// Parses `value` and returns its canonical form, if it is a color.
pub fn canonical(value: &str) -> Option<String> {
    Color::parse(value).map(|c| c.to_canonical())
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Parsed alpha carries 8 bits of precision, two decimals cover it.
fn format_alpha(alpha: f32) -> String {
    let rounded = (alpha * 100.0).round() / 100.0;
    format!("{}", rounded)
}

// ============================================================================
// Tests
// ============================================================================
