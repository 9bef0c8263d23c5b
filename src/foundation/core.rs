use crate::foundation::error::{AlgonimError, AlgonimResult};

pub use kurbo::{Affine, BezPath, Point, Rect, Size, Vec2};

/// Returns `s` with `amount` taken off both dimensions.
pub fn shrink(s: Size, amount: f64) -> Size {
    Size::new(s.width - amount, s.height - amount)
}

/// Straight-alpha RGBA8 paint.
///
/// Serialized as a CSS-like string (`"#rrggbb"`, `"#rrggbbaa"`, `"#rgb"` or a named color).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

const NAMED_COLORS: &[(&str, [u8; 4])] = &[
    ("transparent", [0, 0, 0, 0]),
    ("black", [0, 0, 0, 255]),
    ("white", [255, 255, 255, 255]),
    ("red", [255, 0, 0, 255]),
    ("green", [0, 128, 0, 255]),
    ("lime", [0, 255, 0, 255]),
    ("blue", [0, 0, 255, 255]),
    ("navy", [0, 0, 128, 255]),
    ("yellow", [255, 255, 0, 255]),
    ("lightyellow", [255, 255, 224, 255]),
    ("orange", [255, 165, 0, 255]),
    ("purple", [128, 0, 128, 255]),
    ("magenta", [255, 0, 255, 255]),
    ("fuchsia", [255, 0, 255, 255]),
    ("cyan", [0, 255, 255, 255]),
    ("aqua", [0, 255, 255, 255]),
    ("teal", [0, 128, 128, 255]),
    ("maroon", [128, 0, 0, 255]),
    ("olive", [128, 128, 0, 255]),
    ("silver", [192, 192, 192, 255]),
    ("gray", [128, 128, 128, 255]),
    ("grey", [128, 128, 128, 255]),
    ("lightgray", [211, 211, 211, 255]),
    ("lightgrey", [211, 211, 211, 255]),
    ("darkgray", [169, 169, 169, 255]),
    ("darkgrey", [169, 169, 169, 255]),
    ("lightblue", [173, 216, 230, 255]),
    ("steelblue", [70, 130, 180, 255]),
    ("pink", [255, 192, 203, 255]),
    ("brown", [165, 42, 42, 255]),
    ("gold", [255, 215, 0, 255]),
];

impl Color {
    pub const TRANSPARENT: Self = Self::rgba8(0, 0, 0, 0);
    pub const BLACK: Self = Self::rgba8(0, 0, 0, 255);
    pub const WHITE: Self = Self::rgba8(255, 255, 255, 255);
    pub const RED: Self = Self::rgba8(255, 0, 0, 255);
    pub const MAGENTA: Self = Self::rgba8(255, 0, 255, 255);
    pub const LIGHT_YELLOW: Self = Self::rgba8(255, 255, 224, 255);

    pub const fn rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgba8(r, g, b, 255)
    }

    /// Parse a CSS-like color string.
    pub fn parse(s: &str) -> AlgonimResult<Self> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex)
                .ok_or_else(|| AlgonimError::validation(format!("invalid hex color '{s}'")));
        }
        let lower = s.to_ascii_lowercase();
        NAMED_COLORS
            .iter()
            .find(|(name, _)| *name == lower)
            .map(|(_, [r, g, b, a])| Self::rgba8(*r, *g, *b, *a))
            .ok_or_else(|| AlgonimError::validation(format!("unknown color '{s}'")))
    }

    /// The color as `#rrggbbaa` (or `#rrggbb` when opaque).
    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.is_ascii() {
        return None;
    }
    let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    match hex.len() {
        3 => Some(Color::rgb8(nibble(0)?, nibble(1)?, nibble(2)?)),
        4 => Some(Color::rgba8(nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)?)),
        6 => Some(Color::rgb8(byte(0)?, byte(2)?, byte(4)?)),
        8 => Some(Color::rgba8(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
        _ => None,
    }
}

impl TryFrom<String> for Color {
    type Error = AlgonimError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Color> for String {
    fn from(value: Color) -> Self {
        value.to_hex()
    }
}

/// A captured raster frame as RGBA8 pixels.
///
/// Frames coming out of the CPU surface are **premultiplied alpha**; the flag makes this
/// explicit at API boundaries.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Pixel at `(x, y)` or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
