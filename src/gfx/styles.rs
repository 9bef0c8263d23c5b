//! Style value objects and their partial overrides.
//!
//! Every drawing primitive takes a partial style; the effective style is the built-in default
//! with the caller's `Some` fields laid over it key by key.

use std::f64::consts::TAU;

use serde::{Deserialize, Deserializer};

use crate::foundation::core::Color;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineJoin {
    Round,
    Bevel,
    #[default]
    Miter,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalAlign {
    Start,
    End,
    Left,
    Right,
    #[default]
    Center,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextBaseline {
    Top,
    Hanging,
    Middle,
    #[default]
    Alphabetic,
    Ideographic,
    Bottom,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontKerning {
    #[default]
    Auto,
    Normal,
    None,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FontStretch {
    UltraCondensed,
    ExtraCondensed,
    Condensed,
    SemiCondensed,
    #[default]
    Normal,
    SemiExpanded,
    Expanded,
    ExtraExpanded,
    UltraExpanded,
}

impl FontStretch {
    /// Width as a fraction of normal (CSS `font-stretch` percentages).
    pub fn ratio(self) -> f32 {
        match self {
            Self::UltraCondensed => 0.5,
            Self::ExtraCondensed => 0.625,
            Self::Condensed => 0.75,
            Self::SemiCondensed => 0.875,
            Self::Normal => 1.0,
            Self::SemiExpanded => 1.125,
            Self::Expanded => 1.25,
            Self::ExtraExpanded => 1.5,
            Self::UltraExpanded => 2.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FontVariantCaps {
    #[default]
    Normal,
    SmallCaps,
    AllSmallCaps,
    PetiteCaps,
    AllPetiteCaps,
    Unicase,
    TitlingCaps,
}

/// Stroke parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct LineStyle {
    pub stroke: Color,
    pub line_width: f64,
    pub line_cap: LineCap,
    pub line_join: LineJoin,
    pub miter_limit: f64,
    pub line_dash: Vec<f64>,
    pub line_dash_offset: f64,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            stroke: Color::BLACK,
            line_width: 1.0,
            line_cap: LineCap::Butt,
            line_join: LineJoin::Miter,
            miter_limit: 10.0,
            line_dash: Vec::new(),
            line_dash_offset: 0.0,
        }
    }
}

impl LineStyle {
    /// The default style with `overrides` applied.
    pub fn resolve(overrides: &LineStyleOverrides) -> Self {
        Self::default().overlaid(overrides)
    }

    pub fn overlaid(&self, o: &LineStyleOverrides) -> Self {
        Self {
            stroke: o.stroke.unwrap_or(self.stroke),
            line_width: o.line_width.unwrap_or(self.line_width),
            line_cap: o.line_cap.unwrap_or(self.line_cap),
            line_join: o.line_join.unwrap_or(self.line_join),
            miter_limit: o.miter_limit.unwrap_or(self.miter_limit),
            line_dash: o.line_dash.clone().unwrap_or_else(|| self.line_dash.clone()),
            line_dash_offset: o.line_dash_offset.unwrap_or(self.line_dash_offset),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LineStyleOverrides {
    pub stroke: Option<Color>,
    pub line_width: Option<f64>,
    pub line_cap: Option<LineCap>,
    pub line_join: Option<LineJoin>,
    pub miter_limit: Option<f64>,
    pub line_dash: Option<Vec<f64>>,
    pub line_dash_offset: Option<f64>,
}

impl LineStyleOverrides {
    pub fn with_stroke(mut self, stroke: Color) -> Self {
        self.stroke = Some(stroke);
        self
    }

    pub fn with_line_width(mut self, width: f64) -> Self {
        self.line_width = Some(width);
        self
    }

    pub fn with_dash(mut self, pattern: Vec<f64>, offset: f64) -> Self {
        self.line_dash = Some(pattern);
        self.line_dash_offset = Some(offset);
        self
    }
}

impl From<&LineStyle> for LineStyleOverrides {
    fn from(s: &LineStyle) -> Self {
        Self {
            stroke: Some(s.stroke),
            line_width: Some(s.line_width),
            line_cap: Some(s.line_cap),
            line_join: Some(s.line_join),
            miter_limit: Some(s.miter_limit),
            line_dash: Some(s.line_dash.clone()),
            line_dash_offset: Some(s.line_dash_offset),
        }
    }
}

/// Text paint and font metrics parameters.
///
/// `fill` and `line` are independent: a `Some` fill draws filled glyphs, a `Some` line
/// additionally strokes them.
#[derive(Clone, Debug, PartialEq)]
pub struct FontStyle {
    pub fill: Option<Color>,
    pub line: Option<LineStyle>,
    /// CSS-like font shorthand, e.g. `"bold 18px monospace"`.
    pub font: String,
    pub font_kerning: FontKerning,
    pub font_stretch: FontStretch,
    pub font_variant_caps: FontVariantCaps,
    pub text_baseline: TextBaseline,
    /// Extra advance per character in pixels.
    pub letter_spacing: f64,
}

impl Default for FontStyle {
    fn default() -> Self {
        Self {
            fill: Some(Color::BLACK),
            line: None,
            font: "24px sans".to_string(),
            font_kerning: FontKerning::Auto,
            font_stretch: FontStretch::Normal,
            font_variant_caps: FontVariantCaps::Normal,
            text_baseline: TextBaseline::Alphabetic,
            letter_spacing: 0.0,
        }
    }
}

impl FontStyle {
    pub fn resolve(overrides: &FontStyleOverrides) -> Self {
        Self::default().overlaid(overrides)
    }

    pub fn overlaid(&self, o: &FontStyleOverrides) -> Self {
        Self {
            fill: o.fill.unwrap_or(self.fill),
            line: match &o.line {
                Some(line) => line.as_ref().map(LineStyle::resolve),
                None => self.line.clone(),
            },
            font: o.font.clone().unwrap_or_else(|| self.font.clone()),
            font_kerning: o.font_kerning.unwrap_or(self.font_kerning),
            font_stretch: o.font_stretch.unwrap_or(self.font_stretch),
            font_variant_caps: o.font_variant_caps.unwrap_or(self.font_variant_caps),
            text_baseline: o.text_baseline.unwrap_or(self.text_baseline),
            letter_spacing: o.letter_spacing.unwrap_or(self.letter_spacing),
        }
    }
}

/// Partial [`FontStyle`]. The nullable fields use `Some(None)` for an explicit "none".
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FontStyleOverrides {
    #[serde(deserialize_with = "explicit_null")]
    pub fill: Option<Option<Color>>,
    #[serde(deserialize_with = "explicit_null")]
    pub line: Option<Option<LineStyleOverrides>>,
    pub font: Option<String>,
    pub font_kerning: Option<FontKerning>,
    pub font_stretch: Option<FontStretch>,
    pub font_variant_caps: Option<FontVariantCaps>,
    pub text_baseline: Option<TextBaseline>,
    pub letter_spacing: Option<f64>,
}

impl FontStyleOverrides {
    pub fn with_fill(mut self, fill: Option<Color>) -> Self {
        self.fill = Some(fill);
        self
    }

    pub fn with_line(mut self, line: Option<LineStyleOverrides>) -> Self {
        self.line = Some(line);
        self
    }

    pub fn with_font(mut self, font: impl Into<String>) -> Self {
        self.font = Some(font.into());
        self
    }
}

// Distinguishes `"fill": null` (Some(None)) from an absent key (None).
fn explicit_null<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextAlign {
    pub align: HorizontalAlign,
    pub baseline: TextBaseline,
}

impl Default for TextAlign {
    fn default() -> Self {
        Self {
            align: HorizontalAlign::Center,
            baseline: TextBaseline::Middle,
        }
    }
}

impl TextAlign {
    pub fn resolve(overrides: &TextAlignOverrides) -> Self {
        let d = Self::default();
        Self {
            align: overrides.align.unwrap_or(d.align),
            baseline: overrides.baseline.unwrap_or(d.baseline),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TextAlignOverrides {
    pub align: Option<HorizontalAlign>,
    pub baseline: Option<TextBaseline>,
}

impl TextAlignOverrides {
    pub const fn new(align: HorizontalAlign, baseline: TextBaseline) -> Self {
        Self {
            align: Some(align),
            baseline: Some(baseline),
        }
    }

    /// Left-to-right flowing text anchored at its top-left corner.
    pub const fn start_top() -> Self {
        Self::new(HorizontalAlign::Start, TextBaseline::Top)
    }
}

impl From<TextAlign> for TextAlignOverrides {
    fn from(a: TextAlign) -> Self {
        Self::new(a.align, a.baseline)
    }
}

/// Arrowhead shape.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArrowStyle {
    /// "Shallowness" of the head: 0° folds the prongs back onto the shaft, 90° spreads them
    /// perpendicular to it.
    pub angle_degrees: f64,
    /// Prong length in pixels.
    pub length: f64,
}

impl Default for ArrowStyle {
    fn default() -> Self {
        Self {
            angle_degrees: 45.0,
            length: 10.0,
        }
    }
}

impl ArrowStyle {
    pub fn resolve(overrides: &ArrowStyleOverrides) -> Self {
        let d = Self::default();
        Self {
            angle_degrees: overrides.angle_degrees.unwrap_or(d.angle_degrees),
            length: overrides.length.unwrap_or(d.length),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArrowStyleOverrides {
    pub angle_degrees: Option<f64>,
    pub length: Option<f64>,
}

/// Arc parameters for [`crate::Drawer::draw_ellipse`]; the default is a full ellipse.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EllipseExtras {
    pub rotation: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    pub counterclockwise: bool,
}

impl Default for EllipseExtras {
    fn default() -> Self {
        Self {
            rotation: 0.0,
            start_angle: 0.0,
            end_angle: TAU,
            counterclockwise: false,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/gfx/styles.rs"]
mod tests;
