//! Canvas-like immediate-mode drawing context.
//!
//! [`Context2D`] mirrors the subset of a 2D canvas API the [`crate::Drawer`] wraps. The
//! state machine (save stack, current transform, clip paths, current path, paint and font
//! settings) is shared in [`StateStack`]; backends only implement the operations that
//! actually put pixels (or commands) somewhere.

use std::f64::consts::TAU;

use kurbo::{PathEl, Shape};

use crate::foundation::core::{Affine, BezPath, Color, Point, Rect, Vec2};
use crate::gfx::font::FontDescriptor;
use crate::gfx::styles::{
    FontKerning, FontStretch, FontStyle, FontVariantCaps, HorizontalAlign, LineStyle,
    TextBaseline,
};

const PATH_TOLERANCE: f64 = 0.1;

/// Font-level metrics of a measured string.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TextMetrics {
    /// Advance width.
    pub width: f64,
    /// Distance from the alphabetic baseline to the top of the font bounding box.
    pub font_ascent: f64,
    /// Distance from the alphabetic baseline to the bottom of the font bounding box.
    pub font_descent: f64,
}

impl TextMetrics {
    pub fn height(&self) -> f64 {
        self.font_ascent + self.font_descent
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FontState {
    pub descriptor: FontDescriptor,
    pub kerning: FontKerning,
    pub stretch: FontStretch,
    pub variant_caps: FontVariantCaps,
    pub letter_spacing: f64,
}

impl Default for FontState {
    fn default() -> Self {
        Self {
            descriptor: FontDescriptor::default(),
            kerning: FontKerning::Auto,
            stretch: FontStretch::Normal,
            variant_caps: FontVariantCaps::Normal,
            letter_spacing: 0.0,
        }
    }
}

impl FontState {
    /// OpenType feature settings implied by kerning and caps, in CSS
    /// `font-feature-settings` syntax. `None` when the font defaults apply.
    pub fn feature_settings(&self) -> Option<String> {
        let mut features: Vec<(&str, u8)> = Vec::new();
        match self.kerning {
            FontKerning::Auto => {}
            FontKerning::Normal => features.push(("kern", 1)),
            FontKerning::None => features.push(("kern", 0)),
        }
        let caps: &[&str] = match self.variant_caps {
            FontVariantCaps::Normal => &[],
            FontVariantCaps::SmallCaps => &["smcp"],
            FontVariantCaps::AllSmallCaps => &["c2sc", "smcp"],
            FontVariantCaps::PetiteCaps => &["pcap"],
            FontVariantCaps::AllPetiteCaps => &["c2pc", "pcap"],
            FontVariantCaps::Unicase => &["unic"],
            FontVariantCaps::TitlingCaps => &["titl"],
        };
        features.extend(caps.iter().map(|tag| (*tag, 1)));

        if features.is_empty() {
            return None;
        }
        Some(
            features
                .iter()
                .map(|(tag, value)| format!("\"{tag}\" {value}"))
                .collect::<Vec<_>>()
                .join(", "),
        )
    }
}

/// Everything `save` pushes and `restore` pops.
#[derive(Clone, Debug)]
pub struct DrawState {
    pub transform: Affine,
    /// Clip paths in device space; the effective clip is their intersection.
    pub clips: Vec<BezPath>,
    pub line: LineStyle,
    pub fill: Color,
    pub font: FontState,
    pub text_align: HorizontalAlign,
    pub text_baseline: TextBaseline,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            transform: Affine::IDENTITY,
            clips: Vec::new(),
            line: LineStyle::default(),
            fill: Color::BLACK,
            font: FontState::default(),
            text_align: HorizontalAlign::Start,
            text_baseline: TextBaseline::Alphabetic,
        }
    }
}

/// Arc/ellipse segment in user space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EllipseArc {
    pub center: Point,
    pub radii: Vec2,
    pub rotation: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    pub counterclockwise: bool,
}

impl EllipseArc {
    /// Signed sweep following canvas `ellipse()` rules.
    pub fn sweep(&self) -> f64 {
        let delta = self.end_angle - self.start_angle;
        if self.counterclockwise {
            let back = -delta;
            if back >= TAU { -TAU } else { -back.rem_euclid(TAU) }
        } else if delta >= TAU {
            TAU
        } else {
            delta.rem_euclid(TAU)
        }
    }
}

/// Shared state machine behind every [`Context2D`].
#[derive(Clone, Debug, Default)]
pub struct StateStack {
    current: DrawState,
    saved: Vec<DrawState>,
    /// Current path, already in device space.
    path: BezPath,
}

impl StateStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> &DrawState {
        &self.current
    }

    pub fn current_mut(&mut self) -> &mut DrawState {
        &mut self.current
    }

    pub fn path(&self) -> &BezPath {
        &self.path
    }

    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    pub fn save(&mut self) {
        self.saved.push(self.current.clone());
    }

    /// Pops the last saved state; an unbalanced restore is ignored.
    pub fn restore(&mut self) {
        if let Some(prev) = self.saved.pop() {
            self.current = prev;
        }
    }

    pub fn translate(&mut self, d: Vec2) {
        self.current.transform *= Affine::translate(d);
    }

    pub fn begin_path(&mut self) {
        self.path = BezPath::new();
    }

    pub fn move_to(&mut self, p: Point) {
        let p = self.current.transform * p;
        self.path.move_to(p);
    }

    pub fn line_to(&mut self, p: Point) {
        let p = self.current.transform * p;
        if self.path.elements().is_empty() {
            self.path.move_to(p);
        } else {
            self.path.line_to(p);
        }
    }

    pub fn rect(&mut self, r: Rect) {
        self.move_to(Point::new(r.x0, r.y0));
        self.line_to(Point::new(r.x1, r.y0));
        self.line_to(Point::new(r.x1, r.y1));
        self.line_to(Point::new(r.x0, r.y1));
        self.path.close_path();
    }

    pub fn ellipse(&mut self, e: &EllipseArc) {
        let arc = kurbo::Arc::new(e.center, e.radii, e.start_angle, e.sweep(), e.rotation);
        let transform = self.current.transform;
        let connect = !self.path.elements().is_empty();
        for (i, el) in arc.path_elements(PATH_TOLERANCE).enumerate() {
            let el = transform * el;
            match el {
                PathEl::MoveTo(p) if i == 0 && connect => self.path.line_to(p),
                el => self.path.push(el),
            }
        }
    }

    /// Intersects the clip with the current path.
    pub fn clip(&mut self) {
        self.current.clips.push(self.path.clone());
    }

    /// Bounding-box intersection of all clip paths, `None` when unclipped.
    pub fn clip_bounds(&self) -> Option<Rect> {
        self.current
            .clips
            .iter()
            .map(|p| p.bounding_box())
            .reduce(|a, b| {
                let r = a.intersect(b);
                // Disjoint clips intersect to an inverted rect; collapse it to empty.
                if r.width() < 0.0 || r.height() < 0.0 {
                    Rect::new(r.x0, r.y0, r.x0, r.y0)
                } else {
                    r
                }
            })
    }

    pub fn set_font(&mut self, style: &FontStyle) {
        let descriptor = FontDescriptor::parse(&style.font);
        // `small-caps` in the shorthand applies unless caps are set explicitly.
        let variant_caps = match style.font_variant_caps {
            FontVariantCaps::Normal if descriptor.small_caps => FontVariantCaps::SmallCaps,
            caps => caps,
        };
        self.current.font = FontState {
            descriptor,
            kerning: style.font_kerning,
            stretch: style.font_stretch,
            variant_caps,
            letter_spacing: style.letter_spacing,
        };
        self.current.text_baseline = style.text_baseline;
    }
}

/// Horizontal shift from the anchor to the start of a line of `width`.
pub fn align_offset(align: HorizontalAlign, width: f64) -> f64 {
    match align {
        HorizontalAlign::Start | HorizontalAlign::Left => 0.0,
        HorizontalAlign::Center => -width / 2.0,
        HorizontalAlign::End | HorizontalAlign::Right => -width,
    }
}

/// Vertical shift from the anchor to the alphabetic baseline.
pub fn baseline_offset(baseline: TextBaseline, ascent: f64, descent: f64) -> f64 {
    match baseline {
        TextBaseline::Top | TextBaseline::Hanging => ascent,
        TextBaseline::Middle => (ascent - descent) / 2.0,
        TextBaseline::Alphabetic => 0.0,
        TextBaseline::Ideographic | TextBaseline::Bottom => -descent,
    }
}

/// A canvas-like drawing context.
///
/// Coordinates passed to path and text operations are user space; they go through the
/// current transform when they are issued.
pub trait Context2D {
    fn state(&self) -> &StateStack;
    fn state_mut(&mut self) -> &mut StateStack;

    /// Strokes the current path with the current line style, inside the current clip.
    fn stroke(&mut self);
    /// Fills the current path with the current fill paint, inside the current clip.
    fn fill(&mut self);
    fn fill_rect(&mut self, rect: Rect);
    fn fill_text(&mut self, text: &str, at: Point);
    fn stroke_text(&mut self, text: &str, at: Point);
    /// Measures `text` with the current font settings.
    fn measure_text(&mut self, text: &str) -> TextMetrics;

    fn save(&mut self) {
        self.state_mut().save();
    }

    fn restore(&mut self) {
        self.state_mut().restore();
    }

    fn save_depth(&self) -> usize {
        self.state().depth()
    }

    fn translate(&mut self, d: Vec2) {
        self.state_mut().translate(d);
    }

    fn begin_path(&mut self) {
        self.state_mut().begin_path();
    }

    fn move_to(&mut self, p: Point) {
        self.state_mut().move_to(p);
    }

    fn line_to(&mut self, p: Point) {
        self.state_mut().line_to(p);
    }

    fn rect(&mut self, r: Rect) {
        self.state_mut().rect(r);
    }

    fn ellipse(&mut self, e: &EllipseArc) {
        self.state_mut().ellipse(e);
    }

    fn clip(&mut self) {
        self.state_mut().clip();
    }

    fn set_line_style(&mut self, style: &LineStyle) {
        self.state_mut().current_mut().line = style.clone();
    }

    fn set_fill_paint(&mut self, paint: Color) {
        self.state_mut().current_mut().fill = paint;
    }

    /// Applies the font-level fields of `style` (font, kerning, stretch, caps, baseline,
    /// letter spacing). Fill and line are applied separately.
    fn set_font(&mut self, style: &FontStyle) {
        self.state_mut().set_font(style);
    }

    fn set_text_align(&mut self, align: HorizontalAlign) {
        self.state_mut().current_mut().text_align = align;
    }

    fn set_text_baseline(&mut self, baseline: TextBaseline) {
        self.state_mut().current_mut().text_baseline = baseline;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/gfx/context.rs"]
mod tests;
