//! CPU raster backend on `vello_cpu`, with `parley` shaping text.

use std::borrow::Cow;
use std::collections::HashMap;

use crate::foundation::core::{Affine, BezPath, FrameRGBA, Point, Rect};
use crate::foundation::error::{AlgonimError, AlgonimResult};
use crate::gfx::context::{
    Context2D, FontState, StateStack, TextMetrics, align_offset, baseline_offset,
};
use crate::gfx::styles::{FontStretch, LineCap, LineJoin, LineStyle};
use crate::render::surface::Surface;

/// Font selection and shaping shared by measurement and drawing.
struct TextEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
    /// Families from registered font bytes, tried before the requested families.
    registered: Vec<String>,
    fonts: HashMap<(u64, u32), vello_cpu::peniko::FontData>,
}

impl TextEngine {
    fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            registered: Vec::new(),
            fonts: HashMap::new(),
        }
    }

    fn register(&mut self, bytes: Vec<u8>) -> AlgonimResult<String> {
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(bytes), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| AlgonimError::validation("no font families registered from font bytes"))?;
        let name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| AlgonimError::validation("registered font family has no name"))?
            .to_string();
        if !self.registered.contains(&name) {
            self.registered.push(name.clone());
        }
        Ok(name)
    }

    fn layout(&mut self, text: &str, font: &FontState) -> parley::Layout<()> {
        let d = &font.descriptor;
        let stack = self
            .registered
            .iter()
            .map(|f| format!("\"{f}\""))
            .chain(std::iter::once(d.families.clone()))
            .collect::<Vec<_>>()
            .join(", ");

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(stack)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(d.size_px as f32));
        builder.push_default(parley::style::StyleProperty::FontWeight(
            parley::style::FontWeight::new(f32::from(d.weight)),
        ));
        if d.italic {
            builder.push_default(parley::style::StyleProperty::FontStyle(
                parley::style::FontStyle::Italic,
            ));
        }
        if font.stretch != FontStretch::Normal {
            builder.push_default(parley::style::StyleProperty::FontWidth(
                parley::style::FontWidth::from_ratio(font.stretch.ratio()),
            ));
        }
        if let Some(features) = font.feature_settings() {
            builder.push_default(parley::style::StyleProperty::FontFeatures(
                parley::style::FontSettings::Source(Cow::Owned(features)),
            ));
        }
        if font.letter_spacing != 0.0 {
            builder.push_default(parley::style::StyleProperty::LetterSpacing(
                font.letter_spacing as f32,
            ));
        }

        let mut layout: parley::Layout<()> = builder.build(text);
        layout.break_all_lines(None);
        layout
    }

    fn font_data(&mut self, font: &parley::FontData) -> vello_cpu::peniko::FontData {
        self.fonts
            .entry((font.data.id(), font.index))
            .or_insert_with(|| {
                vello_cpu::peniko::FontData::new(
                    vello_cpu::peniko::Blob::from(font.data.data().to_vec()),
                    font.index,
                )
            })
            .clone()
    }
}

/// Metrics of the first line and its baseline offset from the layout top.
fn layout_metrics(layout: &parley::Layout<()>, em: f64) -> (TextMetrics, f64) {
    let (ascent, descent, baseline) = layout
        .lines()
        .next()
        .map(|line| {
            let m = line.metrics();
            (f64::from(m.ascent), f64::from(m.descent), f64::from(m.baseline))
        })
        .unwrap_or((em * 0.8, em * 0.2, em * 0.8));
    let metrics = TextMetrics {
        width: f64::from(layout.full_width()),
        font_ascent: ascent,
        font_descent: descent,
    };
    (metrics, baseline)
}

/// [`Context2D`] rasterizing into a `vello_cpu` render context.
pub struct RasterContext {
    state: StateStack,
    ctx: vello_cpu::RenderContext,
    text: TextEngine,
}

impl std::fmt::Debug for RasterContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterContext")
            .field("state", &self.state)
            .field("registered_fonts", &self.text.registered)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Copy)]
enum GlyphPaint {
    Fill,
    Stroke,
}

impl RasterContext {
    fn new(width: u16, height: u16) -> Self {
        Self {
            state: StateStack::new(),
            ctx: vello_cpu::RenderContext::new(width, height),
            text: TextEngine::new(),
        }
    }

    // Clip paths are stored in device space, so layers are pushed untransformed.
    fn with_clips(&mut self, f: impl FnOnce(&mut vello_cpu::RenderContext, &mut TextEngine)) {
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        let clips = &self.state.current().clips;
        for clip in clips {
            self.ctx.push_clip_layer(&bezpath_to_cpu(clip));
        }
        f(&mut self.ctx, &mut self.text);
        for _ in clips {
            self.ctx.pop_layer();
        }
    }

    fn draw_glyphs(&mut self, text: &str, at: Point, paint: GlyphPaint) {
        let current = self.state.current().clone();
        let layout = self.text.layout(text, &current.font);
        let (metrics, first_baseline) = layout_metrics(&layout, current.font.descriptor.size_px);

        let origin = Point::new(
            at.x + align_offset(current.text_align, metrics.width),
            at.y + baseline_offset(current.text_baseline, metrics.font_ascent, metrics.font_descent)
                - first_baseline,
        );
        let transform = current.transform * Affine::translate(origin.to_vec2());

        self.with_clips(|ctx, engine| {
            match paint {
                GlyphPaint::Fill => ctx.set_paint(color_to_cpu(current.fill)),
                GlyphPaint::Stroke => {
                    ctx.set_paint(color_to_cpu(current.line.stroke));
                    ctx.set_stroke(stroke_to_cpu(&current.line));
                }
            }
            ctx.set_transform(affine_to_cpu(transform));
            for line in layout.lines() {
                for item in line.items() {
                    let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                        continue;
                    };
                    let font = engine.font_data(run.run().font());
                    let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                        id: g.id,
                        x: g.x,
                        y: g.y,
                    });
                    let builder = ctx.glyph_run(&font).font_size(run.run().font_size());
                    match paint {
                        GlyphPaint::Fill => builder.fill_glyphs(glyphs),
                        GlyphPaint::Stroke => builder.stroke_glyphs(glyphs),
                    }
                }
            }
        });
    }
}

impl Context2D for RasterContext {
    fn state(&self) -> &StateStack {
        &self.state
    }

    fn state_mut(&mut self) -> &mut StateStack {
        &mut self.state
    }

    fn stroke(&mut self) {
        let path = bezpath_to_cpu(self.state.path());
        let line = self.state.current().line.clone();
        self.with_clips(|ctx, _| {
            ctx.set_paint(color_to_cpu(line.stroke));
            ctx.set_stroke(stroke_to_cpu(&line));
            ctx.stroke_path(&path);
        });
    }

    fn fill(&mut self) {
        let path = bezpath_to_cpu(self.state.path());
        let paint = self.state.current().fill;
        self.with_clips(|ctx, _| {
            ctx.set_paint(color_to_cpu(paint));
            ctx.fill_path(&path);
        });
    }

    fn fill_rect(&mut self, rect: Rect) {
        let mut path = BezPath::new();
        let t = self.state.current().transform;
        path.move_to(t * Point::new(rect.x0, rect.y0));
        path.line_to(t * Point::new(rect.x1, rect.y0));
        path.line_to(t * Point::new(rect.x1, rect.y1));
        path.line_to(t * Point::new(rect.x0, rect.y1));
        path.close_path();
        let path = bezpath_to_cpu(&path);
        let paint = self.state.current().fill;
        self.with_clips(|ctx, _| {
            ctx.set_paint(color_to_cpu(paint));
            ctx.fill_path(&path);
        });
    }

    fn fill_text(&mut self, text: &str, at: Point) {
        self.draw_glyphs(text, at, GlyphPaint::Fill);
    }

    fn stroke_text(&mut self, text: &str, at: Point) {
        self.draw_glyphs(text, at, GlyphPaint::Stroke);
    }

    fn measure_text(&mut self, text: &str) -> TextMetrics {
        let font = self.state.current().font.clone();
        let layout = self.text.layout(text, &font);
        layout_metrics(&layout, font.descriptor.size_px).0
    }
}

/// Pixel surface; `capture` rasterizes everything drawn since the last capture.
#[derive(Debug)]
pub struct RasterSurface {
    width: u16,
    height: u16,
    ctx: RasterContext,
}

impl RasterSurface {
    pub fn new(width: u32, height: u32) -> AlgonimResult<Self> {
        let to_u16 = |v: u32, what: &str| {
            u16::try_from(v)
                .ok()
                .filter(|v| *v > 0)
                .ok_or_else(|| {
                    AlgonimError::validation(format!("surface {what} must be in 1..=65535, got {v}"))
                })
        };
        let (w, h) = (to_u16(width, "width")?, to_u16(height, "height")?);
        Ok(Self {
            width: w,
            height: h,
            ctx: RasterContext::new(w, h),
        })
    }

    /// Makes a font file available; its family is preferred over system fonts.
    pub fn register_font(&mut self, bytes: Vec<u8>) -> AlgonimResult<String> {
        let name = self.ctx.text.register(bytes)?;
        tracing::debug!(family = %name, "registered font");
        Ok(name)
    }
}

impl Surface for RasterSurface {
    type Frame = FrameRGBA;

    fn width(&self) -> u32 {
        u32::from(self.width)
    }

    fn height(&self) -> u32 {
        u32::from(self.height)
    }

    fn context_2d(&mut self) -> Option<&mut dyn Context2D> {
        Some(&mut self.ctx)
    }

    fn capture(&mut self) -> AlgonimResult<FrameRGBA> {
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        self.ctx.ctx.flush();
        self.ctx.ctx.render_to_pixmap(&mut pixmap);
        self.ctx.ctx.reset();
        Ok(FrameRGBA {
            width: u32::from(self.width),
            height: u32::from(self.height),
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }
}

fn color_to_cpu(c: crate::foundation::core::Color) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn stroke_to_cpu(line: &LineStyle) -> vello_cpu::kurbo::Stroke {
    let cap = match line.line_cap {
        LineCap::Butt => vello_cpu::kurbo::Cap::Butt,
        LineCap::Round => vello_cpu::kurbo::Cap::Round,
        LineCap::Square => vello_cpu::kurbo::Cap::Square,
    };
    let join = match line.line_join {
        LineJoin::Round => vello_cpu::kurbo::Join::Round,
        LineJoin::Bevel => vello_cpu::kurbo::Join::Bevel,
        LineJoin::Miter => vello_cpu::kurbo::Join::Miter,
    };
    let stroke = vello_cpu::kurbo::Stroke::new(line.line_width)
        .with_caps(cap)
        .with_join(join)
        .with_miter_limit(line.miter_limit);

    // Canvas semantics: an odd dash list is repeated, negative or all-zero lists disable dashing.
    let dashes = &line.line_dash;
    if dashes.is_empty()
        || dashes.iter().any(|d| !d.is_finite() || *d < 0.0)
        || dashes.iter().all(|d| *d == 0.0)
    {
        return stroke;
    }
    let mut pattern = dashes.clone();
    if pattern.len() % 2 == 1 {
        pattern.extend_from_slice(dashes);
    }
    stroke.with_dashes(line.line_dash_offset, pattern)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
