use crate::foundation::core::{Color, Point, Rect, Size, Vec2};
use crate::gfx::context::{Context2D, EllipseArc, TextMetrics};
use crate::gfx::region::Region;
use crate::gfx::styles::{
    ArrowStyle, ArrowStyleOverrides, EllipseExtras, FontStyle, FontStyleOverrides, LineStyle,
    LineStyleOverrides, TextAlign, TextAlignOverrides,
};

/// Segments shorter than this on both axes get no arrowhead.
const ARROW_EPSILON: f64 = 0.00001;

/// Drawing handle bound to one [`Region`] of a shared [`Context2D`].
///
/// Primitives take pane-local coordinates: `(0, 0)` is the region's top-left corner shifted
/// by `origin`. Every primitive saves the context state, clips to the region, draws, and
/// restores the state again on every exit path (a drop guard performs the restore, so a
/// panic inside a draw does not leak state either).
pub struct Drawer<'a> {
    ctx: &'a mut dyn Context2D,
    region: Region,
    origin: Point,
}

impl std::fmt::Debug for Drawer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Drawer")
            .field("region", &self.region)
            .field("origin", &self.origin)
            .finish()
    }
}

struct SavedState<'c> {
    ctx: &'c mut dyn Context2D,
}

impl<'c> SavedState<'c> {
    fn new(ctx: &'c mut dyn Context2D) -> Self {
        ctx.save();
        Self { ctx }
    }
}

impl Drop for SavedState<'_> {
    fn drop(&mut self) {
        self.ctx.restore();
    }
}

impl<'a> Drawer<'a> {
    pub fn new(ctx: &'a mut dyn Context2D, region: Region) -> Self {
        Self::with_origin(ctx, region, Point::ORIGIN)
    }

    pub fn with_origin(ctx: &'a mut dyn Context2D, region: Region, origin: Point) -> Self {
        Self {
            ctx,
            region,
            origin,
        }
    }

    /// Absolute clip region on the surface.
    pub fn region(&self) -> Region {
        self.region
    }

    /// Local coordinate shift applied on top of the region's origin.
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Same size as [`Drawer::region`], zero origin: the frame primitives are called in.
    pub fn local_region(&self) -> Region {
        Region::from_origin_size(Point::ORIGIN, self.region.size)
    }

    /// Child drawer for `r`, given relative to this drawer's region and clipped against it.
    ///
    /// When clipping cuts into the top or left of `r`, the child's origin compensates so
    /// its coordinates stay relative to the requested top-left corner.
    pub fn subregion(&mut self, r: Region) -> Drawer<'_> {
        let requested = r.offset(self.region.origin.x, self.region.origin.y);
        let region = self.region.subregion(r);
        let origin = Point::new(
            requested.origin.x - region.origin.x,
            requested.origin.y - region.origin.y,
        );
        Drawer {
            ctx: &mut *self.ctx,
            region,
            origin,
        }
    }

    /// Same clip, local origin shifted by `by`.
    pub fn with_translated_origin(&mut self, by: Vec2) -> Drawer<'_> {
        Drawer {
            ctx: &mut *self.ctx,
            region: self.region,
            origin: self.origin + by,
        }
    }

    fn clipped<R>(&mut self, skip_origin: bool, f: impl FnOnce(&mut dyn Context2D) -> R) -> R {
        let (region, origin) = (self.region, self.origin);
        let guard = SavedState::new(&mut *self.ctx);
        let ctx: &mut dyn Context2D = &mut *guard.ctx;
        ctx.translate(region.origin.to_vec2());
        ctx.begin_path();
        ctx.rect(Rect::from_origin_size(Point::ORIGIN, region.size));
        ctx.clip();
        if !skip_origin {
            ctx.translate(origin.to_vec2());
        }
        f(ctx)
    }

    pub fn draw_line(&mut self, start: Point, end: Point, style: &LineStyleOverrides) {
        self.draw_multi_line([start, end], style);
    }

    /// Strokes a polyline through `points`.
    pub fn draw_multi_line(
        &mut self,
        points: impl IntoIterator<Item = Point>,
        style: &LineStyleOverrides,
    ) {
        let style = LineStyle::resolve(style);
        self.clipped(false, |ctx| {
            ctx.begin_path();
            ctx.set_line_style(&style);
            for (i, p) in points.into_iter().enumerate() {
                if i == 0 {
                    ctx.move_to(p);
                } else {
                    ctx.line_to(p);
                }
            }
            ctx.stroke();
        });
    }

    /// Line from `start` to `end` with an arrowhead at `end`.
    pub fn draw_arrow(
        &mut self,
        start: Point,
        end: Point,
        line: &LineStyleOverrides,
        arrow: &ArrowStyleOverrides,
    ) {
        self.draw_line(start, end, line);
        self.draw_arrowhead(end, start, line, arrow);
    }

    /// Two prongs at `tip`, pointing away from `from`.
    ///
    /// The prongs are the reversed unit direction rotated by ±`angle_degrees` and scaled by
    /// `length`. Degenerate directions draw nothing.
    pub fn draw_arrowhead(
        &mut self,
        tip: Point,
        from: Point,
        line: &LineStyleOverrides,
        arrow: &ArrowStyleOverrides,
    ) {
        let arrow = ArrowStyle::resolve(arrow);
        let d = tip - from;
        if d.x.abs() < ARROW_EPSILON && d.y.abs() < ARROW_EPSILON {
            return;
        }
        let dir = d / d.hypot();
        let (sin, cos) = arrow.angle_degrees.to_radians().sin_cos();

        // i: perpendicular to the shaft, j: backwards along it
        let i = Vec2::new(-dir.y, dir.x) * arrow.length;
        let j = -dir * arrow.length;

        self.draw_line(tip, tip + i * sin + j * cos, line);
        self.draw_line(tip, tip - i * sin + j * cos, line);
    }

    pub fn draw_ellipse(
        &mut self,
        center: Point,
        size: Size,
        line: Option<&LineStyleOverrides>,
        fill: Option<Color>,
        extras: &EllipseExtras,
    ) {
        let arc = EllipseArc {
            center,
            radii: Vec2::new(size.width.max(0.0) / 2.0, size.height.max(0.0) / 2.0),
            rotation: extras.rotation,
            start_angle: extras.start_angle,
            end_angle: extras.end_angle,
            counterclockwise: extras.counterclockwise,
        };
        let line = line.map(LineStyle::resolve);
        self.clipped(false, |ctx| {
            if let Some(fill) = fill {
                ctx.set_fill_paint(fill);
                ctx.begin_path();
                ctx.ellipse(&arc);
                ctx.fill();
            }
            if let Some(line) = &line {
                ctx.set_line_style(line);
                ctx.begin_path();
                ctx.ellipse(&arc);
                ctx.stroke();
            }
        });
    }

    pub fn draw_rect(
        &mut self,
        rect: Region,
        line: Option<&LineStyleOverrides>,
        fill: Option<Color>,
    ) {
        let line = line.map(LineStyle::resolve);
        self.clipped(false, |ctx| {
            if let Some(fill) = fill {
                ctx.set_fill_paint(fill);
                ctx.begin_path();
                ctx.rect(rect.to_rect());
                ctx.fill();
            }
            if let Some(line) = &line {
                ctx.set_line_style(line);
                ctx.begin_path();
                ctx.rect(rect.to_rect());
                ctx.stroke();
            }
        });
    }

    pub fn draw_text(
        &mut self,
        text: &str,
        at: Point,
        align: &TextAlignOverrides,
        style: &FontStyleOverrides,
    ) {
        let align = TextAlign::resolve(align);
        let style = FontStyle::resolve(style);
        self.draw_text_with(text, at, &align, &style);
    }

    /// [`Drawer::draw_text`] with already resolved styles.
    pub fn draw_text_with(&mut self, text: &str, at: Point, align: &TextAlign, style: &FontStyle) {
        self.clipped(false, |ctx| {
            apply_font_style(ctx, style);
            apply_text_align(ctx, align);
            if style.fill.is_some() {
                ctx.fill_text(text, at);
            }
            if style.line.is_some() {
                ctx.stroke_text(text, at);
            }
        });
    }

    /// Metrics under the same font and alignment state `draw_text` would use.
    pub fn measure_text(
        &mut self,
        text: &str,
        align: &TextAlignOverrides,
        style: &FontStyleOverrides,
    ) -> TextMetrics {
        let align = TextAlign::resolve(align);
        let style = FontStyle::resolve(style);
        self.measure_text_with(text, &align, &style)
    }

    pub fn measure_text_with(
        &mut self,
        text: &str,
        align: &TextAlign,
        style: &FontStyle,
    ) -> TextMetrics {
        self.clipped(false, |ctx| {
            apply_font_style(ctx, style);
            apply_text_align(ctx, align);
            ctx.measure_text(text)
        })
    }

    /// Paints the whole region, ignoring the local origin.
    pub fn fill(&mut self, paint: Color) {
        let size = self.region.size;
        self.clipped(true, |ctx| {
            ctx.set_fill_paint(paint);
            ctx.fill_rect(Rect::from_origin_size(Point::ORIGIN, size));
        });
    }

    /// Raw access to the context inside this drawer's clipped, translated frame.
    ///
    /// The closure must leave the save stack as it found it. Leftover saves are popped and
    /// reported.
    pub fn draw_freeform(&mut self, f: impl FnOnce(&mut dyn Context2D)) {
        self.clipped(false, |ctx| {
            let depth = ctx.save_depth();
            f(ctx);
            let after = ctx.save_depth();
            if after > depth {
                tracing::warn!(
                    leaked = after - depth,
                    "draw_freeform closure left saved states behind"
                );
                for _ in depth..after {
                    ctx.restore();
                }
            } else if after < depth {
                tracing::warn!(
                    missing = depth - after,
                    "draw_freeform closure restored states it did not save"
                );
            }
        });
    }
}

fn apply_font_style(ctx: &mut dyn Context2D, style: &FontStyle) {
    ctx.set_font(style);
    if let Some(fill) = style.fill {
        ctx.set_fill_paint(fill);
    }
    if let Some(line) = &style.line {
        ctx.set_line_style(line);
    }
}

fn apply_text_align(ctx: &mut dyn Context2D, align: &TextAlign) {
    ctx.set_text_align(align.align);
    ctx.set_text_baseline(align.baseline);
}

#[cfg(test)]
#[path = "../../tests/unit/gfx/drawer.rs"]
mod tests;
