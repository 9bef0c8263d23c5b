use crate::foundation::core::{Color, Point, Size};
use crate::gfx::drawer::Drawer;
use crate::gfx::styles::LineStyleOverrides;

/// Overlay markers for eyeballing geometry while developing a model.
pub struct DebugDraw;

impl DebugDraw {
    pub const COLOR: Color = Color::MAGENTA;

    /// Small `+` of half-size `radius` at `at`.
    pub fn point(drawer: &mut Drawer<'_>, at: Point, stroke: Color, radius: f64) {
        let style = LineStyleOverrides::default().with_stroke(stroke);
        drawer.draw_line(
            Point::new(at.x - radius, at.y),
            Point::new(at.x + radius, at.y),
            &style,
        );
        drawer.draw_line(
            Point::new(at.x, at.y - radius),
            Point::new(at.x, at.y + radius),
            &style,
        );
    }

    /// Outline of a `size` box centered on `center`, crossed by its diagonals.
    pub fn cross_box(drawer: &mut Drawer<'_>, center: Point, size: Size, stroke: Color) {
        let style = LineStyleOverrides::default().with_stroke(stroke);
        let (hw, hh) = (size.width / 2.0, size.height / 2.0);
        let tl = Point::new(center.x - hw, center.y - hh);
        let tr = Point::new(center.x + hw, center.y - hh);
        let br = Point::new(center.x + hw, center.y + hh);
        let bl = Point::new(center.x - hw, center.y + hh);
        drawer.draw_multi_line([tl, tr, br, bl, tl], &style);
        drawer.draw_line(tl, br, &style);
        drawer.draw_line(tr, bl, &style);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/gfx/debug_draw.rs"]
mod tests;
