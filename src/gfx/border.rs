//! Shapes drawn around a node's content.
//!
//! All geometry is relative to the content center. A drawer handed to [`Border::draw`] must
//! have its local origin at that center.

use std::f64::consts::SQRT_2;

use crate::foundation::core::{Color, Point, Size};
use crate::gfx::drawer::Drawer;
use crate::gfx::region::Region;
use crate::gfx::styles::{EllipseExtras, LineStyleOverrides};

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum Border {
    Ellipse(EllipseBorder),
    Rectangle(RectangleBorder),
}

impl Default for Border {
    fn default() -> Self {
        Self::Ellipse(EllipseBorder::default())
    }
}

impl Border {
    /// Footprint of the shape, centered on the content.
    pub fn bounds(&self, content: Size) -> Region {
        match self {
            Self::Ellipse(b) => b.bounds(content),
            Self::Rectangle(b) => b.bounds(content),
        }
    }

    /// Where a ray from the center at `angle` (radians, y down) leaves the outline.
    pub fn boundary_point(&self, content: Size, angle: f64) -> Point {
        match self {
            Self::Ellipse(b) => b.boundary_point(content, angle),
            Self::Rectangle(b) => b.boundary_point(content, angle),
        }
    }

    pub fn draw(&self, drawer: &mut Drawer<'_>, content: Size) {
        match self {
            Self::Ellipse(b) => b.draw(drawer, content),
            Self::Rectangle(b) => b.draw(drawer, content),
        }
    }
}

/// Ellipse through the corners of the content box.
#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct EllipseBorder {
    pub line: Option<LineStyleOverrides>,
    pub fill: Option<Color>,
}

impl Default for EllipseBorder {
    fn default() -> Self {
        Self {
            line: Some(LineStyleOverrides::default()),
            fill: None,
        }
    }
}

impl EllipseBorder {
    /// Extra room around the outline so antialiased edges are not clipped away.
    pub const MARGIN: f64 = 2.0;

    /// Scaling the content box by sqrt(2) makes the inscribed ellipse pass through its
    /// corners.
    pub fn semi_axes(&self, content: Size) -> Size {
        Size::new(
            SQRT_2 * content.width.max(0.0) / 2.0,
            SQRT_2 * content.height.max(0.0) / 2.0,
        )
    }

    pub fn bounds(&self, content: Size) -> Region {
        let s = self.semi_axes(content);
        let (a, b) = (s.width + Self::MARGIN, s.height + Self::MARGIN);
        Region::from_start_end(Point::new(-a, -b), Point::new(a, b))
    }

    pub fn boundary_point(&self, content: Size, angle: f64) -> Point {
        let s = self.semi_axes(content);
        let (sin, cos) = angle.sin_cos();
        let denom = (s.height * cos).hypot(s.width * sin);
        if denom == 0.0 {
            return Point::ORIGIN;
        }
        let r = s.width * s.height / denom;
        Point::new(r * cos, r * sin)
    }

    pub fn draw(&self, drawer: &mut Drawer<'_>, content: Size) {
        let s = self.semi_axes(content);
        drawer.draw_ellipse(
            Point::ORIGIN,
            Size::new(s.width * 2.0, s.height * 2.0),
            self.line.as_ref(),
            self.fill,
            &EllipseExtras::default(),
        );
    }
}

/// Box around the content with `padding` on every side.
#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct RectangleBorder {
    pub padding: f64,
    pub line: Option<LineStyleOverrides>,
    pub fill: Option<Color>,
}

impl Default for RectangleBorder {
    fn default() -> Self {
        Self {
            padding: 4.0,
            line: Some(LineStyleOverrides::default()),
            fill: None,
        }
    }
}

impl RectangleBorder {
    pub const MARGIN: f64 = 2.0;

    fn half_extent(&self, content: Size) -> Size {
        Size::new(
            content.width.max(0.0) / 2.0 + self.padding,
            content.height.max(0.0) / 2.0 + self.padding,
        )
    }

    pub fn bounds(&self, content: Size) -> Region {
        let h = self.half_extent(content);
        let (a, b) = (h.width + Self::MARGIN, h.height + Self::MARGIN);
        Region::from_start_end(Point::new(-a, -b), Point::new(a, b))
    }

    pub fn boundary_point(&self, content: Size, angle: f64) -> Point {
        let h = self.half_extent(content);
        let (sin, cos) = angle.sin_cos();
        let tx = if cos.abs() > f64::EPSILON { h.width / cos.abs() } else { f64::INFINITY };
        let ty = if sin.abs() > f64::EPSILON { h.height / sin.abs() } else { f64::INFINITY };
        let t = tx.min(ty);
        if !t.is_finite() {
            return Point::ORIGIN;
        }
        Point::new(t * cos, t * sin)
    }

    pub fn draw(&self, drawer: &mut Drawer<'_>, content: Size) {
        let h = self.half_extent(content);
        drawer.draw_rect(
            Region::new(-h.width, -h.height, h.width * 2.0, h.height * 2.0),
            self.line.as_ref(),
            self.fill,
        );
    }
}

#[cfg(test)]
#[path = "../../tests/unit/gfx/border.rs"]
mod tests;
