use crate::foundation::core::{Point, Rect, Size};

/// Axis-aligned rectangle in surface coordinates.
///
/// All operations are pure. Sizes stay non-negative after clipping and splitting, degenerate
/// (zero-area) regions stand for empty areas.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Region {
    pub origin: Point,
    pub size: Size,
}

impl Region {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    pub const fn from_origin_size(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }

    /// Region starting at `start`; the larger of `start`/`end` on each axis is the end.
    pub fn from_start_end(start: Point, end: Point) -> Self {
        Self::new(
            start.x,
            start.y,
            start.x.max(end.x) - start.x,
            start.y.max(end.y) - start.y,
        )
    }

    pub fn x(&self) -> f64 {
        self.origin.x
    }

    pub fn y(&self) -> f64 {
        self.origin.y
    }

    pub fn width(&self) -> f64 {
        self.size.width
    }

    pub fn height(&self) -> f64 {
        self.size.height
    }

    /// Bottom-right corner.
    pub fn end(&self) -> Point {
        Point::new(
            self.origin.x + self.size.width,
            self.origin.y + self.size.height,
        )
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.origin.x + self.size.width / 2.0,
            self.origin.y + self.size.height / 2.0,
        )
    }

    pub fn is_empty(&self) -> bool {
        self.size.width <= 0.0 || self.size.height <= 0.0
    }

    pub fn to_rect(&self) -> Rect {
        Rect::from_origin_size(self.origin, self.size)
    }

    /// Interpret `sub` relative to this region's origin and clip it to this region.
    pub fn subregion(&self, sub: Region) -> Region {
        sub.offset(self.origin.x, self.origin.y).clipped_by(*self)
    }

    /// Top/bottom partition by fraction of height.
    ///
    /// The start boundary rounds down and the end boundary rounds up so adjacent splits
    /// never leave a pixel gap between them.
    pub fn hsplit(&self, start_frac: f64, end_frac: f64) -> Region {
        let (start_frac, end_frac) = clamp_fractions(start_frac, end_frac);
        Self::from_start_end(
            Point::new(
                self.origin.x,
                self.origin.y + (start_frac * self.size.height).floor(),
            ),
            Point::new(
                self.origin.x + self.size.width,
                self.origin.y + (end_frac * self.size.height).ceil(),
            ),
        )
    }

    /// Left/right partition by fraction of width. Rounds like [`Region::hsplit`].
    pub fn vsplit(&self, start_frac: f64, end_frac: f64) -> Region {
        let (start_frac, end_frac) = clamp_fractions(start_frac, end_frac);
        Self::from_start_end(
            Point::new(
                self.origin.x + (start_frac * self.size.width).floor(),
                self.origin.y,
            ),
            Point::new(
                self.origin.x + (end_frac * self.size.width).ceil(),
                self.origin.y + self.size.height,
            ),
        )
    }

    /// Intersection of both regions.
    pub fn clipped_by(&self, clip: Region) -> Region {
        let start = Point::new(self.origin.x.max(clip.origin.x), self.origin.y.max(clip.origin.y));
        let (a, b) = (self.end(), clip.end());
        let end = Point::new(a.x.min(b.x), a.y.min(b.y));
        Self::from_start_end(start, end)
    }

    /// Smallest region containing both.
    pub fn union(&self, other: Region) -> Region {
        let start = Point::new(self.origin.x.min(other.origin.x), self.origin.y.min(other.origin.y));
        let (a, b) = (self.end(), other.end());
        Self::from_start_end(start, Point::new(a.x.max(b.x), a.y.max(b.y)))
    }

    pub fn contains_region(&self, other: Region) -> bool {
        let (a, b) = (self.end(), other.end());
        self.origin.x <= other.origin.x
            && self.origin.y <= other.origin.y
            && b.x <= a.x
            && b.y <= a.y
    }

    pub fn offset(&self, dx: f64, dy: f64) -> Region {
        Self::new(
            self.origin.x + dx,
            self.origin.y + dy,
            self.size.width,
            self.size.height,
        )
    }
}

fn clamp_fractions(start: f64, end: f64) -> (f64, f64) {
    let end = if end.is_nan() { 0.0 } else { end.clamp(0.0, 1.0) };
    let start = if start.is_nan() { 0.0 } else { start.clamp(0.0, end) };
    (start, end)
}

#[cfg(test)]
#[path = "../../tests/unit/gfx/region.rs"]
mod tests;
