use crate::foundation::core::Point;
use crate::gfx::drawer::Drawer;
use crate::gfx::region::Region;
use crate::gfx::styles::LineStyleOverrides;
use crate::models::{ModelId, ModelStore};

/// Direction a split divides in: `Horizontal` stacks top/bottom, `Vertical` sits
/// left/right.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Horizontal,
    Vertical,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Pane {
    Model(ModelPane),
    Split(SplitPane),
}

impl Pane {
    pub fn draw(&self, drawer: &mut Drawer<'_>, models: &ModelStore) {
        match self {
            Self::Model(p) => p.draw(drawer, models),
            Self::Split(p) => p.draw(drawer, models),
        }
    }

    /// Absolute regions of the model panes below this pane, in draw order.
    pub fn model_regions(&self, region: Region) -> Vec<(Option<ModelId>, Region)> {
        let mut out = Vec::new();
        let mut stack = vec![(self, region)];
        while let Some((pane, region)) = stack.pop() {
            match pane {
                Self::Model(p) => out.push((p.model, region)),
                Self::Split(p) => {
                    let (first, second) = p.child_regions(region);
                    if let Some(s) = &p.second {
                        stack.push((s, second));
                    }
                    if let Some(f) = &p.first {
                        stack.push((f, first));
                    }
                }
            }
        }
        out
    }
}

/// Leaf pane showing one model, or nothing.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ModelPane {
    pub model: Option<ModelId>,
}

impl ModelPane {
    pub fn new(model: ModelId) -> Self {
        Self { model: Some(model) }
    }

    pub fn draw(&self, drawer: &mut Drawer<'_>, models: &ModelStore) {
        let Some(id) = self.model else { return };
        match models.get(id) {
            Ok(model) => model.draw(drawer),
            Err(err) => tracing::warn!(%err, "model pane refers to a missing model"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SplitPane {
    pub axis: Axis,
    /// Share of the pane given to `first`, in `[0, 1]`.
    pub ratio: f64,
    pub first: Option<Box<Pane>>,
    pub second: Option<Box<Pane>>,
    pub divider: LineStyleOverrides,
}

impl SplitPane {
    pub const DEFAULT_RATIO: f64 = 0.5;

    pub fn new(axis: Axis) -> Self {
        Self {
            axis,
            ratio: Self::DEFAULT_RATIO,
            first: None,
            second: None,
            divider: LineStyleOverrides::default(),
        }
    }

    pub fn with_ratio(mut self, ratio: f64) -> Self {
        self.ratio = ratio;
        self
    }

    pub fn with_first(mut self, pane: Pane) -> Self {
        self.first = Some(Box::new(pane));
        self
    }

    pub fn with_second(mut self, pane: Pane) -> Self {
        self.second = Some(Box::new(pane));
        self
    }

    /// `(first, second)` parts of `region`.
    pub fn child_regions(&self, region: Region) -> (Region, Region) {
        match self.axis {
            Axis::Horizontal => (region.hsplit(0.0, self.ratio), region.hsplit(self.ratio, 1.0)),
            Axis::Vertical => (region.vsplit(0.0, self.ratio), region.vsplit(self.ratio, 1.0)),
        }
    }

    pub fn draw(&self, drawer: &mut Drawer<'_>, models: &ModelStore) {
        let local = drawer.local_region();
        let (first, second) = self.child_regions(local);

        if let Some(pane) = &self.first {
            pane.draw(&mut drawer.subregion(first), models);
        }
        if let Some(pane) = &self.second {
            pane.draw(&mut drawer.subregion(second), models);
        }

        // Centered on a pixel row/column so a 1px line covers exactly one.
        let size = local.size;
        let (start, end) = match self.axis {
            Axis::Horizontal => {
                let y = (size.height * self.ratio).round() + 0.5;
                (Point::new(0.0, y), Point::new(size.width, y))
            }
            Axis::Vertical => {
                let x = (size.width * self.ratio).round() + 0.5;
                (Point::new(x, 0.0), Point::new(x, size.height))
            }
        };
        drawer.draw_line(start, end, &self.divider);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pane/pane.rs"]
mod tests;
