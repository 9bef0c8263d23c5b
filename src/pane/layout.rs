//! Declarative layout descriptions and their conversion into pane trees.

use serde_json::Value;

use crate::foundation::error::{AlgonimError, AlgonimResult};
use crate::models::ModelId;
use crate::pane::pane::{Axis, ModelPane, Pane, SplitPane};

/// A layout description: a model leaf or a split with optional halves.
#[derive(Clone, Debug, PartialEq)]
pub enum Layout {
    Model(ModelId),
    Horizontal {
        ratio: Option<f64>,
        top: Option<Box<Layout>>,
        bottom: Option<Box<Layout>>,
    },
    Vertical {
        ratio: Option<f64>,
        left: Option<Box<Layout>>,
        right: Option<Box<Layout>>,
    },
}

impl From<ModelId> for Layout {
    fn from(id: ModelId) -> Self {
        Self::Model(id)
    }
}

impl Layout {
    pub fn horizontal(ratio: Option<f64>, top: Option<Layout>, bottom: Option<Layout>) -> Self {
        Self::Horizontal {
            ratio,
            top: top.map(Box::new),
            bottom: bottom.map(Box::new),
        }
    }

    pub fn vertical(ratio: Option<f64>, left: Option<Layout>, right: Option<Layout>) -> Self {
        Self::Vertical {
            ratio,
            left: left.map(Box::new),
            right: right.map(Box::new),
        }
    }

    /// Model ids referenced anywhere in the description.
    pub fn model_ids(&self) -> Vec<ModelId> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(layout) = stack.pop() {
            match layout {
                Self::Model(id) => out.push(*id),
                Self::Horizontal { top: a, bottom: b, .. }
                | Self::Vertical { left: a, right: b, .. } => {
                    stack.extend(b.as_deref());
                    stack.extend(a.as_deref());
                }
            }
        }
        out
    }

    /// Parses the JSON form.
    ///
    /// A leaf is a model name (`"main"` or `{"model": "main"}`) looked up with `resolve`.
    /// Splits are `{"split": "horizontal", "ratio"?, "top"?, "bottom"?}` and
    /// `{"split": "vertical", "ratio"?, "left"?, "right"?}`; `null` halves are empty.
    pub fn from_json(
        value: &Value,
        resolve: &dyn Fn(&str) -> Option<ModelId>,
    ) -> AlgonimResult<Self> {
        let lookup = |name: &str| {
            resolve(name)
                .map(Layout::Model)
                .ok_or_else(|| AlgonimError::layout(format!("layout references unknown model '{name}'")))
        };

        let obj = match value {
            Value::String(name) => return lookup(name),
            Value::Object(obj) => obj,
            other => {
                return Err(AlgonimError::layout(format!(
                    "expected a model name or a split object, got {other}"
                )));
            }
        };

        if let Some(model) = obj.get("model") {
            return match model {
                Value::String(name) => lookup(name),
                other => Err(AlgonimError::layout(format!("model name must be a string, got {other}"))),
            };
        }

        let ratio = match obj.get("ratio") {
            None | Some(Value::Null) => None,
            Some(v) => Some(v.as_f64().ok_or_else(|| {
                AlgonimError::layout(format!("split ratio must be a number, got {v}"))
            })?),
        };
        let child = |key: &str| -> AlgonimResult<Option<Box<Layout>>> {
            match obj.get(key) {
                None | Some(Value::Null) => Ok(None),
                Some(v) => Ok(Some(Box::new(Layout::from_json(v, resolve)?))),
            }
        };

        match obj.get("split").and_then(Value::as_str) {
            Some("horizontal") => Ok(Self::Horizontal {
                ratio,
                top: child("top")?,
                bottom: child("bottom")?,
            }),
            Some("vertical") => Ok(Self::Vertical {
                ratio,
                left: child("left")?,
                right: child("right")?,
            }),
            Some(other) => Err(AlgonimError::layout(format!("unsupported split axis '{other}'"))),
            None => Err(AlgonimError::layout(
                "layout object needs either a \"model\" or a \"split\" key",
            )),
        }
    }
}

/// Builds the pane tree for `layout`.
///
/// Every description node uses one unit of `depth_limit`; reaching a node with no budget
/// left fails with [`AlgonimError::DepthLimit`].
#[tracing::instrument(level = "debug", skip(layout))]
pub fn layout_to_pane(layout: &Layout, depth_limit: usize) -> AlgonimResult<Pane> {
    build(layout, depth_limit, depth_limit)
}

fn build(layout: &Layout, budget: usize, limit: usize) -> AlgonimResult<Pane> {
    if budget == 0 {
        return Err(AlgonimError::DepthLimit { limit });
    }

    let (axis, ratio, first, second) = match layout {
        Layout::Model(id) => return Ok(Pane::Model(ModelPane::new(*id))),
        Layout::Horizontal { ratio, top, bottom } => (Axis::Horizontal, *ratio, top, bottom),
        Layout::Vertical { ratio, left, right } => (Axis::Vertical, *ratio, left, right),
    };

    let ratio = ratio.unwrap_or(SplitPane::DEFAULT_RATIO);
    // Out-of-range and NaN ratios are a layout error; they are not clamped.
    if !(0.0..=1.0).contains(&ratio) {
        return Err(AlgonimError::layout(format!("split ratio {ratio} is outside [0, 1]")));
    }

    let child = |l: &Option<Box<Layout>>| -> AlgonimResult<Option<Box<Pane>>> {
        l.as_deref()
            .map(|l| build(l, budget - 1, limit).map(Box::new))
            .transpose()
    };

    Ok(Pane::Split(SplitPane {
        axis,
        ratio,
        first: child(first)?,
        second: child(second)?,
        ..SplitPane::new(axis)
    }))
}

#[cfg(test)]
#[path = "../../tests/unit/pane/layout.rs"]
mod tests;
