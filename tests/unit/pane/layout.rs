use serde_json::json;

use super::*;
use crate::models::{Code, ModelStore};

fn ids(n: usize) -> Vec<ModelId> {
    let mut store = ModelStore::new();
    (0..n).map(|_| store.insert(Code::new().into())).collect()
}

/// `n` horizontal splits, each nested in the previous one's top half.
fn nested(n: usize, leaf: Option<Layout>) -> Layout {
    let mut layout = leaf;
    for _ in 0..n {
        layout = Some(Layout::horizontal(None, layout, None));
    }
    layout.expect("at least one node")
}

#[test]
fn depth_limit_counts_description_nodes() {
    assert!(layout_to_pane(&nested(50, None), 50).is_ok());
    assert!(matches!(
        layout_to_pane(&nested(51, None), 50),
        Err(AlgonimError::DepthLimit { limit: 50 })
    ));

    let leaf = Layout::Model(ids(1)[0]);
    assert!(layout_to_pane(&nested(49, Some(leaf.clone())), 50).is_ok());
    assert!(layout_to_pane(&nested(50, Some(leaf)), 50).is_err());
}

#[test]
fn zero_budget_rejects_even_a_leaf() {
    let leaf = Layout::Model(ids(1)[0]);
    assert!(matches!(
        layout_to_pane(&leaf, 0),
        Err(AlgonimError::DepthLimit { limit: 0 })
    ));
}

#[test]
fn splits_map_onto_panes() {
    let m = ids(2);
    let layout = Layout::vertical(Some(0.3), Some(m[0].into()), Some(m[1].into()));
    let pane = layout_to_pane(&layout, 50).unwrap();

    let Pane::Split(split) = pane else {
        panic!("expected a split pane");
    };
    assert_eq!(split.axis, Axis::Vertical);
    assert_eq!(split.ratio, 0.3);
    assert_eq!(split.first.as_deref(), Some(&Pane::Model(ModelPane::new(m[0]))));
    assert_eq!(split.second.as_deref(), Some(&Pane::Model(ModelPane::new(m[1]))));
}

#[test]
fn missing_ratio_defaults_to_half() {
    let pane = layout_to_pane(&Layout::horizontal(None, None, None), 50).unwrap();
    match pane {
        Pane::Split(s) => {
            assert_eq!(s.ratio, SplitPane::DEFAULT_RATIO);
            assert!(s.first.is_none() && s.second.is_none());
        }
        other => panic!("expected a split pane, got {other:?}"),
    }
}

#[test]
fn ratios_outside_the_unit_interval_are_rejected() {
    for ratio in [-0.1, 1.5, f64::NAN] {
        assert!(matches!(
            layout_to_pane(&Layout::vertical(Some(ratio), None, None), 50),
            Err(AlgonimError::Layout(_))
        ));
    }
    assert!(layout_to_pane(&Layout::vertical(Some(1.0), None, None), 50).is_ok());
}

#[test]
fn model_ids_are_collected_in_order() {
    let m = ids(3);
    let layout = Layout::horizontal(
        None,
        Some(Layout::vertical(None, Some(m[0].into()), Some(m[1].into()))),
        Some(m[2].into()),
    );
    assert_eq!(layout.model_ids(), m);
}

#[test]
fn json_descriptions_resolve_model_names() {
    let m = ids(2);
    let resolve = |name: &str| match name {
        "code" => Some(m[0]),
        "graph" => Some(m[1]),
        _ => None,
    };

    let layout = Layout::from_json(
        &json!({
            "split": "vertical",
            "ratio": 0.25,
            "left": "code",
            "right": {"model": "graph"}
        }),
        &resolve,
    )
    .unwrap();
    assert_eq!(layout, Layout::vertical(Some(0.25), Some(m[0].into()), Some(m[1].into())));

    let layout = Layout::from_json(&json!({"split": "horizontal", "bottom": null}), &resolve).unwrap();
    assert_eq!(layout, Layout::horizontal(None, None, None));
}

#[test]
fn malformed_json_descriptions_fail() {
    let resolve = |_: &str| -> Option<ModelId> { None };
    let err = |v: serde_json::Value| Layout::from_json(&v, &resolve).unwrap_err().to_string();

    assert!(err(json!("nope")).contains("unknown model 'nope'"));
    assert!(err(json!({"split": "diagonal"})).contains("unsupported split axis 'diagonal'"));
    assert!(err(json!({"ratio": 0.5})).contains("\"split\""));
    assert!(err(json!({"split": "vertical", "ratio": "half"})).contains("must be a number"));
    assert!(err(json!({"model": 3})).contains("must be a string"));
    assert!(err(json!(42)).contains("expected a model name"));
}
