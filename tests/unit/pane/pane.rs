use kurbo::PathEl;
use tracing_test::traced_test;

use super::*;
use crate::models::Code;
use crate::render::recording::{DrawCommand, RecordingContext};

fn store_with(n: usize) -> (ModelStore, Vec<ModelId>) {
    let mut store = ModelStore::new();
    let ids = (0..n)
        .map(|i| store.insert(Code::with_lines([format!("m{i}")]).into()))
        .collect();
    (store, ids)
}

fn full() -> Region {
    Region::new(0.0, 0.0, 640.0, 480.0)
}

#[test]
fn horizontal_splits_stack_and_vertical_splits_sit_side_by_side() {
    let h = SplitPane::new(Axis::Horizontal).with_ratio(0.3);
    assert_eq!(
        h.child_regions(full()),
        (Region::new(0.0, 0.0, 640.0, 144.0), Region::new(0.0, 144.0, 640.0, 336.0))
    );

    let v = SplitPane::new(Axis::Vertical).with_ratio(0.3);
    assert_eq!(
        v.child_regions(full()),
        (Region::new(0.0, 0.0, 192.0, 480.0), Region::new(192.0, 0.0, 448.0, 480.0))
    );
}

#[test]
fn model_regions_are_listed_in_draw_order() {
    let (_, ids) = store_with(3);
    let pane = Pane::Split(
        SplitPane::new(Axis::Vertical)
            .with_first(Pane::Model(ModelPane::new(ids[0])))
            .with_second(Pane::Split(
                SplitPane::new(Axis::Horizontal)
                    .with_first(Pane::Model(ModelPane::new(ids[1])))
                    .with_second(Pane::Model(ModelPane::new(ids[2]))),
            )),
    );

    assert_eq!(
        pane.model_regions(full()),
        vec![
            (Some(ids[0]), Region::new(0.0, 0.0, 320.0, 480.0)),
            (Some(ids[1]), Region::new(320.0, 0.0, 320.0, 240.0)),
            (Some(ids[2]), Region::new(320.0, 240.0, 320.0, 240.0)),
        ]
    );
}

#[test]
fn split_draws_children_clipped_then_the_divider() {
    let (store, ids) = store_with(2);
    let pane = Pane::Split(
        SplitPane::new(Axis::Vertical)
            .with_ratio(0.3)
            .with_first(Pane::Model(ModelPane::new(ids[0])))
            .with_second(Pane::Model(ModelPane::new(ids[1]))),
    );

    let mut ctx = RecordingContext::new();
    pane.draw(&mut Drawer::new(&mut ctx, full()), &store);
    let cmds = ctx.commands();
    assert_eq!(cmds.len(), 3);

    let left = cmds[0].text().expect("left model text");
    assert_eq!((left.text.as_str(), left.anchor), ("m0", Point::new(16.0, 0.0)));
    assert_eq!(cmds[0].clip(), Some(kurbo::Rect::new(0.0, 0.0, 192.0, 480.0)));

    let right = cmds[1].text().expect("right model text");
    assert_eq!(right.anchor, Point::new(208.0, 0.0));
    assert_eq!(cmds[1].clip(), Some(kurbo::Rect::new(192.0, 0.0, 640.0, 480.0)));

    let DrawCommand::Stroke { path, line, .. } = &cmds[2] else {
        panic!("expected the divider stroke, got {:?}", cmds[2]);
    };
    assert_eq!(
        path.elements(),
        &[
            PathEl::MoveTo(Point::new(192.5, 0.0)),
            PathEl::LineTo(Point::new(192.5, 480.0))
        ]
    );
    assert_eq!(line.line_width, 1.0);
}

#[test]
fn empty_halves_render_nothing() {
    let (store, _) = store_with(0);
    let pane = Pane::Split(SplitPane::new(Axis::Horizontal));
    let mut ctx = RecordingContext::new();
    pane.draw(&mut Drawer::new(&mut ctx, full()), &store);

    let cmds = ctx.commands();
    assert_eq!(cmds.len(), 1);
    assert_eq!(cmds[0].bounds(), kurbo::Rect::new(0.0, 240.5, 640.0, 240.5));

    let empty = Pane::Model(ModelPane::default());
    empty.draw(&mut Drawer::new(&mut ctx, full()), &store);
    assert_eq!(ctx.commands().len(), 1);
}

#[test]
#[traced_test]
fn missing_models_are_skipped_with_a_warning() {
    let (_, ids) = store_with(1);
    let pane = Pane::Model(ModelPane::new(ids[0]));

    let mut ctx = RecordingContext::new();
    pane.draw(&mut Drawer::new(&mut ctx, full()), &ModelStore::new());
    assert!(ctx.commands().is_empty());
    assert!(logs_contain("model pane refers to a missing model"));
}

#[test]
fn axes_serialize_lowercase() {
    assert_eq!(serde_json::to_string(&Axis::Vertical).unwrap(), "\"vertical\"");
    assert_eq!(
        serde_json::from_str::<Axis>("\"horizontal\"").unwrap(),
        Axis::Horizontal
    );
}
