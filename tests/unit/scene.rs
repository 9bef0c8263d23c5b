use serde_json::json;

use super::*;
use crate::gfx::region::Region;

fn sample() -> Scene {
    Scene::from_json_value(json!({
        "width": 640,
        "height": 480,
        "models": {
            "src": { "kind": "code", "lines": ["if x then", "  y"], "arrow_line": 0,
                     "signs": [{ "id": "x", "line": 0, "text": "x=1" }] },
            "g": {
                "kind": "graph",
                "nodes": [
                    { "id": "a", "x": 80, "y": 60, "value": "A" },
                    { "id": "b", "x": 200, "y": 60, "value": "B", "border": { "shape": "rectangle" } }
                ],
                "edges": [{ "id": "ab", "from": "a", "to": "b" }]
            }
        },
        "layout": { "split": "vertical", "ratio": 0.3, "left": "src", "right": "g" },
        "steps": [
            { "delay_ms": 500, "actions": [{ "op": "set_arrow_line", "model": "src", "line": 1 }] },
            { "actions": [
                { "op": "set_bidirectional", "model": "g", "edge": "ab", "bidirectional": true },
                { "op": "destroy_sign", "model": "src", "sign": "x" }
            ] }
        ]
    }))
    .unwrap()
}

#[test]
fn scenes_build_models_and_layout() {
    let scene = sample();
    let (alg, handles) = scene.build(AlgonimOpts::default()).unwrap();

    let src = handles.model("src").unwrap();
    let g = handles.model("g").unwrap();
    assert_eq!(
        alg.pane_regions(scene.width, scene.height),
        vec![
            (Some(src), Region::new(0.0, 0.0, 192.0, 480.0)),
            (Some(g), Region::new(192.0, 0.0, 448.0, 480.0)),
        ]
    );

    let code = alg.code(src).unwrap();
    assert_eq!(code.arrow_line(), Some(0));
    assert_eq!(code.sign_text(handles.sign(src, "x").unwrap()).unwrap(), "x=1");

    let graph = alg.graph(g).unwrap();
    let b = handles.graph_node(g, "b").unwrap();
    assert!(matches!(graph.node(b).unwrap().border, Some(Border::Rectangle(_))));
    let ab = handles.edge(g, "ab").unwrap();
    assert_eq!(graph.edge(ab).unwrap().destination(), b);
}

#[test]
fn scene_size_and_background_override_the_opts() {
    let scene = Scene::from_json_str(
        r##"{ "width": 320, "height": 200, "background": "#000000",
             "models": { "c": { "kind": "code" } }, "layout": "c" }"##,
    )
    .unwrap();
    let (alg, _) = scene.build(AlgonimOpts::default()).unwrap();
    assert_eq!((alg.opts().width, alg.opts().height), (320, 200));
    assert_eq!(alg.opts().background, Color::BLACK);
}

#[test]
fn playback_applies_steps_in_order() {
    let scene = sample();
    let (mut alg, handles) = scene.build(AlgonimOpts::default()).unwrap();
    let (src, g) = (handles.model("src").unwrap(), handles.model("g").unwrap());
    let ab = handles.edge(g, "ab").unwrap();
    let mut playback = scene.playback(handles);

    assert_eq!(playback.next_step(&mut alg).unwrap(), Some(Duration::from_millis(500)));
    assert_eq!(alg.code(src).unwrap().arrow_line(), Some(1));

    assert_eq!(
        playback.next_step(&mut alg).unwrap(),
        Some(alg.opts().keyframe_delay)
    );
    assert!(alg.graph(g).unwrap().edge(ab).unwrap().bidirectional());
    assert!(alg.code(src).unwrap().lines()[0].signs().is_empty());

    assert_eq!(playback.next_step(&mut alg).unwrap(), None);
}

#[test]
fn trees_keep_null_children_as_empty_slots() {
    let scene = Scene::from_json_value(json!({
        "models": {
            "t": { "kind": "tree", "level_height": 40,
                   "root": { "id": "r", "value": "8",
                             "children": [null, { "id": "k", "value": "9" }] } }
        },
        "layout": { "model": "t" }
    }))
    .unwrap();
    let (mut alg, mut handles) = scene.build(AlgonimOpts::default()).unwrap();
    let t = handles.model("t").unwrap();
    let (r, k) = (handles.tree_node(t, "r").unwrap(), handles.tree_node(t, "k").unwrap());

    let tree = alg.tree(t).unwrap();
    assert_eq!(tree.level_height, 40.0);
    assert_eq!(tree.children(r).unwrap(), &[None, Some(k)]);

    let delete: Action = serde_json::from_value(json!({
        "op": "delete_tree_node", "model": "t", "node": "k", "keep_slot": true
    }))
    .unwrap();
    delete.apply(&mut alg, &mut handles).unwrap();
    assert_eq!(alg.tree(t).unwrap().children(r).unwrap(), &[None, None]);

    let rename: Action = serde_json::from_value(json!({
        "op": "set_tree_value", "model": "t", "node": "k", "value": "x"
    }))
    .unwrap();
    assert!(matches!(
        rename.apply(&mut alg, &mut handles),
        Err(AlgonimError::InvalidHandle(_))
    ));
}

#[test]
fn replacing_lines_forgets_their_sign_names() {
    let scene = sample();
    let (mut alg, mut handles) = scene.build(AlgonimOpts::default()).unwrap();
    let set_lines: Action =
        serde_json::from_value(json!({ "op": "set_lines", "model": "src", "lines": ["z"] })).unwrap();
    set_lines.apply(&mut alg, &mut handles).unwrap();

    let destroy: Action =
        serde_json::from_value(json!({ "op": "destroy_sign", "model": "src", "sign": "x" })).unwrap();
    let err = destroy.apply(&mut alg, &mut handles).unwrap_err();
    assert!(err.to_string().contains("unknown sign 'x'"));
}

#[test]
fn graph_actions_resolve_node_names() {
    let scene = sample();
    let (mut alg, mut handles) = scene.build(AlgonimOpts::default()).unwrap();
    let g = handles.model("g").unwrap();
    let actions: Vec<Action> = serde_json::from_value(json!([
        { "op": "add_edge", "model": "g", "from": "b", "to": "a", "id": "ba" },
        { "op": "move_node", "model": "g", "node": "a", "x": 10, "y": 20 },
        { "op": "set_node_value", "model": "g", "node": "a", "value": "A'" },
        { "op": "remove_edge", "model": "g", "edge": "ab" }
    ]))
    .unwrap();
    for action in &actions {
        action.apply(&mut alg, &mut handles).unwrap();
    }

    let graph = alg.graph(g).unwrap();
    let a = handles.graph_node(g, "a").unwrap();
    let node = graph.node(a).unwrap();
    assert_eq!(node.position, Point::new(10.0, 20.0));
    assert_eq!(node.value, "A'");
    assert_eq!(node.incoming(), &[handles.edge(g, "ba").unwrap()]);
    assert!(node.outgoing().is_empty());
    assert!(graph.consistency_report().is_empty());
}

#[test]
fn malformed_scenes_are_rejected() {
    assert!(matches!(
        Scene::from_json_str(r#"{ "models": {}, "layout": "x", "colour": 1 }"#),
        Err(AlgonimError::Serde(_))
    ));
    assert!(Scene::from_json_str(r#"{ "models": { "p": { "kind": "pie" } }, "layout": "p" }"#).is_err());

    let unknown = Scene::from_json_value(json!({
        "models": { "c": { "kind": "code" } },
        "layout": { "split": "vertical", "left": "c", "right": "nope" }
    }))
    .unwrap();
    assert!(matches!(
        unknown.build(AlgonimOpts::default()),
        Err(AlgonimError::Layout(_))
    ));

    let duplicate = Scene::from_json_value(json!({
        "models": { "g": { "kind": "graph", "nodes": [
            { "id": "a", "x": 0, "y": 0 }, { "id": "a", "x": 1, "y": 1 }
        ] } },
        "layout": "g"
    }))
    .unwrap();
    let err = duplicate.build(AlgonimOpts::default()).unwrap_err();
    assert!(err.to_string().contains("duplicate graph node id 'a'"));

    let dangling = Scene::from_json_value(json!({
        "models": { "g": { "kind": "graph", "nodes": [{ "id": "a", "x": 0, "y": 0 }],
                           "edges": [{ "from": "a", "to": "zz" }] } },
        "layout": "g"
    }))
    .unwrap();
    let err = dangling.build(AlgonimOpts::default()).unwrap_err();
    assert!(err.to_string().contains("unknown graph node 'zz'"));
}
