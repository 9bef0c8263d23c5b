use super::*;
use crate::gfx::region::Region;
use crate::render::recording::{DrawCommand, RecordingContext};

#[test]
fn point_marker_is_two_short_strokes() {
    let mut ctx = RecordingContext::new();
    let mut d = Drawer::new(&mut ctx, Region::new(0.0, 0.0, 100.0, 100.0));
    DebugDraw::point(&mut d, Point::new(10.0, 10.0), DebugDraw::COLOR, 3.0);

    let cmds = ctx.commands();
    assert_eq!(cmds.len(), 2);
    for cmd in cmds {
        let DrawCommand::Stroke { line, .. } = cmd else {
            panic!("expected a stroke, got {cmd:?}");
        };
        assert_eq!(line.stroke, Color::MAGENTA);
    }
    let h = cmds[0].bounds();
    assert_eq!((h.x0, h.x1, h.y0, h.y1), (7.0, 13.0, 10.0, 10.0));
    let v = cmds[1].bounds();
    assert_eq!((v.x0, v.x1, v.y0, v.y1), (10.0, 10.0, 7.0, 13.0));
}

#[test]
fn cross_box_outlines_and_crosses_the_box() {
    let mut ctx = RecordingContext::new();
    let mut d = Drawer::new(&mut ctx, Region::new(0.0, 0.0, 100.0, 100.0));
    DebugDraw::cross_box(&mut d, Point::new(50.0, 40.0), Size::new(20.0, 10.0), Color::RED);

    let cmds = ctx.commands();
    assert_eq!(cmds.len(), 3);
    let outline = cmds[0].bounds();
    assert_eq!((outline.x0, outline.y0, outline.x1, outline.y1), (40.0, 35.0, 60.0, 45.0));
    assert_eq!(cmds[1].bounds(), outline);
    assert_eq!(cmds[2].bounds(), outline);
}
