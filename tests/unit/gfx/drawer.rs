use super::*;
use crate::gfx::styles::{FontStyleOverrides, TextAlignOverrides};
use crate::render::recording::{DrawCommand, RecordingContext};
use kurbo::{PathEl, Shape};

fn path_points(cmd: &DrawCommand) -> Vec<Point> {
    cmd.path()
        .map(|p| {
            p.elements()
                .iter()
                .filter_map(|el| match el {
                    PathEl::MoveTo(p) | PathEl::LineTo(p) => Some(*p),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default()
}

fn approx(a: Point, b: Point) -> bool {
    (a.x - b.x).abs() < 1e-6 && (a.y - b.y).abs() < 1e-6
}

#[test]
fn line_is_offset_and_clipped_to_the_region() {
    let mut ctx = RecordingContext::new();
    let mut d = Drawer::new(&mut ctx, Region::new(10.0, 20.0, 100.0, 50.0));
    d.draw_line(Point::new(0.0, 0.0), Point::new(5.0, 5.0), &LineStyleOverrides::default());

    let cmds = ctx.commands();
    assert_eq!(cmds.len(), 1);
    assert_eq!(cmds[0].clip(), Some(Rect::new(10.0, 20.0, 110.0, 70.0)));
    assert_eq!(
        path_points(&cmds[0]),
        vec![Point::new(10.0, 20.0), Point::new(15.0, 25.0)]
    );
    assert_eq!(ctx.save_depth(), 0);
}

#[test]
fn local_region_has_zero_origin() {
    let mut ctx = RecordingContext::new();
    let d = Drawer::new(&mut ctx, Region::new(30.0, 40.0, 50.0, 60.0));
    assert_eq!(d.local_region(), Region::new(0.0, 0.0, 50.0, 60.0));
}

#[test]
fn subregions_clip_cumulatively() {
    let mut ctx = RecordingContext::new();
    let mut root = Drawer::new(&mut ctx, Region::new(50.0, 50.0, 100.0, 100.0));
    let mut child = root.subregion(Region::new(10.0, 10.0, 20.0, 20.0));
    assert_eq!(child.region(), Region::new(60.0, 60.0, 20.0, 20.0));

    let mut grandchild = child.subregion(Region::new(15.0, 15.0, 20.0, 20.0));
    assert_eq!(grandchild.region(), Region::new(75.0, 75.0, 5.0, 5.0));

    grandchild.fill(Color::RED);
    let cmd = &ctx.commands()[0];
    assert_eq!(cmd.clip(), Some(Rect::new(75.0, 75.0, 80.0, 80.0)));
}

#[test]
fn subregion_clipped_at_top_left_keeps_requested_coordinates() {
    let mut ctx = RecordingContext::new();
    let mut root = Drawer::new(&mut ctx, Region::new(0.0, 0.0, 100.0, 100.0));
    let mut child = root.subregion(Region::new(-10.0, 20.0, 30.0, 30.0));
    assert_eq!(child.region(), Region::new(0.0, 20.0, 20.0, 30.0));
    assert_eq!(child.origin(), Point::new(-10.0, 0.0));

    // Local (10, 0) is 10px right of the requested, partly invisible, left edge.
    child.draw_line(Point::new(10.0, 0.0), Point::new(10.0, 5.0), &LineStyleOverrides::default());
    let pts = path_points(&ctx.commands()[0]);
    assert_eq!(pts[0], Point::new(0.0, 20.0));
}

#[test]
fn translated_origin_shifts_drawing_but_not_the_clip() {
    let mut ctx = RecordingContext::new();
    let mut root = Drawer::new(&mut ctx, Region::new(10.0, 10.0, 50.0, 50.0));
    let mut shifted = root.with_translated_origin(Vec2::new(25.0, 25.0));
    assert_eq!(shifted.region(), Region::new(10.0, 10.0, 50.0, 50.0));
    shifted.draw_line(Point::ORIGIN, Point::new(1.0, 0.0), &LineStyleOverrides::default());

    let cmd = &ctx.commands()[0];
    assert_eq!(path_points(cmd)[0], Point::new(35.0, 35.0));
    assert_eq!(cmd.clip(), Some(Rect::new(10.0, 10.0, 60.0, 60.0)));
}

#[test]
fn fill_covers_the_region_regardless_of_origin() {
    let mut ctx = RecordingContext::new();
    let mut d = Drawer::with_origin(&mut ctx, Region::new(5.0, 5.0, 20.0, 10.0), Point::new(7.0, 7.0));
    d.fill(Color::WHITE);

    match &ctx.commands()[0] {
        DrawCommand::Fill { path, paint, .. } => {
            assert_eq!(*paint, Color::WHITE);
            assert_eq!(path.bounding_box(), Rect::new(5.0, 5.0, 25.0, 15.0));
        }
        other => panic!("expected a fill, got {other:?}"),
    }
}

#[test]
fn arrow_prongs_are_rotated_back_from_the_tip() {
    let mut ctx = RecordingContext::new();
    let mut d = Drawer::new(&mut ctx, Region::new(0.0, 0.0, 100.0, 100.0));
    d.draw_arrow(
        Point::new(0.0, 0.0),
        Point::new(10.0, 0.0),
        &LineStyleOverrides::default(),
        &ArrowStyleOverrides::default(),
    );

    let cmds = ctx.commands();
    assert_eq!(cmds.len(), 3);
    let s = 10.0 * std::f64::consts::FRAC_1_SQRT_2;
    let prongs: Vec<Point> = cmds[1..].iter().map(|c| path_points(c)[1]).collect();
    assert!(approx(prongs[0], Point::new(10.0 - s, s)), "{prongs:?}");
    assert!(approx(prongs[1], Point::new(10.0 - s, -s)), "{prongs:?}");
    for c in &cmds[1..] {
        assert_eq!(path_points(c)[0], Point::new(10.0, 0.0));
    }
}

#[test]
fn degenerate_arrow_draws_no_head() {
    let mut ctx = RecordingContext::new();
    let mut d = Drawer::new(&mut ctx, Region::new(0.0, 0.0, 100.0, 100.0));
    d.draw_arrow(
        Point::new(5.0, 5.0),
        Point::new(5.0, 5.000001),
        &LineStyleOverrides::default(),
        &ArrowStyleOverrides::default(),
    );
    assert_eq!(ctx.commands().len(), 1);
}

#[test]
fn ellipse_fills_before_stroking() {
    let mut ctx = RecordingContext::new();
    let mut d = Drawer::new(&mut ctx, Region::new(0.0, 0.0, 100.0, 100.0));
    d.draw_ellipse(
        Point::new(50.0, 50.0),
        Size::new(20.0, 10.0),
        Some(&LineStyleOverrides::default()),
        Some(Color::RED),
        &EllipseExtras::default(),
    );

    let cmds = ctx.commands();
    assert_eq!(cmds.len(), 2);
    assert!(matches!(cmds[0], DrawCommand::Fill { paint: Color::RED, .. }));
    assert!(matches!(cmds[1], DrawCommand::Stroke { .. }));
    let b = cmds[1].bounds();
    assert!((b.x0 - 40.0).abs() < 0.2 && (b.x1 - 60.0).abs() < 0.2);
    assert!((b.y0 - 45.0).abs() < 0.2 && (b.y1 - 55.0).abs() < 0.2);
}

#[test]
fn text_fill_and_outline_follow_the_style() {
    let mut ctx = RecordingContext::new();
    let mut d = Drawer::new(&mut ctx, Region::new(0.0, 0.0, 100.0, 100.0));
    let align = TextAlignOverrides::default();

    d.draw_text("a", Point::ORIGIN, &align, &FontStyleOverrides::default());
    d.draw_text(
        "b",
        Point::ORIGIN,
        &align,
        &FontStyleOverrides::default().with_line(Some(LineStyleOverrides::default())),
    );
    d.draw_text(
        "c",
        Point::ORIGIN,
        &align,
        &FontStyleOverrides::default().with_fill(None),
    );

    let kinds: Vec<(&str, bool)> = ctx
        .commands()
        .iter()
        .map(|c| {
            let t = c.text().map(|t| t.text.as_str()).unwrap_or("");
            (t, matches!(c, DrawCommand::FillText { .. }))
        })
        .collect();
    assert_eq!(kinds, vec![("a", true), ("b", true), ("b", false)]);
}

#[test]
fn measure_text_uses_the_draw_font() {
    let mut ctx = RecordingContext::new();
    let mut d = Drawer::new(&mut ctx, Region::new(0.0, 0.0, 100.0, 100.0));
    let m = d.measure_text("abc", &TextAlignOverrides::default(), &FontStyleOverrides::default());
    assert_eq!(m.width, 36.0);
    assert!((m.height() - 24.0).abs() < 1e-9);

    let small = FontStyleOverrides::default().with_font("10px sans");
    let m = d.measure_text("abc", &TextAlignOverrides::default(), &small);
    assert_eq!(m.width, 15.0);
    assert_eq!(ctx.save_depth(), 0);
}

#[tracing_test::traced_test]
#[test]
fn freeform_rebalances_leaked_saves() {
    let mut ctx = RecordingContext::new();
    let mut d = Drawer::new(&mut ctx, Region::new(0.0, 0.0, 10.0, 10.0));
    d.draw_freeform(|c| {
        c.save();
        c.save();
        c.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0));
    });
    assert_eq!(ctx.save_depth(), 0);
    assert_eq!(ctx.commands().len(), 1);
    assert!(logs_contain("left saved states behind"));
}

#[test]
fn state_is_restored_when_a_draw_panics() {
    let mut ctx = RecordingContext::new();
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        let mut d = Drawer::new(&mut ctx, Region::new(0.0, 0.0, 10.0, 10.0));
        d.draw_freeform(|_| panic!("boom"));
    }));
    assert!(result.is_err());
    assert_eq!(ctx.save_depth(), 0);
    assert!(ctx.state().current().clips.is_empty());
}
