use super::*;
use crate::render::recording::{DrawCommand, RecordingContext};
use kurbo::PathEl;

fn draw(code: &Code) -> Vec<DrawCommand> {
    let mut ctx = RecordingContext::new();
    let mut d = Drawer::new(&mut ctx, Region::new(0.0, 0.0, 640.0, 480.0));
    code.draw(&mut d);
    ctx.take_commands()
}

fn first_point(cmd: &DrawCommand) -> Option<Point> {
    cmd.path()?.elements().iter().find_map(|el| match el {
        PathEl::MoveTo(p) => Some(*p),
        _ => None,
    })
}

#[test]
fn arrow_points_at_the_middle_of_its_line() {
    let mut code = Code::with_lines(["if x then", "  y"]);
    code.set_arrow_line(Some(1)).unwrap();
    let cmds = draw(&code);

    let texts: Vec<(&str, Point)> = cmds
        .iter()
        .filter_map(|c| c.text().map(|t| (t.text.as_str(), t.anchor)))
        .collect();
    assert_eq!(
        texts,
        vec![("if x then", Point::new(16.0, 0.0)), ("y", Point::new(40.0, 26.0))]
    );

    let strokes: Vec<&DrawCommand> = cmds
        .iter()
        .filter(|c| matches!(c, DrawCommand::Stroke { .. }))
        .collect();
    assert_eq!(strokes.len(), 3);
    let shaft = first_point(strokes[0]).unwrap();
    assert_eq!(shaft, Point::new(2.0, 38.0));
    let bounds = strokes[0].bounds();
    assert_eq!(bounds.x1, 14.0);
    match strokes[0] {
        DrawCommand::Stroke { line, .. } => {
            assert_eq!(line.stroke, Color::RED);
            assert_eq!(line.line_width, 2.0);
        }
        _ => unreachable!(),
    }
}

#[test]
fn no_arrow_without_an_arrow_line() {
    let code = Code::with_lines(["a", "b"]);
    assert!(draw(&code).iter().all(|c| c.text().is_some()));
}

#[test]
fn arrow_line_must_exist() {
    let mut code = Code::with_lines(["a"]);
    assert!(matches!(code.set_arrow_line(Some(1)), Err(AlgonimError::Validation(_))));
    code.set_arrow_line(Some(0)).unwrap();
    code.set_lines(["x", "y"]);
    assert_eq!(code.arrow_line(), Some(0));
    code.set_lines(Vec::<String>::new());
    assert_eq!(code.arrow_line(), None);
}

#[test]
fn signs_are_boxed_after_the_line_text() {
    let mut code = Code::with_lines(["if x then"]);
    let sign = code.add_sign(0, "i=0").unwrap();
    assert_eq!(code.sign_line(sign).unwrap(), 0);
    assert_eq!(code.sign_text(sign).unwrap(), "i=0");

    let cmds = draw(&code);
    let frame = cmds
        .iter()
        .find(|c| matches!(c, DrawCommand::Fill { paint, .. } if *paint == Color::LIGHT_YELLOW))
        .expect("sign box");
    // 16px margin + 9 chars * 12px + 6px gap, boxed text with 3px padding.
    assert_eq!(frame.bounds(), kurbo::Rect::new(130.0, 0.0, 172.0, 24.0));

    let label = cmds
        .iter()
        .filter_map(DrawCommand::text)
        .find(|t| t.text == "i=0")
        .expect("sign text");
    assert_eq!(label.anchor, Point::new(133.0, 0.0));
}

#[test]
fn signs_that_do_not_fit_wrap_to_the_next_row() {
    let mut code = Code::with_lines(["abcdefgh"]);
    code.add_sign(0, "n").unwrap();

    let mut ctx = RecordingContext::new();
    // 16px margin leaves 100px: the 96px text fits, the 24px sign does not.
    let mut d = Drawer::new(&mut ctx, Region::new(0.0, 0.0, 116.0, 200.0));
    code.draw(&mut d);

    let label = ctx
        .commands()
        .iter()
        .filter_map(DrawCommand::text)
        .find(|t| t.text == "n")
        .expect("sign text")
        .anchor;
    assert_eq!(label, Point::new(16.0 + 6.0 + 3.0, 24.0));
}

#[test]
fn destroyed_signs_are_invalid_handles() {
    let mut code = Code::with_lines(["a", "b"]);
    let first = code.add_sign(1, "x").unwrap();
    code.destroy_sign(first).unwrap();
    assert!(matches!(code.sign_text(first), Err(AlgonimError::InvalidHandle(_))));
    assert!(matches!(code.destroy_sign(first), Err(AlgonimError::InvalidHandle(_))));

    let second = code.add_sign(1, "y").unwrap();
    assert_ne!(first, second);
    code.set_sign_text(second, "z").unwrap();
    assert_eq!(code.lines()[1].signs()[0].text, "z");

    code.clear_signs(1).unwrap();
    assert!(matches!(code.sign_line(second), Err(AlgonimError::InvalidHandle(_))));
}

#[test]
fn replacing_lines_destroys_their_signs() {
    let mut code = Code::with_lines(["a"]);
    let sign = code.add_sign(0, "s").unwrap();
    code.set_lines(["b"]);
    assert!(code.sign_text(sign).is_err());
    assert!(code.lines()[0].signs().is_empty());
}

#[test]
fn line_edits_check_bounds() {
    let mut code = Code::new();
    assert_eq!(code.push_line("x"), 0);
    code.set_line_text(0, "y").unwrap();
    assert_eq!(code.lines()[0].text, "y");
    assert!(code.set_line_text(3, "z").is_err());
    assert!(code.add_sign(3, "z").is_err());
    assert!(code.clear_signs(3).is_err());
}
