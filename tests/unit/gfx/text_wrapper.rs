use super::*;
use crate::gfx::region::Region;
use crate::render::recording::{DrawCommand, RecordingContext};

// The recording context gives every char 12px of advance at the default 24px font.

#[derive(Debug)]
struct Block {
    width: f64,
    height: f64,
}

impl TextAtom for Block {
    fn measure(&self, _: &mut Drawer<'_>, _: &TextAlign, _: &FontStyle) -> Size {
        Size::new(self.width, self.height)
    }

    fn draw(&self, at: Point, drawer: &mut Drawer<'_>, _: &TextAlign, _: &FontStyle) {
        drawer.draw_rect(
            Region::new(at.x, at.y, self.width, self.height),
            None,
            Some(crate::foundation::core::Color::RED),
        );
    }
}

fn styles() -> (TextAlign, FontStyle) {
    (TextAlign::resolve(&TextAlignOverrides::start_top()), FontStyle::default())
}

fn row_texts(lines: &[WrappedLine]) -> Vec<Vec<String>> {
    lines
        .iter()
        .map(|l| {
            l.pieces
                .iter()
                .map(|p| p.piece.as_text().unwrap_or("<atom>").to_string())
                .collect()
        })
        .collect()
}

#[test]
fn short_text_is_one_line() {
    let mut ctx = RecordingContext::new();
    let mut d = Drawer::new(&mut ctx, Region::new(0.0, 0.0, 200.0, 100.0));
    let result = TextWrapper::new().draw_text(
        &mut d,
        &["hello".into()],
        Point::ORIGIN,
        100.0,
        &TextAlignOverrides::start_top(),
        &FontStyleOverrides::default(),
    );
    assert_eq!(result.line_breaks, 0);
    assert!((result.height - 24.0).abs() < 1e-9);
    assert_eq!(ctx.commands().len(), 1);
}

#[test]
fn long_words_are_hyphenated_across_rows() {
    let mut ctx = RecordingContext::new();
    let mut d = Drawer::new(&mut ctx, Region::new(0.0, 0.0, 200.0, 200.0));
    let (align, style) = styles();
    let lines = TextWrapper::new().wrap(&mut d, &["abcdefghij".into()], 50.0, &align, &style);
    assert_eq!(
        row_texts(&lines),
        vec![vec!["abc-"], vec!["def-"], vec!["ghij"]]
    );
}

#[test]
fn break_on_whitespace_drops_the_hyphen() {
    let mut ctx = RecordingContext::new();
    let mut d = Drawer::new(&mut ctx, Region::new(0.0, 0.0, 200.0, 200.0));
    let (align, style) = styles();
    let clip = TextWrapper::new()
        .clip_string(&mut d, "ab cdef", 40.0, &align, &style)
        .expect("two chars fit");
    assert_eq!(clip.clipped, "ab");
    assert_eq!(clip.remainder, " cdef");
}

#[test]
fn clip_respects_multibyte_chars() {
    let mut ctx = RecordingContext::new();
    let mut d = Drawer::new(&mut ctx, Region::new(0.0, 0.0, 200.0, 200.0));
    let (align, style) = styles();
    let clip = TextWrapper::new()
        .clip_string(&mut d, "äöüß", 36.0, &align, &style)
        .expect("two chars fit");
    assert_eq!(clip.clipped, "äö-");
    assert_eq!(clip.remainder, "üß");
}

#[test]
fn clip_fails_when_one_char_and_hyphen_do_not_fit() {
    let mut ctx = RecordingContext::new();
    let mut d = Drawer::new(&mut ctx, Region::new(0.0, 0.0, 200.0, 200.0));
    let (align, style) = styles();
    let wrapper = TextWrapper::new();
    assert_eq!(wrapper.clip_string(&mut d, "abc", 20.0, &align, &style), None);

    // The row still takes the piece and overflows.
    let lines = wrapper.wrap(&mut d, &["abc".into()], 20.0, &align, &style);
    assert_eq!(row_texts(&lines), vec![vec!["abc"]]);
}

#[test]
fn each_row_consumes_at_least_one_piece() {
    let mut ctx = RecordingContext::new();
    let mut d = Drawer::new(&mut ctx, Region::new(0.0, 0.0, 200.0, 200.0));
    let (align, style) = styles();
    let mut queue: Vec<TextPiece> = vec![TextPiece::Atom(Rc::new(Block {
        width: 500.0,
        height: 5.0,
    }))];
    let placed = TextWrapper::new().consume_maximal_text(&mut d, &mut queue, 10.0, &align, &style);
    assert_eq!(placed.len(), 1);
    assert!(queue.is_empty());
}

#[test]
fn unclippable_atoms_move_to_the_next_row() {
    let mut ctx = RecordingContext::new();
    let mut d = Drawer::new(&mut ctx, Region::new(0.0, 0.0, 200.0, 200.0));
    let (align, style) = styles();
    let pieces = vec![
        TextPiece::from("abcd"),
        TextPiece::Atom(Rc::new(Block {
            width: 30.0,
            height: 10.0,
        })),
    ];
    let result = TextWrapper::new().draw_text_with(&mut d, &pieces, Point::new(5.0, 5.0), 60.0, &align, &style);
    assert_eq!(result.line_breaks, 1);
    assert!((result.height - 34.0).abs() < 1e-9);

    let atom_fill = ctx
        .commands()
        .iter()
        .find(|c| matches!(c, DrawCommand::Fill { .. }))
        .expect("atom drawn");
    assert_eq!(atom_fill.bounds().origin(), Point::new(5.0, 29.0));
}

#[test]
fn indentation_becomes_a_left_margin() {
    let mut ctx = RecordingContext::new();
    let mut d = Drawer::new(&mut ctx, Region::new(0.0, 0.0, 200.0, 200.0));
    let (align, style) = styles();
    TextWrapper::new().draw_indented(&mut d, &["  y".into()], Point::new(16.0, 0.0), 184.0, &align, &style);

    let text = ctx.commands()[0].text().expect("text drawn");
    assert_eq!(text.text, "y");
    assert_eq!(text.anchor, Point::new(40.0, 0.0));
}

#[test]
fn indented_rows_share_the_margin() {
    let mut ctx = RecordingContext::new();
    let mut d = Drawer::new(&mut ctx, Region::new(0.0, 0.0, 200.0, 200.0));
    let (align, style) = styles();
    // One tab = 2 units = 24px, leaving 36px: "ab-" then "cd".
    let result = TextWrapper::new().draw_indented(&mut d, &["\tabcd".into()], Point::ORIGIN, 60.0, &align, &style);
    assert_eq!(result.line_breaks, 1);

    let anchors: Vec<Point> = ctx
        .commands()
        .iter()
        .filter_map(|c| c.text().map(|t| t.anchor))
        .collect();
    assert_eq!(anchors, vec![Point::new(24.0, 0.0), Point::new(24.0, 24.0)]);
}

#[test]
fn indent_units_count_tabs_double() {
    assert_eq!(split_indent("  y"), (2, "y"));
    assert_eq!(split_indent("\t x"), (3, "x"));
    assert_eq!(split_indent("   "), (3, ""));
    assert_eq!(split_indent("x  "), (0, "x  "));
}
