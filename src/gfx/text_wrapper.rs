//! Greedy line wrapping of text pieces and inline atoms.
//!
//! Pieces are packed left to right into rows of a maximum width. A piece that does not fit
//! in what is left of a row is clipped (strings by a binary search over their prefixes,
//! atoms by [`TextAtom::try_clip`]); the remainder starts the next row. Every row consumes
//! at least one piece so unwrappable content overflows instead of looping forever.

use std::fmt;
use std::rc::Rc;

use crate::foundation::core::{Point, Size, Vec2};
use crate::gfx::drawer::Drawer;
use crate::gfx::styles::{FontStyle, FontStyleOverrides, TextAlign, TextAlignOverrides};

/// Opaque inline element laid out alongside text (a sign box, for instance).
pub trait TextAtom: fmt::Debug {
    fn measure(&self, drawer: &mut Drawer<'_>, align: &TextAlign, style: &FontStyle) -> Size;

    fn draw(&self, at: Point, drawer: &mut Drawer<'_>, align: &TextAlign, style: &FontStyle);

    /// Split into a part no wider than `max_width` and the rest, or `None` when the atom
    /// cannot be split there.
    fn try_clip(
        &self,
        _max_width: f64,
        _drawer: &mut Drawer<'_>,
        _align: &TextAlign,
        _style: &FontStyle,
    ) -> Option<ClipResult<TextPiece>> {
        None
    }
}

#[derive(Clone, Debug)]
pub enum TextPiece {
    Text(String),
    Atom(Rc<dyn TextAtom>),
}

impl TextPiece {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Atom(_) => None,
        }
    }
}

impl From<&str> for TextPiece {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for TextPiece {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClipResult<T> {
    pub clipped: T,
    pub remainder: T,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DrawTextResult {
    pub height: f64,
    pub line_breaks: usize,
}

/// A piece placed on a row together with its measured size.
#[derive(Clone, Debug)]
pub struct PlacedPiece {
    pub piece: TextPiece,
    pub size: Size,
}

#[derive(Clone, Debug, Default)]
pub struct WrappedLine {
    pub pieces: Vec<PlacedPiece>,
    /// Tallest piece on the row.
    pub height: f64,
}

#[derive(Clone, Debug)]
pub struct TextWrapper {
    /// Appended to a string clipped in the middle of a word.
    pub hyphen: String,
}

impl Default for TextWrapper {
    fn default() -> Self {
        Self {
            hyphen: "-".to_string(),
        }
    }
}

impl TextWrapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps and draws `text` at `at`, returning the consumed height and the break count.
    pub fn draw_text(
        &self,
        drawer: &mut Drawer<'_>,
        text: &[TextPiece],
        at: Point,
        max_width: f64,
        align: &TextAlignOverrides,
        style: &FontStyleOverrides,
    ) -> DrawTextResult {
        let align = TextAlign::resolve(align);
        let style = FontStyle::resolve(style);
        self.draw_text_with(drawer, text, at, max_width, &align, &style)
    }

    pub fn draw_text_with(
        &self,
        drawer: &mut Drawer<'_>,
        text: &[TextPiece],
        at: Point,
        max_width: f64,
        align: &TextAlign,
        style: &FontStyle,
    ) -> DrawTextResult {
        let lines = self.wrap(drawer, text, max_width, align, style);

        let mut y = 0.0;
        for line in &lines {
            let mut x = 0.0;
            for placed in &line.pieces {
                let pos = at + Vec2::new(x, y);
                match &placed.piece {
                    TextPiece::Text(s) => drawer.draw_text_with(s, pos, align, style),
                    TextPiece::Atom(atom) => atom.draw(pos, drawer, align, style),
                }
                x += placed.size.width;
            }
            y += line.height;
        }

        DrawTextResult {
            height: y,
            line_breaks: lines.len().saturating_sub(1),
        }
    }

    /// Like [`TextWrapper::draw_text_with`], but the leading spaces and tabs of the first
    /// piece become a left margin of `units * width("m")` (space = 1, tab = 2) that is
    /// applied to every row.
    pub fn draw_indented(
        &self,
        drawer: &mut Drawer<'_>,
        text: &[TextPiece],
        at: Point,
        max_width: f64,
        align: &TextAlign,
        style: &FontStyle,
    ) -> DrawTextResult {
        let mut pieces = text.to_vec();
        let mut units = 0;
        if let Some(TextPiece::Text(first)) = pieces.first_mut() {
            let (u, rest) = split_indent(first);
            units = u;
            *first = rest.to_string();
        }

        let margin = units as f64 * drawer.measure_text_with("m", align, style).width;
        self.draw_text_with(
            drawer,
            &pieces,
            at + Vec2::new(margin, 0.0),
            (max_width - margin).max(0.0),
            align,
            style,
        )
    }

    /// Lays `text` out into rows without drawing.
    pub fn wrap(
        &self,
        drawer: &mut Drawer<'_>,
        text: &[TextPiece],
        max_width: f64,
        align: &TextAlign,
        style: &FontStyle,
    ) -> Vec<WrappedLine> {
        // Consumed from the back.
        let mut queue: Vec<TextPiece> = text.iter().rev().cloned().collect();
        let mut lines = Vec::new();

        loop {
            let pieces = self.consume_maximal_text(drawer, &mut queue, max_width, align, style);
            let height = pieces.iter().map(|p| p.size.height).fold(0.0, f64::max);
            lines.push(WrappedLine { pieces, height });
            if queue.is_empty() {
                break;
            }
        }
        lines
    }

    /// Pops pieces off the back of `queue` while they fit into `max_width`.
    ///
    /// Always consumes at least one piece of a non-empty queue.
    pub fn consume_maximal_text(
        &self,
        drawer: &mut Drawer<'_>,
        queue: &mut Vec<TextPiece>,
        max_width: f64,
        align: &TextAlign,
        style: &FontStyle,
    ) -> Vec<PlacedPiece> {
        let mut consumed = Vec::new();
        let mut width_left = max_width;

        while let Some(piece) = queue.pop() {
            let size = self.measure(drawer, &piece, align, style);
            if size.width <= width_left {
                width_left -= size.width;
                consumed.push(PlacedPiece { piece, size });
                continue;
            }

            let clip = match &piece {
                TextPiece::Text(s) => self
                    .clip_string(drawer, s, width_left, align, style)
                    .map(|c| ClipResult {
                        clipped: TextPiece::Text(c.clipped),
                        remainder: TextPiece::Text(c.remainder),
                    }),
                TextPiece::Atom(atom) => atom.try_clip(width_left, drawer, align, style),
            };
            match clip {
                Some(ClipResult { clipped, remainder }) => {
                    let size = self.measure(drawer, &clipped, align, style);
                    consumed.push(PlacedPiece {
                        piece: clipped,
                        size,
                    });
                    queue.push(remainder);
                }
                None => queue.push(piece),
            }
            break;
        }

        if consumed.is_empty() {
            if let Some(piece) = queue.pop() {
                let size = self.measure(drawer, &piece, align, style);
                consumed.push(PlacedPiece { piece, size });
            }
        }
        consumed
    }

    /// Longest prefix of `text` that fits into `max_width` together with the hyphen.
    ///
    /// The hyphen is kept on `clipped` unless the break falls on whitespace. Returns `None`
    /// when not even one character fits.
    pub fn clip_string(
        &self,
        drawer: &mut Drawer<'_>,
        text: &str,
        max_width: f64,
        align: &TextAlign,
        style: &FontStyle,
    ) -> Option<ClipResult<String>> {
        if drawer.measure_text_with(text, align, style).width <= max_width {
            return Some(ClipResult {
                clipped: text.to_string(),
                remainder: String::new(),
            });
        }

        // Byte offsets of every char boundary after the first char.
        let boundaries: Vec<usize> = text
            .char_indices()
            .map(|(i, _)| i)
            .skip(1)
            .chain(std::iter::once(text.len()))
            .collect();
        let prefix = |chars: usize| &text[..boundaries[chars - 1]];
        let hyphenated = |chars: usize| format!("{}{}", prefix(chars), self.hyphen);

        let (mut min, mut max) = (1, boundaries.len());
        while min + 1 < max {
            let mid = (min + max) / 2;
            if drawer.measure_text_with(&hyphenated(mid), align, style).width > max_width {
                max = mid;
            } else {
                min = mid;
            }
        }

        if drawer.measure_text_with(&hyphenated(min), align, style).width > max_width {
            return None;
        }

        let (head, tail) = text.split_at(prefix(min).len());
        let at_space = head.ends_with(char::is_whitespace) || tail.starts_with(char::is_whitespace);
        let clipped = if at_space {
            head.to_string()
        } else {
            format!("{head}{}", self.hyphen)
        };
        Some(ClipResult {
            clipped,
            remainder: tail.to_string(),
        })
    }

    pub fn measure(
        &self,
        drawer: &mut Drawer<'_>,
        piece: &TextPiece,
        align: &TextAlign,
        style: &FontStyle,
    ) -> Size {
        match piece {
            TextPiece::Text(s) => {
                let m = drawer.measure_text_with(s, align, style);
                Size::new(m.width, m.height())
            }
            TextPiece::Atom(atom) => atom.measure(drawer, align, style),
        }
    }
}

/// Indentation units of the leading whitespace run (space = 1, tab = 2) and the text
/// after it.
pub fn split_indent(line: &str) -> (usize, &str) {
    let mut units = 0;
    for (i, c) in line.char_indices() {
        match c {
            ' ' => units += 1,
            '\t' => units += 2,
            _ => return (units, &line[i..]),
        }
    }
    (units, "")
}

#[cfg(test)]
#[path = "../../tests/unit/gfx/text_wrapper.rs"]
mod tests;
