//! Code listing with a line pointer and inline annotations ("signs").

use std::rc::Rc;

use crate::foundation::core::{Color, Point, Size};
use crate::foundation::error::{AlgonimError, AlgonimResult};
use crate::gfx::drawer::Drawer;
use crate::gfx::region::Region;
use crate::gfx::styles::{
    ArrowStyleOverrides, FontStyle, FontStyleOverrides, LineStyleOverrides, TextAlign,
    TextAlignOverrides,
};
use crate::gfx::text_wrapper::{TextAtom, TextPiece, TextWrapper};

/// Handle to a sign. Ids are never reused, so a destroyed sign's id stays invalid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SignId(u64);

#[derive(Clone, Debug, PartialEq)]
pub struct Sign {
    id: SignId,
    pub text: String,
}

impl Sign {
    pub fn id(&self) -> SignId {
        self.id
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Line {
    pub text: String,
    signs: Vec<Sign>,
}

impl Line {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            signs: Vec::new(),
        }
    }

    pub fn signs(&self) -> &[Sign] {
        &self.signs
    }
}

#[derive(Clone, Debug)]
pub struct Code {
    lines: Vec<Line>,
    arrow_line: Option<usize>,
    next_sign: u64,
    pub font: FontStyleOverrides,
    /// Vertical gap between logical lines.
    pub line_spacing: f64,
    /// Room left of the text for the line pointer.
    pub left_margin: f64,
    pub arrow_line_style: LineStyleOverrides,
    pub arrow_style: ArrowStyleOverrides,
    pub sign_fill: Color,
    pub wrapper: TextWrapper,
}

impl Default for Code {
    fn default() -> Self {
        Self {
            lines: Vec::new(),
            arrow_line: None,
            next_sign: 0,
            font: FontStyleOverrides::default(),
            line_spacing: 2.0,
            left_margin: 16.0,
            arrow_line_style: LineStyleOverrides::default()
                .with_stroke(Color::RED)
                .with_line_width(2.0),
            arrow_style: ArrowStyleOverrides {
                angle_degrees: None,
                length: Some(5.0),
            },
            sign_fill: Color::LIGHT_YELLOW,
            wrapper: TextWrapper::default(),
        }
    }
}

impl Code {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut code = Self::new();
        code.set_lines(lines);
        code
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Replaces the listing. Existing signs are destroyed and the pointer is cleared when
    /// its line no longer exists.
    pub fn set_lines<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lines = lines.into_iter().map(Line::new).collect();
        if self.arrow_line.is_some_and(|l| l >= self.lines.len()) {
            self.arrow_line = None;
        }
    }

    pub fn push_line(&mut self, text: impl Into<String>) -> usize {
        self.lines.push(Line::new(text));
        self.lines.len() - 1
    }

    pub fn set_line_text(&mut self, line: usize, text: impl Into<String>) -> AlgonimResult<()> {
        self.line_mut(line)?.text = text.into();
        Ok(())
    }

    pub fn arrow_line(&self) -> Option<usize> {
        self.arrow_line
    }

    pub fn set_arrow_line(&mut self, line: Option<usize>) -> AlgonimResult<()> {
        if let Some(l) = line {
            self.check_line(l)?;
        }
        self.arrow_line = line;
        Ok(())
    }

    pub fn add_sign(&mut self, line: usize, text: impl Into<String>) -> AlgonimResult<SignId> {
        self.check_line(line)?;
        let id = SignId(self.next_sign);
        self.next_sign += 1;
        self.lines[line].signs.push(Sign {
            id,
            text: text.into(),
        });
        Ok(id)
    }

    /// Index of the line owning `sign`.
    pub fn sign_line(&self, sign: SignId) -> AlgonimResult<usize> {
        self.locate(sign).map(|(line, _)| line)
    }

    pub fn sign_text(&self, sign: SignId) -> AlgonimResult<&str> {
        let (line, idx) = self.locate(sign)?;
        Ok(&self.lines[line].signs[idx].text)
    }

    pub fn set_sign_text(&mut self, sign: SignId, text: impl Into<String>) -> AlgonimResult<()> {
        let (line, idx) = self.locate(sign)?;
        self.lines[line].signs[idx].text = text.into();
        Ok(())
    }

    pub fn destroy_sign(&mut self, sign: SignId) -> AlgonimResult<()> {
        let (line, idx) = self.locate(sign)?;
        self.lines[line].signs.remove(idx);
        Ok(())
    }

    pub fn clear_signs(&mut self, line: usize) -> AlgonimResult<()> {
        self.line_mut(line)?.signs.clear();
        Ok(())
    }

    fn locate(&self, sign: SignId) -> AlgonimResult<(usize, usize)> {
        self.lines
            .iter()
            .enumerate()
            .find_map(|(l, line)| {
                line.signs
                    .iter()
                    .position(|s| s.id == sign)
                    .map(|i| (l, i))
            })
            .ok_or_else(|| AlgonimError::invalid_handle(format!("sign {} was destroyed", sign.0)))
    }

    fn check_line(&self, line: usize) -> AlgonimResult<()> {
        if line < self.lines.len() {
            Ok(())
        } else {
            Err(AlgonimError::validation(format!(
                "line {line} out of range (listing has {} lines)",
                self.lines.len()
            )))
        }
    }

    fn line_mut(&mut self, line: usize) -> AlgonimResult<&mut Line> {
        self.check_line(line)?;
        Ok(&mut self.lines[line])
    }

    /// Draws the listing top to bottom, each logical line wrapped to the pane width and
    /// indented by its leading whitespace.
    pub fn draw(&self, drawer: &mut Drawer<'_>) {
        let align = TextAlign::resolve(&TextAlignOverrides::start_top());
        let style = FontStyle::resolve(&self.font);
        let width = drawer.local_region().width() - self.left_margin;

        let mut y = 0.0;
        for (i, line) in self.lines.iter().enumerate() {
            let mut pieces = vec![TextPiece::Text(line.text.clone())];
            pieces.extend(line.signs.iter().map(|s| {
                TextPiece::Atom(Rc::new(SignAtom {
                    text: s.text.clone(),
                    fill: self.sign_fill,
                }))
            }));

            let result = self.wrapper.draw_indented(
                drawer,
                &pieces,
                Point::new(self.left_margin, y),
                width,
                &align,
                &style,
            );

            if self.arrow_line == Some(i) {
                let mid = y + result.height / 2.0;
                drawer.draw_arrow(
                    Point::new(2.0, mid),
                    Point::new(self.left_margin - 2.0, mid),
                    &self.arrow_line_style,
                    &self.arrow_style,
                );
            }
            y += result.height + self.line_spacing;
        }
    }
}

const SIGN_GAP: f64 = 6.0;
const SIGN_PADDING: f64 = 3.0;

/// Boxed note drawn after a line's text. Never split across rows.
#[derive(Debug)]
struct SignAtom {
    text: String,
    fill: Color,
}

impl TextAtom for SignAtom {
    fn measure(&self, drawer: &mut Drawer<'_>, align: &TextAlign, style: &FontStyle) -> Size {
        let m = drawer.measure_text_with(&self.text, align, style);
        Size::new(m.width + 2.0 * SIGN_PADDING + SIGN_GAP, m.height())
    }

    fn draw(&self, at: Point, drawer: &mut Drawer<'_>, align: &TextAlign, style: &FontStyle) {
        let m = drawer.measure_text_with(&self.text, align, style);
        let frame = Region::new(
            at.x + SIGN_GAP,
            at.y,
            m.width + 2.0 * SIGN_PADDING,
            m.height(),
        );
        drawer.draw_rect(frame, Some(&LineStyleOverrides::default()), Some(self.fill));
        drawer.draw_text_with(
            &self.text,
            Point::new(frame.x() + SIGN_PADDING, at.y),
            align,
            style,
        );
    }
}

#[cfg(test)]
#[path = "../../tests/unit/models/code.rs"]
mod tests;
