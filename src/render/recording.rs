//! Deterministic backend that records what would be drawn.
//!
//! Paths and anchors are recorded in device space together with the clip rectangle in
//! effect. Text uses synthetic metrics so layouts are reproducible without fonts:
//! every char advances half an em (scaled by the font stretch) plus the letter spacing,
//! the ascent is 0.8 em and the descent 0.2 em.

use kurbo::Shape;

use crate::foundation::core::{BezPath, Color, Point, Rect};
use crate::foundation::error::AlgonimResult;
use crate::gfx::context::{Context2D, FontState, StateStack, TextMetrics};
use crate::gfx::styles::{HorizontalAlign, LineStyle, TextBaseline};
use crate::render::surface::Surface;

const ADVANCE_EM: f64 = 0.5;
// Descent is a fifth of the em; the ascent takes the rest so the two sum to the em exactly.
const DESCENT_DIVISOR: f64 = 5.0;

#[derive(Clone, Debug, PartialEq)]
pub struct RecordedText {
    pub text: String,
    /// The `at` point of the draw call, in device space.
    pub anchor: Point,
    pub align: HorizontalAlign,
    pub baseline: TextBaseline,
    pub font: FontState,
    pub metrics: TextMetrics,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Stroke {
        path: BezPath,
        line: LineStyle,
        clip: Option<Rect>,
    },
    Fill {
        path: BezPath,
        paint: Color,
        clip: Option<Rect>,
    },
    FillText {
        text: RecordedText,
        paint: Color,
        clip: Option<Rect>,
    },
    StrokeText {
        text: RecordedText,
        line: LineStyle,
        clip: Option<Rect>,
    },
}

impl DrawCommand {
    pub fn clip(&self) -> Option<Rect> {
        match self {
            Self::Stroke { clip, .. }
            | Self::Fill { clip, .. }
            | Self::FillText { clip, .. }
            | Self::StrokeText { clip, .. } => *clip,
        }
    }

    pub fn path(&self) -> Option<&BezPath> {
        match self {
            Self::Stroke { path, .. } | Self::Fill { path, .. } => Some(path),
            Self::FillText { .. } | Self::StrokeText { .. } => None,
        }
    }

    pub fn text(&self) -> Option<&RecordedText> {
        match self {
            Self::FillText { text, .. } | Self::StrokeText { text, .. } => Some(text),
            Self::Stroke { .. } | Self::Fill { .. } => None,
        }
    }

    /// Device-space bounding box of a path, or of a text run's anchor box.
    pub fn bounds(&self) -> Rect {
        match self {
            Self::Stroke { path, .. } | Self::Fill { path, .. } => path.bounding_box(),
            Self::FillText { text, .. } | Self::StrokeText { text, .. } => {
                let m = text.metrics;
                let x = text.anchor.x
                    + crate::gfx::context::align_offset(text.align, m.width);
                let baseline = text.anchor.y
                    + crate::gfx::context::baseline_offset(
                        text.baseline,
                        m.font_ascent,
                        m.font_descent,
                    );
                Rect::new(x, baseline - m.font_ascent, x + m.width, baseline + m.font_descent)
            }
        }
    }
}

/// [`Context2D`] that appends [`DrawCommand`]s instead of rasterizing.
#[derive(Clone, Debug, Default)]
pub struct RecordingContext {
    state: StateStack,
    commands: Vec<DrawCommand>,
}

impl RecordingContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    fn record_text(&mut self, text: &str, at: Point) -> RecordedText {
        let metrics = self.measure_text(text);
        let current = self.state.current();
        RecordedText {
            text: text.to_string(),
            anchor: current.transform * at,
            align: current.text_align,
            baseline: current.text_baseline,
            font: current.font.clone(),
            metrics,
        }
    }
}

/// Synthetic metrics for `text` under `font`.
pub fn synthetic_metrics(text: &str, font: &FontState) -> TextMetrics {
    let em = font.descriptor.size_px;
    let chars = text.chars().count() as f64;
    let descent = em / DESCENT_DIVISOR;
    let advance = em * ADVANCE_EM * f64::from(font.stretch.ratio());
    TextMetrics {
        width: chars * (advance + font.letter_spacing),
        font_ascent: em - descent,
        font_descent: descent,
    }
}

impl Context2D for RecordingContext {
    fn state(&self) -> &StateStack {
        &self.state
    }

    fn state_mut(&mut self) -> &mut StateStack {
        &mut self.state
    }

    fn stroke(&mut self) {
        self.commands.push(DrawCommand::Stroke {
            path: self.state.path().clone(),
            line: self.state.current().line.clone(),
            clip: self.state.clip_bounds(),
        });
    }

    fn fill(&mut self) {
        self.commands.push(DrawCommand::Fill {
            path: self.state.path().clone(),
            paint: self.state.current().fill,
            clip: self.state.clip_bounds(),
        });
    }

    fn fill_rect(&mut self, rect: Rect) {
        let path = self.state.current().transform * rect.to_path(0.1);
        self.commands.push(DrawCommand::Fill {
            path,
            paint: self.state.current().fill,
            clip: self.state.clip_bounds(),
        });
    }

    fn fill_text(&mut self, text: &str, at: Point) {
        let text = self.record_text(text, at);
        self.commands.push(DrawCommand::FillText {
            text,
            paint: self.state.current().fill,
            clip: self.state.clip_bounds(),
        });
    }

    fn stroke_text(&mut self, text: &str, at: Point) {
        let text = self.record_text(text, at);
        self.commands.push(DrawCommand::StrokeText {
            text,
            line: self.state.current().line.clone(),
            clip: self.state.clip_bounds(),
        });
    }

    fn measure_text(&mut self, text: &str) -> TextMetrics {
        synthetic_metrics(text, &self.state.current().font)
    }
}

/// Surface backed by a [`RecordingContext`]; frames are the recorded command lists.
#[derive(Clone, Debug)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    ctx: Option<RecordingContext>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ctx: Some(RecordingContext::new()),
        }
    }

    /// A surface that cannot hand out a drawing context.
    pub fn detached(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ctx: None,
        }
    }

    /// Commands recorded since the last capture.
    pub fn commands(&self) -> &[DrawCommand] {
        self.ctx.as_ref().map(RecordingContext::commands).unwrap_or(&[])
    }
}

impl Surface for RecordingSurface {
    type Frame = Vec<DrawCommand>;

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn context_2d(&mut self) -> Option<&mut dyn Context2D> {
        self.ctx.as_mut().map(|c| c as &mut dyn Context2D)
    }

    fn capture(&mut self) -> AlgonimResult<Self::Frame> {
        Ok(self
            .ctx
            .as_mut()
            .map(RecordingContext::take_commands)
            .unwrap_or_default())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/recording.rs"]
mod tests;
