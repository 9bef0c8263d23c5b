use crate::foundation::error::AlgonimResult;
use crate::gfx::context::Context2D;

/// Something a frame can be drawn onto and read back from.
///
/// Only one draw may be in flight against a surface at a time; the `&mut` receivers make
/// that a compile-time property.
pub trait Surface {
    /// What [`Surface::capture`] hands back (pixels, recorded commands, ...).
    type Frame;

    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// The drawing context, or `None` when this surface cannot provide one.
    fn context_2d(&mut self) -> Option<&mut dyn Context2D>;

    /// Finishes the frame drawn since the previous capture and returns it.
    fn capture(&mut self) -> AlgonimResult<Self::Frame>;
}
