//! Algonim renders algorithm visualizations (code listings with a line pointer and inline
//! signs, node-link graphs, trees) onto a 2D surface, composed from nested clipped panes.
//!
//! - Register models on an [`Algonim`] host and arrange them with a [`Layout`]
//! - Draw onto a [`Surface`] ([`RasterSurface`] for pixels, [`RecordingSurface`] for
//!   inspectable draw commands)
//! - Play keyframe steps into a [`FrameSink`] with [`Slideshow`]
#![forbid(unsafe_code)]

pub mod foundation;
pub mod gfx;
pub mod models;
pub mod pane;
pub mod render;
pub mod scene;
pub mod widget;

pub use crate::foundation::config::{AlgonimOpts, DEFAULT_DEPTH_LIMIT, Diagnostics};
pub use crate::foundation::core::{Affine, BezPath, Color, FrameRGBA, Point, Rect, Size, Vec2};
pub use crate::foundation::error::{AlgonimError, AlgonimResult};

pub use crate::gfx::border::{Border, EllipseBorder, RectangleBorder};
pub use crate::gfx::context::{Context2D, TextMetrics};
pub use crate::gfx::drawer::Drawer;
pub use crate::gfx::region::Region;
pub use crate::gfx::styles::{
    ArrowStyle, ArrowStyleOverrides, FontStyle, FontStyleOverrides, LineStyle,
    LineStyleOverrides, TextAlign, TextAlignOverrides,
};
pub use crate::gfx::text_wrapper::{TextAtom, TextPiece, TextWrapper};

pub use crate::models::code::{Code, SignId};
pub use crate::models::graph::{EdgeId, Graph, NodeId};
pub use crate::models::tree::{Tree, TreeNodeId};
pub use crate::models::{Model, ModelId, ModelRegistry};

pub use crate::pane::layout::{Layout, layout_to_pane};
pub use crate::pane::pane::{Axis, Pane};

pub use crate::render::raster::RasterSurface;
pub use crate::render::recording::{DrawCommand, RecordingSurface};
pub use crate::render::surface::Surface;

pub use crate::scene::{Scene, SceneHandles, ScenePlayback};

pub use crate::widget::algonim::Algonim;
pub use crate::widget::sink::{FrameSink, InMemorySink, PngSequenceSink, SinkConfig};
pub use crate::widget::slideshow::{Animation, Clock, ManualClock, Script, Slideshow, ThreadClock};
