//! Declarative canvas rendering.
//!
//! A model is mapped to a list of [`DrawCommand`]s which [`paint`] replays
//! in order against a [`DrawingContext`]. [`canvas_view`] packages that as a
//! view function for the runtime, including the element's mount-scoped
//! input listeners and frame timer.

mod command;
mod context;
mod images;
mod paint;
mod raster;
mod view;

pub use command::{CanvasMsg, DrawCommand, TextAlign, DEFAULT_FONT};
pub use context::{
    ContextOp, DrawingContext, OpLog, RecordingContext, DEFAULT_LINE_WIDTH, DEFAULT_TEXT_ALIGN,
};
pub use images::{ImageCache, ImageError, ImageLoader, SourceLoader};
pub use paint::paint;
pub use raster::{parse_color, RasterContext, TextRun};
pub use view::{canvas_view, CanvasEnv, CanvasView};
