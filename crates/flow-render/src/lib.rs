//! `flow-render`: draws one frame of the particle animation.
//!
//! The renderer is a pure reader: [`draw`] takes the topology snapshot and
//! the particle pool by shared reference and emits primitives onto a
//! [`Canvas`].  Two canvases ship with the crate:
//!
//! - [`RecordingCanvas`]: captures [`DrawCommand`]s; used by tests and by
//!   hosts that forward primitives to their own graphics stack.
//! - `PixmapCanvas` (feature `raster`): rasterizes with `tiny-skia` and
//!   encodes PNG.

pub mod canvas;
pub mod draw;
pub mod error;
pub mod viewport;

#[cfg(feature = "raster")]
pub mod raster;

#[cfg(test)]
mod tests;

pub use canvas::{Canvas, DrawCommand, RecordingCanvas};
pub use draw::{FrameStats, RenderOptions, draw};
pub use error::{RenderError, RenderResult};
pub use viewport::Viewport;

#[cfg(feature = "raster")]
pub use raster::PixmapCanvas;
