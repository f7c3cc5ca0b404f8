use thiserror::Error;

/// Errors from building or encoding a raster surface.  Drawing itself never
/// fails.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to allocate a {width}x{height} pixmap")]
    PixmapAlloc { width: u32, height: u32 },

    #[error("failed to encode PNG")]
    PngEncode,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type RenderResult<T> = Result<T, RenderError>;
