//! Error types for skcanvas-context2d.

use thiserror::Error;

/// Result type alias using Context2dError.
pub type Context2dResult<T> = Result<T, Context2dError>;

/// Errors that can occur in context operations.
///
/// Drawing operations never return these; degenerate geometry is silently
/// skipped. Errors are reserved for surface allocation, encoding, and parsing
/// of caller-provided text.
#[derive(Debug, Error)]
pub enum Context2dError {
    /// Invalid surface dimensions (must be positive and within limits).
    #[error("Invalid dimensions: width={width}, height={height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// The backing pixel buffer could not be allocated.
    #[error("Failed to allocate a {width}x{height} surface")]
    AllocationFailed { width: u32, height: u32 },

    /// Failed to parse color value.
    #[error("Failed to parse color: {0}")]
    ColorParseError(String),

    /// Failed to parse SVG path data.
    #[error("Failed to parse path data: {0}")]
    PathParseError(String),

    /// Unknown composite operation name.
    #[error("Invalid composite operation: {0}")]
    InvalidCompositeOperation(String),

    /// Unknown line cap name.
    #[error("Invalid line cap: {0}")]
    InvalidLineCap(String),

    /// Unknown line join name.
    #[error("Invalid line join: {0}")]
    InvalidLineJoin(String),

    /// Pixel buffer length does not match its dimensions.
    #[error("Image data size mismatch: expected {expected} bytes, got {actual}")]
    ImageDataSize { expected: usize, actual: usize },

    /// PNG encoding error.
    #[error("PNG encoding error: {0}")]
    PngError(String),
}

impl From<png::EncodingError> for Context2dError {
    fn from(err: png::EncodingError) -> Self {
        Context2dError::PngError(err.to_string())
    }
}
