//! Error types for gapfind.

use thiserror::Error;

/// Result alias for gapfind operations.
pub type GapResult<T> = std::result::Result<T, GapError>;

/// Errors that can occur while locating a gap.
///
/// Every variant is terminal for the current attempt: nothing in the crate
/// retries internally or substitutes a default offset.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum GapError {
    /// The input bytes could not be decoded into a non-empty raster.
    #[error("decode failed: {reason}")]
    Decode { reason: String },
    /// Dimensions are zero, overflow, or the template exceeds the scene.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// No usable contour was found on the piece or in the scene.
    #[error("no contour found in {context}")]
    NoContourFound { context: &'static str },
    /// The template carries no intensity variation, so ZNCC is undefined.
    #[error("degenerate template: {reason}")]
    DegenerateTemplate { reason: &'static str },
    /// The backing buffer is shorter than the requested layout.
    #[error("buffer too small: needed {needed}, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// The stride is shorter than the row width.
    #[error("invalid stride {stride} for width {width}")]
    InvalidStride { width: usize, stride: usize },
    /// A region of interest does not fit inside its image.
    #[error("roi {width}x{height} at ({x}, {y}) exceeds {img_width}x{img_height}")]
    RoiOutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        img_width: usize,
        img_height: usize,
    },
}

impl GapError {
    pub(crate) fn decode(reason: impl Into<String>) -> Self {
        GapError::Decode {
            reason: reason.into(),
        }
    }
}
