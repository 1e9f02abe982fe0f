//! Error types for tilematch.

use thiserror::Error;

/// Result alias for tilematch operations.
pub type TileMatchResult<T> = std::result::Result<T, TileMatchError>;

/// Errors that can occur while building images, configuring the pipeline or
/// loading files.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TileMatchError {
    /// Width or height is zero, or their product overflows.
    #[error("invalid image dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// Row stride is shorter than the row width.
    #[error("stride {stride} is smaller than width {width}")]
    InvalidStride { width: usize, stride: usize },
    /// Backing buffer does not hold enough samples.
    #[error("buffer too small: needed {needed} samples, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// Requested region does not fit inside the image.
    #[error(
        "region {width}x{height} at ({x}, {y}) exceeds image bounds {img_width}x{img_height}"
    )]
    RoiOutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        img_width: usize,
        img_height: usize,
    },
    /// An image file could not be opened or decoded.
    #[error("failed to load image {path}: {reason}")]
    ImageIo { path: String, reason: String },
    /// A candidate directory does not exist or cannot be listed.
    #[error("cannot list directory {path}: {reason}")]
    DirectoryUnavailable { path: String, reason: String },
    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}
