use crate::{ImageSize, Rect};

/// An error type for the image conversion crates.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ImageError {
    /// Error when a buffer has no CPU accessible pixel data.
    #[error("Image buffer has no pixel data")]
    NullBuffer,

    /// Error when a read-only buffer is used as a destination.
    #[error("Image buffer is read-only and cannot be written")]
    ReadOnlyBuffer,

    /// Error when the image or rectangle dimensions are not valid.
    #[error("Invalid dimensions ({0}x{1})")]
    InvalidDimensions(usize, usize),

    /// Error when the pixel format, or a combination of formats, is not supported.
    #[error("Unsupported pixel format: {0}")]
    UnsupportedFormat(String),

    /// Error when a buffer is smaller than its pixel format requires.
    #[error("Buffer too small: got {0} bytes, expected at least {1}")]
    BufferTooSmall(usize, usize),

    /// Error when a rectangle does not fit inside the image it refers to.
    #[error("Rectangle {0} does not fit inside the image {1}")]
    InvalidRect(Rect, ImageSize),

    /// Error reported by the hardware accelerator.
    #[error("Hardware backend failed with status {0}: {1}")]
    HardwareFailure(i32, String),

    /// Error when the destination buffer cannot be allocated.
    #[error("Failed to allocate {0} bytes")]
    AllocationFailure(usize),
}
