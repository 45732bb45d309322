#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Fallible allocation of pixel memory.
pub mod allocator;

/// Error types for the image module.
pub mod error;

/// Pixel format catalog and buffer size calculation.
pub mod format;

/// image buffer descriptors and their memory.
pub mod image;

/// Rectangles and working regions.
pub mod rect;

pub use crate::error::ImageError;
pub use crate::format::{size_for, PixelFormat, PlaneLayout};
pub use crate::image::{BufferData, HardwareHandle, ImageBuffer, ImageSize, Ownership, PixelSample};
pub use crate::rect::{Rect, Region};
