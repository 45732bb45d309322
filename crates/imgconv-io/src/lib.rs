#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// JPEG and PNG decoding and encoding in memory.
pub mod codec;

/// Error types for I/O operations.
pub mod error;

/// High-level image reading and writing functions.
///
/// Files are dispatched on their extension. See [`functional::read_image`] and
/// [`functional::write_image`].
pub mod functional;

/// Listing the image files of a directory.
pub mod scan;

pub use crate::error::IoError;
