#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// software conversion of whole buffers.
pub mod convert;

/// aspect preserving placement of an image inside another.
pub mod letterbox;

/// semi-planar YUV 4:2:0 plane handling.
pub mod planar;

/// bilinear crop and scale of packed buffers.
pub mod resample;
