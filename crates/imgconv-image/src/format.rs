use std::{fmt, str::FromStr};

use crate::{error::ImageError, ImageSize};

/// How the planes of a pixel format are laid out in memory.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaneLayout {
    /// A single plane with interleaved channels.
    Packed,
    /// A full resolution luma plane followed by an interleaved two channel chroma plane
    /// subsampled by two on both axes.
    SemiPlanar420,
}

/// Pixel layouts supported by the conversion engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// 8-bit grayscale, one byte per pixel.
    Gray8,
    /// 8-bit RGB, three interleaved bytes per pixel.
    Rgb888,
    /// 8-bit RGBA, four interleaved bytes per pixel.
    Rgba8888,
    /// YUV 4:2:0 semi-planar with UV chroma order.
    Yuv420SpNv12,
    /// YUV 4:2:0 semi-planar with VU chroma order.
    Yuv420SpNv21,
}

struct FormatInfo {
    channels: usize,
    layout: PlaneLayout,
    name: &'static str,
}

impl PixelFormat {
    /// All the supported pixel formats.
    pub const ALL: [PixelFormat; 5] = [
        PixelFormat::Gray8,
        PixelFormat::Rgb888,
        PixelFormat::Rgba8888,
        PixelFormat::Yuv420SpNv12,
        PixelFormat::Yuv420SpNv21,
    ];

    const fn info(&self) -> FormatInfo {
        match self {
            PixelFormat::Gray8 => FormatInfo {
                channels: 1,
                layout: PlaneLayout::Packed,
                name: "gray8",
            },
            PixelFormat::Rgb888 => FormatInfo {
                channels: 3,
                layout: PlaneLayout::Packed,
                name: "rgb888",
            },
            PixelFormat::Rgba8888 => FormatInfo {
                channels: 4,
                layout: PlaneLayout::Packed,
                name: "rgba8888",
            },
            PixelFormat::Yuv420SpNv12 => FormatInfo {
                channels: 1,
                layout: PlaneLayout::SemiPlanar420,
                name: "nv12",
            },
            PixelFormat::Yuv420SpNv21 => FormatInfo {
                channels: 1,
                layout: PlaneLayout::SemiPlanar420,
                name: "nv21",
            },
        }
    }

    /// Number of interleaved channels of the first plane.
    ///
    /// For semi-planar formats this is the luma plane, the chroma plane always has two.
    pub const fn channels(&self) -> usize {
        self.info().channels
    }

    /// The plane layout of the format.
    pub const fn layout(&self) -> PlaneLayout {
        self.info().layout
    }

    /// Number of memory planes.
    pub const fn num_planes(&self) -> usize {
        match self.layout() {
            PlaneLayout::Packed => 1,
            PlaneLayout::SemiPlanar420 => 2,
        }
    }

    /// Whether the format stores chroma at reduced resolution.
    pub const fn is_subsampled(&self) -> bool {
        matches!(self.layout(), PlaneLayout::SemiPlanar420)
    }

    /// Total number of bytes needed to store an image of the given size.
    ///
    /// See [`size_for`].
    pub fn buffer_size(&self, size: ImageSize) -> usize {
        size_for(*self, size)
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.info().name)
    }
}

impl FromStr for PixelFormat {
    type Err = ImageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.to_ascii_lowercase();
        PixelFormat::ALL
            .into_iter()
            .find(|format| format.info().name == name)
            .ok_or(ImageError::UnsupportedFormat(s.to_string()))
    }
}

/// Compute the total byte size of an image buffer.
///
/// Semi-planar formats use `w * h * 3 / 2` with integer division, which truncates for odd
/// dimensions. [`crate::ImageBuffer`] rejects odd sizes for those formats.
///
/// # Example
///
/// ```
/// use imgconv_image::{size_for, ImageSize, PixelFormat};
///
/// let size = ImageSize { width: 4, height: 4 };
///
/// assert_eq!(size_for(PixelFormat::Rgb888, size), 48);
/// assert_eq!(size_for(PixelFormat::Yuv420SpNv12, size), 24);
/// ```
pub fn size_for(format: PixelFormat, size: ImageSize) -> usize {
    let pixels = size.width * size.height;
    match format.layout() {
        PlaneLayout::Packed => pixels * format.channels(),
        PlaneLayout::SemiPlanar420 => pixels * 3 / 2,
    }
}

/// Size in bytes of the luma plane of a semi-planar image.
pub fn luma_plane_size(size: ImageSize) -> usize {
    size.width * size.height
}

/// Size in bytes of the interleaved chroma plane of a semi-planar image.
pub fn chroma_plane_size(size: ImageSize) -> usize {
    (size.width / 2) * (size.height / 2) * 2
}
