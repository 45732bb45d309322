use num_traits::{Bounded, NumCast, ToPrimitive};

use crate::{
    allocator::alloc_pixels,
    error::ImageError,
    format::{size_for, PixelFormat},
};

/// Image size in pixels
///
/// A struct to represent the size of an image in pixels.
///
/// # Examples
///
/// ```
/// use imgconv_image::ImageSize;
///
/// let image_size = ImageSize {
///   width: 10,
///   height: 20,
/// };
///
/// assert_eq!(image_size.width, 10);
/// assert_eq!(image_size.height, 20);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ImageSize {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
}

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "ImageSize {{ width: {}, height: {} }}",
            self.width, self.height
        )
    }
}

impl From<[usize; 2]> for ImageSize {
    fn from(size: [usize; 2]) -> Self {
        ImageSize {
            width: size[0],
            height: size[1],
        }
    }
}

/// Trait for the channel values the resampling kernels operate on.
pub trait PixelSample: Copy + Default {
    /// Convert the value to f32 for interpolation.
    fn to_f32(self) -> f32;

    /// Convert an interpolated value back, truncating toward zero and saturating at the
    /// bounds of the type.
    fn from_f32(x: f32) -> Self;
}

fn saturating_trunc<T: Bounded + NumCast>(x: f32) -> T {
    let lo = T::min_value().to_f32().unwrap_or(f32::MIN);
    let hi = T::max_value().to_f32().unwrap_or(f32::MAX);
    NumCast::from(x.trunc().clamp(lo, hi)).unwrap_or_else(T::min_value)
}

impl PixelSample for u8 {
    fn to_f32(self) -> f32 {
        self as f32
    }

    fn from_f32(x: f32) -> Self {
        saturating_trunc(x)
    }
}

impl PixelSample for u16 {
    fn to_f32(self) -> f32 {
        self as f32
    }

    fn from_f32(x: f32) -> Self {
        saturating_trunc(x)
    }
}

impl PixelSample for f32 {
    fn to_f32(self) -> f32 {
        self
    }

    fn from_f32(x: f32) -> Self {
        x
    }
}

/// A handle that lets a hardware accelerator reach the pixel memory without a CPU pointer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HardwareHandle {
    /// A dma-buf style file descriptor.
    Fd(i32),
    /// A physical address token.
    PhysAddr(u64),
}

impl HardwareHandle {
    /// Whether the handle can reach memory. Only descriptors above zero are valid.
    pub fn is_valid(self) -> bool {
        match self {
            HardwareHandle::Fd(fd) => fd > 0,
            HardwareHandle::PhysAddr(_) => true,
        }
    }
}

/// The pixel memory of an [`ImageBuffer`] and who owns it.
#[derive(Debug, Default)]
pub enum BufferData<'a> {
    /// Memory owned by the holder of the buffer descriptor.
    Owned(Vec<u8>),
    /// Writable caller memory. Never freed by the engine.
    Borrowed(&'a mut [u8]),
    /// Read-only caller memory, usable as a conversion source only.
    View(&'a [u8]),
    /// No CPU memory. The engine allocates it when the buffer is a letterbox destination.
    #[default]
    Unallocated,
}

/// Ownership of the memory behind an [`ImageBuffer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ownership {
    /// The descriptor owns its memory.
    Owned,
    /// The memory belongs to the caller.
    Borrowed,
    /// There is no CPU memory.
    Unallocated,
}

/// Descriptor of a pixel buffer: geometry, layout and memory.
///
/// # Examples
///
/// ```
/// use imgconv_image::{ImageBuffer, ImageSize, Ownership, PixelFormat};
///
/// let image = ImageBuffer::new(
///     ImageSize { width: 4, height: 2 },
///     PixelFormat::Rgb888,
///     vec![0u8; 4 * 2 * 3],
/// )
/// .unwrap();
///
/// assert_eq!(image.width(), 4);
/// assert_eq!(image.byte_size(), 24);
/// assert_eq!(image.ownership(), Ownership::Owned);
/// ```
#[derive(Debug)]
pub struct ImageBuffer<'a> {
    size: ImageSize,
    format: PixelFormat,
    data: BufferData<'a>,
    byte_size: usize,
    handle: Option<HardwareHandle>,
}

impl<'a> ImageBuffer<'a> {
    fn validate_geometry(size: ImageSize, format: PixelFormat) -> Result<(), ImageError> {
        if size.width == 0 || size.height == 0 {
            return Err(ImageError::InvalidDimensions(size.width, size.height));
        }
        if format.is_subsampled() && (size.width % 2 != 0 || size.height % 2 != 0) {
            return Err(ImageError::InvalidDimensions(size.width, size.height));
        }
        Ok(())
    }

    fn with_data(
        size: ImageSize,
        format: PixelFormat,
        data: BufferData<'a>,
        byte_size: usize,
    ) -> Result<Self, ImageError> {
        Self::validate_geometry(size, format)?;
        let required = size_for(format, size);
        if !matches!(data, BufferData::Unallocated) && byte_size < required {
            return Err(ImageError::BufferTooSmall(byte_size, required));
        }
        Ok(Self {
            size,
            format,
            data,
            byte_size,
            handle: None,
        })
    }

    /// Create a buffer that owns its pixel data.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::InvalidDimensions`] for empty sizes or odd sizes of
    /// semi-planar formats, and [`ImageError::BufferTooSmall`] if `data` is shorter than
    /// [`size_for`] requires.
    pub fn new(size: ImageSize, format: PixelFormat, data: Vec<u8>) -> Result<Self, ImageError> {
        let len = data.len();
        Self::with_data(size, format, BufferData::Owned(data), len)
    }

    /// Create a zero filled buffer that owns its pixel data.
    pub fn from_size(size: ImageSize, format: PixelFormat) -> Result<Self, ImageError> {
        Self::validate_geometry(size, format)?;
        let data = alloc_pixels(size_for(format, size))?;
        Self::new(size, format, data)
    }

    /// Create a writable buffer over caller memory.
    pub fn from_slice_mut(
        size: ImageSize,
        format: PixelFormat,
        data: &'a mut [u8],
    ) -> Result<Self, ImageError> {
        let len = data.len();
        Self::with_data(size, format, BufferData::Borrowed(data), len)
    }

    /// Create a read-only buffer over caller memory.
    pub fn from_slice(
        size: ImageSize,
        format: PixelFormat,
        data: &'a [u8],
    ) -> Result<Self, ImageError> {
        let len = data.len();
        Self::with_data(size, format, BufferData::View(data), len)
    }

    /// Create a buffer without CPU memory.
    ///
    /// Used as a destination it is allocated by the engine and owned by the caller after
    /// the conversion returns.
    pub fn unallocated(size: ImageSize, format: PixelFormat) -> Result<Self, ImageError> {
        Self::with_data(size, format, BufferData::Unallocated, 0)
    }

    /// Create a buffer only reachable by the hardware accelerator.
    ///
    /// `byte_size` is the declared size of the memory behind the handle.
    pub fn from_handle(
        size: ImageSize,
        format: PixelFormat,
        handle: HardwareHandle,
        byte_size: usize,
    ) -> Result<Self, ImageError> {
        Self::validate_geometry(size, format)?;
        Ok(Self {
            size,
            format,
            data: BufferData::Unallocated,
            byte_size,
            handle: Some(handle),
        })
    }

    /// Attach a hardware handle to the buffer.
    pub fn with_handle(mut self, handle: HardwareHandle) -> Self {
        self.handle = Some(handle);
        self
    }

    /// Get the size of the image in pixels.
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// Get the width of the image in pixels.
    pub fn width(&self) -> usize {
        self.size.width
    }

    /// Get the height of the image in pixels.
    pub fn height(&self) -> usize {
        self.size.height
    }

    /// Get the pixel format.
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// The declared size of the memory in bytes.
    pub fn byte_size(&self) -> usize {
        self.byte_size
    }

    /// The number of bytes the format and size require.
    pub fn required_size(&self) -> usize {
        size_for(self.format, self.size)
    }

    /// The hardware handle, if any.
    pub fn handle(&self) -> Option<HardwareHandle> {
        self.handle
    }

    /// Who owns the memory.
    pub fn ownership(&self) -> Ownership {
        match self.data {
            BufferData::Owned(_) => Ownership::Owned,
            BufferData::Borrowed(_) | BufferData::View(_) => Ownership::Borrowed,
            BufferData::Unallocated => Ownership::Unallocated,
        }
    }

    /// Whether the buffer has a handle the accelerator can use.
    pub fn has_valid_handle(&self) -> bool {
        self.handle.is_some_and(HardwareHandle::is_valid)
    }

    /// Whether the CPU memory is a read-only view.
    pub fn is_read_only(&self) -> bool {
        matches!(self.data, BufferData::View(_))
    }

    /// Whether the buffer has CPU accessible memory.
    pub fn is_allocated(&self) -> bool {
        !matches!(self.data, BufferData::Unallocated)
    }

    /// Get the pixel data, if the buffer has CPU memory.
    pub fn as_slice(&self) -> Option<&[u8]> {
        match &self.data {
            BufferData::Owned(data) => Some(data.as_slice()),
            BufferData::Borrowed(data) => Some(data),
            BufferData::View(data) => Some(data),
            BufferData::Unallocated => None,
        }
    }

    /// Get the pixel data mutably.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::NullBuffer`] without CPU memory and
    /// [`ImageError::ReadOnlyBuffer`] for views.
    pub fn as_slice_mut(&mut self) -> Result<&mut [u8], ImageError> {
        match &mut self.data {
            BufferData::Owned(data) => Ok(data.as_mut_slice()),
            BufferData::Borrowed(data) => Ok(data),
            BufferData::View(_) => Err(ImageError::ReadOnlyBuffer),
            BufferData::Unallocated => Err(ImageError::NullBuffer),
        }
    }

    /// Allocate CPU memory for an unallocated buffer.
    ///
    /// Does nothing if the buffer already has memory. On failure the buffer stays
    /// unallocated.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::AllocationFailure`] if the memory cannot be reserved.
    pub fn allocate(&mut self) -> Result<(), ImageError> {
        if self.is_allocated() {
            return Ok(());
        }
        let required = self.required_size();
        self.data = BufferData::Owned(alloc_pixels(required)?);
        self.byte_size = required;
        Ok(())
    }

    /// Consume the buffer and return its pixel data as an owned vector.
    ///
    /// Borrowed memory is copied.
    pub fn into_vec(self) -> Option<Vec<u8>> {
        match self.data {
            BufferData::Owned(data) => Some(data),
            BufferData::Borrowed(data) => Some(data.to_vec()),
            BufferData::View(data) => Some(data.to_vec()),
            BufferData::Unallocated => None,
        }
    }
}
