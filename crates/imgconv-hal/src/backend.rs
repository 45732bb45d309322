use std::fmt;

use imgconv_image::{HardwareHandle, ImageBuffer, ImageSize, PixelFormat, Region};

/// Status code returned by an accelerator call. Values above zero are successes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HwStatus(pub i32);

impl HwStatus {
    /// The canonical success status.
    pub const SUCCESS: HwStatus = HwStatus(1);

    /// Whether the call succeeded.
    pub fn is_success(self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for HwStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque token for a buffer imported into the accelerator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HwHandle(pub u32);

/// The memory an accelerator import refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HwMemory {
    /// A physical address.
    Physical(u64),
    /// A dma-buf style file descriptor.
    Fd(i32),
    /// CPU memory, given by its address and length.
    Virtual {
        /// Address of the first byte.
        addr: usize,
        /// Length in bytes.
        len: usize,
    },
}

impl HwMemory {
    /// Pick the memory an accelerator should use for `image`.
    ///
    /// A physical address wins over a file descriptor, which wins over CPU memory. Only
    /// descriptors above zero are considered valid.
    pub fn of(image: &ImageBuffer) -> Option<HwMemory> {
        match image.handle().filter(|h| h.is_valid()) {
            Some(HardwareHandle::PhysAddr(addr)) => return Some(HwMemory::Physical(addr)),
            Some(HardwareHandle::Fd(fd)) => return Some(HwMemory::Fd(fd)),
            None => {}
        }
        image.as_slice().map(|data| HwMemory::Virtual {
            addr: data.as_ptr() as usize,
            len: data.len(),
        })
    }

    /// Pick the memory an accelerator may write for `image`.
    ///
    /// Same as [`of`](Self::of), except that read-only CPU memory is never offered.
    pub fn of_writable(image: &ImageBuffer) -> Option<HwMemory> {
        match HwMemory::of(image) {
            Some(HwMemory::Virtual { .. }) if image.is_read_only() => None,
            memory => memory,
        }
    }
}

/// What the accelerator needs to import a buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HwBufferDesc {
    /// Size of the image in pixels.
    pub size: ImageSize,
    /// The accelerator's own format code.
    pub format: u32,
    /// Where the pixels live.
    pub memory: HwMemory,
}

/// An imported source buffer handed to [`HardwareBackend::process`].
///
/// `data` is the CPU view of the pixels when the buffer has one.
#[derive(Debug)]
pub struct HwSurface<'a> {
    /// The import handle.
    pub handle: HwHandle,
    /// Size of the image in pixels.
    pub size: ImageSize,
    /// The accelerator's own format code.
    pub format: u32,
    /// CPU view of the pixels.
    pub data: Option<&'a [u8]>,
}

/// An imported destination buffer.
#[derive(Debug)]
pub struct HwSurfaceMut<'a> {
    /// The import handle.
    pub handle: HwHandle,
    /// Size of the image in pixels.
    pub size: ImageSize,
    /// The accelerator's own format code.
    pub format: u32,
    /// Writable CPU view of the pixels.
    pub data: Option<&'a mut [u8]>,
}

/// Usage bits forwarded untouched to [`HardwareBackend::process`].
///
/// The conversion engine never sets any of them itself.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TransformFlags(u32);

impl TransformFlags {
    /// No transform.
    pub const NONE: TransformFlags = TransformFlags(0);
    /// Rotate by 90 degrees.
    pub const ROTATE_90: TransformFlags = TransformFlags(1 << 0);
    /// Rotate by 180 degrees.
    pub const ROTATE_180: TransformFlags = TransformFlags(1 << 1);
    /// Rotate by 270 degrees.
    pub const ROTATE_270: TransformFlags = TransformFlags(1 << 2);
    /// Mirror horizontally.
    pub const FLIP_H: TransformFlags = TransformFlags(1 << 3);
    /// Mirror vertically.
    pub const FLIP_V: TransformFlags = TransformFlags(1 << 4);

    /// Create flags from raw bits.
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// The raw bits.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Whether no bit is set.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Whether every bit of `other` is set.
    pub const fn contains(self, other: TransformFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for TransformFlags {
    type Output = TransformFlags;

    fn bitor(self, rhs: TransformFlags) -> TransformFlags {
        TransformFlags(self.0 | rhs.0)
    }
}

/// Contract of a fixed function 2D accelerator able to crop, scale and fill images.
///
/// Every method takes `&self` so several imports can be alive while a job runs. An
/// implementation that needs mutable state keeps it behind interior mutability.
pub trait HardwareBackend {
    /// A short name used in log messages.
    fn name(&self) -> &str;

    /// Map a pixel format to the accelerator's format code, `None` if unsupported.
    fn native_format(&self, format: PixelFormat) -> Option<u32>;

    /// Import a buffer so it can be used by [`fill`](Self::fill) and
    /// [`process`](Self::process).
    ///
    /// # Errors
    ///
    /// Returns the failing status if the buffer cannot be imported.
    fn import(&self, desc: &HwBufferDesc) -> Result<HwHandle, HwStatus>;

    /// Release a handle returned by [`import`](Self::import).
    fn release(&self, handle: HwHandle);

    /// Fill `rect` of `dst` with `color`, the pad byte replicated into every byte.
    fn fill(&self, dst: &mut HwSurfaceMut, rect: Region, color: u32) -> HwStatus;

    /// Crop `crop` from `src`, scale it and write it into `paste` of `dst`.
    fn process(
        &self,
        src: &HwSurface,
        dst: &mut HwSurfaceMut,
        crop: Region,
        paste: Region,
        flags: TransformFlags,
    ) -> HwStatus;

    /// A readable message for a failing status.
    fn status_message(&self, status: HwStatus) -> String;
}

impl<B: HardwareBackend + ?Sized> HardwareBackend for &B {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn native_format(&self, format: PixelFormat) -> Option<u32> {
        (**self).native_format(format)
    }

    fn import(&self, desc: &HwBufferDesc) -> Result<HwHandle, HwStatus> {
        (**self).import(desc)
    }

    fn release(&self, handle: HwHandle) {
        (**self).release(handle)
    }

    fn fill(&self, dst: &mut HwSurfaceMut, rect: Region, color: u32) -> HwStatus {
        (**self).fill(dst, rect, color)
    }

    fn process(
        &self,
        src: &HwSurface,
        dst: &mut HwSurfaceMut,
        crop: Region,
        paste: Region,
        flags: TransformFlags,
    ) -> HwStatus {
        (**self).process(src, dst, crop, paste, flags)
    }

    fn status_message(&self, status: HwStatus) -> String {
        (**self).status_message(status)
    }
}

/// A backend for builds without an accelerator. It supports no format, so every
/// conversion takes the software path.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoHardware;

impl HardwareBackend for NoHardware {
    fn name(&self) -> &str {
        "none"
    }

    fn native_format(&self, _format: PixelFormat) -> Option<u32> {
        None
    }

    fn import(&self, _desc: &HwBufferDesc) -> Result<HwHandle, HwStatus> {
        Err(HwStatus(-1))
    }

    fn release(&self, _handle: HwHandle) {}

    fn fill(&self, _dst: &mut HwSurfaceMut, _rect: Region, _color: u32) -> HwStatus {
        HwStatus(-1)
    }

    fn process(
        &self,
        _src: &HwSurface,
        _dst: &mut HwSurfaceMut,
        _crop: Region,
        _paste: Region,
        _flags: TransformFlags,
    ) -> HwStatus {
        HwStatus(-1)
    }

    fn status_message(&self, _status: HwStatus) -> String {
        "no hardware accelerator".to_string()
    }
}

/// An imported handle, released when the guard is dropped.
pub struct ImportGuard<'b, B: HardwareBackend + ?Sized> {
    backend: &'b B,
    handle: HwHandle,
}

impl<'b, B: HardwareBackend + ?Sized> ImportGuard<'b, B> {
    /// Import `desc` into `backend`.
    ///
    /// # Errors
    ///
    /// Returns the failing status if the import fails. Nothing needs releasing then.
    pub fn import(backend: &'b B, desc: &HwBufferDesc) -> Result<Self, HwStatus> {
        let handle = backend.import(desc)?;
        Ok(Self { backend, handle })
    }

    /// The imported handle.
    pub fn handle(&self) -> HwHandle {
        self.handle
    }
}

impl<B: HardwareBackend + ?Sized> Drop for ImportGuard<'_, B> {
    fn drop(&mut self) {
        self.backend.release(self.handle);
    }
}
