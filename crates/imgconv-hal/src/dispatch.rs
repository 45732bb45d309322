use imgconv_image::{ImageBuffer, ImageError, Rect};
use imgconv_imgproc::{
    convert::{check_paste, convert_cpu, rect_or_full},
    letterbox::{compute_letterbox, Letterbox},
};

use crate::{
    backend::{
        HardwareBackend, HwBufferDesc, HwMemory, HwStatus, HwSurface, HwSurfaceMut,
        ImportGuard, TransformFlags,
    },
    config::DispatchConfig,
};

/// The path that produced a conversion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backend {
    /// The hardware accelerator.
    Hardware,
    /// The portable CPU implementation.
    Software,
}

/// Choose the path for a conversion.
///
/// The accelerator is used only when it is present and enabled, knows both pixel
/// formats, and both image widths are multiples of `config.alignment`.
pub fn select_backend<B: HardwareBackend + ?Sized>(
    config: &DispatchConfig,
    hardware: Option<&B>,
    src: &ImageBuffer,
    dst: &ImageBuffer,
) -> Backend {
    let Some(hardware) = hardware else {
        return Backend::Software;
    };

    if !config.hardware_enabled {
        return Backend::Software;
    }

    let formats_ok = hardware.native_format(src.format()).is_some()
        && hardware.native_format(dst.format()).is_some();
    let aligned = config.is_aligned(src.width()) && config.is_aligned(dst.width());

    if formats_ok && aligned {
        Backend::Hardware
    } else {
        log::debug!(
            "{} not usable for {}x{} {} -> {}x{} {} (alignment {})",
            hardware.name(),
            src.width(),
            src.height(),
            src.format(),
            dst.width(),
            dst.height(),
            dst.format(),
            config.alignment
        );
        Backend::Software
    }
}

fn hardware_error<B: HardwareBackend + ?Sized>(backend: &B, status: HwStatus) -> ImageError {
    ImageError::HardwareFailure(status.0, backend.status_message(status))
}

fn describe<B: HardwareBackend + ?Sized>(
    backend: &B,
    image: &ImageBuffer,
    memory: Option<HwMemory>,
) -> Result<HwBufferDesc, ImageError> {
    let format = backend.native_format(image.format()).ok_or_else(|| {
        ImageError::UnsupportedFormat(format!("{} has no {} format", backend.name(), image.format()))
    })?;
    let memory = memory.ok_or(ImageError::NullBuffer)?;
    Ok(HwBufferDesc {
        size: image.size(),
        format,
        memory,
    })
}

/// Crop, scale and letterbox an image on the accelerator.
///
/// Both images are imported for the duration of the call and released on every return
/// path. When `paste` does not cover the destination, the whole destination is first
/// filled with `pad`; if the accelerator cannot fill it, the CPU does when the
/// destination has CPU memory.
///
/// # Errors
///
/// * [`ImageError::UnsupportedFormat`] if the backend does not know a format.
/// * [`ImageError::NullBuffer`] if an image has neither a handle nor CPU memory.
/// * [`ImageError::ReadOnlyBuffer`] if the destination is a read-only view without a
///   handle.
/// * [`ImageError::HardwareFailure`] if an import or the processing fails.
pub fn convert_hardware<B: HardwareBackend + ?Sized>(
    backend: &B,
    src: &ImageBuffer,
    dst: &mut ImageBuffer,
    crop: Rect,
    paste: Rect,
    pad: u8,
    flags: TransformFlags,
) -> Result<(), ImageError> {
    if dst.is_read_only() && !dst.has_valid_handle() {
        return Err(ImageError::ReadOnlyBuffer);
    }
    let src_desc = describe(backend, src, HwMemory::of(src))?;
    let dst_desc = describe(backend, dst, HwMemory::of_writable(dst))?;

    let src_import =
        ImportGuard::import(backend, &src_desc).map_err(|s| hardware_error(backend, s))?;
    let dst_import =
        ImportGuard::import(backend, &dst_desc).map_err(|s| hardware_error(backend, s))?;

    let dst_size = dst.size();
    let dst_required = dst.required_size();

    let src_surface = HwSurface {
        handle: src_import.handle(),
        size: src_desc.size,
        format: src_desc.format,
        data: src.as_slice(),
    };
    let mut dst_surface = HwSurfaceMut {
        handle: dst_import.handle(),
        size: dst_desc.size,
        format: dst_desc.format,
        data: dst.as_slice_mut().ok(),
    };

    if !paste.is_full(dst_size) {
        let color = u32::from_be_bytes([pad; 4]);
        let whole = Rect::full(dst_size)?.region();
        let status = backend.fill(&mut dst_surface, whole, color);
        if !status.is_success() {
            match dst_surface.data.as_deref_mut() {
                Some(data) => {
                    let len = dst_required.min(data.len());
                    data[..len].fill(pad);
                    log::warn!(
                        "{} fill failed ({}), padded on the CPU",
                        backend.name(),
                        backend.status_message(status)
                    );
                }
                None => log::warn!(
                    "{} fill failed ({}) and the destination has no CPU memory",
                    backend.name(),
                    backend.status_message(status)
                ),
            }
        } else {
            log::debug!("{} filled {dst_size} with {color:#010x}", backend.name());
        }
    }

    let status = backend.process(
        &src_surface,
        &mut dst_surface,
        crop.region(),
        paste.region(),
        flags,
    );
    if !status.is_success() {
        return Err(hardware_error(backend, status));
    }

    log::debug!("{} converted {crop} -> {paste}", backend.name());
    Ok(())
}

/// Converts images on the accelerator when possible and on the CPU otherwise.
///
/// # Example
///
/// ```
/// use imgconv_hal::{Converter, DispatchConfig, NoHardware};
/// use imgconv_image::{ImageBuffer, ImageSize, PixelFormat};
///
/// let converter = Converter::<NoHardware>::new(DispatchConfig::default(), None);
///
/// let src = ImageBuffer::new(
///     ImageSize { width: 4, height: 2 },
///     PixelFormat::Gray8,
///     vec![10u8; 8],
/// )
/// .unwrap();
/// let mut dst = ImageBuffer::unallocated(ImageSize { width: 4, height: 4 }, PixelFormat::Gray8)
///     .unwrap();
///
/// let letterbox = converter.convert_with_letterbox(&src, &mut dst, 0).unwrap();
///
/// assert_eq!(letterbox.y_pad, 0);
/// assert_eq!(&dst.as_slice().unwrap()[..4], &[10, 10, 10, 10]);
/// ```
#[derive(Debug)]
pub struct Converter<B> {
    config: DispatchConfig,
    hardware: Option<B>,
}

impl<B: HardwareBackend> Converter<B> {
    /// Create a converter using `hardware` when present.
    pub fn new(config: DispatchConfig, hardware: Option<B>) -> Self {
        Self { config, hardware }
    }

    /// The dispatch configuration.
    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// The accelerator, if any.
    pub fn hardware(&self) -> Option<&B> {
        self.hardware.as_ref()
    }

    /// The path [`convert`](Self::convert) would try first for these images.
    pub fn select(&self, src: &ImageBuffer, dst: &ImageBuffer) -> Backend {
        select_backend(&self.config, self.hardware.as_ref(), src, dst)
    }

    /// Crop `crop` from `src`, scale it into `paste` of `dst` and pad the rest with `pad`.
    ///
    /// `None` rectangles cover the whole image. If the accelerator fails, the whole
    /// conversion is run again on the CPU, once.
    ///
    /// # Returns
    ///
    /// The path that produced the destination.
    ///
    /// # Errors
    ///
    /// * [`ImageError::BufferTooSmall`] if the destination is smaller than its format needs.
    /// * [`ImageError::InvalidRect`] if `paste` leaves the destination.
    /// * [`ImageError::ReadOnlyBuffer`] if the destination is a read-only view.
    /// * Any error of [`convert_cpu`] once the software path runs.
    pub fn convert(
        &self,
        src: &ImageBuffer,
        dst: &mut ImageBuffer,
        crop: Option<Rect>,
        paste: Option<Rect>,
        pad: u8,
    ) -> Result<Backend, ImageError> {
        let crop = rect_or_full(crop, src.size())?;
        let paste = rect_or_full(paste, dst.size())?;

        let required = dst.required_size();
        if dst.byte_size() < required {
            return Err(ImageError::BufferTooSmall(dst.byte_size(), required));
        }
        check_paste(paste, dst.size())?;
        if dst.is_read_only() {
            return Err(ImageError::ReadOnlyBuffer);
        }

        if let (Backend::Hardware, Some(hardware)) = (self.select(src, dst), self.hardware.as_ref())
        {
            log::debug!("converting {crop} -> {paste} on {}", hardware.name());
            match convert_hardware(hardware, src, dst, crop, paste, pad, self.config.transform) {
                Ok(()) => return Ok(Backend::Hardware),
                Err(err) => {
                    log::warn!("{} failed: {err}, falling back to the CPU", hardware.name());
                }
            }
        }

        log::debug!("converting {crop} -> {paste} on the CPU");
        convert_cpu(src, dst, Some(crop), Some(paste), pad)?;
        Ok(Backend::Software)
    }

    /// Fit the whole of `src` into `dst`, keeping its aspect ratio, and pad the borders.
    ///
    /// A destination without CPU memory and without a valid hardware handle is allocated
    /// here and owned by the caller afterwards.
    ///
    /// # Returns
    ///
    /// How the source was placed, to map destination coordinates back to the source.
    ///
    /// # Errors
    ///
    /// * [`ImageError::AllocationFailure`] if the destination cannot be allocated. The
    ///   destination stays unallocated.
    /// * [`ImageError::BufferTooSmall`] if a supplied destination is too small.
    /// * Any error of [`convert`](Self::convert).
    pub fn convert_with_letterbox(
        &self,
        src: &ImageBuffer,
        dst: &mut ImageBuffer,
        pad: u8,
    ) -> Result<Letterbox, ImageError> {
        let (paste, letterbox) = compute_letterbox(src.size(), dst.size(), self.config.letterbox)?;

        if !dst.is_allocated() && !dst.has_valid_handle() {
            dst.allocate()?;
            log::debug!("allocated {} bytes for the letterbox", dst.byte_size());
        } else if dst.byte_size() < dst.required_size() {
            return Err(ImageError::BufferTooSmall(dst.byte_size(), dst.required_size()));
        }

        let backend = self.convert(src, dst, None, Some(paste), pad)?;
        log::debug!(
            "letterboxed {} into {} at scale {} on {backend:?}",
            src.size(),
            paste,
            letterbox.scale
        );

        Ok(letterbox)
    }
}
