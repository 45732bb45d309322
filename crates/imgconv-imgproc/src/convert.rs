use imgconv_image::{ImageBuffer, ImageError, ImageSize, PlaneLayout, Rect};

use crate::{planar::resample_semi_planar, resample::resample_bilinear};

/// Resolve an optional rectangle to the full image extent.
pub fn rect_or_full(rect: Option<Rect>, size: ImageSize) -> Result<Rect, ImageError> {
    match rect {
        Some(rect) => Ok(rect),
        None => Rect::full(size),
    }
}

/// Check that a paste rectangle lies inside the destination.
pub fn check_paste(paste: Rect, size: ImageSize) -> Result<(), ImageError> {
    if !paste.fits_in(size) {
        return Err(ImageError::InvalidRect(paste, size));
    }
    Ok(())
}

/// Crop, scale and letterbox an image on the CPU.
///
/// Reads `crop` from the source, scales it into `paste` of the destination and, when
/// `paste` does not cover the whole destination, first fills every byte of the
/// destination with `pad`. Both buffers must have the same pixel format.
///
/// All the checks run before the destination is written.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `dst` - The destination image. It needs writable CPU memory.
/// * `crop` - The source rectangle, the whole source if `None`.
/// * `paste` - The destination rectangle, the whole destination if `None`.
/// * `pad` - The byte written to every pixel outside `paste`.
///
/// # Errors
///
/// * [`ImageError::NullBuffer`] if a buffer has no CPU memory.
/// * [`ImageError::ReadOnlyBuffer`] if the destination is a read-only view.
/// * [`ImageError::UnsupportedFormat`] if the formats differ.
/// * [`ImageError::BufferTooSmall`] if a buffer is smaller than its format requires.
/// * [`ImageError::InvalidRect`] if `paste` leaves the destination.
///
/// # Example
///
/// ```
/// use imgconv_image::{ImageBuffer, ImageSize, PixelFormat, Rect};
/// use imgconv_imgproc::convert::convert_cpu;
///
/// let src = ImageBuffer::new(
///     ImageSize { width: 2, height: 2 },
///     PixelFormat::Gray8,
///     vec![5u8; 4],
/// )
/// .unwrap();
/// let mut dst = ImageBuffer::from_size(ImageSize { width: 4, height: 2 }, PixelFormat::Gray8).unwrap();
///
/// let paste = Rect::new(1, 0, 2, 1).unwrap();
/// convert_cpu(&src, &mut dst, None, Some(paste), 114).unwrap();
///
/// assert_eq!(dst.as_slice().unwrap(), &[114, 5, 5, 114, 114, 5, 5, 114]);
/// ```
pub fn convert_cpu(
    src: &ImageBuffer,
    dst: &mut ImageBuffer,
    crop: Option<Rect>,
    paste: Option<Rect>,
    pad: u8,
) -> Result<(), ImageError> {
    let src_data = src.as_slice().ok_or(ImageError::NullBuffer)?;

    if src.format() != dst.format() {
        return Err(ImageError::UnsupportedFormat(format!(
            "cannot convert {} to {} on the CPU",
            src.format(),
            dst.format()
        )));
    }

    let src_required = src.required_size();
    if src_data.len() < src_required {
        return Err(ImageError::BufferTooSmall(src_data.len(), src_required));
    }

    let crop = rect_or_full(crop, src.size())?;
    let paste = rect_or_full(paste, dst.size())?;
    check_paste(paste, dst.size())?;

    let (format, src_size, dst_size) = (src.format(), src.size(), dst.size());
    let dst_required = dst.required_size();

    let dst_data = dst.as_slice_mut()?;
    if dst_data.len() < dst_required {
        return Err(ImageError::BufferTooSmall(dst_data.len(), dst_required));
    }
    let dst_data = &mut dst_data[..dst_required];

    if !paste.is_full(dst_size) {
        dst_data.fill(pad);
        log::debug!("filled {dst_size} with pad value {pad:#04x}");
    }

    match format.layout() {
        PlaneLayout::Packed => resample_bilinear(
            format.channels(),
            src_data,
            src_size,
            crop.region(),
            dst_data,
            dst_size,
            paste.region(),
        ),
        PlaneLayout::SemiPlanar420 => resample_semi_planar(
            src_data,
            src_size,
            crop.region(),
            dst_data,
            dst_size,
            paste.region(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use imgconv_image::PixelFormat;

    fn size(width: usize, height: usize) -> ImageSize {
        ImageSize { width, height }
    }

    #[test]
    fn convert_identity_rgb() -> Result<(), ImageError> {
        let data = (0..4 * 3 * 3).map(|v| v as u8).collect::<Vec<_>>();
        let src = ImageBuffer::new(size(4, 3), PixelFormat::Rgb888, data.clone())?;
        let mut dst = ImageBuffer::from_size(size(4, 3), PixelFormat::Rgb888)?;

        convert_cpu(&src, &mut dst, None, None, 0)?;

        assert_eq!(dst.as_slice(), Some(data.as_slice()));
        Ok(())
    }

    #[test]
    fn convert_pads_outside_paste() -> Result<(), ImageError> {
        let src = ImageBuffer::new(size(2, 2), PixelFormat::Rgba8888, vec![200u8; 16])?;
        let mut dst = ImageBuffer::new(size(2, 4), PixelFormat::Rgba8888, vec![1u8; 32])?;

        let paste = Rect::new(0, 1, 1, 2)?;
        convert_cpu(&src, &mut dst, None, Some(paste), 114)?;

        let out = dst.as_slice().ok_or(ImageError::NullBuffer)?;
        assert!(out[..8].iter().all(|&v| v == 114));
        assert!(out[8..24].iter().all(|&v| v == 200));
        assert!(out[24..].iter().all(|&v| v == 114));
        Ok(())
    }

    #[test]
    fn convert_full_paste_does_not_pad() -> Result<(), ImageError> {
        let src = ImageBuffer::new(size(2, 2), PixelFormat::Gray8, vec![3u8; 4])?;
        let mut memory = vec![1u8; 4 + 8];
        let mut dst = ImageBuffer::from_slice_mut(size(2, 2), PixelFormat::Gray8, &mut memory)?;

        convert_cpu(&src, &mut dst, None, None, 114)?;
        drop(dst);

        // bytes past the image are not part of the conversion
        assert_eq!(&memory[..4], &[3, 3, 3, 3]);
        assert!(memory[4..].iter().all(|&v| v == 1));
        Ok(())
    }

    #[test]
    fn convert_nv12_letterbox() -> Result<(), ImageError> {
        let mut data = vec![80u8; 16];
        data.extend([100u8, 150].repeat(4));
        let src = ImageBuffer::new(size(4, 4), PixelFormat::Yuv420SpNv12, data)?;
        let mut dst = ImageBuffer::from_size(size(4, 8), PixelFormat::Yuv420SpNv12)?;

        let paste = Rect::new(0, 2, 3, 5)?;
        convert_cpu(&src, &mut dst, None, Some(paste), 0)?;

        let out = dst.as_slice().ok_or(ImageError::NullBuffer)?;
        assert!(out[..8].iter().all(|&v| v == 0));
        assert!(out[8..24].iter().all(|&v| v == 80));
        assert!(out[24..32].iter().all(|&v| v == 0));
        // chroma rows 1 and 2 of 4
        assert_eq!(&out[32..36], &[0, 0, 0, 0]);
        assert_eq!(&out[36..44], &[100, 150, 100, 150, 100, 150, 100, 150]);
        assert_eq!(&out[44..48], &[0, 0, 0, 0]);
        Ok(())
    }

    #[test]
    fn convert_rejects_before_writing() -> Result<(), ImageError> {
        let src = ImageBuffer::new(size(2, 2), PixelFormat::Gray8, vec![3u8; 4])?;
        let mut dst = ImageBuffer::new(size(2, 2), PixelFormat::Gray8, vec![9u8; 4])?;

        let paste = Rect::new(1, 1, 2, 2)?;
        let res = convert_cpu(&src, &mut dst, None, Some(paste), 0);

        assert!(matches!(res, Err(ImageError::InvalidRect(_, _))));
        assert_eq!(dst.as_slice(), Some([9u8; 4].as_slice()));
        Ok(())
    }

    #[test]
    fn convert_errors() -> Result<(), ImageError> {
        let src = ImageBuffer::new(size(2, 2), PixelFormat::Gray8, vec![3u8; 4])?;

        let mut rgb = ImageBuffer::from_size(size(2, 2), PixelFormat::Rgb888)?;
        assert!(matches!(
            convert_cpu(&src, &mut rgb, None, None, 0),
            Err(ImageError::UnsupportedFormat(_))
        ));

        let mut empty = ImageBuffer::unallocated(size(2, 2), PixelFormat::Gray8)?;
        assert_eq!(
            convert_cpu(&src, &mut empty, None, None, 0),
            Err(ImageError::NullBuffer)
        );

        let memory = vec![0u8; 4];
        let mut view = ImageBuffer::from_slice(size(2, 2), PixelFormat::Gray8, &memory)?;
        assert_eq!(
            convert_cpu(&src, &mut view, None, None, 0),
            Err(ImageError::ReadOnlyBuffer)
        );

        let no_src = ImageBuffer::unallocated(size(2, 2), PixelFormat::Gray8)?;
        let mut dst = ImageBuffer::from_size(size(2, 2), PixelFormat::Gray8)?;
        assert_eq!(
            convert_cpu(&no_src, &mut dst, None, None, 0),
            Err(ImageError::NullBuffer)
        );
        Ok(())
    }
}
