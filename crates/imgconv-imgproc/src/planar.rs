use imgconv_image::{
    format::{chroma_plane_size, luma_plane_size},
    ImageError, ImageSize, PixelSample, Region,
};

use crate::resample::resample_bilinear;

fn split_planes<T>(data: &[T], size: ImageSize) -> Result<(&[T], &[T]), ImageError> {
    let luma = luma_plane_size(size);
    let required = luma + chroma_plane_size(size);
    if data.len() < required {
        return Err(ImageError::BufferTooSmall(data.len(), required));
    }
    Ok(data[..required].split_at(luma))
}

fn split_planes_mut<T>(data: &mut [T], size: ImageSize) -> Result<(&mut [T], &mut [T]), ImageError> {
    let luma = luma_plane_size(size);
    let required = luma + chroma_plane_size(size);
    if data.len() < required {
        return Err(ImageError::BufferTooSmall(data.len(), required));
    }
    Ok(data[..required].split_at_mut(luma))
}

fn half(size: ImageSize) -> ImageSize {
    ImageSize {
        width: size.width / 2,
        height: size.height / 2,
    }
}

/// Crop and scale a YUV 4:2:0 semi-planar image (NV12 or NV21).
///
/// The luma plane is resampled at full resolution with the given windows. The interleaved
/// chroma plane, stored right after the luma plane, is resampled at half resolution with
/// two channels and every window field halved on its own.
///
/// Odd crop or paste offsets are truncated when halved, which leaves the chroma plane up
/// to half a pixel off the luma plane.
///
/// # Arguments
///
/// * `src` - The source image data, luma plane followed by chroma plane.
/// * `src_size` - The size of the source in pixels.
/// * `crop` - The source window to read.
/// * `dst` - The destination image data.
/// * `dst_size` - The size of the destination in pixels.
/// * `paste` - The destination window to write.
///
/// # Errors
///
/// Same as [`resample_bilinear`].
pub fn resample_semi_planar<T: PixelSample>(
    src: &[T],
    src_size: ImageSize,
    crop: Region,
    dst: &mut [T],
    dst_size: ImageSize,
    paste: Region,
) -> Result<(), ImageError> {
    if src.is_empty() || dst.is_empty() {
        return Err(ImageError::NullBuffer);
    }

    let (src_y, src_uv) = split_planes(src, src_size)?;
    let (dst_y, dst_uv) = split_planes_mut(dst, dst_size)?;

    resample_bilinear(1, src_y, src_size, crop, dst_y, dst_size, paste)?;

    let (src_uv_size, dst_uv_size) = (half(src_size), half(dst_size));
    if src_uv.is_empty() || dst_uv.is_empty() {
        // single row or column images have no chroma samples
        return Ok(());
    }

    resample_bilinear(
        2,
        src_uv,
        src_uv_size,
        crop.halved(),
        dst_uv,
        dst_uv_size,
        paste.halved(),
    )
}
