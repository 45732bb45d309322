use imgconv_image::{ImageError, ImageSize, PixelSample, Rect, Region};

/// Source coordinates of one output column or row.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Taps {
    i0: usize,
    i1: usize,
    frac: f32,
}

/// Map an output offset inside the paste window to its two source neighbours.
///
/// Neighbours are clamped first to the crop window and then, once shifted by the crop
/// offset, to the source extent, so crops reaching outside the image repeat edge pixels.
#[inline]
fn taps(offset: usize, ratio: f32, crop_start: usize, crop_len: usize, src_len: usize) -> Taps {
    let s = offset as f32 * ratio;
    let i0 = (s as usize).min(crop_len.saturating_sub(1));
    let i1 = if i0 + 1 < crop_len { i0 + 1 } else { i0 };
    let frac = s - i0 as f32;

    let last = src_len - 1;
    Taps {
        i0: (crop_start + i0).min(last),
        i1: (crop_start + i1).min(last),
        frac,
    }
}

/// Crop a window of the source and scale it into a window of the destination.
///
/// The buffers are packed row-major with `channels` interleaved values per pixel. For
/// every destination pixel inside `paste` the position inside `crop` is found with the
/// per axis ratio `crop / paste`, and each channel is blended from the four surrounding
/// source samples with bilinear weights, then truncated to `T`. Pixels outside `paste`
/// are left untouched.
///
/// # Arguments
///
/// * `channels` - The number of interleaved channels per pixel.
/// * `src` - The source samples.
/// * `src_size` - The size of the source in pixels.
/// * `crop` - The source window to read. It may reach outside the source.
/// * `dst` - The destination samples.
/// * `dst_size` - The size of the destination in pixels.
/// * `paste` - The destination window to write. It must lie inside the destination.
///
/// # Errors
///
/// * [`ImageError::NullBuffer`] if a buffer is empty.
/// * [`ImageError::BufferTooSmall`] if a buffer is shorter than its size requires.
/// * [`ImageError::InvalidRect`] if `paste` leaves the destination.
/// * [`ImageError::InvalidDimensions`] if `channels` is zero or an image is empty.
///
/// # Example
///
/// ```
/// use imgconv_image::{ImageSize, Region};
/// use imgconv_imgproc::resample::resample_bilinear;
///
/// let src = [0u8, 100, 200, 250];
/// let mut dst = [0u8; 2];
///
/// resample_bilinear(
///     1,
///     &src,
///     ImageSize { width: 4, height: 1 },
///     Region { x: 0, y: 0, width: 4, height: 1 },
///     &mut dst,
///     ImageSize { width: 2, height: 1 },
///     Region { x: 0, y: 0, width: 2, height: 1 },
/// )
/// .unwrap();
///
/// assert_eq!(dst, [0, 200]);
/// ```
pub fn resample_bilinear<T: PixelSample>(
    channels: usize,
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

    if channels == 0 {
        return Err(ImageError::InvalidDimensions(0, 0));
    }

    for size in [src_size, dst_size] {
        if size.width == 0 || size.height == 0 {
            return Err(ImageError::InvalidDimensions(size.width, size.height));
        }
    }

    let src_len = src_size.width * src_size.height * channels;
    if src.len() < src_len {
        return Err(ImageError::BufferTooSmall(src.len(), src_len));
    }

    let dst_len = dst_size.width * dst_size.height * channels;
    if dst.len() < dst_len {
        return Err(ImageError::BufferTooSmall(dst.len(), dst_len));
    }

    if paste.is_empty() {
        return Ok(());
    }

    if !paste.fits_in(dst_size) {
        let rect = Rect {
            left: paste.x,
            top: paste.y,
            right: paste.x + paste.width - 1,
            bottom: paste.y + paste.height - 1,
        };
        return Err(ImageError::InvalidRect(rect, dst_size));
    }

    let x_ratio = crop.width as f32 / paste.width as f32;
    let y_ratio = crop.height as f32 / paste.height as f32;

    // the horizontal taps are the same for every row
    let x_taps = (0..paste.width)
        .map(|dx| taps(dx, x_ratio, crop.x, crop.width, src_size.width))
        .collect::<Vec<_>>();

    let src_stride = src_size.width * channels;
    let dst_stride = dst_size.width * channels;

    for dy in 0..paste.height {
        let ty = taps(dy, y_ratio, crop.y, crop.height, src_size.height);
        let row0 = &src[ty.i0 * src_stride..(ty.i0 + 1) * src_stride];
        let row1 = &src[ty.i1 * src_stride..(ty.i1 + 1) * src_stride];

        let dst_start = (paste.y + dy) * dst_stride + paste.x * channels;
        let dst_row = &mut dst[dst_start..dst_start + paste.width * channels];

        for (out, tx) in dst_row.chunks_exact_mut(channels).zip(x_taps.iter()) {
            let w00 = (1.0 - tx.frac) * (1.0 - ty.frac);
            let w01 = tx.frac * (1.0 - ty.frac);
            let w10 = (1.0 - tx.frac) * ty.frac;
            let w11 = tx.frac * ty.frac;

            let (a, b) = (tx.i0 * channels, tx.i1 * channels);
            for (k, value) in out.iter_mut().enumerate() {
                let p00 = row0[a + k].to_f32();
                let p01 = row0[b + k].to_f32();
                let p10 = row1[a + k].to_f32();
                let p11 = row1[b + k].to_f32();

                *value = T::from_f32(p00 * w00 + p01 * w01 + p10 * w10 + p11 * w11);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full(size: ImageSize) -> Region {
        Region {
            x: 0,
            y: 0,
            width: size.width,
            height: size.height,
        }
    }

    #[test]
    fn taps_double_clamp() {
        // last column of a crop hanging past the right border
        let t = taps(3, 1.0, 2, 4, 4);
        assert_eq!((t.i0, t.i1), (3, 3));
        assert_eq!(t.frac, 0.0);

        // crop fully outside the source
        let t = taps(0, 1.0, 10, 2, 4);
        assert_eq!((t.i0, t.i1), (3, 3));
    }

    #[test]
    fn resample_identity() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 3,
            height: 2,
        };
        #[rustfmt::skip]
        let src = vec![
            0u8, 1, 2, 3, 4, 5, 6, 7, 8,
            9u8, 10, 11, 12, 13, 14, 15, 16, 17,
        ];
        let mut dst = vec![0u8; src.len()];

        resample_bilinear(3, &src, size, full(size), &mut dst, size, full(size))?;

        assert_eq!(dst, src);
        Ok(())
    }

    #[test]
    fn resample_upscale() -> Result<(), ImageError> {
        let src_size = ImageSize {
            width: 2,
            height: 1,
        };
        let dst_size = ImageSize {
            width: 4,
            height: 1,
        };
        let src = vec![0u8, 100];
        let mut dst = vec![0u8; 4];

        resample_bilinear(1, &src, src_size, full(src_size), &mut dst, dst_size, full(dst_size))?;

        // ratio 0.5: 0, 0.5, 1.0, 1.5 -> the last two clamp to the edge
        assert_eq!(dst, vec![0, 50, 100, 100]);
        Ok(())
    }

    #[test]
    fn resample_paste_window() -> Result<(), ImageError> {
        let src_size = ImageSize {
            width: 2,
            height: 2,
        };
        let dst_size = ImageSize {
            width: 4,
            height: 4,
        };
        let src = vec![9u8; 4];
        let mut dst = vec![1u8; 16];

        let paste = Region {
            x: 1,
            y: 1,
            width: 2,
            height: 2,
        };
        resample_bilinear(1, &src, src_size, full(src_size), &mut dst, dst_size, paste)?;

        #[rustfmt::skip]
        let expected = vec![
            1u8, 1, 1, 1,
            1u8, 9, 9, 1,
            1u8, 9, 9, 1,
            1u8, 1, 1, 1,
        ];
        assert_eq!(dst, expected);
        Ok(())
    }

    #[test]
    fn resample_crop_out_of_bounds() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 4,
            height: 1,
        };
        let src = vec![10u8, 20, 30, 40];
        let mut dst = vec![0u8; 4];

        let crop = Region {
            x: 2,
            y: 0,
            width: 4,
            height: 1,
        };
        resample_bilinear(1, &src, size, crop, &mut dst, size, full(size))?;

        assert_eq!(dst, vec![30, 40, 40, 40]);
        Ok(())
    }

    #[test]
    fn resample_errors() {
        let size = ImageSize {
            width: 2,
            height: 2,
        };
        let src = vec![0u8; 4];
        let mut dst = vec![0u8; 4];

        let res = resample_bilinear::<u8>(1, &[], size, full(size), &mut dst, size, full(size));
        assert_eq!(res, Err(ImageError::NullBuffer));

        let res = resample_bilinear(2, &src, size, full(size), &mut dst, size, full(size));
        assert_eq!(res, Err(ImageError::BufferTooSmall(4, 8)));

        let paste = Region {
            x: 1,
            y: 0,
            width: 2,
            height: 2,
        };
        let res = resample_bilinear(1, &src, size, full(size), &mut dst, size, paste);
        assert!(matches!(res, Err(ImageError::InvalidRect(_, _))));
    }

    #[test]
    fn resample_f32() -> Result<(), ImageError> {
        let src_size = ImageSize {
            width: 2,
            height: 2,
        };
        let dst_size = ImageSize {
            width: 3,
            height: 3,
        };
        let src = vec![0.0f32, 1.0, 2.0, 3.0];
        let mut dst = vec![0.0f32; 9];

        resample_bilinear(1, &src, src_size, full(src_size), &mut dst, dst_size, full(dst_size))?;

        assert_eq!(dst[0], 0.0);
        approx::assert_relative_eq!(dst[4], 2.0, epsilon = 1e-5);
        Ok(())
    }
}
