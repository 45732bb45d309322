use image::{
    codecs::{jpeg::JpegEncoder, png::PngEncoder},
    ExtendedColorType, ImageEncoder,
};
use imgconv_image::{ImageBuffer, ImageError, ImageSize, PixelFormat};

use crate::error::IoError;

/// Decode a JPEG or PNG image from memory.
///
/// Single channel images become [`PixelFormat::Gray8`], images with an alpha channel
/// [`PixelFormat::Rgba8888`] and everything else [`PixelFormat::Rgb888`]. Samples deeper
/// than 8 bits are reduced to 8 bits.
///
/// # Arguments
///
/// * `bytes` - The encoded image.
///
/// # Returns
///
/// An image owning the decoded pixels.
pub fn decode_image(bytes: &[u8]) -> Result<ImageBuffer<'static>, IoError> {
    let img = image::load_from_memory(bytes)?;

    let size = ImageSize {
        width: img.width() as usize,
        height: img.height() as usize,
    };

    let color = img.color();
    let image = if color.channel_count() == 1 {
        ImageBuffer::new(size, PixelFormat::Gray8, img.into_luma8().into_raw())?
    } else if color.has_alpha() {
        ImageBuffer::new(size, PixelFormat::Rgba8888, img.into_rgba8().into_raw())?
    } else {
        ImageBuffer::new(size, PixelFormat::Rgb888, img.into_rgb8().into_raw())?
    };

    log::debug!("decoded {size} {color:?} as {}", image.format());
    Ok(image)
}

fn encodable<'a>(image: &'a ImageBuffer<'_>) -> Result<(&'a [u8], ExtendedColorType), IoError> {
    let color = match image.format() {
        PixelFormat::Gray8 => ExtendedColorType::L8,
        PixelFormat::Rgb888 => ExtendedColorType::Rgb8,
        PixelFormat::Rgba8888 => ExtendedColorType::Rgba8,
        format => {
            return Err(ImageError::UnsupportedFormat(format!("cannot encode {format}")).into())
        }
    };
    let data = image.as_slice().ok_or(ImageError::NullBuffer)?;
    Ok((&data[..image.required_size()], color))
}

/// Encode an image as JPEG.
///
/// # Arguments
///
/// * `image` - A [`PixelFormat::Gray8`] or [`PixelFormat::Rgb888`] image.
/// * `quality` - The JPEG quality, from 1 to 100.
///
/// # Errors
///
/// Fails with [`ImageError::UnsupportedFormat`] for any other format, RGBA included.
pub fn encode_image_jpeg(image: &ImageBuffer, quality: u8) -> Result<Vec<u8>, IoError> {
    if image.format() == PixelFormat::Rgba8888 {
        return Err(ImageError::UnsupportedFormat("jpeg has no alpha channel".to_string()).into());
    }
    let (data, color) = encodable(image)?;

    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, quality).write_image(
        data,
        image.width() as u32,
        image.height() as u32,
        color,
    )?;
    Ok(buf)
}

/// Encode an image as PNG.
///
/// # Arguments
///
/// * `image` - A [`PixelFormat::Gray8`], [`PixelFormat::Rgb888`] or
///   [`PixelFormat::Rgba8888`] image.
///
/// # Errors
///
/// Fails with [`ImageError::UnsupportedFormat`] for semi-planar formats.
pub fn encode_image_png(image: &ImageBuffer) -> Result<Vec<u8>, IoError> {
    let (data, color) = encodable(image)?;

    let mut buf = Vec::new();
    PngEncoder::new(&mut buf).write_image(
        data,
        image.width() as u32,
        image.height() as u32,
        color,
    )?;
    Ok(buf)
}
