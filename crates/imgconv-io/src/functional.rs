use std::path::{Path, PathBuf};

use imgconv_image::{ImageBuffer, ImageError, ImageSize, PixelFormat};

use crate::{
    codec::{decode_image, encode_image_jpeg, encode_image_png},
    error::IoError,
};

/// JPEG quality used by [`write_image`].
pub const JPEG_QUALITY: u8 = 95;

/// The image file kinds known by [`read_image`] and [`write_image`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileKind {
    /// `.jpg` or `.jpeg`.
    Jpeg,
    /// `.png`.
    Png,
    /// `.data`, raw pixels without a header.
    Raw,
}

impl FileKind {
    /// Get the kind of a path from its extension, ignoring case.
    pub fn from_path(path: &Path) -> Option<FileKind> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Some(FileKind::Jpeg),
            "png" => Some(FileKind::Png),
            "data" => Some(FileKind::Raw),
            _ => None,
        }
    }
}

fn check_exists(file_path: &Path) -> Result<(), IoError> {
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }
    Ok(())
}

fn kind_of(file_path: &Path) -> Result<FileKind, IoError> {
    FileKind::from_path(file_path).ok_or_else(|| IoError::InvalidFileExtension(file_path.into()))
}

/// Read raw pixels from a file.
///
/// The file holds no header, so the geometry is given by the caller. Bytes past the
/// size the format requires are ignored.
///
/// # Arguments
///
/// * `file_path` - The path to the raw file.
/// * `size` - The size of the image in pixels.
/// * `format` - The pixel format of the data.
///
/// # Errors
///
/// Fails with [`ImageError::BufferTooSmall`] if the file is shorter than the image.
pub fn read_image_raw(
    file_path: impl AsRef<Path>,
    size: ImageSize,
    format: PixelFormat,
) -> Result<ImageBuffer<'static>, IoError> {
    let file_path = file_path.as_ref();
    check_exists(file_path)?;

    let required = format.buffer_size(size);
    let file = std::fs::File::open(file_path)?;
    let file_len = file.metadata()?.len() as usize;
    if file_len < required {
        return Err(ImageError::BufferTooSmall(file_len, required).into());
    }

    // open the file and map it to memory
    let mmap = unsafe { memmap2::Mmap::map(&file)? };

    Ok(ImageBuffer::new(size, format, mmap[..required].to_vec())?)
}

/// Write the raw pixels of an image to a file, without any header.
pub fn write_image_raw(file_path: impl AsRef<Path>, image: &ImageBuffer) -> Result<(), IoError> {
    let data = image.as_slice().ok_or(ImageError::NullBuffer)?;
    std::fs::write(file_path, &data[..image.required_size()])?;
    Ok(())
}

/// Read an image from a JPEG or PNG file.
///
/// # Arguments
///
/// * `file_path` - The path to the image. The extension is matched ignoring case.
///
/// # Returns
///
/// A [`PixelFormat::Gray8`], [`PixelFormat::Rgb888`] or [`PixelFormat::Rgba8888`] image.
///
/// # Errors
///
/// `.data` files have no geometry and fail with [`IoError::UnsupportedImageFormat`]; use
/// [`read_image_raw`] for them.
pub fn read_image(file_path: impl AsRef<Path>) -> Result<ImageBuffer<'static>, IoError> {
    let file_path = file_path.as_ref();
    check_exists(file_path)?;

    match kind_of(file_path)? {
        FileKind::Jpeg | FileKind::Png => {
            let file = std::fs::File::open(file_path)?;
            let mmap = unsafe { memmap2::Mmap::map(&file)? };
            let image = decode_image(&mmap)?;
            log::debug!("read {} as {} {}", file_path.display(), image.size(), image.format());
            Ok(image)
        }
        FileKind::Raw => Err(IoError::UnsupportedImageFormat),
    }
}

/// Write an image to a file, choosing the encoding from the extension.
///
/// `.png` is lossless, `.jpg`/`.jpeg` are encoded at [`JPEG_QUALITY`] and `.data` gets
/// the raw pixels.
///
/// # Arguments
///
/// * `file_path` - The path to the image. The extension is matched ignoring case.
/// * `image` - The image to write.
pub fn write_image(file_path: impl AsRef<Path>, image: &ImageBuffer) -> Result<(), IoError> {
    let file_path: PathBuf = file_path.as_ref().to_owned();

    let bytes = match kind_of(&file_path)? {
        FileKind::Png => encode_image_png(image)?,
        FileKind::Jpeg => encode_image_jpeg(image, JPEG_QUALITY)?,
        FileKind::Raw => return write_image_raw(&file_path, image),
    };

    std::fs::write(&file_path, bytes)?;
    log::debug!("wrote {} {} to {}", image.size(), image.format(), file_path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_kind() {
        assert_eq!(FileKind::from_path(Path::new("a.JPG")), Some(FileKind::Jpeg));
        assert_eq!(FileKind::from_path(Path::new("a.jpeg")), Some(FileKind::Jpeg));
        assert_eq!(FileKind::from_path(Path::new("b/a.Png")), Some(FileKind::Png));
        assert_eq!(FileKind::from_path(Path::new("a.DATA")), Some(FileKind::Raw));
        assert_eq!(FileKind::from_path(Path::new("a.bmp")), None);
        assert_eq!(FileKind::from_path(Path::new("jpg")), None);
    }

    #[test]
    fn raw_roundtrip() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("frame.data");

        let size = ImageSize {
            width: 4,
            height: 2,
        };
        let image = ImageBuffer::new(size, PixelFormat::Yuv420SpNv21, (0u8..12).collect())?;
        write_image(&file_path, &image)?;

        let back = read_image_raw(&file_path, size, PixelFormat::Yuv420SpNv21)?;
        assert_eq!(back.as_slice(), image.as_slice());

        assert!(matches!(
            read_image(&file_path),
            Err(IoError::UnsupportedImageFormat)
        ));
        Ok(())
    }

    #[test]
    fn raw_too_short() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("short.data");
        std::fs::write(&file_path, [0u8; 5])?;

        let size = ImageSize {
            width: 2,
            height: 2,
        };
        assert!(matches!(
            read_image_raw(&file_path, size, PixelFormat::Rgb888),
            Err(IoError::ImageCreationError(ImageError::BufferTooSmall(5, 12)))
        ));
        Ok(())
    }

    #[test]
    fn missing_and_unknown() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;

        let missing = tmp_dir.path().join("missing.png");
        assert!(matches!(
            read_image(&missing),
            Err(IoError::FileDoesNotExist(_))
        ));

        let unknown = tmp_dir.path().join("image.bmp");
        std::fs::write(&unknown, [0u8; 4])?;
        assert!(matches!(
            read_image(&unknown),
            Err(IoError::InvalidFileExtension(_))
        ));

        let image = ImageBuffer::from_size(
            ImageSize {
                width: 2,
                height: 2,
            },
            PixelFormat::Gray8,
        )?;
        assert!(matches!(
            write_image(tmp_dir.path().join("image.tiff"), &image),
            Err(IoError::InvalidFileExtension(_))
        ));
        Ok(())
    }
}
