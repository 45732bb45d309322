use imgconv_image::{ImageError, ImageSize, Rect};

/// How a source image was fitted into a letterboxed destination.
///
/// Map a destination point back to the source with `(x - x_pad) / scale` and
/// `(y - y_pad) / scale`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Letterbox {
    /// The uniform scale applied to the source.
    pub scale: f32,
    /// Left offset of the scaled content in the destination.
    pub x_pad: usize,
    /// Top offset of the scaled content in the destination.
    pub y_pad: usize,
}

/// Alignment rounding applied to the scaled content.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LetterboxOptions {
    /// Allow shrinking the scaled content slightly so its size is aligned.
    pub allow_slight_change: bool,
    /// The scaled width is rounded down to a multiple of this value.
    pub width_quantum: usize,
    /// The scaled height is rounded down to a multiple of this value.
    pub height_quantum: usize,
}

impl Default for LetterboxOptions {
    fn default() -> Self {
        Self {
            allow_slight_change: true,
            width_quantum: 4,
            height_quantum: 2,
        }
    }
}

impl LetterboxOptions {
    /// Keep the exact scaled size, without alignment rounding.
    pub fn exact() -> Self {
        Self {
            allow_slight_change: false,
            ..Default::default()
        }
    }

    /// Set the width and height quanta.
    pub fn with_quantum(mut self, width_quantum: usize, height_quantum: usize) -> Self {
        self.width_quantum = width_quantum.max(1);
        self.height_quantum = height_quantum.max(1);
        self
    }
}

/// Round `value` down to a multiple of `quantum`, never below `min(quantum, limit)`.
fn align_down(value: usize, quantum: usize, limit: usize) -> usize {
    let quantum = quantum.max(1);
    let aligned = value - value % quantum;
    if aligned >= quantum {
        aligned
    } else {
        quantum.min(limit).max(1)
    }
}

/// Half the padding, rounded down to an even offset.
fn centered_offset(padding: usize) -> usize {
    let offset = padding / 2;
    offset - offset % 2
}

/// Compute the placement of a source inside a destination, preserving the aspect ratio.
///
/// The binding axis fills the destination and the other axis is scaled by the same
/// factor. The scaled size is then rounded down to the alignment quanta and centered,
/// with the offsets forced to even values so both planes of semi-planar formats stay
/// aligned.
///
/// # Arguments
///
/// * `src` - The size of the source image.
/// * `dst` - The size of the destination image.
/// * `options` - The alignment rounding to apply.
///
/// # Returns
///
/// The destination rectangle receiving the scaled content and the fit parameters.
///
/// # Errors
///
/// Returns [`ImageError::InvalidDimensions`] if any of the sizes is empty.
///
/// # Example
///
/// ```
/// use imgconv_image::ImageSize;
/// use imgconv_imgproc::letterbox::{compute_letterbox, LetterboxOptions};
///
/// let (rect, letterbox) = compute_letterbox(
///     ImageSize { width: 640, height: 480 },
///     ImageSize { width: 300, height: 300 },
///     LetterboxOptions::default(),
/// )
/// .unwrap();
///
/// assert_eq!(letterbox.x_pad, 0);
/// assert_eq!(letterbox.y_pad, 38);
/// assert_eq!((rect.width(), rect.height()), (300, 224));
/// ```
pub fn compute_letterbox(
    src: ImageSize,
    dst: ImageSize,
    options: LetterboxOptions,
) -> Result<(Rect, Letterbox), ImageError> {
    for size in [src, dst] {
        if size.width == 0 || size.height == 0 {
            return Err(ImageError::InvalidDimensions(size.width, size.height));
        }
    }

    let scale_w = dst.width as f32 / src.width as f32;
    let scale_h = dst.height as f32 / src.height as f32;

    let (scale, mut resize_w, mut resize_h) = if scale_w < scale_h {
        (scale_w, dst.width, (src.height as f32 * scale_w) as usize)
    } else {
        (scale_h, (src.width as f32 * scale_h) as usize, dst.height)
    };

    if options.allow_slight_change {
        resize_w = align_down(resize_w, options.width_quantum, dst.width);
        resize_h = align_down(resize_h, options.height_quantum, dst.height);
    }
    resize_w = resize_w.clamp(1, dst.width);
    resize_h = resize_h.clamp(1, dst.height);

    let left = centered_offset(dst.width - resize_w);
    let top = centered_offset(dst.height - resize_h);

    let rect = Rect::from_xywh(left, top, resize_w, resize_h)?;

    Ok((
        rect,
        Letterbox {
            scale,
            x_pad: left,
            y_pad: top,
        },
    ))
}
