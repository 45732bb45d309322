use std::fmt;

use crate::{error::ImageError, ImageSize};

/// A rectangle with inclusive corners.
///
/// `width = right - left + 1` and `height = bottom - top + 1`.
///
/// # Examples
///
/// ```
/// use imgconv_image::Rect;
///
/// let rect = Rect::new(2, 4, 11, 9).unwrap();
///
/// assert_eq!(rect.width(), 10);
/// assert_eq!(rect.height(), 6);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rect {
    /// Left column, inclusive.
    pub left: usize,
    /// Top row, inclusive.
    pub top: usize,
    /// Right column, inclusive.
    pub right: usize,
    /// Bottom row, inclusive.
    pub bottom: usize,
}

impl Rect {
    /// Create a rectangle from its inclusive corners.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::InvalidDimensions`] if `left > right` or `top > bottom`.
    pub fn new(left: usize, top: usize, right: usize, bottom: usize) -> Result<Self, ImageError> {
        if left > right || top > bottom {
            return Err(ImageError::InvalidDimensions(
                (right + 1).saturating_sub(left),
                (bottom + 1).saturating_sub(top),
            ));
        }
        Ok(Self {
            left,
            top,
            right,
            bottom,
        })
    }

    /// Create a rectangle from its top left corner and its size.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::InvalidDimensions`] if the width or the height is zero.
    pub fn from_xywh(x: usize, y: usize, width: usize, height: usize) -> Result<Self, ImageError> {
        if width == 0 || height == 0 {
            return Err(ImageError::InvalidDimensions(width, height));
        }
        Self::new(x, y, x + width - 1, y + height - 1)
    }

    /// The rectangle covering a whole image.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::InvalidDimensions`] if the image is empty.
    pub fn full(size: ImageSize) -> Result<Self, ImageError> {
        Self::from_xywh(0, 0, size.width, size.height)
    }

    /// Width of the rectangle in pixels.
    pub fn width(&self) -> usize {
        self.right - self.left + 1
    }

    /// Height of the rectangle in pixels.
    pub fn height(&self) -> usize {
        self.bottom - self.top + 1
    }

    /// Whether the rectangle covers exactly the whole image.
    pub fn is_full(&self, size: ImageSize) -> bool {
        self.left == 0 && self.top == 0 && self.width() == size.width && self.height() == size.height
    }

    /// Whether the rectangle lies inside `[0, width) x [0, height)`.
    pub fn fits_in(&self, size: ImageSize) -> bool {
        self.right < size.width && self.bottom < size.height
    }

    /// The rectangle as a working [`Region`].
    pub fn region(&self) -> Region {
        Region {
            x: self.left,
            y: self.top,
            width: self.width(),
            height: self.height(),
        }
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Rect {{ left: {}, top: {}, right: {}, bottom: {} }}",
            self.left, self.top, self.right, self.bottom
        )
    }
}

/// A window in pixel coordinates, handed to the resampling kernels.
///
/// Unlike [`Rect`] a region may be empty, which happens when the chroma plane of a small
/// semi-planar window is halved.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Region {
    /// Left column.
    pub x: usize,
    /// Top row.
    pub y: usize,
    /// Width in pixels.
    pub width: usize,
    /// Height in pixels.
    pub height: usize,
}

impl Region {
    /// Whether the region covers no pixels.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Halve every field independently, rounding down.
    ///
    /// Odd offsets lose half a pixel, which shifts the chroma plane against the luma plane.
    pub fn halved(&self) -> Region {
        Region {
            x: self.x / 2,
            y: self.y / 2,
            width: self.width / 2,
            height: self.height / 2,
        }
    }

    /// Whether the region lies inside `[0, width) x [0, height)`.
    pub fn fits_in(&self, size: ImageSize) -> bool {
        self.x + self.width <= size.width && self.y + self.height <= size.height
    }
}

impl From<Rect> for Region {
    fn from(rect: Rect) -> Self {
        rect.region()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_smoke() -> Result<(), ImageError> {
        let rect = Rect::new(0, 0, 9, 4)?;
        assert_eq!(rect.width(), 10);
        assert_eq!(rect.height(), 5);
        assert_eq!(Rect::from_xywh(0, 0, 10, 5)?, rect);
        Ok(())
    }

    #[test]
    fn rect_invalid() {
        assert!(Rect::new(5, 0, 4, 0).is_err());
        assert!(Rect::new(0, 3, 0, 2).is_err());
        assert_eq!(
            Rect::from_xywh(0, 0, 0, 4),
            Err(ImageError::InvalidDimensions(0, 4))
        );
    }

    #[test]
    fn rect_full() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 8,
            height: 6,
        };
        let full = Rect::full(size)?;
        assert!(full.is_full(size));
        assert!(full.fits_in(size));
        assert!(!Rect::new(0, 2, 7, 5)?.is_full(size));
        assert!(!Rect::new(0, 0, 8, 5)?.fits_in(size));
        Ok(())
    }

    #[test]
    fn region_halved() -> Result<(), ImageError> {
        let region = Rect::from_xywh(3, 5, 7, 1)?.region();
        let half = region.halved();
        assert_eq!(
            half,
            Region {
                x: 1,
                y: 2,
                width: 3,
                height: 0
            }
        );
        assert!(half.is_empty());
        Ok(())
    }
}
