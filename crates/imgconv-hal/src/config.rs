use imgconv_imgproc::letterbox::LetterboxOptions;

use crate::backend::TransformFlags;

/// Configuration of the backend dispatcher.
///
/// # Example
///
/// ```
/// use imgconv_hal::DispatchConfig;
///
/// // platforms whose accelerator only needs 4 pixel aligned rows
/// let config = DispatchConfig::default().with_alignment(4);
///
/// assert_eq!(config.alignment, 4);
/// assert!(config.hardware_enabled);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DispatchConfig {
    /// Width alignment, in pixels, the accelerator needs for both images.
    pub alignment: usize,
    /// Allow the hardware path at all.
    pub hardware_enabled: bool,
    /// Usage bits forwarded to the accelerator.
    pub transform: TransformFlags,
    /// Rounding used when fitting an image into a letterbox.
    pub letterbox: LetterboxOptions,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            alignment: 16,
            hardware_enabled: true,
            transform: TransformFlags::NONE,
            letterbox: LetterboxOptions::default(),
        }
    }
}

impl DispatchConfig {
    /// A configuration that never uses the accelerator.
    pub fn software_only() -> Self {
        Self {
            hardware_enabled: false,
            ..Default::default()
        }
    }

    /// Set the width alignment. Zero is treated as one.
    pub fn with_alignment(mut self, alignment: usize) -> Self {
        self.alignment = alignment.max(1);
        self
    }

    /// Enable or disable the hardware path.
    pub fn with_hardware(mut self, enabled: bool) -> Self {
        self.hardware_enabled = enabled;
        self
    }

    /// Set the usage bits forwarded to the accelerator.
    pub fn with_transform(mut self, transform: TransformFlags) -> Self {
        self.transform = transform;
        self
    }

    /// Set the letterbox rounding.
    pub fn with_letterbox(mut self, letterbox: LetterboxOptions) -> Self {
        self.letterbox = letterbox;
        self
    }

    /// Whether a width satisfies the alignment.
    pub fn is_aligned(&self, width: usize) -> bool {
        width % self.alignment.max(1) == 0
    }
}
