#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use imgconv_image as image;

#[doc(inline)]
pub use imgconv_imgproc as imgproc;

#[doc(inline)]
pub use imgconv_hal as hal;

#[doc(inline)]
pub use imgconv_io as io;
