use argh::FromArgs;
use std::path::PathBuf;

use imgconv::{
    hal::{Converter, DispatchConfig, NoHardware},
    image::{ImageBuffer, ImageSize},
    io::functional as F,
};

#[derive(FromArgs)]
/// Fit an image into a fixed size, keeping its aspect ratio, and pad the borders
struct Args {
    /// path to an input image
    #[argh(option, short = 'i')]
    input: PathBuf,

    /// path to the output image (.png, .jpg or .data)
    #[argh(option, short = 'o')]
    output: PathBuf,

    /// width of the output image
    #[argh(option, default = "640")]
    width: usize,

    /// height of the output image
    #[argh(option, default = "640")]
    height: usize,

    /// value written to every byte of the borders
    #[argh(option, default = "114")]
    pad: u8,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    // read the image
    let image = F::read_image(&args.input)?;

    // no accelerator is linked into this binary, so every conversion runs on the CPU
    let converter = Converter::<NoHardware>::new(DispatchConfig::software_only(), None);

    // the converter allocates the output
    let size = ImageSize {
        width: args.width,
        height: args.height,
    };
    let mut letterboxed = ImageBuffer::unallocated(size, image.format())?;
    let letterbox = converter.convert_with_letterbox(&image, &mut letterboxed, args.pad)?;

    log::info!(
        "{} -> {}: scale {:.4}, padding ({}, {})",
        image.size(),
        size,
        letterbox.scale,
        letterbox.x_pad,
        letterbox.y_pad
    );

    F::write_image(&args.output, &letterboxed)?;

    println!(
        "scale={} x_pad={} y_pad={}",
        letterbox.scale, letterbox.x_pad, letterbox.y_pad
    );

    Ok(())
}
