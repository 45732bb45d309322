use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use imgconv_image::{ImageBuffer, ImageSize, PixelFormat};
use imgconv_imgproc::{
    convert::convert_cpu,
    letterbox::{compute_letterbox, LetterboxOptions},
};

fn resize_image_crate(data: &[u8], size: ImageSize, new_size: ImageSize) -> Vec<u8> {
    let rgb = image::RgbImage::from_raw(size.width as u32, size.height as u32, data.to_vec())
        .unwrap();
    let image_crate = image::DynamicImage::ImageRgb8(rgb);

    let image_resized = image_crate.resize_exact(
        new_size.width as u32,
        new_size.height as u32,
        image::imageops::FilterType::Triangle,
    );
    image_resized.into_rgb8().into_raw()
}

fn bench_resample(c: &mut Criterion) {
    let mut group = c.benchmark_group("Resample");

    for (width, height) in [(256, 224), (512, 448), (1024, 896)].iter() {
        group.throughput(criterion::Throughput::Elements((*width * *height) as u64));

        let parameter_string = format!("{}x{}", width, height);

        // input image
        let image_size: ImageSize = [*width, *height].into();
        let data = (0..width * height * 3)
            .map(|_| rand::random::<u8>())
            .collect::<Vec<_>>();
        let image = ImageBuffer::new(image_size, PixelFormat::Rgb888, data.clone()).unwrap();

        // output image
        let new_size = ImageSize {
            width: width / 2,
            height: height / 2,
        };

        group.bench_with_input(
            BenchmarkId::new("image_rs", &parameter_string),
            &data,
            |b, d| b.iter(|| resize_image_crate(black_box(d), image_size, new_size)),
        );

        group.bench_with_input(
            BenchmarkId::new("imgconv_rgb", &parameter_string),
            &image,
            |b, src| {
                let mut dst = ImageBuffer::from_size(new_size, PixelFormat::Rgb888).unwrap();
                b.iter(|| convert_cpu(black_box(src), black_box(&mut dst), None, None, 0))
            },
        );

        let nv12 = ImageBuffer::from_size(image_size, PixelFormat::Yuv420SpNv12).unwrap();
        group.bench_with_input(
            BenchmarkId::new("imgconv_nv12", &parameter_string),
            &nv12,
            |b, src| {
                let mut dst = ImageBuffer::from_size(new_size, PixelFormat::Yuv420SpNv12).unwrap();
                b.iter(|| convert_cpu(black_box(src), black_box(&mut dst), None, None, 0))
            },
        );

        let letterbox_size = ImageSize {
            width: 640,
            height: 640,
        };
        let (paste, _) =
            compute_letterbox(image_size, letterbox_size, LetterboxOptions::default()).unwrap();
        group.bench_with_input(
            BenchmarkId::new("imgconv_letterbox", &parameter_string),
            &(&image, paste),
            |b, i| {
                let (src, paste) = (i.0, i.1);
                let mut dst = ImageBuffer::from_size(letterbox_size, PixelFormat::Rgb888).unwrap();
                b.iter(|| {
                    convert_cpu(
                        black_box(src),
                        black_box(&mut dst),
                        None,
                        Some(paste),
                        114,
                    )
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_resample);
criterion_main!(benches);
