//! Pure bitmap transforms.
//!
//! Inputs are expected in one of the 8-bit layouts produced by the image
//! loader; any other layout passes through unchanged.

use super::PosterizeLevels;
use crate::config::MEDIAN_KERNEL_SIZE;
use image::{DynamicImage, ImageBuffer, Pixel, Rgb, Rgba};
use rayon::prelude::*;

/// ITU-R 601 luma, rounded to nearest.
pub fn luminance(r: u8, g: u8, b: u8) -> u8 {
    let y = 0.2989_f32 * f32::from(r) + 0.5870 * f32::from(g) + 0.1140 * f32::from(b);
    y.round().clamp(0.0, 255.0) as u8
}

/// Replaces RGB with the pixel luminance; alpha is kept.
pub fn grayscale(image: &DynamicImage) -> DynamicImage {
    match image {
        DynamicImage::ImageRgb8(buf) => {
            let mut out = buf.clone();
            for pixel in out.pixels_mut() {
                let v = luminance(pixel[0], pixel[1], pixel[2]);
                *pixel = Rgb([v, v, v]);
            }
            DynamicImage::ImageRgb8(out)
        }
        DynamicImage::ImageRgba8(buf) => {
            let mut out = buf.clone();
            for pixel in out.pixels_mut() {
                let v = luminance(pixel[0], pixel[1], pixel[2]);
                *pixel = Rgba([v, v, v, pixel[3]]);
            }
            DynamicImage::ImageRgba8(out)
        }
        other => other.clone(),
    }
}

/// Square-window median over every channel, borders replicated.
pub fn median_filter(image: &DynamicImage) -> DynamicImage {
    match image {
        DynamicImage::ImageLuma8(buf) => DynamicImage::ImageLuma8(median_buffer(buf)),
        DynamicImage::ImageLumaA8(buf) => DynamicImage::ImageLumaA8(median_buffer(buf)),
        DynamicImage::ImageRgb8(buf) => DynamicImage::ImageRgb8(median_buffer(buf)),
        DynamicImage::ImageRgba8(buf) => DynamicImage::ImageRgba8(median_buffer(buf)),
        other => other.clone(),
    }
}

fn median_buffer<P>(buf: &ImageBuffer<P, Vec<u8>>) -> ImageBuffer<P, Vec<u8>>
where
    P: Pixel<Subpixel = u8>,
{
    let (width, height) = buf.dimensions();
    if width == 0 || height == 0 {
        return buf.clone();
    }

    let channels = usize::from(P::CHANNEL_COUNT);
    let (w, h) = (width as usize, height as usize);
    let radius = (MEDIAN_KERNEL_SIZE / 2) as isize;
    let window_len = (MEDIAN_KERNEL_SIZE * MEDIAN_KERNEL_SIZE) as usize;
    let src: &[u8] = buf.as_raw();

    let mut out: ImageBuffer<P, Vec<u8>> = ImageBuffer::new(width, height);
    out.par_chunks_mut(w * channels)
        .enumerate()
        .for_each(|(y, row)| {
            let mut window = Vec::with_capacity(window_len);
            for x in 0..w {
                for c in 0..channels {
                    window.clear();
                    for dy in -radius..=radius {
                        let sy = (y as isize + dy).clamp(0, h as isize - 1) as usize;
                        for dx in -radius..=radius {
                            let sx = (x as isize + dx).clamp(0, w as isize - 1) as usize;
                            window.push(src[(sy * w + sx) * channels + c]);
                        }
                    }
                    window.sort_unstable();
                    row[x * channels + c] = window[window.len() / 2];
                }
            }
        });
    out
}

/// Quantizes each color channel into `levels` bins; alpha is untouched.
///
/// `bucket = floor(v / (256 / levels)) * (256 / levels)`, evaluated in integers.
pub fn posterize(image: &DynamicImage, levels: PosterizeLevels) -> DynamicImage {
    let table = posterize_table(levels);
    match image {
        DynamicImage::ImageLuma8(buf) => {
            let mut out = buf.clone();
            posterize_channels(&mut out, 1, 1, &table);
            DynamicImage::ImageLuma8(out)
        }
        DynamicImage::ImageLumaA8(buf) => {
            let mut out = buf.clone();
            posterize_channels(&mut out, 2, 1, &table);
            DynamicImage::ImageLumaA8(out)
        }
        DynamicImage::ImageRgb8(buf) => {
            let mut out = buf.clone();
            posterize_channels(&mut out, 3, 3, &table);
            DynamicImage::ImageRgb8(out)
        }
        DynamicImage::ImageRgba8(buf) => {
            let mut out = buf.clone();
            posterize_channels(&mut out, 4, 3, &table);
            DynamicImage::ImageRgba8(out)
        }
        other => other.clone(),
    }
}

fn posterize_table(levels: PosterizeLevels) -> [u8; 256] {
    let levels = levels.get();
    let mut table = [0u8; 256];
    for (value, slot) in (0u32..).zip(table.iter_mut()) {
        let bucket = value * levels / 256;
        let quantized = bucket * 256 / levels;
        debug_assert!(quantized <= value);
        *slot = quantized as u8;
    }
    table
}

fn posterize_channels(data: &mut [u8], channels: usize, color_channels: usize, table: &[u8; 256]) {
    for pixel in data.chunks_exact_mut(channels) {
        for value in &mut pixel[..color_channels] {
            *value = table[usize::from(*value)];
        }
    }
}

/// Reflects about the vertical center axis.
pub fn mirror(image: &DynamicImage) -> DynamicImage {
    image.fliph()
}

/// Rotates 90 degrees clockwise without resampling.
pub fn rotate_clockwise(image: &DynamicImage) -> DynamicImage {
    image.rotate90()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, GrayImage, Luma, LumaA, RgbImage, RgbaImage};

    fn gradient(w: u32, h: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(w, h, |x, y| {
            Rgb([(x * 40) as u8, (y * 60) as u8, ((x + y) * 20) as u8])
        }))
    }

    #[test]
    fn grayscale_uniform_color_rounds_to_nearest() {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 4, Rgb([100, 150, 200])));
        let gray = grayscale(&image);
        // 0.2989*100 + 0.5870*150 + 0.1140*200 = 140.74
        for pixel in gray.as_rgb8().unwrap().pixels() {
            assert_eq!(pixel, &Rgb([141, 141, 141]));
        }
    }

    #[test]
    fn grayscale_keeps_alpha() {
        let image =
            DynamicImage::ImageRgba8(RgbaImage::from_pixel(2, 2, Rgba([255, 0, 0, 42])));
        let gray = grayscale(&image);
        assert_eq!(gray.as_rgba8().unwrap().get_pixel(1, 1), &Rgba([76, 76, 76, 42]));
    }

    #[test]
    fn grayscale_passes_single_channel_through() {
        let image = DynamicImage::ImageLuma8(GrayImage::from_pixel(3, 3, Luma([77])));
        assert_eq!(grayscale(&image), image);
    }

    #[test]
    fn grayscale_is_idempotent() {
        let once = grayscale(&gradient(5, 4));
        assert_eq!(grayscale(&once), once);
    }

    #[test]
    fn posterize_single_level_maps_to_zero() {
        let image = gradient(6, 5);
        let flat = posterize(&image, PosterizeLevels::new(1).unwrap());
        assert!(flat.as_rgb8().unwrap().as_raw().iter().all(|&v| v == 0));
    }

    #[test]
    fn posterize_three_levels_buckets() {
        let table = posterize_table(PosterizeLevels::new(3).unwrap());
        assert_eq!(table[0], 0);
        assert_eq!(table[85], 0);
        assert_eq!(table[86], 85);
        assert_eq!(table[170], 85);
        assert_eq!(table[171], 170);
        assert_eq!(table[255], 170);
    }

    #[test]
    fn posterize_ten_levels_hits_exact_boundaries() {
        let table = posterize_table(PosterizeLevels::new(10).unwrap());
        assert_eq!(table[128], 128);
        assert_eq!(table[127], 102);
    }

    #[test]
    fn posterize_never_brightens() {
        for levels in 1..=10 {
            let table = posterize_table(PosterizeLevels::new(levels).unwrap());
            for value in 0..=255u8 {
                let quantized = table[usize::from(value)];
                assert!(quantized <= value, "levels {levels}, value {value}");
            }
        }
    }

    #[test]
    fn posterize_leaves_alpha_alone() {
        let image =
            DynamicImage::ImageLumaA8(ImageBuffer::from_pixel(2, 1, LumaA([200, 99])));
        let out = posterize(&image, PosterizeLevels::new(2).unwrap());
        assert_eq!(out.as_luma_alpha8().unwrap().get_pixel(0, 0), &LumaA([128, 99]));
    }

    #[test]
    fn median_removes_isolated_outlier() {
        let mut buf = GrayImage::from_pixel(5, 5, Luma([10]));
        buf.put_pixel(2, 2, Luma([250]));
        let filtered = median_filter(&DynamicImage::ImageLuma8(buf));
        assert!(filtered.as_luma8().unwrap().pixels().all(|p| p[0] == 10));
    }

    #[test]
    fn median_filters_every_channel_independently() {
        let mut buf = RgbaImage::from_pixel(3, 3, Rgba([1, 2, 3, 4]));
        buf.put_pixel(1, 1, Rgba([200, 200, 200, 200]));
        let filtered = median_filter(&DynamicImage::ImageRgba8(buf));
        assert_eq!(filtered.as_rgba8().unwrap().get_pixel(1, 1), &Rgba([1, 2, 3, 4]));
    }

    #[test]
    fn median_handles_single_pixel_and_empty() {
        let one = DynamicImage::ImageRgb8(RgbImage::from_pixel(1, 1, Rgb([9, 8, 7])));
        assert_eq!(median_filter(&one), one);
        let empty = DynamicImage::ImageRgb8(RgbImage::new(0, 0));
        assert_eq!(median_filter(&empty), empty);
    }

    #[test]
    fn mirror_twice_restores_original() {
        let image = gradient(7, 3);
        let mirrored = mirror(&image);
        assert_ne!(mirrored, image);
        assert_eq!(
            mirrored.as_rgb8().unwrap().get_pixel(0, 0),
            image.as_rgb8().unwrap().get_pixel(6, 0)
        );
        assert_eq!(mirror(&mirrored), image);
    }

    #[test]
    fn four_rotations_restore_non_square_original() {
        let image = gradient(5, 2);
        let once = rotate_clockwise(&image);
        assert_eq!((once.width(), once.height()), (2, 5));
        // Top-left of the rotated image comes from the bottom-left of the source.
        assert_eq!(
            once.as_rgb8().unwrap().get_pixel(0, 0),
            image.as_rgb8().unwrap().get_pixel(0, 1)
        );
        let full = rotate_clockwise(&rotate_clockwise(&rotate_clockwise(&once)));
        assert_eq!(full, image);
    }
}
