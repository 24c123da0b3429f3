use crate::error::{AppError, Result};
use image::{DynamicImage, ImageReader};
use std::path::Path;

/// Loads an image file on the calling thread and normalizes it to an 8-bit buffer.
///
/// The format is guessed from content, so a PNG named `.jpg` still decodes.
pub fn load_image_blocking(path: &Path) -> Result<DynamicImage> {
    let image = ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|e| AppError::ImageLoad(format!("{}: {}", path.display(), e)))?
        .decode()?;
    Ok(normalize(image))
}

/// Converts any decoded layout to one of Luma8, LumaA8, Rgb8 or Rgba8.
fn normalize(image: DynamicImage) -> DynamicImage {
    match image {
        DynamicImage::ImageLuma8(_)
        | DynamicImage::ImageLumaA8(_)
        | DynamicImage::ImageRgb8(_)
        | DynamicImage::ImageRgba8(_) => image,
        DynamicImage::ImageLuma16(_) => DynamicImage::ImageLuma8(image.to_luma8()),
        DynamicImage::ImageLumaA16(_) => DynamicImage::ImageLumaA8(image.to_luma_alpha8()),
        other if other.color().has_alpha() => DynamicImage::ImageRgba8(other.to_rgba8()),
        other => DynamicImage::ImageRgb8(other.to_rgb8()),
    }
}
