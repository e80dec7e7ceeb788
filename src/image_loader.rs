use crate::error::{AppError, Result};
use crate::state::viewport::{Size, fit_keep_aspect};
use image::imageops::FilterType;
use slint::{Image, Rgba8Pixel, SharedPixelBuffer};
use std::path::Path;

/// Decoded RGBA8 pixels. Plain data so it can cross from rayon threads to the UI thread.
#[derive(Clone, Debug)]
pub struct DecodedImage {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl DecodedImage {
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            data,
            width,
            height,
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

fn decode(path: &Path) -> Result<image::DynamicImage> {
    let reader = image::ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|e| AppError::ImageLoad(format!("{}: {}", path.display(), e)))?;
    Ok(reader.decode()?)
}

/// Decodes an image file at full resolution. Blocks; call from a worker thread.
pub fn load_image_blocking(path: &Path) -> Result<DecodedImage> {
    let rgba = decode(path)?.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(DecodedImage::new(rgba.into_raw(), width, height))
}

/// Decodes an image file and scales it to fit `bounds`, keeping the aspect ratio.
pub fn load_thumbnail_blocking(path: &Path, bounds: Size) -> Result<DecodedImage> {
    let img = decode(path)?;
    let target = fit_keep_aspect(Size::new(img.width(), img.height()), bounds);
    if target.is_empty() {
        return Ok(DecodedImage::new(Vec::new(), 0, 0));
    }

    let rgba = img
        .resize_exact(target.width, target.height, FilterType::Triangle)
        .to_rgba8();
    Ok(DecodedImage::new(rgba.into_raw(), target.width, target.height))
}

/// Converts decoded pixels into a Slint image. Must run on the UI thread.
pub fn create_slint_image(image: &DecodedImage) -> Image {
    if image.width == 0 || image.height == 0 {
        return Image::default();
    }
    let buffer =
        SharedPixelBuffer::<Rgba8Pixel>::clone_from_slice(&image.data, image.width, image.height);
    Image::from_rgba8(buffer)
}
