// SPDX-License-Identifier: MPL-2.0
//! Crop rendering and JPEG export for the 3:4 portrait artifact.

use crate::domain::photo::{CropRect, ExportSize};
use crate::error::MediaError;
use base64::Engine as _;
use image_rs::buffer::ConvertBuffer;
use image_rs::codecs::jpeg::JpegEncoder;
use image_rs::{imageops, imageops::FilterType, DynamicImage, GenericImageView, Rgba, RgbImage, RgbaImage};

/// Background used where the crop box extends past the image and under
/// transparent pixels.
pub const FILL_COLOR: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Crop the image to the specified rectangle.
///
/// The rectangle coordinates are clamped to the image boundaries.
/// If the resulting crop area is invalid (zero width or height), returns None.
pub fn crop(image: &DynamicImage, x: u32, y: u32, width: u32, height: u32) -> Option<DynamicImage> {
    let img_width = image.width();
    let img_height = image.height();

    if img_width == 0 || img_height == 0 || width == 0 || height == 0 {
        return None;
    }

    let x = x.min(img_width.saturating_sub(1));
    let y = y.min(img_height.saturating_sub(1));

    let width = width.min(img_width.saturating_sub(x)).max(1);
    let height = height.min(img_height.saturating_sub(y)).max(1);

    Some(image.crop_imm(x, y, width, height))
}

/// Renders `rect` of `image` into a white raster of exactly `size`.
///
/// The visible part of the image is resampled with Lanczos3 and composited
/// over the white background, so parts of the box outside the image and
/// transparent pixels come out white.
pub fn render_crop(image: &DynamicImage, rect: CropRect, size: ExportSize) -> RgbaImage {
    let (out_width, out_height) = size.dimensions();
    let mut canvas = RgbaImage::from_pixel(out_width, out_height, FILL_COLOR);

    if !(rect.width > 0.0 && rect.height > 0.0) {
        return canvas;
    }

    let (img_width, img_height) = image.dimensions();
    let scale_x = out_width as f32 / rect.width;
    let scale_y = out_height as f32 / rect.height;

    // Source pixels covered by the box, rounded outward.
    let left = rect.x.max(0.0).floor() as u32;
    let top = rect.y.max(0.0).floor() as u32;
    let right = (rect.x + rect.width).min(img_width as f32).ceil().max(0.0) as u32;
    let bottom = (rect.y + rect.height).min(img_height as f32).ceil().max(0.0) as u32;

    if right <= left || bottom <= top {
        return canvas;
    }

    let Some(visible) = crop(image, left, top, right - left, bottom - top) else {
        return canvas;
    };

    let dest_x = ((left as f32 - rect.x) * scale_x).round() as i64;
    let dest_y = ((top as f32 - rect.y) * scale_y).round() as i64;
    let dest_width = (visible.width() as f32 * scale_x).round().max(1.0) as u32;
    let dest_height = (visible.height() as f32 * scale_y).round().max(1.0) as u32;

    let scaled = visible
        .resize_exact(dest_width, dest_height, FilterType::Lanczos3)
        .to_rgba8();
    imageops::overlay(&mut canvas, &scaled, dest_x, dest_y);

    canvas
}

/// Encodes an opaque RGBA surface as baseline JPEG.
///
/// `quality` is on the 1–100 scale (90 matches a canvas export at 0.9).
pub fn encode_jpeg(surface: &RgbaImage, quality: u8) -> Result<Vec<u8>, MediaError> {
    let rgb: RgbImage = surface.convert();
    let mut bytes = Vec::new();
    {
        let mut encoder = JpegEncoder::new_with_quality(&mut bytes, quality.clamp(1, 100));
        encoder
            .encode_image(&rgb)
            .map_err(|e| MediaError::Encode(e.to_string()))?;
    }
    Ok(bytes)
}

/// Wraps JPEG bytes in a `data:` URL.
pub fn jpeg_data_url(bytes: &[u8]) -> String {
    format!(
        "data:image/jpeg;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}
