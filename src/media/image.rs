// SPDX-License-Identifier: MPL-2.0
//! Image decoding from the selected file's bytes (PNG, JPEG, GIF, WebP, etc.).

use crate::error::MediaError;
use image_rs::{DynamicImage, GenericImageView};

/// Decodes an in-memory image, sniffing the format from its content.
///
/// The reported media type is not trusted for the format; it was only used
/// to reject obvious non-images before reading.
pub fn decode(bytes: &[u8]) -> Result<DynamicImage, MediaError> {
    let image = image_rs::load_from_memory(bytes).map_err(|e| MediaError::Decode(e.to_string()))?;

    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(MediaError::Decode("image has empty dimensions".into()));
    }

    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image_rs::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([10, 20, 30, 255]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).expect("encode png");
        out.into_inner()
    }

    #[test]
    fn decode_reads_dimensions() {
        let image = decode(&png_bytes(6, 8)).expect("decode png");
        assert_eq!(image.dimensions(), (6, 8));
    }

    #[test]
    fn decode_rejects_garbage() {
        let err = decode(b"definitely not an image").unwrap_err();
        assert!(matches!(err, MediaError::Decode(_)));
    }

    #[test]
    fn decode_rejects_empty_input() {
        assert!(decode(&[]).is_err());
    }
}
