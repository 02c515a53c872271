// SPDX-License-Identifier: MPL-2.0
//! Test utilities for float comparisons and sample photos.
//!
//! This module re-exports the `approx` crate's assertion macros for float comparison,
//! which properly handle floating-point precision issues that `assert_eq!` cannot.

pub use approx::{assert_abs_diff_eq, assert_relative_eq};

use crate::media::SelectedFile;
use image_rs::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;

/// A gradient JPEG of the given size, as the file picker would hand it over.
pub fn jpeg_file(width: u32, height: u32) -> SelectedFile {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, 128, 255])
    });
    let rgb = DynamicImage::ImageRgba8(img).to_rgb8();
    let mut out = Cursor::new(Vec::new());
    rgb.write_to(&mut out, ImageFormat::Jpeg)
        .expect("encode jpeg");
    SelectedFile::new("face.jpg", "image/jpeg", out.into_inner())
}
