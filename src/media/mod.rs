// SPDX-License-Identifier: MPL-2.0
//! Photo file handling: selection, decoding, cropping and JPEG export.
//!
//! [`SelectedFile`] plays the role of a browser file input: it carries the
//! file name, the media type reported for it and the raw bytes.

pub mod image;
pub mod image_transform;

use crate::error::Result;
use std::fs;
use std::path::Path;

pub use image::decode;
pub use image_transform::{encode_jpeg, jpeg_data_url, render_crop};

/// Media type used for files whose extension is unknown.
pub const FALLBACK_MEDIA_TYPE: &str = "application/octet-stream";

/// Supported media extensions
pub mod extensions {
    /// Image extensions and the media type reported for each.
    pub const IMAGE_MEDIA_TYPES: &[(&str, &str)] = &[
        ("jpg", "image/jpeg"),
        ("jpeg", "image/jpeg"),
        ("jfif", "image/jpeg"),
        ("png", "image/png"),
        ("gif", "image/gif"),
        ("webp", "image/webp"),
        ("bmp", "image/bmp"),
        ("tif", "image/tiff"),
        ("tiff", "image/tiff"),
        ("ico", "image/vnd.microsoft.icon"),
        ("heic", "image/heic"),
        ("svg", "image/svg+xml"),
    ];
}

/// Guesses the media type of a path from its extension.
pub fn media_type_for_path<P: AsRef<Path>>(path: P) -> &'static str {
    let extension = path
        .as_ref()
        .extension()
        .and_then(|s| s.to_str())
        .map(str::to_lowercase);

    extension
        .and_then(|ext| {
            extensions::IMAGE_MEDIA_TYPES
                .iter()
                .find(|(known, _)| *known == ext)
                .map(|(_, media_type)| *media_type)
        })
        .unwrap_or(FALLBACK_MEDIA_TYPE)
}

/// A file picked by the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes,
        }
    }

    /// Reads a file from disk, guessing its media type from the extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::new(name, media_type_for_path(path), bytes))
    }

    /// Size in bytes.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Whether the reported media type is an image type.
    #[must_use]
    pub fn is_image(&self) -> bool {
        self.media_type.starts_with("image/")
    }
}
