// SPDX-License-Identifier: MPL-2.0
//! Photo geometry for 3:4 portrait crops.
//!
//! All rectangles are expressed in source image pixels. The crop box always
//! keeps a width:height ratio of 3:4, and the exported raster is an exact
//! multiple of 3×4 so the ratio survives integer rounding.

/// Width-to-height ratio of every crop box and exported photo.
pub const ASPECT_RATIO: f32 = 3.0 / 4.0;

/// Smallest crop box width accepted from interactive adjustment (pixels).
pub const MIN_CROP_WIDTH: f32 = 3.0;

// =============================================================================
// PhotoState
// =============================================================================

/// Lifecycle of the photo part of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PhotoState {
    /// No image selected.
    #[default]
    Empty,
    /// Image decoded and the crop surface is active.
    Loaded,
    /// Crop applied; an artifact is ready for submission.
    Cropped,
}

// =============================================================================
// Auto-positioning policy
// =============================================================================

/// Fraction of the image width used for the default crop box.
pub const AUTO_CROP_IMAGE_FRACTION: f32 = 0.7;

/// Fraction of the container width used for the default crop box.
pub const AUTO_CROP_CONTAINER_FRACTION: f32 = 0.8;

/// Upward shift of the default crop box, as a fraction of image height.
pub const AUTO_CROP_UPWARD_SHIFT: f32 = 0.1;

// =============================================================================
// CropRect
// =============================================================================

/// Crop box in image coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl CropRect {
    #[must_use]
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Default portrait framing for a freshly loaded image.
    ///
    /// Width is `min(70% of image width, 80% of container width)`, height is
    /// `width × 4/3`. The box is horizontally centered, vertically centered
    /// and then moved up by 10% of the image height (never above the top
    /// edge). A box taller than the image is shrunk first so it stays
    /// centered.
    #[must_use]
    pub fn portrait_default(image_width: u32, image_height: u32, container_width: f32) -> Self {
        let iw = image_width as f32;
        let ih = image_height as f32;

        let width = (iw * AUTO_CROP_IMAGE_FRACTION)
            .min(container_width * AUTO_CROP_CONTAINER_FRACTION)
            .min(ih * ASPECT_RATIO)
            .max(MIN_CROP_WIDTH.min(iw));
        let height = width / ASPECT_RATIO;

        let x = (iw - width) / 2.0;
        let y = ((ih - height) / 2.0 - ih * AUTO_CROP_UPWARD_SHIFT).max(0.0);

        Self::new(x, y, width, height).constrained_to(image_width, image_height)
    }

    /// Re-imposes the 3:4 ratio (height follows width) and moves/shrinks the
    /// box so it lies entirely inside the image.
    #[must_use]
    pub fn constrained_to(self, image_width: u32, image_height: u32) -> Self {
        let iw = image_width as f32;
        let ih = image_height as f32;

        let mut width = finite_or(self.width, iw).max(MIN_CROP_WIDTH);
        if width > iw {
            width = iw;
        }
        let mut height = width / ASPECT_RATIO;
        if height > ih {
            height = ih;
            width = height * ASPECT_RATIO;
        }

        let x = finite_or(self.x, 0.0).max(0.0).min(iw - width);
        let y = finite_or(self.y, 0.0).max(0.0).min(ih - height);

        Self::new(x, y, width, height)
    }

    /// Returns the box moved by (`dx`, `dy`), constrained to the image.
    #[must_use]
    pub fn translated(self, dx: f32, dy: f32, image_width: u32, image_height: u32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
            .constrained_to(image_width, image_height)
    }

    /// Width divided by height.
    #[must_use]
    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }
}

fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

// =============================================================================
// Export size bounds
// =============================================================================

/// Export raster bounds (240×320 to 960×1280, default 480×640).
pub mod export_bounds {
    /// Minimum exported width.
    pub const MIN_WIDTH: u32 = 240;
    /// Maximum exported width.
    pub const MAX_WIDTH: u32 = 960;
    /// Default exported width.
    pub const DEFAULT_WIDTH: u32 = 480;
    /// Minimum exported height.
    pub const MIN_HEIGHT: u32 = 320;
    /// Maximum exported height.
    pub const MAX_HEIGHT: u32 = 1280;
}

// =============================================================================
// ExportSize
// =============================================================================

/// Exported photo dimensions, guaranteed to be exactly 3:4 and within
/// [`export_bounds`].
///
/// Stored as the number of 3×4 units so width and height can never drift
/// apart through rounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportSize(u32);

impl ExportSize {
    /// Creates an export size from a requested width.
    ///
    /// The width is rounded down to a multiple of 3 and clamped to the
    /// valid range.
    #[must_use]
    pub fn from_width(width: u32) -> Self {
        Self(
            (width / 3).clamp(export_bounds::MIN_WIDTH / 3, export_bounds::MAX_WIDTH / 3),
        )
    }

    #[must_use]
    pub fn width(self) -> u32 {
        self.0 * 3
    }

    #[must_use]
    pub fn height(self) -> u32 {
        self.0 * 4
    }

    /// Returns `(width, height)`.
    #[must_use]
    pub fn dimensions(self) -> (u32, u32) {
        (self.width(), self.height())
    }
}

impl Default for ExportSize {
    fn default() -> Self {
        Self::from_width(export_bounds::DEFAULT_WIDTH)
    }
}
