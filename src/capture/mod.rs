// SPDX-License-Identifier: MPL-2.0
//! Photo capture controller.
//!
//! Owns the selected image, the interactive 3:4 crop box over it and the
//! final cropped artifact. Observers learn about changes through
//! [`PhotoCaptureController::subscribe`]; the controller itself never talks
//! to the network.
//!
//! # Lifecycle
//!
//! ```text
//! Empty --load_image--> Loaded --perform_crop--> Cropped
//!   ^                     |  ^                      |
//!   |                     |  +------load_image------+
//!   +-----clear_image-----+-------------------------+
//! ```

pub mod events;

pub use events::{CaptureEvent, EventBus};

use crate::config::{DEFAULT_CONTAINER_WIDTH, DEFAULT_JPEG_QUALITY, DEFAULT_MAX_FILE_BYTES};
use crate::domain::photo::{CropRect, ExportSize, PhotoState};
use crate::error::{CaptureError, ValidationError};
use crate::media::{self, SelectedFile};
use image_rs::{DynamicImage, GenericImageView, RgbaImage};
use std::fmt;
use std::sync::Arc;
use tokio::sync::mpsc;

/// File name given to the exported photo.
pub const ARTIFACT_FILE_NAME: &str = "cropped-photo.jpg";

/// Media type of the exported photo.
pub const ARTIFACT_MEDIA_TYPE: &str = "image/jpeg";

/// Tunables for validation and export.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptureSettings {
    /// Largest accepted file, in bytes.
    pub max_file_bytes: u64,
    /// Size of the exported raster.
    pub export_size: ExportSize,
    /// JPEG quality, 1–100.
    pub jpeg_quality: u8,
    /// Width of the area the crop surface is displayed in; feeds the default
    /// crop box size.
    pub container_width: f32,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            export_size: ExportSize::default(),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            container_width: DEFAULT_CONTAINER_WIDTH,
        }
    }
}

// =============================================================================
// CroppedArtifact
// =============================================================================

/// The final 3:4 photo: encoded JPEG plus the rendered bitmap it came from.
pub struct CroppedArtifact {
    jpeg: Vec<u8>,
    surface: RgbaImage,
    size: ExportSize,
    source_box: CropRect,
}

impl CroppedArtifact {
    /// Encoded JPEG bytes.
    #[must_use]
    pub fn jpeg_bytes(&self) -> &[u8] {
        &self.jpeg
    }

    /// Rendered bitmap.
    #[must_use]
    pub fn surface(&self) -> &RgbaImage {
        &self.surface
    }

    /// `(width, height)` of the exported raster.
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        self.size.dimensions()
    }

    /// Crop box in source image coordinates that produced this artifact.
    #[must_use]
    pub fn source_box(&self) -> CropRect {
        self.source_box
    }

    #[must_use]
    pub fn file_name(&self) -> &'static str {
        ARTIFACT_FILE_NAME
    }

    #[must_use]
    pub fn media_type(&self) -> &'static str {
        ARTIFACT_MEDIA_TYPE
    }

    /// `data:image/jpeg;base64,…` form used in the submission body.
    #[must_use]
    pub fn data_url(&self) -> String {
        media::jpeg_data_url(&self.jpeg)
    }
}

impl fmt::Debug for CroppedArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CroppedArtifact")
            .field("jpeg_len", &self.jpeg.len())
            .field("size", &self.size)
            .field("source_box", &self.source_box)
            .finish()
    }
}

// =============================================================================
// Stage
// =============================================================================

/// Interactive crop surface over a decoded image.
struct CropSurface {
    image: DynamicImage,
    crop_box: CropRect,
    /// Whether the operator moved or resized the default box.
    adjusted: bool,
}

enum Stage {
    Empty,
    Loaded(CropSurface),
    Cropped {
        artifact: Arc<CroppedArtifact>,
        source_dimensions: (u32, u32),
    },
}

/// What the preview area should show.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewView {
    pub visible: bool,
    /// i18n key of the crop button label, if the button is shown.
    pub crop_button_label: Option<&'static str>,
    pub crop_button_enabled: bool,
    /// i18n key of the success note shown under a cropped photo.
    pub success_note: Option<&'static str>,
    pub crop_box: Option<CropRect>,
    pub image_dimensions: Option<(u32, u32)>,
}

// =============================================================================
// PhotoCaptureController
// =============================================================================

/// Validates, crops and exports the operator's photo.
pub struct PhotoCaptureController {
    settings: CaptureSettings,
    stage: Stage,
    events: EventBus,
}

impl Default for PhotoCaptureController {
    fn default() -> Self {
        Self::new(CaptureSettings::default())
    }
}

impl PhotoCaptureController {
    #[must_use]
    pub fn new(settings: CaptureSettings) -> Self {
        Self {
            settings,
            stage: Stage::Empty,
            events: EventBus::new(),
        }
    }

    /// Registers an observer for [`CaptureEvent`]s.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<CaptureEvent> {
        self.events.subscribe()
    }

    #[must_use]
    pub fn photo_state(&self) -> PhotoState {
        match self.stage {
            Stage::Empty => PhotoState::Empty,
            Stage::Loaded(_) => PhotoState::Loaded,
            Stage::Cropped { .. } => PhotoState::Cropped,
        }
    }

    #[must_use]
    pub fn is_cropped(&self) -> bool {
        matches!(self.stage, Stage::Cropped { .. })
    }

    /// The exported photo, once the crop was applied.
    #[must_use]
    pub fn artifact(&self) -> Option<Arc<CroppedArtifact>> {
        match &self.stage {
            Stage::Cropped { artifact, .. } => Some(Arc::clone(artifact)),
            _ => None,
        }
    }

    /// Current crop box while the crop surface is active.
    #[must_use]
    pub fn crop_box(&self) -> Option<CropRect> {
        match &self.stage {
            Stage::Loaded(surface) => Some(surface.crop_box),
            _ => None,
        }
    }

    #[must_use]
    pub fn preview(&self) -> PreviewView {
        match &self.stage {
            Stage::Empty => PreviewView {
                visible: false,
                crop_button_label: None,
                crop_button_enabled: false,
                success_note: None,
                crop_box: None,
                image_dimensions: None,
            },
            Stage::Loaded(surface) => PreviewView {
                visible: true,
                crop_button_label: Some(if surface.adjusted {
                    "crop-button-apply"
                } else {
                    "crop-button-auto"
                }),
                crop_button_enabled: true,
                success_note: None,
                crop_box: Some(surface.crop_box),
                image_dimensions: Some(surface.image.dimensions()),
            },
            Stage::Cropped {
                source_dimensions, ..
            } => PreviewView {
                visible: true,
                crop_button_label: Some("crop-button-done"),
                crop_button_enabled: false,
                success_note: Some("crop-success"),
                crop_box: None,
                image_dimensions: Some(*source_dimensions),
            },
        }
    }

    /// Validates and decodes `file`, then opens a crop surface over it.
    ///
    /// Type and size are checked before anything is decoded; a rejected file
    /// leaves the current state untouched. Any previous surface or artifact
    /// is replaced.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::NotAnImage`] if the media type is not `image/*`
    /// - [`ValidationError::FileTooLarge`] if the file exceeds the limit
    /// - [`CaptureError::Media`] if the bytes cannot be decoded
    pub fn load_image(&mut self, file: &SelectedFile) -> Result<(), CaptureError> {
        if !file.is_image() {
            log::warn!("Rejected {:?}: media type {:?}", file.name, file.media_type);
            return Err(ValidationError::NotAnImage {
                media_type: file.media_type.clone(),
            }
            .into());
        }

        if file.size() > self.settings.max_file_bytes {
            log::warn!("Rejected {:?}: {} bytes", file.name, file.size());
            return Err(ValidationError::FileTooLarge {
                size: file.size(),
                limit: self.settings.max_file_bytes,
            }
            .into());
        }

        let image = match media::decode(&file.bytes) {
            Ok(image) => image,
            Err(err) => {
                log::warn!("Failed to decode {:?}: {}", file.name, err);
                self.events.publish(CaptureEvent::Error {
                    message: err.to_string(),
                });
                return Err(err.into());
            }
        };

        let (width, height) = image.dimensions();
        let crop_box = CropRect::portrait_default(width, height, self.settings.container_width);
        log::debug!(
            "Loaded {:?} ({}x{}), default crop box {:?}",
            file.name,
            width,
            height,
            crop_box
        );

        self.stage = Stage::Loaded(CropSurface {
            image,
            crop_box,
            adjusted: false,
        });
        self.events.publish(CaptureEvent::Loaded { width, height });
        Ok(())
    }

    /// Replaces the crop box, keeping it 3:4 and inside the image.
    ///
    /// Returns the box actually applied.
    pub fn set_crop_box(&mut self, rect: CropRect) -> Result<CropRect, CaptureError> {
        let Stage::Loaded(surface) = &mut self.stage else {
            return Err(CaptureError::NoImage);
        };
        let (width, height) = surface.image.dimensions();
        surface.crop_box = rect.constrained_to(width, height);
        surface.adjusted = true;
        Ok(surface.crop_box)
    }

    /// Moves the crop box by (`dx`, `dy`) image pixels.
    pub fn move_crop_box(&mut self, dx: f32, dy: f32) -> Result<CropRect, CaptureError> {
        let Stage::Loaded(surface) = &mut self.stage else {
            return Err(CaptureError::NoImage);
        };
        let (width, height) = surface.image.dimensions();
        surface.crop_box = surface.crop_box.translated(dx, dy, width, height);
        surface.adjusted = true;
        Ok(surface.crop_box)
    }

    /// Renders the crop box into the export raster, encodes it and replaces
    /// the crop surface with the static result.
    ///
    /// # Errors
    ///
    /// [`CaptureError::NoImage`] without an active crop surface, or
    /// [`CaptureError::Media`] if JPEG encoding fails.
    pub fn perform_crop(&mut self) -> Result<Arc<CroppedArtifact>, CaptureError> {
        let Stage::Loaded(surface) = &self.stage else {
            return Err(CaptureError::NoImage);
        };

        let size = self.settings.export_size;
        let rendered = media::render_crop(&surface.image, surface.crop_box, size);
        let jpeg = match media::encode_jpeg(&rendered, self.settings.jpeg_quality) {
            Ok(jpeg) => jpeg,
            Err(err) => {
                log::warn!("Failed to encode cropped photo: {}", err);
                self.events.publish(CaptureEvent::Error {
                    message: err.to_string(),
                });
                return Err(err.into());
            }
        };

        let artifact = Arc::new(CroppedArtifact {
            jpeg,
            surface: rendered,
            size,
            source_box: surface.crop_box,
        });
        let source_dimensions = surface.image.dimensions();
        log::info!(
            "Cropped photo to {}x{} ({} bytes)",
            size.width(),
            size.height(),
            artifact.jpeg.len()
        );

        self.stage = Stage::Cropped {
            artifact: Arc::clone(&artifact),
            source_dimensions,
        };
        self.events
            .publish(CaptureEvent::Cropped(Arc::clone(&artifact)));
        Ok(artifact)
    }

    /// Discards the image, crop surface and artifact.
    pub fn clear_image(&mut self) {
        self.stage = Stage::Empty;
        self.events.publish(CaptureEvent::Cleared);
    }
}
