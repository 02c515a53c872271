// SPDX-License-Identifier: MPL-2.0
//! This module handles the client configuration, including loading and saving
//! preferences to a `settings.toml` file.
//!
//! # Configuration Sections
//!
//! The configuration is organized into logical sections:
//! - `[general]` - Language
//! - `[server]` - Backend base URL and route layout
//! - `[capture]` - File size limit, export size, JPEG quality, container width
//! - `[form]` - Delay before the form resets after a successful submission
//!
//! # Path Resolution
//!
//! The config file location can be customized for testing or portable deployments:
//! 1. Use `load_from_path()`/`save_to_path()` with explicit path
//! 2. Pass `--config-dir` on the command line
//! 3. Set `FACE_ENROLL_CONFIG_DIR` environment variable
//! 4. Falls back to platform-specific config directory
//!
//! # Examples
//!
//! ```no_run
//! use face_enroll::config::{self, Config};
//!
//! // Load existing configuration (returns tuple with optional warning)
//! let (mut config, _warning) = config::load();
//!
//! // Point the client at another backend
//! config.server.base_url = Some("http://10.0.0.5:8080".to_string());
//!
//! // Save the modified configuration
//! config::save(&config).expect("Failed to save config");
//! ```

pub mod defaults;

pub use defaults::*;

use crate::api::ApiRoutes;
use crate::capture::CaptureSettings;
use crate::domain::photo::{export_bounds, ExportSize};
use crate::error::{Error, Result};
use crate::paths;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILE: &str = "settings.toml";

// =============================================================================
// Section Structs
// =============================================================================

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct GeneralConfig {
    /// UI language code (e.g., "ru", "en-US").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// Backend connection settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    /// Base URL the API paths are appended to.
    #[serde(default = "default_base_url", skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Route layout exposed by the backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routes: Option<ApiRoutes>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            routes: Some(ApiRoutes::default()),
        }
    }
}

/// Photo capture settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CaptureConfig {
    /// Largest accepted photo, in megabytes.
    #[serde(
        default = "default_max_file_mb",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_file_mb: Option<u32>,

    /// Width of the exported photo (height follows at 3:4).
    #[serde(
        default = "default_export_width",
        skip_serializing_if = "Option::is_none"
    )]
    pub export_width: Option<u32>,

    /// JPEG quality of the exported photo (1-100).
    #[serde(
        default = "default_jpeg_quality",
        skip_serializing_if = "Option::is_none"
    )]
    pub jpeg_quality: Option<u8>,

    /// Width of the crop container, used for the default crop box.
    #[serde(
        default = "default_container_width",
        skip_serializing_if = "Option::is_none"
    )]
    pub container_width: Option<f32>,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            max_file_mb: default_max_file_mb(),
            export_width: default_export_width(),
            jpeg_quality: default_jpeg_quality(),
            container_width: default_container_width(),
        }
    }
}

/// Form behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FormConfig {
    /// Delay between a successful submission and the form reset.
    #[serde(
        default = "default_reset_delay_ms",
        skip_serializing_if = "Option::is_none"
    )]
    pub reset_delay_ms: Option<u64>,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            reset_delay_ms: default_reset_delay_ms(),
        }
    }
}

// =============================================================================
// Main Config Struct (Sectioned)
// =============================================================================

/// Client configuration with logical sections.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Backend connection settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Photo capture settings.
    #[serde(default)]
    pub capture: CaptureConfig,

    /// Form behavior settings.
    #[serde(default)]
    pub form: FormConfig,
}

impl Config {
    /// Backend base URL, without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> String {
        self.server
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
            .to_string()
    }

    #[must_use]
    pub fn routes(&self) -> ApiRoutes {
        self.server.routes.unwrap_or_default()
    }

    /// Capture settings with every value clamped to its valid range.
    #[must_use]
    pub fn capture_settings(&self) -> CaptureSettings {
        let max_file_mb = self
            .capture
            .max_file_mb
            .unwrap_or(DEFAULT_MAX_FILE_MB)
            .clamp(MIN_MAX_FILE_MB, MAX_MAX_FILE_MB);
        let container_width = self
            .capture
            .container_width
            .filter(|w| w.is_finite() && *w > 0.0)
            .unwrap_or(DEFAULT_CONTAINER_WIDTH);

        CaptureSettings {
            max_file_bytes: u64::from(max_file_mb) * 1024 * 1024,
            export_size: ExportSize::from_width(
                self.capture
                    .export_width
                    .unwrap_or(export_bounds::DEFAULT_WIDTH),
            ),
            jpeg_quality: self
                .capture
                .jpeg_quality
                .unwrap_or(DEFAULT_JPEG_QUALITY)
                .clamp(MIN_JPEG_QUALITY, MAX_JPEG_QUALITY),
            container_width,
        }
    }

    /// Delay before the form resets after a successful submission.
    #[must_use]
    pub fn reset_delay(&self) -> Duration {
        Duration::from_millis(
            self.form
                .reset_delay_ms
                .unwrap_or(DEFAULT_RESET_DELAY_MS)
                .min(MAX_RESET_DELAY_MS),
        )
    }
}

// =============================================================================
// Default Value Functions
// =============================================================================

fn default_base_url() -> Option<String> {
    Some(DEFAULT_BASE_URL.to_string())
}

fn default_max_file_mb() -> Option<u32> {
    Some(DEFAULT_MAX_FILE_MB)
}

fn default_export_width() -> Option<u32> {
    Some(export_bounds::DEFAULT_WIDTH)
}

fn default_jpeg_quality() -> Option<u8> {
    Some(DEFAULT_JPEG_QUALITY)
}

fn default_container_width() -> Option<f32> {
    Some(DEFAULT_CONTAINER_WIDTH)
}

fn default_reset_delay_ms() -> Option<u64> {
    Some(DEFAULT_RESET_DELAY_MS)
}

// =============================================================================
// Config Path Resolution
// =============================================================================

/// Returns the config file path with an optional override.
fn get_config_path_with_override(base_dir: Option<PathBuf>) -> Option<PathBuf> {
    paths::get_app_config_dir_with_override(base_dir).map(|mut path| {
        path.push(CONFIG_FILE);
        path
    })
}

// =============================================================================
// Load Functions
// =============================================================================

/// Loads the configuration from the default path.
///
/// Returns a tuple of (config, optional_warning). If loading fails, returns
/// default config with a warning message key explaining what went wrong.
pub fn load() -> (Config, Option<String>) {
    load_with_override(None)
}

/// Loads the configuration from a custom directory.
pub fn load_with_override(base_dir: Option<PathBuf>) -> (Config, Option<String>) {
    if let Some(path) = get_config_path_with_override(base_dir) {
        if path.exists() {
            match load_from_path(&path) {
                Ok(config) => return (config, None),
                Err(err) => {
                    log::warn!("Ignoring {}: {}", path.display(), err);
                    return (
                        Config::default(),
                        Some("config-load-error".to_string()),
                    );
                }
            }
        }
    }
    (Config::default(), None)
}

/// Loads configuration from a specific path.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

// =============================================================================
// Save Functions
// =============================================================================

/// Saves the configuration to the default path.
pub fn save(config: &Config) -> Result<()> {
    save_with_override(config, None)
}

/// Saves the configuration to a custom directory.
pub fn save_with_override(config: &Config, base_dir: Option<PathBuf>) -> Result<()> {
    if let Some(path) = get_config_path_with_override(base_dir) {
        return save_to_path(config, &path);
    }
    Ok(())
}

/// Saves configuration to a specific path.
pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config).map_err(Error::from)?;
    fs::write(path, content)?;
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
