// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! This module serves as the single source of truth for default values
//! used across the crate. Constants are organized by category.
//!
//! # Categories
//!
//! - **General**: Fallback locale
//! - **Server**: Backend base URL
//! - **Capture**: File size limit, JPEG quality, crop container width
//! - **Form**: Delay before the form resets after a successful submission

// ==========================================================================
// General Defaults
// ==========================================================================

/// Locale used when neither CLI, config nor OS locale match a bundle.
pub const DEFAULT_LOCALE: &str = "ru";

// ==========================================================================
// Server Defaults
// ==========================================================================

/// Backend base URL.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

// ==========================================================================
// Capture Defaults
// ==========================================================================

/// Default maximum photo size in megabytes.
pub const DEFAULT_MAX_FILE_MB: u32 = 10;

/// Minimum configurable photo size limit in megabytes.
pub const MIN_MAX_FILE_MB: u32 = 1;

/// Maximum configurable photo size limit in megabytes.
pub const MAX_MAX_FILE_MB: u32 = 50;

/// Default maximum photo size in bytes (10 MiB).
pub const DEFAULT_MAX_FILE_BYTES: u64 = DEFAULT_MAX_FILE_MB as u64 * 1024 * 1024;

/// Default JPEG quality of the exported photo (0.9 on a 0–1 scale).
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Lowest accepted JPEG quality.
pub const MIN_JPEG_QUALITY: u8 = 1;

/// Highest accepted JPEG quality.
pub const MAX_JPEG_QUALITY: u8 = 100;

/// Default width of the crop container in pixels.
pub const DEFAULT_CONTAINER_WIDTH: f32 = 800.0;

// ==========================================================================
// Form Defaults
// ==========================================================================

/// Delay between a successful submission and the form reset (milliseconds).
pub const DEFAULT_RESET_DELAY_MS: u64 = 1500;

/// Longest configurable reset delay (milliseconds).
pub const MAX_RESET_DELAY_MS: u64 = 60_000;
