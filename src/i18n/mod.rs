// SPDX-License-Identifier: MPL-2.0
//! Internationalization (i18n) support for the client.
//!
//! This module provides localization using the Fluent localization system.
//! Every user-visible string produced by the form is a message key (plus
//! arguments) that is rendered here.
//!
//! # Features
//!
//! - Locale detection from CLI, config, or system settings
//! - Embedded `.ftl` translation files
//! - Fallback to Russian, the form's native language

pub mod fluent;

pub use fluent::{I18n, DEFAULT_LOCALE};
