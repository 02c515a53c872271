// SPDX-License-Identifier: MPL-2.0
//! Domain layer - Core enrollment types with ZERO external dependencies.
//!
//! This module contains pure domain types, value objects, and business rules.
//! It has no dependencies on external crates (except `std`) to keep the
//! form rules testable without a backend or an image decoder.
//!
//! # Modules
//!
//! - [`identity`]: Identity types ([`Iin`](identity::Iin),
//!   [`IdentityRecord`](identity::IdentityRecord))
//! - [`photo`]: Photo geometry ([`PhotoState`](photo::PhotoState),
//!   [`CropRect`](photo::CropRect), [`ExportSize`](photo::ExportSize))

pub mod identity;
pub mod photo;

pub use identity::{IdentityRecord, Iin, UserId};
pub use photo::{CropRect, ExportSize, PhotoState};
