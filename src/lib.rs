// SPDX-License-Identifier: MPL-2.0
//! `face_enroll` is a face-registration client.
//!
//! The operator enters an IIN, the client confirms the identity with the
//! backend, crops the operator's photo to a 3:4 portrait and submits it for
//! the confirmed user. The crate is UI-agnostic: [`form::FormOrchestrator`]
//! exposes every operator action and a view snapshot, and the binary drives
//! it from the command line.

#![doc(html_root_url = "https://docs.rs/face_enroll/0.1.0")]

pub mod api;
pub mod capture;
pub mod config;
pub mod domain;
pub mod error;
pub mod form;
pub mod i18n;
pub mod media;
pub mod paths;

#[cfg(test)]
pub(crate) mod test_utils;
