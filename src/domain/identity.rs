// SPDX-License-Identifier: MPL-2.0
//! Identity types.
//!
//! An [`Iin`] is the lookup key typed by the operator; an [`IdentityRecord`]
//! is what the backend returns for it.

use crate::error::ValidationError;
use std::fmt;

/// Number of digits in an IIN.
pub const IIN_LENGTH: usize = 12;

// =============================================================================
// Iin
// =============================================================================

/// Individual identification number, guaranteed to be exactly 12 ASCII digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Iin(String);

impl Iin {
    /// Parses operator input, ignoring surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MalformedIin`] unless the trimmed input is
    /// exactly 12 ASCII digits.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.len() == IIN_LENGTH && trimmed.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(ValidationError::MalformedIin)
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Iin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// IdentityRecord
// =============================================================================

/// Backend user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A confirmed identity, held in memory only while the form is populated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityRecord {
    pub user_id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub middle_name: Option<String>,
}

impl IdentityRecord {
    /// Full name as shown next to the IIN field: "last first [middle]".
    #[must_use]
    pub fn display_name(&self) -> String {
        let mut parts = vec![self.last_name.trim(), self.first_name.trim()];
        if let Some(middle) = self.middle_name.as_deref() {
            parts.push(middle.trim());
        }
        parts
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
