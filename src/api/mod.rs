// SPDX-License-Identifier: MPL-2.0
//! Backend API used by the enrollment form.
//!
//! A backend only moves bytes: it returns the raw status and body of each
//! exchange, or a [`TransportError`] when no response arrived. Turning those
//! into domain results is done once, by the pure functions in [`response`],
//! so every backend (HTTP or scripted) is interpreted the same way.

pub mod http;
pub mod response;

pub use http::HttpBackend;
pub use response::{interpret_lookup, interpret_submission};

use crate::domain::{Iin, UserId};
use crate::error::TransportError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Route layout exposed by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ApiRoutes {
    /// `POST /api/get_user_by_iin` and `POST /api/submit-face`.
    #[default]
    Legacy,
    /// `GET /api/users/by_iin/{iin}` and `PUT /api/users/{user_id}/face`.
    Rest,
}

impl std::str::FromStr for ApiRoutes {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legacy" => Ok(ApiRoutes::Legacy),
            "rest" => Ok(ApiRoutes::Rest),
            other => Err(format!("unknown route layout {:?} (expected legacy or rest)", other)),
        }
    }
}

impl fmt::Display for ApiRoutes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiRoutes::Legacy => write!(f, "legacy"),
            ApiRoutes::Rest => write!(f, "rest"),
        }
    }
}

/// Status code and body of a completed exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is in the 2xx range.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Payload of a face submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FaceSubmission {
    pub iin: String,
    pub user_id: u64,
    /// `data:image/jpeg;base64,...`
    pub photo: String,
}

impl FaceSubmission {
    pub fn new(iin: &Iin, user_id: UserId, photo_data_url: String) -> Self {
        Self {
            iin: iin.as_str().to_string(),
            user_id: user_id.0,
            photo: photo_data_url,
        }
    }
}

/// Transport to the enrollment backend.
///
/// Implementations issue exactly one request per call and never retry.
#[allow(async_fn_in_trait)]
pub trait EnrollmentBackend {
    /// Looks up the identity registered under `iin`.
    async fn lookup_identity(&self, iin: &Iin) -> Result<RawResponse, TransportError>;

    /// Submits the cropped face photo for a confirmed identity.
    async fn submit_face(&self, submission: &FaceSubmission) -> Result<RawResponse, TransportError>;
}
