// SPDX-License-Identifier: MPL-2.0
//! Error types for enrollment, capture and backend exchange.
//!
//! Infrastructure failures (file system, configuration, HTTP client setup) use
//! [`Error`]. Everything the operator can see carries an `i18n_key()` so the
//! front end can render a localized message.

use std::fmt;

#[derive(Debug, Clone)]
pub enum Error {
    Io(String),
    Config(String),
    Http(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O Error: {}", e),
            Error::Config(e) => write!(f, "Config Error: {}", e),
            Error::Http(e) => write!(f, "HTTP Error: {}", e),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Http(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

// =============================================================================
// Input validation
// =============================================================================

/// Input rejected locally, before any request or decode happens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// IIN is not exactly twelve digits.
    MalformedIin,
    /// Selected file does not report an `image/*` media type.
    NotAnImage { media_type: String },
    /// Selected file exceeds the size limit.
    FileTooLarge { size: u64, limit: u64 },
}

impl ValidationError {
    /// Returns the i18n message key for this error.
    pub fn i18n_key(&self) -> &'static str {
        match self {
            ValidationError::MalformedIin => "iin-error-invalid",
            ValidationError::NotAnImage { .. } => "photo-error-not-image",
            ValidationError::FileTooLarge { .. } => "photo-error-too-large",
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::MalformedIin => write!(f, "IIN must be exactly 12 digits"),
            ValidationError::NotAnImage { media_type } => {
                write!(f, "Not an image file (media type: {:?})", media_type)
            }
            ValidationError::FileTooLarge { size, limit } => {
                write!(f, "File too large: {} bytes (limit {} bytes)", size, limit)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

// =============================================================================
// Image processing
// =============================================================================

/// Decoding or encoding failure inside the image pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaError {
    Decode(String),
    Encode(String),
}

impl fmt::Display for MediaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaError::Decode(msg) => write!(f, "Decoding failed: {}", msg),
            MediaError::Encode(msg) => write!(f, "Encoding failed: {}", msg),
        }
    }
}

impl std::error::Error for MediaError {}

/// Errors returned by the photo capture controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    Invalid(ValidationError),
    Media(MediaError),
    /// Operation needs a loaded image with an active crop surface.
    NoImage,
}

impl CaptureError {
    /// Returns the i18n message key for this error.
    pub fn i18n_key(&self) -> &'static str {
        match self {
            CaptureError::Invalid(err) => err.i18n_key(),
            CaptureError::Media(_) => "photo-error-processing",
            CaptureError::NoImage => "photo-error-no-image",
        }
    }
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureError::Invalid(err) => write!(f, "{}", err),
            CaptureError::Media(err) => write!(f, "{}", err),
            CaptureError::NoImage => write!(f, "No image loaded"),
        }
    }
}

impl std::error::Error for CaptureError {}

impl From<ValidationError> for CaptureError {
    fn from(err: ValidationError) -> Self {
        CaptureError::Invalid(err)
    }
}

impl From<MediaError> for CaptureError {
    fn from(err: MediaError) -> Self {
        CaptureError::Media(err)
    }
}

// =============================================================================
// Backend exchange
// =============================================================================

/// The request never produced a usable response (connection refused, reset,
/// body could not be read).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError(pub String);

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Transport error: {}", self.0)
    }
}

impl std::error::Error for TransportError {}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        TransportError(err.to_string())
    }
}

/// Identity lookup did not confirm a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupFailure {
    /// Backend answered 404.
    NotFound,
    /// Backend answered with another non-success status.
    Server { status: u16 },
    /// Backend answered 2xx with `success: false`.
    Rejected { reason: Option<String> },
    /// Request failed or the response body was not understood.
    Network(String),
}

impl LookupFailure {
    /// Returns the i18n message key for this failure.
    pub fn i18n_key(&self) -> &'static str {
        match self {
            LookupFailure::NotFound => "iin-error-not-found",
            LookupFailure::Server { .. } => "iin-error-server",
            LookupFailure::Rejected { .. } => "iin-error-lookup-failed",
            LookupFailure::Network(_) => "error-network",
        }
    }
}

impl fmt::Display for LookupFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupFailure::NotFound => write!(f, "User not found"),
            LookupFailure::Server { status } => write!(f, "Server error (status {})", status),
            LookupFailure::Rejected { reason: Some(reason) } => {
                write!(f, "Lookup rejected: {}", reason)
            }
            LookupFailure::Rejected { reason: None } => write!(f, "Lookup rejected"),
            LookupFailure::Network(msg) => write!(f, "Network error: {}", msg),
        }
    }
}

impl std::error::Error for LookupFailure {}

impl From<TransportError> for LookupFailure {
    fn from(err: TransportError) -> Self {
        LookupFailure::Network(err.0)
    }
}

/// Reasons a submission is refused before any request is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitBlocked {
    IdentityNotConfirmed,
    PhotoNotCropped,
}

impl SubmitBlocked {
    /// Returns the i18n message key for this refusal.
    pub fn i18n_key(&self) -> &'static str {
        match self {
            SubmitBlocked::IdentityNotConfirmed => "submit-blocked-identity",
            SubmitBlocked::PhotoNotCropped => "submit-blocked-crop",
        }
    }
}

impl fmt::Display for SubmitBlocked {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitBlocked::IdentityNotConfirmed => write!(f, "Identity is not confirmed"),
            SubmitBlocked::PhotoNotCropped => write!(f, "Photo is not cropped"),
        }
    }
}

impl std::error::Error for SubmitBlocked {}

/// Face submission did not succeed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionFailure {
    /// Backend answered non-2xx. `message` is the best text recovered from
    /// the body, if any.
    Rejected { status: u16, message: Option<String> },
    /// Request failed before a response arrived.
    Network(String),
}

impl SubmissionFailure {
    /// Returns the i18n message key for this failure.
    ///
    /// A rejection carrying a server message is shown verbatim; the key is
    /// only used when the body held nothing readable.
    pub fn i18n_key(&self) -> &'static str {
        match self {
            SubmissionFailure::Rejected { .. } => "submit-error-server",
            SubmissionFailure::Network(_) => "error-network",
        }
    }
}

impl fmt::Display for SubmissionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmissionFailure::Rejected {
                status,
                message: Some(message),
            } => write!(f, "Submission rejected ({}): {}", status, message),
            SubmissionFailure::Rejected {
                status,
                message: None,
            } => write!(f, "Submission rejected ({})", status),
            SubmissionFailure::Network(msg) => write!(f, "Network error: {}", msg),
        }
    }
}

impl std::error::Error for SubmissionFailure {}

impl From<TransportError> for SubmissionFailure {
    fn from(err: TransportError) -> Self {
        SubmissionFailure::Network(err.0)
    }
}

// =============================================================================
// Form orchestration
// =============================================================================

/// Errors surfaced by form operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    Validation(ValidationError),
    Lookup(LookupFailure),
    Capture(CaptureError),
    Blocked(SubmitBlocked),
    Submission(SubmissionFailure),
    /// Photo controls are disabled (no confirmed identity, or a request is
    /// in flight).
    PhotoControlsDisabled,
    /// Another request of the same form is still in flight.
    Busy,
}

impl FormError {
    /// Returns the i18n message key for this error.
    pub fn i18n_key(&self) -> &'static str {
        match self {
            FormError::Validation(err) => err.i18n_key(),
            FormError::Lookup(err) => err.i18n_key(),
            FormError::Capture(err) => err.i18n_key(),
            FormError::Blocked(err) => err.i18n_key(),
            FormError::Submission(err) => err.i18n_key(),
            FormError::PhotoControlsDisabled => "photo-controls-disabled",
            FormError::Busy => "form-busy",
        }
    }
}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormError::Validation(err) => write!(f, "{}", err),
            FormError::Lookup(err) => write!(f, "{}", err),
            FormError::Capture(err) => write!(f, "{}", err),
            FormError::Blocked(err) => write!(f, "{}", err),
            FormError::Submission(err) => write!(f, "{}", err),
            FormError::PhotoControlsDisabled => write!(f, "Photo controls are disabled"),
            FormError::Busy => write!(f, "A request is already in progress"),
        }
    }
}

impl std::error::Error for FormError {}

impl From<ValidationError> for FormError {
    fn from(err: ValidationError) -> Self {
        FormError::Validation(err)
    }
}

impl From<LookupFailure> for FormError {
    fn from(err: LookupFailure) -> Self {
        FormError::Lookup(err)
    }
}

impl From<CaptureError> for FormError {
    fn from(err: CaptureError) -> Self {
        match err {
            CaptureError::Invalid(inner) => FormError::Validation(inner),
            other => FormError::Capture(other),
        }
    }
}

impl From<SubmitBlocked> for FormError {
    fn from(err: SubmitBlocked) -> Self {
        FormError::Blocked(err)
    }
}

impl From<SubmissionFailure> for FormError {
    fn from(err: SubmissionFailure) -> Self {
        FormError::Submission(err)
    }
}
