// SPDX-License-Identifier: MPL-2.0
//! Inline messages shown next to the form's fields.

use crate::error::{FormError, LookupFailure, SubmissionFailure, ValidationError};
use crate::i18n::I18n;

/// How a message is styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Success,
    Info,
    Error,
}

/// Message body: either an i18n key resolved at render time, or text
/// received from the server and shown verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Key {
        key: &'static str,
        args: Vec<(&'static str, String)>,
    },
    Text(String),
}

/// A message with its severity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    severity: Severity,
    message: Message,
}

impl Feedback {
    pub fn new(severity: Severity, key: &'static str) -> Self {
        Self {
            severity,
            message: Message::Key {
                key,
                args: Vec::new(),
            },
        }
    }

    pub fn success(key: &'static str) -> Self {
        Self::new(Severity::Success, key)
    }

    pub fn info(key: &'static str) -> Self {
        Self::new(Severity::Info, key)
    }

    pub fn error(key: &'static str) -> Self {
        Self::new(Severity::Error, key)
    }

    /// Server-provided text.
    pub fn text(severity: Severity, text: impl Into<String>) -> Self {
        Self {
            severity,
            message: Message::Text(text.into()),
        }
    }

    /// Adds an argument for message interpolation.
    #[must_use]
    pub fn with_arg(mut self, name: &'static str, value: impl Into<String>) -> Self {
        if let Message::Key { args, .. } = &mut self.message {
            args.push((name, value.into()));
        }
        self
    }

    #[must_use]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    #[must_use]
    pub fn message(&self) -> &Message {
        &self.message
    }

    /// The i18n key, if the message is not server text.
    #[must_use]
    pub fn key(&self) -> Option<&'static str> {
        match &self.message {
            Message::Key { key, .. } => Some(*key),
            Message::Text(_) => None,
        }
    }

    /// Resolves the message into display text.
    #[must_use]
    pub fn render(&self, i18n: &I18n) -> String {
        match &self.message {
            Message::Key { key, args } => i18n.tr_with_args(key, args),
            Message::Text(text) => text.clone(),
        }
    }
}

impl From<&FormError> for Feedback {
    fn from(err: &FormError) -> Self {
        let feedback = Feedback::error(err.i18n_key());
        match err {
            FormError::Validation(ValidationError::FileTooLarge { limit, .. }) => {
                feedback.with_arg("max_mb", (limit / (1024 * 1024)).to_string())
            }
            FormError::Capture(capture) => feedback.with_arg("error", capture.to_string()),
            FormError::Lookup(LookupFailure::Rejected {
                reason: Some(reason),
            }) => Feedback::text(Severity::Error, reason.clone()),
            FormError::Submission(SubmissionFailure::Rejected { status, message }) => {
                match message {
                    Some(message) => Feedback::text(Severity::Error, message.clone()),
                    None => feedback.with_arg("status", status.to_string()),
                }
            }
            _ => feedback,
        }
    }
}
