// SPDX-License-Identifier: MPL-2.0
//! Form state machine.
//!
//! The form is the product of three independent parts: who the photo is
//! for ([`IdentityState`]), where the photo is in its lifecycle
//! ([`PhotoState`]) and what the form is currently doing ([`Activity`]).
//! Every change goes through [`FormState::apply`]; what the operator may do
//! next is derived from the state by [`Controls::derive`].

use crate::domain::{IdentityRecord, Iin, PhotoState};
use tokio::time::Instant;

/// Identity part of the form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum IdentityState {
    #[default]
    NoIdentity,
    /// Lookup succeeded for `iin`.
    Confirmed { iin: Iin, record: IdentityRecord },
}

impl IdentityState {
    #[must_use]
    pub fn is_confirmed(&self) -> bool {
        matches!(self, IdentityState::Confirmed { .. })
    }

    #[must_use]
    pub fn record(&self) -> Option<&IdentityRecord> {
        match self {
            IdentityState::Confirmed { record, .. } => Some(record),
            IdentityState::NoIdentity => None,
        }
    }
}

/// What the form is doing right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Activity {
    #[default]
    Idle,
    /// Identity lookup in flight.
    CheckingIdentity,
    /// Face submission in flight.
    Submitting,
    /// Submission succeeded; the form resets once `deadline` passes.
    ResetPending { deadline: Instant },
}

impl Activity {
    /// Whether a request is in flight.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        matches!(self, Activity::CheckingIdentity | Activity::Submitting)
    }
}

/// Inputs of the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    /// A check was requested; photo controls are disabled, which drops the
    /// identity and the photo.
    PhotoControlsDisabled,
    /// A valid IIN was entered and the lookup request is being sent.
    LookupStarted,
    LookupSucceeded { iin: Iin, record: IdentityRecord },
    LookupFailed,
    PhotoLoaded,
    PhotoCropped,
    PhotoCleared,
    SubmitStarted,
    SubmitFailed,
    SubmitSucceeded { deadline: Instant },
    /// The in-flight request was dropped before a response arrived.
    RequestAbandoned,
    /// The reset deadline passed.
    ResetElapsed,
}

/// Complete state of the enrollment form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormState {
    pub identity: IdentityState,
    pub photo: PhotoState,
    pub activity: Activity,
}

impl FormState {
    /// Applies one transition.
    pub fn apply(&mut self, event: FormEvent) {
        log::debug!("{:?} + {:?}", self.activity, event);
        match event {
            FormEvent::PhotoControlsDisabled => {
                self.identity = IdentityState::NoIdentity;
                self.photo = PhotoState::Empty;
            }
            FormEvent::LookupStarted => {
                self.activity = Activity::CheckingIdentity;
            }
            FormEvent::LookupSucceeded { iin, record } => {
                self.identity = IdentityState::Confirmed { iin, record };
                self.photo = PhotoState::Empty;
                self.activity = Activity::Idle;
            }
            FormEvent::LookupFailed => {
                self.identity = IdentityState::NoIdentity;
                self.activity = Activity::Idle;
            }
            FormEvent::PhotoLoaded => {
                self.photo = PhotoState::Loaded;
            }
            FormEvent::PhotoCropped => {
                self.photo = PhotoState::Cropped;
            }
            FormEvent::PhotoCleared => {
                self.photo = PhotoState::Empty;
            }
            FormEvent::SubmitStarted => {
                self.activity = Activity::Submitting;
            }
            FormEvent::SubmitFailed => {
                self.activity = Activity::Idle;
            }
            FormEvent::SubmitSucceeded { deadline } => {
                self.activity = Activity::ResetPending { deadline };
            }
            FormEvent::RequestAbandoned => {
                if self.activity.is_busy() {
                    self.activity = Activity::Idle;
                }
            }
            FormEvent::ResetElapsed => {
                *self = FormState::default();
            }
        }
    }

    /// Deadline of a pending reset, if any.
    #[must_use]
    pub fn reset_deadline(&self) -> Option<Instant> {
        match self.activity {
            Activity::ResetPending { deadline } => Some(deadline),
            _ => None,
        }
    }
}

/// Enabled state and labels of the form's controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub check_enabled: bool,
    /// i18n key of the check button label.
    pub check_label: &'static str,
    /// File input, crop and clear buttons.
    pub photo_controls_enabled: bool,
    pub submit_enabled: bool,
    /// i18n key of the submit button label.
    pub submit_label: &'static str,
}

impl Controls {
    #[must_use]
    pub fn derive(state: &FormState) -> Self {
        let confirmed = state.identity.is_confirmed();
        let idle = state.activity == Activity::Idle;

        Self {
            check_enabled: !state.activity.is_busy(),
            check_label: if state.activity == Activity::CheckingIdentity {
                "check-button-busy"
            } else {
                "check-button"
            },
            photo_controls_enabled: confirmed && idle,
            submit_enabled: confirmed && state.photo == PhotoState::Cropped && idle,
            submit_label: if state.activity == Activity::Submitting {
                "submit-button-busy"
            } else {
                "submit-button"
            },
        }
    }
}
