// SPDX-License-Identifier: MPL-2.0
//! Enrollment form orchestration.
//!
//! [`FormOrchestrator`] owns the form state, the photo capture controller and
//! the backend. Operator actions are methods; each one updates the state
//! machine in [`state`] and the inline [`feedback`] and returns the outcome.
//! The orchestrator subscribes to the capture controller once, at
//! construction, and folds its notifications into the state after every
//! capture operation.
//!
//! # Example
//!
//! ```no_run
//! use face_enroll::api::{ApiRoutes, HttpBackend};
//! use face_enroll::config::Config;
//! use face_enroll::form::FormOrchestrator;
//! use face_enroll::media::SelectedFile;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::default();
//! let backend = HttpBackend::new(&config.base_url(), ApiRoutes::Legacy)?;
//! let mut form = FormOrchestrator::from_config(backend, &config);
//!
//! form.check_identity("123456789012").await?;
//! form.select_photo(&SelectedFile::from_path("face.jpg")?)?;
//! form.apply_crop()?;
//! form.submit().await?;
//! form.settle().await;
//! # Ok(())
//! # }
//! ```

pub mod feedback;
pub mod state;

#[cfg(test)]
mod tests;

pub use feedback::{Feedback, Message, Severity};
pub use state::{Activity, Controls, FormEvent, FormState, IdentityState};

use crate::api::{interpret_lookup, interpret_submission, EnrollmentBackend, FaceSubmission};
use crate::capture::{CaptureEvent, CaptureSettings, CroppedArtifact, PhotoCaptureController, PreviewView};
use crate::config::Config;
use crate::domain::{CropRect, IdentityRecord, Iin, PhotoState};
use crate::error::{CaptureError, FormError, LookupFailure, SubmissionFailure, SubmitBlocked};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;

/// Snapshot of everything the form shows.
#[derive(Debug, Clone, PartialEq)]
pub struct FormView {
    pub controls: Controls,
    pub iin_input: String,
    /// Display name of the confirmed user.
    pub user_name: Option<String>,
    pub iin_feedback: Option<Feedback>,
    pub photo_feedback: Option<Feedback>,
    pub submit_feedback: Option<Feedback>,
    pub photo_state: PhotoState,
    pub preview: PreviewView,
}

/// Marks the form busy for the lifetime of one backend request.
///
/// If the request future is dropped (a caller-side timeout or `select!`),
/// the form goes back to idle instead of staying busy forever.
struct InFlight<'a> {
    state: &'a mut FormState,
    finished: bool,
}

impl<'a> InFlight<'a> {
    fn start(state: &'a mut FormState, event: FormEvent) -> Self {
        state.apply(event);
        Self {
            state,
            finished: false,
        }
    }

    fn finish(mut self) {
        self.finished = true;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.finished {
            log::warn!("Request dropped before a response arrived");
            self.state.apply(FormEvent::RequestAbandoned);
        }
    }
}

/// Drives one enrollment form against a backend.
pub struct FormOrchestrator<B> {
    backend: B,
    capture: PhotoCaptureController,
    capture_events: mpsc::UnboundedReceiver<CaptureEvent>,
    state: FormState,
    iin_input: String,
    user_name: Option<String>,
    iin_feedback: Option<Feedback>,
    photo_feedback: Option<Feedback>,
    submit_feedback: Option<Feedback>,
    reset_delay: Duration,
}

impl<B: EnrollmentBackend> FormOrchestrator<B> {
    pub fn new(backend: B, settings: CaptureSettings, reset_delay: Duration) -> Self {
        let mut capture = PhotoCaptureController::new(settings);
        let capture_events = capture.subscribe();

        Self {
            backend,
            capture,
            capture_events,
            state: FormState::default(),
            iin_input: String::new(),
            user_name: None,
            iin_feedback: None,
            photo_feedback: None,
            submit_feedback: None,
            reset_delay,
        }
    }

    pub fn from_config(backend: B, config: &Config) -> Self {
        Self::new(backend, config.capture_settings(), config.reset_delay())
    }

    #[must_use]
    pub fn state(&self) -> &FormState {
        &self.state
    }

    #[must_use]
    pub fn controls(&self) -> Controls {
        Controls::derive(&self.state)
    }

    #[must_use]
    pub fn identity(&self) -> Option<&IdentityRecord> {
        self.state.identity.record()
    }

    #[must_use]
    pub fn capture(&self) -> &PhotoCaptureController {
        &self.capture
    }

    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[must_use]
    pub fn view(&self) -> FormView {
        FormView {
            controls: self.controls(),
            iin_input: self.iin_input.clone(),
            user_name: self.user_name.clone(),
            iin_feedback: self.iin_feedback.clone(),
            photo_feedback: self.photo_feedback.clone(),
            submit_feedback: self.submit_feedback.clone(),
            photo_state: self.state.photo,
            preview: self.capture.preview(),
        }
    }

    // =========================================================================
    // Identity
    // =========================================================================

    /// Validates `raw` and looks up the identity behind it.
    ///
    /// Photo controls are disabled first, which drops any previous identity
    /// and photo. A malformed IIN is reported without contacting the backend.
    ///
    /// # Errors
    ///
    /// [`FormError::Busy`] while a request is in flight,
    /// [`FormError::Validation`] for a malformed IIN and
    /// [`FormError::Lookup`] when the backend does not confirm a user.
    pub async fn check_identity(&mut self, raw: &str) -> Result<IdentityRecord, FormError> {
        if self.state.activity.is_busy() {
            return Err(FormError::Busy);
        }
        if self.state.reset_deadline().is_some() {
            self.reset();
        }

        self.iin_input = raw.to_string();
        self.iin_feedback = None;
        self.user_name = None;
        self.disable_photo_controls();

        let iin = match Iin::parse(raw) {
            Ok(iin) => iin,
            Err(err) => {
                log::debug!("Rejected IIN input of length {}", raw.trim().len());
                return Err(self.identity_error(err.into()));
            }
        };

        let in_flight = InFlight::start(&mut self.state, FormEvent::LookupStarted);
        let result = self
            .backend
            .lookup_identity(&iin)
            .await
            .map_err(LookupFailure::from)
            .and_then(|response| interpret_lookup(&response));
        in_flight.finish();

        match result {
            Ok(record) => {
                log::info!("Identity confirmed: user {}", record.user_id);
                self.user_name = Some(record.display_name());
                self.state.apply(FormEvent::LookupSucceeded {
                    iin,
                    record: record.clone(),
                });
                Ok(record)
            }
            Err(failure) => {
                log::warn!("Identity lookup failed: {}", failure);
                self.state.apply(FormEvent::LookupFailed);
                Err(self.identity_error(failure.into()))
            }
        }
    }

    fn identity_error(&mut self, err: FormError) -> FormError {
        self.iin_feedback = Some(Feedback::from(&err));
        err
    }

    fn disable_photo_controls(&mut self) {
        if self.capture.photo_state() != PhotoState::Empty {
            self.capture.clear_image();
        }
        self.drain_capture_events();
        self.photo_feedback = None;
        self.state.apply(FormEvent::PhotoControlsDisabled);
    }

    // =========================================================================
    // Photo
    // =========================================================================

    /// Loads the operator's photo into the crop surface.
    ///
    /// # Errors
    ///
    /// [`FormError::PhotoControlsDisabled`] without a confirmed identity,
    /// [`FormError::Validation`] for a non-image or oversized file and
    /// [`FormError::Capture`] if the image cannot be decoded.
    pub fn select_photo(&mut self, file: &crate::media::SelectedFile) -> Result<(), FormError> {
        self.ensure_photo_controls()?;
        self.photo_feedback = None;
        let result = self.capture.load_image(file);
        self.after_capture(result)
    }

    /// Replaces the crop box. Returns the box actually applied.
    pub fn adjust_crop(&mut self, rect: CropRect) -> Result<CropRect, FormError> {
        self.ensure_photo_controls()?;
        let result = self.capture.set_crop_box(rect);
        self.after_capture(result)
    }

    /// Moves the crop box by (`dx`, `dy`) image pixels.
    pub fn nudge_crop(&mut self, dx: f32, dy: f32) -> Result<CropRect, FormError> {
        self.ensure_photo_controls()?;
        let result = self.capture.move_crop_box(dx, dy);
        self.after_capture(result)
    }

    /// Renders and encodes the crop; enables submission.
    pub fn apply_crop(&mut self) -> Result<Arc<CroppedArtifact>, FormError> {
        self.ensure_photo_controls()?;
        let result = self.capture.perform_crop();
        self.after_capture(result)
    }

    /// Discards the photo; disables submission.
    pub fn clear_photo(&mut self) -> Result<(), FormError> {
        self.ensure_photo_controls()?;
        self.capture.clear_image();
        self.photo_feedback = None;
        self.after_capture(Ok(()))
    }

    fn ensure_photo_controls(&self) -> Result<(), FormError> {
        if self.controls().photo_controls_enabled {
            Ok(())
        } else {
            Err(FormError::PhotoControlsDisabled)
        }
    }

    fn after_capture<T>(&mut self, result: Result<T, CaptureError>) -> Result<T, FormError> {
        self.drain_capture_events();
        result.map_err(|err| {
            let err = FormError::from(err);
            self.photo_feedback = Some(Feedback::from(&err));
            err
        })
    }

    fn drain_capture_events(&mut self) {
        while let Ok(event) = self.capture_events.try_recv() {
            match event {
                CaptureEvent::Loaded { width, height } => {
                    log::debug!("Photo loaded ({}x{})", width, height);
                    self.state.apply(FormEvent::PhotoLoaded);
                }
                CaptureEvent::Cropped(_) => {
                    self.state.apply(FormEvent::PhotoCropped);
                }
                CaptureEvent::Cleared => {
                    self.state.apply(FormEvent::PhotoCleared);
                }
                CaptureEvent::Error { message } => {
                    self.photo_feedback =
                        Some(Feedback::error("photo-error-processing").with_arg("error", message));
                }
            }
        }
    }

    // =========================================================================
    // Submission
    // =========================================================================

    /// Sends the cropped photo for the confirmed identity.
    ///
    /// On success the form schedules its own reset; see [`Self::tick`] and
    /// [`Self::settle`].
    ///
    /// # Errors
    ///
    /// [`FormError::Busy`] unless idle, [`FormError::Blocked`] without a
    /// confirmed identity or a cropped photo, and [`FormError::Submission`]
    /// when the backend rejects the photo or cannot be reached.
    pub async fn submit(&mut self) -> Result<(), FormError> {
        if self.state.activity != Activity::Idle {
            return Err(FormError::Busy);
        }

        let submission = match self.prepare_submission() {
            Ok(submission) => submission,
            Err(blocked) => {
                log::warn!("Submission blocked: {}", blocked);
                let err = FormError::from(blocked);
                self.submit_feedback = Some(Feedback::from(&err));
                return Err(err);
            }
        };

        self.submit_feedback = None;
        let in_flight = InFlight::start(&mut self.state, FormEvent::SubmitStarted);
        let result = self
            .backend
            .submit_face(&submission)
            .await
            .map_err(SubmissionFailure::from)
            .and_then(|response| interpret_submission(&response));
        in_flight.finish();

        match result {
            Ok(message) => {
                log::info!("Photo submitted for user {}", submission.user_id);
                let deadline = Instant::now() + self.reset_delay;
                self.state.apply(FormEvent::SubmitSucceeded { deadline });
                self.submit_feedback = Some(match message {
                    Some(text) => Feedback::text(Severity::Success, text),
                    None => Feedback::success("submit-success"),
                });
                Ok(())
            }
            Err(failure) => {
                log::warn!("Submission failed: {}", failure);
                self.state.apply(FormEvent::SubmitFailed);
                let err = FormError::from(failure);
                self.submit_feedback = Some(Feedback::from(&err));
                Err(err)
            }
        }
    }

    fn prepare_submission(&self) -> Result<FaceSubmission, SubmitBlocked> {
        let IdentityState::Confirmed { iin, record } = &self.state.identity else {
            return Err(SubmitBlocked::IdentityNotConfirmed);
        };
        let artifact = self
            .capture
            .artifact()
            .filter(|_| self.state.photo == PhotoState::Cropped)
            .ok_or(SubmitBlocked::PhotoNotCropped)?;

        Ok(FaceSubmission::new(iin, record.user_id, artifact.data_url()))
    }

    // =========================================================================
    // Reset
    // =========================================================================

    /// Resets the form if a pending reset is due at `now`.
    ///
    /// Returns `true` if the form was reset.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.state.reset_deadline() {
            Some(deadline) if deadline <= now => {
                self.reset();
                true
            }
            _ => false,
        }
    }

    /// Waits for a pending reset and performs it. Returns immediately when no
    /// reset is pending.
    pub async fn settle(&mut self) {
        if let Some(deadline) = self.state.reset_deadline() {
            tokio::time::sleep_until(deadline).await;
            self.tick(deadline);
        }
    }

    fn reset(&mut self) {
        log::debug!("Resetting form");
        if self.capture.photo_state() != PhotoState::Empty {
            self.capture.clear_image();
        }
        self.drain_capture_events();
        self.state.apply(FormEvent::ResetElapsed);
        self.iin_input.clear();
        self.user_name = None;
        self.iin_feedback = None;
        self.photo_feedback = None;
        self.submit_feedback = None;
    }
}
