// SPDX-License-Identifier: MPL-2.0
use super::*;
use crate::api::RawResponse;
use crate::domain::UserId;
use crate::error::{TransportError, ValidationError};
use crate::media::SelectedFile;
use crate::test_utils::jpeg_file;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

const IIN: &str = "123456789012";
const USER_7: &str =
    r#"{"success":true,"user_id":7,"first_name":"Ivan","last_name":"Petrov","middle_name":"Sergeevich"}"#;

/// Backend that replays scripted responses and records every call.
#[derive(Default)]
struct FakeBackend {
    lookups: RefCell<VecDeque<Result<RawResponse, TransportError>>>,
    submissions: RefCell<VecDeque<Result<RawResponse, TransportError>>>,
    lookup_calls: RefCell<Vec<Iin>>,
    submitted: RefCell<Vec<FaceSubmission>>,
    /// While set, requests never complete.
    stalled: Cell<bool>,
}

impl FakeBackend {
    fn with_lookup(self, status: u16, body: &str) -> Self {
        self.lookups
            .borrow_mut()
            .push_back(Ok(RawResponse::new(status, body)));
        self
    }

    fn with_lookup_error(self) -> Self {
        self.lookups
            .borrow_mut()
            .push_back(Err(TransportError("connection refused".into())));
        self
    }

    fn with_submission(self, status: u16, body: &str) -> Self {
        self.submissions
            .borrow_mut()
            .push_back(Ok(RawResponse::new(status, body)));
        self
    }

    fn with_submission_error(self) -> Self {
        self.submissions
            .borrow_mut()
            .push_back(Err(TransportError("connection reset".into())));
        self
    }

    fn lookup_count(&self) -> usize {
        self.lookup_calls.borrow().len()
    }

    fn submit_count(&self) -> usize {
        self.submitted.borrow().len()
    }
}

impl EnrollmentBackend for FakeBackend {
    async fn lookup_identity(&self, iin: &Iin) -> Result<RawResponse, TransportError> {
        self.lookup_calls.borrow_mut().push(iin.clone());
        if self.stalled.get() {
            return std::future::pending().await;
        }
        self.lookups
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError("no scripted lookup".into())))
    }

    async fn submit_face(&self, submission: &FaceSubmission) -> Result<RawResponse, TransportError> {
        self.submitted.borrow_mut().push(submission.clone());
        if self.stalled.get() {
            return std::future::pending().await;
        }
        self.submissions
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError("no scripted submission".into())))
    }
}

fn form(backend: FakeBackend) -> FormOrchestrator<FakeBackend> {
    FormOrchestrator::new(
        backend,
        CaptureSettings::default(),
        Duration::from_millis(1500),
    )
}

/// Confirms user 7 before any lookups scripted on `backend` are replayed.
async fn confirmed_form(backend: FakeBackend) -> FormOrchestrator<FakeBackend> {
    backend
        .lookups
        .borrow_mut()
        .push_front(Ok(RawResponse::new(200, USER_7)));
    let mut form = form(backend);
    form.check_identity(IIN).await.expect("lookup");
    form
}

async fn cropped_form(backend: FakeBackend) -> FormOrchestrator<FakeBackend> {
    let mut form = confirmed_form(backend).await;
    form.select_photo(&jpeg_file(600, 800)).expect("select");
    form.apply_crop().expect("crop");
    form
}

fn feedback_key(feedback: &Option<Feedback>) -> Option<&'static str> {
    feedback.as_ref().and_then(Feedback::key)
}

// =============================================================================
// Identity
// =============================================================================

#[tokio::test]
async fn initial_form_disables_photo_and_submit() {
    let form = form(FakeBackend::default());
    let view = form.view();
    assert!(view.controls.check_enabled);
    assert!(!view.controls.photo_controls_enabled);
    assert!(!view.controls.submit_enabled);
    assert_eq!(view.photo_state, PhotoState::Empty);
}

#[tokio::test]
async fn malformed_iin_never_reaches_backend() {
    let mut form = form(FakeBackend::default());
    for raw in ["", "abc", "12345678901", "1234567890123", "12345678901x", "12 345678901"] {
        let err = form.check_identity(raw).await.unwrap_err();
        assert_eq!(err, FormError::Validation(ValidationError::MalformedIin));
        assert_eq!(feedback_key(&form.view().iin_feedback), Some("iin-error-invalid"));
    }
    assert_eq!(form.backend().lookup_count(), 0);
    assert!(!form.controls().photo_controls_enabled);
}

#[tokio::test]
async fn successful_lookup_enables_photo_controls() {
    let mut form = form(FakeBackend::default().with_lookup(200, USER_7));

    let record = form.check_identity(" 123456789012 ").await.expect("lookup");

    assert_eq!(record.user_id, UserId(7));
    assert_eq!(form.backend().lookup_count(), 1);
    let view = form.view();
    assert!(view.controls.photo_controls_enabled);
    assert!(!view.controls.submit_enabled);
    assert_eq!(view.photo_state, PhotoState::Empty);
    assert_eq!(view.user_name.as_deref(), Some("Petrov Ivan Sergeevich"));
    assert!(view.iin_feedback.is_none());
}

#[tokio::test]
async fn lookup_failures_leave_photo_controls_disabled() {
    let cases: Vec<(FakeBackend, &'static str)> = vec![
        (FakeBackend::default().with_lookup(404, ""), "iin-error-not-found"),
        (FakeBackend::default().with_lookup(500, "oops"), "iin-error-server"),
        (
            FakeBackend::default().with_lookup(200, r#"{"success":false}"#),
            "iin-error-lookup-failed",
        ),
        (FakeBackend::default().with_lookup(200, "<html>"), "error-network"),
        (FakeBackend::default().with_lookup_error(), "error-network"),
    ];

    for (backend, expected_key) in cases {
        let mut form = form(backend);
        let err = form.check_identity(IIN).await.unwrap_err();
        assert_eq!(err.i18n_key(), expected_key);
        assert_eq!(feedback_key(&form.view().iin_feedback), Some(expected_key));
        assert!(form.identity().is_none());
        assert!(!form.controls().photo_controls_enabled);
        assert_eq!(form.state().activity, Activity::Idle);
        assert_eq!(form.backend().lookup_count(), 1);
    }
}

#[tokio::test]
async fn lookup_rejection_shows_server_reason() {
    let mut form = form(
        FakeBackend::default().with_lookup(200, r#"{"success":false,"error":"Пользователь заблокирован"}"#),
    );
    form.check_identity(IIN).await.unwrap_err();
    let feedback = form.view().iin_feedback.expect("feedback");
    assert_eq!(
        feedback.message(),
        &Message::Text("Пользователь заблокирован".into())
    );
}

#[tokio::test]
async fn new_check_drops_identity_and_photo() {
    let mut form = cropped_form(FakeBackend::default().with_lookup(404, "")).await;
    assert!(form.controls().submit_enabled);

    form.check_identity("210987654321").await.unwrap_err();

    assert!(form.identity().is_none());
    assert_eq!(form.state().photo, PhotoState::Empty);
    assert_eq!(form.capture().photo_state(), PhotoState::Empty);
    assert!(!form.controls().submit_enabled);
}

#[tokio::test]
async fn invalid_recheck_also_disables_photo_controls() {
    let mut form = confirmed_form(FakeBackend::default()).await;
    form.check_identity("abc").await.unwrap_err();
    assert!(form.identity().is_none());
    assert!(!form.controls().photo_controls_enabled);
    assert_eq!(form.view().user_name, None);
}

// =============================================================================
// Photo
// =============================================================================

#[tokio::test]
async fn photo_selection_requires_confirmed_identity() {
    let mut form = form(FakeBackend::default());
    let err = form.select_photo(&jpeg_file(300, 400)).unwrap_err();
    assert_eq!(err, FormError::PhotoControlsDisabled);
    assert_eq!(form.capture().photo_state(), PhotoState::Empty);
}

#[tokio::test]
async fn oversized_file_is_rejected_without_crop_surface() {
    let mut form = confirmed_form(FakeBackend::default()).await;
    let big = SelectedFile::new("big.jpg", "image/jpeg", vec![0; 11 * 1024 * 1024]);

    let err = form.select_photo(&big).unwrap_err();

    assert!(matches!(
        err,
        FormError::Validation(ValidationError::FileTooLarge { .. })
    ));
    assert_eq!(form.state().photo, PhotoState::Empty);
    assert!(form.capture().crop_box().is_none());
    assert_eq!(feedback_key(&form.view().photo_feedback), Some("photo-error-too-large"));
}

#[tokio::test]
async fn non_image_file_is_rejected() {
    let mut form = confirmed_form(FakeBackend::default()).await;
    let pdf = SelectedFile::new("scan.pdf", "application/pdf", vec![b'%'; 64]);

    let err = form.select_photo(&pdf).unwrap_err();

    assert_eq!(err.i18n_key(), "photo-error-not-image");
    assert_eq!(form.state().photo, PhotoState::Empty);
}

#[tokio::test]
async fn undecodable_image_reports_processing_error() {
    let mut form = confirmed_form(FakeBackend::default()).await;
    let broken = SelectedFile::new("broken.jpg", "image/jpeg", vec![0xFF, 0xD8, 0x00, 0x01]);

    let err = form.select_photo(&broken).unwrap_err();

    assert_eq!(err.i18n_key(), "photo-error-processing");
    assert_eq!(form.state().photo, PhotoState::Empty);
    assert_eq!(
        feedback_key(&form.view().photo_feedback),
        Some("photo-error-processing")
    );
}

#[tokio::test]
async fn crop_enables_submit_and_clear_disables_it() {
    let mut form = confirmed_form(FakeBackend::default()).await;

    form.select_photo(&jpeg_file(600, 800)).expect("select");
    assert_eq!(form.state().photo, PhotoState::Loaded);
    assert!(!form.controls().submit_enabled);

    let artifact = form.apply_crop().expect("crop");
    assert_eq!(artifact.dimensions(), (480, 640));
    assert_eq!(form.state().photo, PhotoState::Cropped);
    assert!(form.controls().submit_enabled);
    assert_eq!(form.view().preview.success_note, Some("crop-success"));

    form.clear_photo().expect("clear");
    assert_eq!(form.state().photo, PhotoState::Empty);
    assert!(!form.controls().submit_enabled);
}

#[tokio::test]
async fn adjusted_crop_box_is_used_for_export() {
    let mut form = confirmed_form(FakeBackend::default()).await;
    form.select_photo(&jpeg_file(600, 800)).expect("select");

    let applied = form
        .adjust_crop(CropRect::new(0.0, 0.0, 300.0, 100.0))
        .expect("adjust");
    assert_eq!(applied.height, 400.0);
    let moved = form.nudge_crop(50.0, 25.0).expect("nudge");
    assert_eq!((moved.x, moved.y), (50.0, 25.0));

    let artifact = form.apply_crop().expect("crop");
    assert_eq!(artifact.source_box(), moved);
}

#[tokio::test]
async fn selecting_new_photo_after_crop_requires_new_crop() {
    let mut form = cropped_form(FakeBackend::default()).await;
    form.select_photo(&jpeg_file(300, 400)).expect("select");
    assert_eq!(form.state().photo, PhotoState::Loaded);
    assert!(!form.controls().submit_enabled);
}

#[tokio::test]
async fn crop_without_image_is_reported() {
    let mut form = confirmed_form(FakeBackend::default()).await;
    let err = form.apply_crop().unwrap_err();
    assert_eq!(err.i18n_key(), "photo-error-no-image");
}

// =============================================================================
// Submission
// =============================================================================

#[tokio::test]
async fn submit_without_identity_is_blocked_locally() {
    let mut form = form(FakeBackend::default());
    let err = form.submit().await.unwrap_err();
    assert_eq!(err, FormError::Blocked(SubmitBlocked::IdentityNotConfirmed));
    assert_eq!(
        feedback_key(&form.view().submit_feedback),
        Some("submit-blocked-identity")
    );
    assert_eq!(form.backend().submit_count(), 0);
}

#[tokio::test]
async fn submit_without_crop_is_blocked_locally() {
    let mut form = confirmed_form(FakeBackend::default()).await;
    form.select_photo(&jpeg_file(600, 800)).expect("select");

    let err = form.submit().await.unwrap_err();

    assert_eq!(err, FormError::Blocked(SubmitBlocked::PhotoNotCropped));
    assert_eq!(form.backend().submit_count(), 0);
}

#[tokio::test]
async fn submission_carries_identity_and_jpeg_data_url() {
    let mut form = cropped_form(FakeBackend::default().with_submission(200, "{}")).await;

    form.submit().await.expect("submit");

    let submitted = form.backend().submitted.borrow();
    assert_eq!(submitted.len(), 1);
    assert_eq!(submitted[0].iin, IIN);
    assert_eq!(submitted[0].user_id, 7);
    assert!(submitted[0].photo.starts_with("data:image/jpeg;base64,/9j/"));
}

#[tokio::test]
async fn server_rejection_allows_retry() {
    let backend = FakeBackend::default()
        .with_submission(400, r#"{"error":"Некорректный формат изображения"}"#)
        .with_submission(200, r#"{"message":"Биометрия обновлена"}"#);
    let mut form = cropped_form(backend).await;

    let err = form.submit().await.unwrap_err();
    assert!(matches!(
        err,
        FormError::Submission(SubmissionFailure::Rejected { status: 400, .. })
    ));
    let view = form.view();
    assert!(view.controls.submit_enabled);
    assert_eq!(
        view.submit_feedback.expect("feedback").message(),
        &Message::Text("Некорректный формат изображения".into())
    );

    form.submit().await.expect("retry");
    let feedback = form.view().submit_feedback.expect("feedback");
    assert_eq!(feedback.severity(), Severity::Success);
    assert_eq!(feedback.message(), &Message::Text("Биометрия обновлена".into()));
    assert_eq!(form.backend().submit_count(), 2);
}

#[tokio::test]
async fn network_failure_allows_retry() {
    let mut form = cropped_form(FakeBackend::default().with_submission_error()).await;

    let err = form.submit().await.unwrap_err();

    assert_eq!(err.i18n_key(), "error-network");
    assert_eq!(form.state().activity, Activity::Idle);
    assert!(form.controls().submit_enabled);
    assert_eq!(form.state().photo, PhotoState::Cropped);
}

#[tokio::test]
async fn generic_server_error_uses_status() {
    let mut form = cropped_form(FakeBackend::default().with_submission(502, "")).await;
    form.submit().await.unwrap_err();
    let feedback = form.view().submit_feedback.expect("feedback");
    assert_eq!(
        feedback.message(),
        &Message::Key {
            key: "submit-error-server",
            args: vec![("status", "502".to_string())]
        }
    );
}

// =============================================================================
// Reset
// =============================================================================

#[tokio::test(start_paused = true)]
async fn success_resets_form_after_delay() {
    let mut form = cropped_form(FakeBackend::default().with_submission(200, "")).await;

    form.submit().await.expect("submit");
    assert_eq!(
        feedback_key(&form.view().submit_feedback),
        Some("submit-success")
    );
    assert!(!form.controls().submit_enabled);
    assert!(!form.controls().photo_controls_enabled);

    let started = Instant::now();
    assert!(!form.tick(started + Duration::from_millis(1499)));
    assert!(form.identity().is_some());

    form.settle().await;

    assert!(started.elapsed() >= Duration::from_millis(1500));
    let view = form.view();
    assert_eq!(form.state(), &FormState::default());
    assert_eq!(view.iin_input, "");
    assert_eq!(view.user_name, None);
    assert!(view.submit_feedback.is_none());
    assert!(view.iin_feedback.is_none());
    assert_eq!(form.capture().photo_state(), PhotoState::Empty);
}

#[tokio::test(start_paused = true)]
async fn tick_after_deadline_resets() {
    let mut form = cropped_form(FakeBackend::default().with_submission(200, "")).await;
    form.submit().await.expect("submit");

    assert!(form.tick(Instant::now() + Duration::from_millis(1500)));
    assert_eq!(form.state(), &FormState::default());
    assert!(!form.tick(Instant::now() + Duration::from_secs(10)));
}

#[tokio::test(start_paused = true)]
async fn check_during_pending_reset_resets_first() {
    let backend = FakeBackend::default()
        .with_submission(200, "")
        .with_lookup(200, USER_7);
    let mut form = cropped_form(backend).await;
    form.submit().await.expect("submit");

    form.check_identity(IIN).await.expect("lookup");

    assert!(form.state().reset_deadline().is_none());
    assert!(form.view().submit_feedback.is_none());
    assert!(form.controls().photo_controls_enabled);
    assert_eq!(form.state().photo, PhotoState::Empty);
}

#[tokio::test]
async fn submit_during_pending_reset_is_refused() {
    let mut form = cropped_form(FakeBackend::default().with_submission(200, "")).await;
    form.submit().await.expect("submit");
    assert_eq!(form.submit().await.unwrap_err(), FormError::Busy);
    assert_eq!(form.backend().submit_count(), 1);
}

#[tokio::test]
async fn settle_without_pending_reset_returns_immediately() {
    let mut form = confirmed_form(FakeBackend::default()).await;
    form.settle().await;
    assert!(form.identity().is_some());
}

// =============================================================================
// Dropped requests
// =============================================================================

#[tokio::test(start_paused = true)]
async fn dropped_lookup_does_not_leave_form_busy() {
    let backend = FakeBackend::default().with_lookup(200, USER_7);
    backend.stalled.set(true);
    let mut form = form(backend);

    let outcome = tokio::time::timeout(Duration::from_secs(5), form.check_identity(IIN)).await;
    assert!(outcome.is_err());

    assert_eq!(form.state().activity, Activity::Idle);
    assert!(form.controls().check_enabled);
    assert!(form.identity().is_none());

    form.backend().stalled.set(false);
    form.check_identity(IIN).await.expect("lookup after timeout");
    assert!(form.controls().photo_controls_enabled);
    assert_eq!(form.backend().lookup_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn dropped_submission_keeps_photo_for_retry() {
    let mut form = cropped_form(FakeBackend::default().with_submission(200, "")).await;
    form.backend().stalled.set(true);

    let outcome = tokio::time::timeout(Duration::from_secs(5), form.submit()).await;
    assert!(outcome.is_err());

    assert_eq!(form.state().activity, Activity::Idle);
    assert_eq!(form.view().photo_state, PhotoState::Cropped);
    assert!(form.controls().submit_enabled);

    form.backend().stalled.set(false);
    form.submit().await.expect("retry after timeout");
    assert_eq!(form.backend().submit_count(), 2);
    assert!(form.state().reset_deadline().is_some());
}
