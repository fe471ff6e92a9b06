//! HTTP endpoint handlers.
//!
//! The submission handler verifies the authenticity token first. A failed
//! check is the only outcome that skips the pipeline; everything past it is
//! reported per channel.

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    Json,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::notify::{DeliveryReport, Dispatcher};
use crate::submission::{SubmissionForm, SubmissionRequest};
use crate::web::nonce::{RequestGuard, SUBMISSION_ACTION};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Dispatcher,
    pub guard: RequestGuard,
}

impl AppState {
    pub fn new(dispatcher: Dispatcher, guard: RequestGuard) -> Self {
        Self { dispatcher, guard }
    }
}

// =============================================================================
// Health Check
// =============================================================================

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// =============================================================================
// Token Issuance
// =============================================================================

#[derive(Serialize)]
pub struct NonceResponse {
    pub nonce: String,
}

/// Issue a token for the submission form.
pub async fn issue_nonce(State(state): State<AppState>) -> Json<NonceResponse> {
    Json(NonceResponse {
        nonce: state.guard.create(SUBMISSION_ACTION),
    })
}

// =============================================================================
// Result Submission
// =============================================================================

/// Body of a submission response: either the guard error or the report.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum SubmissionResponse {
    Rejected { error: String },
    Delivered(DeliveryReport),
}

/// Submission endpoint.
///
/// The body is parsed leniently and never rejected by the extractor, so every
/// request reaches the token check and gets a JSON answer.
///
/// This endpoint:
/// 1. Verifies the `_wpnonce` token
/// 2. Sanitizes the form into a [`SubmissionRequest`]
/// 3. Fans out to the webhook and both emails
/// 4. Returns the per-channel report
pub async fn send_result(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Json<SubmissionResponse> {
    let form = match body {
        Ok(bytes) => SubmissionForm::from_urlencoded(&bytes),
        Err(e) => {
            warn!(error = %e, "submission_body_unreadable");
            SubmissionForm::default()
        }
    };

    info!(
        has_nonce = form.nonce.is_some(),
        has_user_email = form.user_email.is_some(),
        has_result = form.result.is_some(),
        "submission_received"
    );

    if let Err(e) = state.guard.verify(SUBMISSION_ACTION, form.nonce.as_deref()) {
        warn!(reason = %e, "submission_rejected");
        let error = state
            .dispatcher
            .catalog()
            .tr("Nonce verification failed!")
            .to_string();
        return Json(SubmissionResponse::Rejected { error });
    }

    let request = SubmissionRequest::from(&form);
    let report = state.dispatcher.dispatch(&request).await;

    Json(SubmissionResponse::Delivered(report))
}
