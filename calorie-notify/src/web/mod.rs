//! Web server module for the calculator's submission endpoint.
//!
//! Routes:
//! - `GET /health`
//! - `GET /nonce` issues a form token
//! - `POST /send-result` verifies the token and dispatches the submission

pub mod handlers;
pub mod nonce;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub use handlers::{
    health, issue_nonce, send_result, AppState, HealthResponse, NonceResponse, SubmissionResponse,
};
pub use nonce::{GuardError, RequestGuard, TokenAge, SUBMISSION_ACTION};

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/nonce", get(issue_nonce))
        .route("/send-result", post(send_result))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
