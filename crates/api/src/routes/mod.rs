//! HTTP route handlers for the postcard service.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//!
//! # JSON API
//! GET  /api/config             - Public keys for the browser client
//! POST /api/send-postcard      - Direct order flow (reCAPTCHA-gated)
//! POST /api/send-confirmation  - Immediate confirmation email
//!
//! # Deferred flow (plain text errors, redirect on success)
//! GET  /api/verify-and-send    - Token-verified order submission
//! ```
//!
//! Every handler is stateless: one request builds one ephemeral order,
//! makes its single-attempt provider calls in sequence, and responds.
//! Unmatched verbs fall through to a 405 with the JSON body the original
//! clients expect.

pub mod config;
pub mod confirmation;
pub mod order;
pub mod verify;

use axum::{
    Router,
    routing::{get, post},
};

use crate::error::ApiError;
use crate::state::AppState;

/// Create all API routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/config", get(config::public_config))
        .route("/api/send-postcard", post(order::send_postcard))
        .route("/api/send-confirmation", post(confirmation::send_confirmation))
        .route("/api/verify-and-send", get(verify::verify_and_send))
        .method_not_allowed_fallback(method_not_allowed)
}

/// Reject a known path hit with the wrong verb.
async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}


#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::test_support::{full_config, state};
    use super::*;

    #[tokio::test]
    async fn test_wrong_verb_gets_json_405() {
        let app = routes().with_state(state(full_config()));

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/config")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Method Not Allowed");
    }

    #[tokio::test]
    async fn test_deferred_endpoint_rejects_post() {
        let app = routes().with_state(state(full_config()));

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/verify-and-send")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
