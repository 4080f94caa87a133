//! Unified error handling with Sentry integration.
//!
//! Provides an `ApiError` type covering the whole failure taxonomy of the
//! service. Errors are translated to a status code and a JSON body at the
//! handler boundary; provider detail (response bodies) is captured to
//! Sentry and the logs but never echoed to the caller.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use postcard_core::OrderError;

use crate::services::{EmailError, RecaptchaError, TokenError, ZappostError};

/// Application-level error type for the postcard service.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Wrong HTTP verb for the endpoint.
    #[error("Method Not Allowed")]
    MethodNotAllowed,

    /// A required secret or key is absent from configuration.
    /// Operator-fixable, not user-fixable.
    #[error("Server configuration error: {0}")]
    Configuration(&'static str),

    /// The request is missing or malforms a required field.
    #[error("Validation error: {0}")]
    Validation(#[from] OrderError),

    /// The human-interaction proof failed.
    #[error("Verification failure: {0}")]
    Verification(#[from] RecaptchaError),

    /// The deferred token failed signature or structure checks.
    #[error("Token failure: {0}")]
    Token(#[from] TokenError),

    /// The print-fulfillment provider returned non-success.
    #[error("Fulfillment error: {0}")]
    Fulfillment(#[from] ZappostError),

    /// The email-delivery provider returned non-success.
    #[error("Email error: {0}")]
    Email(#[from] EmailError),

    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON failure body: `{"success": false, "message": "..."}`.
#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    message: String,
}

impl ApiError {
    /// Status code for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Validation(_) | Self::Verification(_) | Self::Token(_) => StatusCode::BAD_REQUEST,
            Self::Configuration(_) | Self::Fulfillment(_) | Self::Email(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Client-facing message for this error.
    ///
    /// Server-class failures get a generic message; their detail stays in
    /// the logs.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::MethodNotAllowed => "Method Not Allowed".to_string(),
            Self::Configuration(_) => {
                "Server configuration error. Required API keys are not set.".to_string()
            }
            Self::Validation(err) => err.to_string(),
            Self::Verification(RecaptchaError::MissingToken) => {
                "reCAPTCHA verification missing.".to_string()
            }
            Self::Verification(_) => "reCAPTCHA verification failed.".to_string(),
            Self::Token(TokenError::Missing) => "Missing verification token.".to_string(),
            Self::Token(TokenError::IncompleteOrder(err)) => err.to_string(),
            // Signature-level detail stays in the logs.
            Self::Token(_) => "Invalid or expired verification token.".to_string(),
            Self::Fulfillment(ZappostError::Api { status, .. }) => {
                format!("The print service returned an error ({status}).")
            }
            Self::Fulfillment(_) => "The print service returned an error.".to_string(),
            Self::Email(_) => "Failed to send confirmation email.".to_string(),
            Self::Internal(_) => "An internal server error occurred.".to_string(),
        }
    }

    /// Whether this failure is a server fault worth capturing to Sentry.
    const fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Configuration(_) | Self::Fulfillment(_) | Self::Email(_) | Self::Internal(_)
        )
    }

    /// Log this error, capturing server faults to Sentry.
    ///
    /// Called by both response renderings (JSON and plain text) so the full
    /// provider detail lands in the logs exactly once.
    pub(crate) fn report(&self) {
        if self.is_server_error() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::warn!(error = %self, "Request rejected");
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.report();

        let body = ErrorBody {
            success: false,
            message: self.message(),
        };

        (self.status(), Json(body)).into_response()
    }
}

/// Result type alias for `ApiError`.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_follow_taxonomy() {
        assert_eq!(
            ApiError::MethodNotAllowed.status(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            ApiError::Configuration("RECAPTCHA_SECRET_KEY").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::Validation(OrderError::MissingField("sender.name")).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Verification(RecaptchaError::MissingToken).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Fulfillment(ZappostError::Api {
                status: 503,
                message: "down".to_string()
            })
            .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::Internal("boom".to_string()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_provider_detail_not_echoed() {
        let err = ApiError::Fulfillment(ZappostError::Api {
            status: 403,
            message: "secret internal detail".to_string(),
        });
        let message = err.message();
        assert!(!message.contains("secret internal detail"));
        assert!(message.contains("403"));
    }

    #[test]
    fn test_token_failure_detail_not_echoed() {
        let err = ApiError::Token(TokenError::Invalid(
            jsonwebtoken::errors::ErrorKind::InvalidSignature.into(),
        ));
        assert_eq!(err.message(), "Invalid or expired verification token.");

        let err = ApiError::Token(TokenError::Expired);
        assert_eq!(err.message(), "Invalid or expired verification token.");

        let err = ApiError::Token(TokenError::IncompleteOrder(OrderError::MissingField(
            "recipient.postcode",
        )));
        assert_eq!(err.message(), "missing required field: recipient.postcode");
    }

    #[test]
    fn test_missing_proof_message_matches_contract() {
        let err = ApiError::Verification(RecaptchaError::MissingToken);
        assert_eq!(err.message(), "reCAPTCHA verification missing.");
        let err = ApiError::Verification(RecaptchaError::Rejected("bad-input".to_string()));
        assert_eq!(err.message(), "reCAPTCHA verification failed.");
    }
}
