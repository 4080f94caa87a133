//! reCAPTCHA verification client.
//!
//! Checks a client-supplied proof-of-human token against the configured
//! `siteverify` endpoint. A missing token is rejected locally before any
//! network call; a provider-reported failure is a verification failure
//! attributable to client input, not a server fault.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;

use crate::config::RecaptchaConfig;

use super::REQUEST_TIMEOUT;

/// Errors that can occur when verifying a proof token.
#[derive(Debug, Error)]
pub enum RecaptchaError {
    /// No token was supplied with the request.
    #[error("reCAPTCHA verification missing")]
    MissingToken,

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The verification service rejected the token.
    #[error("reCAPTCHA verification failed: {0}")]
    Rejected(String),
}

/// Client for the reCAPTCHA `siteverify` API.
#[derive(Clone)]
pub struct RecaptchaClient {
    client: reqwest::Client,
    secret: SecretString,
    verify_url: String,
}

impl RecaptchaClient {
    /// Create a new verification client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &RecaptchaConfig) -> Result<Self, RecaptchaError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            secret: config.secret.clone(),
            verify_url: config.verify_url.clone(),
        })
    }

    /// Verify a proof token against the verification service.
    ///
    /// # Errors
    ///
    /// Returns [`RecaptchaError::MissingToken`] without touching the network
    /// if the token is absent or blank, [`RecaptchaError::Rejected`] if the
    /// service reports failure, or [`RecaptchaError::Http`] on transport
    /// errors.
    pub async fn verify(&self, token: &str) -> Result<(), RecaptchaError> {
        if token.trim().is_empty() {
            return Err(RecaptchaError::MissingToken);
        }

        // The siteverify API takes secret and response as query parameters
        // on a POST with an empty body.
        let response = self
            .client
            .post(&self.verify_url)
            .query(&[
                ("secret", self.secret.expose_secret()),
                ("response", token),
            ])
            .send()
            .await?;

        let verdict: VerifyResponse = response.json().await?;

        if verdict.success {
            Ok(())
        } else {
            let detail = if verdict.error_codes.is_empty() {
                "rejected by provider".to_string()
            } else {
                verdict.error_codes.join(", ")
            };
            Err(RecaptchaError::Rejected(detail))
        }
    }
}

/// Response body from the `siteverify` endpoint.
#[derive(Debug, Deserialize)]
struct VerifyResponse {
    success: bool,
    #[serde(default, rename = "error-codes")]
    error_codes: Vec<String>,
}
