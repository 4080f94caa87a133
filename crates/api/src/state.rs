//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::Config;
use crate::error::ApiError;
use crate::services::{EmailClient, RecaptchaClient, TokenVerifier, ZappostClient};

/// Error constructing provider clients at startup.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("recaptcha client: {0}")]
    Recaptcha(#[from] crate::services::RecaptchaError),
    #[error("zappost client: {0}")]
    Zappost(#[from] crate::services::ZappostError),
    #[error("email client: {0}")]
    Email(#[from] crate::services::EmailError),
}

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Provider clients are immutable values
/// constructed once at process start - there is no shared mutable provider
/// state to configure per call. A client is `None` when its configuration
/// section is absent; the accessor turns that into a configuration error so
/// endpoints fail with a 500 before any external call.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    recaptcha: Option<RecaptchaClient>,
    zappost: Option<ZappostClient>,
    email: Option<EmailClient>,
    tokens: Option<TokenVerifier>,
}

impl AppState {
    /// Create a new application state, building a client for every provider
    /// whose configuration is present.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured client fails to build.
    pub fn new(config: Config) -> Result<Self, StateError> {
        let recaptcha = config
            .recaptcha
            .as_ref()
            .map(RecaptchaClient::new)
            .transpose()?;
        let zappost = config.zappost.as_ref().map(ZappostClient::new).transpose()?;
        let email = config.sendgrid.as_ref().map(EmailClient::new).transpose()?;
        let tokens = config.jwt_secret.as_ref().map(TokenVerifier::new);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                recaptcha,
                zappost,
                email,
                tokens,
            }),
        })
    }

    /// Get a reference to the service configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the reCAPTCHA verification client.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `RECAPTCHA_SECRET_KEY` is unset.
    pub fn recaptcha(&self) -> Result<&RecaptchaClient, ApiError> {
        self.inner
            .recaptcha
            .as_ref()
            .ok_or(ApiError::Configuration("RECAPTCHA_SECRET_KEY"))
    }

    /// Get the ZAP~POST fulfillment client.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if any `ZAPPOST_*` variable is unset.
    pub fn zappost(&self) -> Result<&ZappostClient, ApiError> {
        self.inner
            .zappost
            .as_ref()
            .ok_or(ApiError::Configuration(
                "ZAPPOST_USERNAME/ZAPPOST_PASSWORD/ZAPPOST_CAMPAIGN_ID",
            ))
    }

    /// Get the SendGrid email client.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if any `SENDGRID_*` variable is unset.
    pub fn email(&self) -> Result<&EmailClient, ApiError> {
        self.inner.email.as_ref().ok_or(ApiError::Configuration(
            "SENDGRID_API_KEY/SENDGRID_FROM_EMAIL",
        ))
    }

    /// Get the deferred-token verifier.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `JWT_SECRET` is unset.
    pub fn tokens(&self) -> Result<&TokenVerifier, ApiError> {
        self.inner
            .tokens
            .as_ref()
            .ok_or(ApiError::Configuration("JWT_SECRET"))
    }
}
