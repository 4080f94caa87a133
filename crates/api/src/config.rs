//! Service configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Server
//! - `POSTCARD_HOST` - Bind address (default: 127.0.0.1)
//! - `POSTCARD_PORT` - Listen port (default: 3000)
//! - `POSTCARD_BASE_URL` - Public URL for the service (default: http://localhost:3000)
//!
//! ## Public keys (served to the client by `GET /api/config`)
//! - `RECAPTCHA_SITE_KEY` - reCAPTCHA public site key
//! - `PIXABAY_API_KEY` - Pixabay image-search public key
//!
//! ## Providers
//! - `RECAPTCHA_SECRET_KEY` - reCAPTCHA server-side secret
//! - `RECAPTCHA_VERIFY_URL` - Verification endpoint (default: Google siteverify)
//! - `SENDGRID_API_KEY` - SendGrid API key
//! - `SENDGRID_FROM_EMAIL` - Confirmation email from-address
//! - `SENDGRID_FROM_NAME` - Optional from-name override
//! - `SENDGRID_SEND_URL` - Mail-send endpoint (default: SendGrid v3)
//! - `ZAPPOST_USERNAME` / `ZAPPOST_PASSWORD` - ZAP~POST Basic-auth credentials
//! - `ZAPPOST_CAMPAIGN_ID` - ZAP~POST campaign to submit orders into
//! - `ZAPPOST_BASE_URL` - API base (default: https://api.zappost.com)
//! - `JWT_SECRET` - Deferred-order token signing secret (min 32 chars)
//!
//! ## Optional
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//!
//! Provider sections are optional at startup: the process boots without
//! them, and each endpoint fails with a configuration error (500) before
//! any external call if the section it needs is absent.

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

/// Minimum length for the token signing secret.
const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Google reCAPTCHA verification endpoint.
const DEFAULT_RECAPTCHA_VERIFY_URL: &str = "https://www.google.com/recaptcha/api/siteverify";

/// SendGrid v3 mail-send endpoint.
const DEFAULT_SENDGRID_SEND_URL: &str = "https://api.sendgrid.com/v3/mail/send";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Top-level service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the service (used in email links)
    pub base_url: String,
    /// Public keys exposed to the browser client
    pub public: PublicKeys,
    /// reCAPTCHA verification configuration
    pub recaptcha: Option<RecaptchaConfig>,
    /// SendGrid email delivery configuration
    pub sendgrid: Option<SendgridConfig>,
    /// ZAP~POST fulfillment configuration
    pub zappost: Option<ZappostConfig>,
    /// Deferred-order token signing secret
    pub jwt_secret: Option<SecretString>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Non-secret keys the browser client needs.
///
/// Either may be absent; the config endpoint reports 500 until both are set.
#[derive(Debug, Clone, Default)]
pub struct PublicKeys {
    /// reCAPTCHA public site key
    pub recaptcha_site_key: Option<String>,
    /// Pixabay image-search public key
    pub pixabay_api_key: Option<String>,
}

/// reCAPTCHA verification configuration.
///
/// Implements `Debug` manually to redact the secret.
#[derive(Clone)]
pub struct RecaptchaConfig {
    /// Server-side verification secret
    pub secret: SecretString,
    /// Verification endpoint URL
    pub verify_url: String,
}

impl std::fmt::Debug for RecaptchaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecaptchaConfig")
            .field("secret", &"[REDACTED]")
            .field("verify_url", &self.verify_url)
            .finish()
    }
}

/// SendGrid email delivery configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct SendgridConfig {
    /// SendGrid API key
    pub api_key: SecretString,
    /// From-address for confirmation emails
    pub from_email: String,
    /// Optional from-name override (templates supply a default)
    pub from_name: Option<String>,
    /// Mail-send endpoint URL
    pub send_url: String,
}

impl std::fmt::Debug for SendgridConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SendgridConfig")
            .field("api_key", &"[REDACTED]")
            .field("from_email", &self.from_email)
            .field("from_name", &self.from_name)
            .field("send_url", &self.send_url)
            .finish()
    }
}

/// ZAP~POST fulfillment API configuration.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct ZappostConfig {
    /// Basic-auth username
    pub username: String,
    /// Basic-auth password
    pub password: SecretString,
    /// Campaign submissions are attached to
    pub campaign_id: String,
    /// API base URL
    pub base_url: String,
}

impl std::fmt::Debug for ZappostConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZappostConfig")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("campaign_id", &self.campaign_id)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid (bad bind
    /// address or port, or a token secret that is too short).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("POSTCARD_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("POSTCARD_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("POSTCARD_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("POSTCARD_PORT".to_string(), e.to_string()))?;
        let base_url = get_env_or_default("POSTCARD_BASE_URL", "http://localhost:3000");

        let jwt_secret = match get_optional_env("JWT_SECRET") {
            Some(value) => {
                validate_jwt_secret(&value)?;
                Some(SecretString::from(value))
            }
            None => None,
        };

        Ok(Self {
            host,
            port,
            base_url,
            public: PublicKeys::from_env(),
            recaptcha: RecaptchaConfig::from_env(),
            sendgrid: SendgridConfig::from_env(),
            zappost: ZappostConfig::from_env(),
            jwt_secret,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl PublicKeys {
    fn from_env() -> Self {
        Self {
            recaptcha_site_key: get_optional_env("RECAPTCHA_SITE_KEY"),
            pixabay_api_key: get_optional_env("PIXABAY_API_KEY"),
        }
    }
}

impl RecaptchaConfig {
    /// Returns `None` unless the verification secret is set.
    fn from_env() -> Option<Self> {
        let secret = get_optional_env("RECAPTCHA_SECRET_KEY")?;
        Some(Self {
            secret: SecretString::from(secret),
            verify_url: get_env_or_default("RECAPTCHA_VERIFY_URL", DEFAULT_RECAPTCHA_VERIFY_URL),
        })
    }
}

impl SendgridConfig {
    /// Returns `None` unless every required SendGrid variable is set.
    fn from_env() -> Option<Self> {
        let api_key = get_optional_env("SENDGRID_API_KEY")?;
        let from_email = get_optional_env("SENDGRID_FROM_EMAIL")?;
        Some(Self {
            api_key: SecretString::from(api_key),
            from_email,
            from_name: get_optional_env("SENDGRID_FROM_NAME"),
            send_url: get_env_or_default("SENDGRID_SEND_URL", DEFAULT_SENDGRID_SEND_URL),
        })
    }
}

impl ZappostConfig {
    /// Returns `None` unless every required ZAP~POST variable is set.
    fn from_env() -> Option<Self> {
        let username = get_optional_env("ZAPPOST_USERNAME")?;
        let password = get_optional_env("ZAPPOST_PASSWORD")?;
        let campaign_id = get_optional_env("ZAPPOST_CAMPAIGN_ID")?;
        Some(Self {
            username,
            password: SecretString::from(password),
            campaign_id,
            base_url: get_env_or_default("ZAPPOST_BASE_URL", "https://api.zappost.com"),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable, treating empty values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Validate that the token signing secret meets the minimum length.
fn validate_jwt_secret(value: &str) -> Result<(), ConfigError> {
    if value.len() < MIN_JWT_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            "JWT_SECRET".to_string(),
            format!(
                "must be at least {MIN_JWT_SECRET_LENGTH} characters (got {})",
                value.len()
            ),
        ));
    }
    Ok(())
}
