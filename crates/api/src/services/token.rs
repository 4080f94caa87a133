//! Signed deferred-order tokens.
//!
//! A deferred token is a time-limited HS256 JWT carrying a complete order,
//! letting verification happen on a later request (the email-confirmation
//! link) without any server-side session storage. Verification fails
//! closed: a tampered, expired, or structurally incomplete token rejects
//! the request before any provider is contacted.

use chrono::{Duration, Utc};
use jsonwebtoken::{
    DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use postcard_core::{Order, OrderError};

/// Default token lifetime.
const DEFAULT_LIFETIME_HOURS: i64 = 48;

/// Errors that can occur when issuing or verifying a deferred token.
#[derive(Debug, Error)]
pub enum TokenError {
    /// No token was supplied with the request.
    #[error("missing verification token")]
    Missing,

    /// The token's signature window has passed.
    #[error("token expired")]
    Expired,

    /// Bad signature, malformed token, or claims that don't decode.
    #[error("invalid token: {0}")]
    Invalid(jsonwebtoken::errors::Error),

    /// The token decoded but does not carry a complete order.
    #[error("token payload incomplete: {0}")]
    IncompleteOrder(#[from] OrderError),

    /// Signing failed.
    #[error("failed to sign token: {0}")]
    Signing(jsonwebtoken::errors::Error),
}

/// Claims payload: the order fields plus standard timestamps.
#[derive(Debug, Serialize, Deserialize)]
struct OrderClaims {
    #[serde(flatten)]
    order: Order,
    /// Issued at timestamp.
    iat: i64,
    /// Expiration timestamp.
    exp: i64,
}

/// Issues and verifies deferred-order tokens with a shared secret.
#[derive(Clone)]
pub struct TokenVerifier {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    lifetime: Duration,
}

impl TokenVerifier {
    /// Create a verifier from the shared signing secret.
    #[must_use]
    pub fn new(secret: &SecretString) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(bytes),
            decoding_key: DecodingKey::from_secret(bytes),
            lifetime: Duration::hours(DEFAULT_LIFETIME_HOURS),
        }
    }

    /// Issue a signed token encoding the given order.
    ///
    /// Used by the upstream link builder and by tests; the deferred
    /// endpoint itself only verifies.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Signing`] if encoding fails.
    pub fn issue(&self, order: &Order) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = OrderClaims {
            order: order.clone(),
            iat: now.timestamp(),
            exp: (now + self.lifetime).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding_key).map_err(TokenError::Signing)
    }

    /// Verify a token and reconstruct the order it carries.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Expired`] past the expiry window,
    /// [`TokenError::Invalid`] on a bad signature or malformed claims, and
    /// [`TokenError::IncompleteOrder`] if the decoded order is missing a
    /// required field.
    pub fn verify(&self, token: &str) -> Result<Order, TokenError> {
        let data = decode::<OrderClaims>(token, &self.decoding_key, &Validation::default())
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e),
            })?;

        let order = data.claims.order;
        order.validate()?;
        Ok(order)
    }
}
