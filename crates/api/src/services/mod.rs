//! Clients for the external providers the service depends on.
//!
//! Each client wraps one third-party API behind an immutable value that is
//! constructed once at process start and shared via `AppState`. All calls
//! are single-attempt: a failed provider call is a terminal failure for the
//! request that made it.

pub mod email;
pub mod recaptcha;
pub mod token;
pub mod zappost;

pub use email::{ConfirmationTemplate, EmailClient, EmailError};
pub use recaptcha::{RecaptchaClient, RecaptchaError};
pub use token::{TokenError, TokenVerifier};
pub use zappost::{ZappostClient, ZappostError};

use std::time::Duration;

/// Timeout applied to every outbound provider call.
///
/// The underlying platform used to supply this implicitly; it is explicit
/// here so a hung provider cannot pin a request indefinitely.
pub(crate) const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
