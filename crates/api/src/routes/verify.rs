//! Deferred order flow: token-verified submission.
//!
//! The request carries only an opaque signed token (from the confirmation
//! link in the user's email). The handler is an explicit sequence of
//! fallible steps - verify token, submit order, send confirmation, redirect -
//! and any failure short-circuits to a terminal plain-text error. There is
//! no partial-state recovery: a failure after the fulfillment provider has
//! accepted the order leaves it submitted.

use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use tracing::instrument;

use crate::error::ApiError;
use crate::services::{ConfirmationTemplate, TokenError};
use crate::state::AppState;

/// Destination after a fully completed deferred flow.
const SUCCESS_LOCATION: &str = "/success.html";

/// Query parameters for the deferred endpoint.
#[derive(Debug, Deserialize)]
pub struct VerifyParams {
    pub token: Option<String>,
}

/// Plain-text error rendering for the deferred flow.
///
/// This endpoint is opened from an email link, so failures are readable
/// text rather than the JSON the API endpoints use. The underlying error
/// is still logged and captured the same way.
#[derive(Debug)]
pub struct PlainError(ApiError);

impl<E> From<E> for PlainError
where
    E: Into<ApiError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for PlainError {
    fn into_response(self) -> Response {
        self.0.report();
        (self.0.status(), self.0.message()).into_response()
    }
}

/// GET /api/verify-and-send?token=...
///
/// Steps, in order, each terminal on failure:
/// 1. token present (400) and signing secret configured (500)
/// 2. signature verified and order reconstructed - fails closed (400)
/// 3. order submitted to the fulfillment provider, keyed by the derived
///    customer identifier (500 on non-200)
/// 4. plain confirmation email sent (500 on failure; the order stays
///    submitted - the two are not transactional)
/// 5. 302 redirect to the static success page
///
/// # Errors
///
/// Returns [`PlainError`] at whichever step fails first.
#[instrument(skip_all)]
pub async fn verify_and_send(
    State(state): State<AppState>,
    Query(params): Query<VerifyParams>,
) -> Result<Response, PlainError> {
    let verifier = state.tokens()?;

    let token = params
        .token
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(TokenError::Missing)?;

    // Fails closed: expired or tampered tokens reject the request before
    // any provider is contacted.
    let order = verifier.verify(token)?;

    let zappost = state.zappost()?;
    zappost.submit_order(&order, &order.customer_id()).await?;

    let email = state.email()?;
    email
        .send_confirmation(&order, ConfirmationTemplate::Plain, &state.config().base_url)
        .await?;

    Ok((
        StatusCode::FOUND,
        [(header::LOCATION, SUCCESS_LOCATION)],
    )
        .into_response())
}
