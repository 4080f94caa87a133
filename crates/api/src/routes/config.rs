//! Public configuration endpoint.
//!
//! Exposes the non-secret keys the browser client needs to render the
//! reCAPTCHA widget and the image picker. Read-only; no side effects
//! beyond logging.

use axum::{Json, extract::State};
use serde::Serialize;

use crate::error::{ApiError, Result};
use crate::state::AppState;

/// Public keys returned to the client. Exactly these two fields.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicConfigResponse {
    pub recaptcha_site_key: String,
    pub pixabay_api_key: String,
}

/// GET /api/config
///
/// # Errors
///
/// Returns a configuration error (500) if either public key is absent.
pub async fn public_config(State(state): State<AppState>) -> Result<Json<PublicConfigResponse>> {
    let public = &state.config().public;

    let recaptcha_site_key = public
        .recaptcha_site_key
        .clone()
        .ok_or(ApiError::Configuration("RECAPTCHA_SITE_KEY"))?;
    let pixabay_api_key = public
        .pixabay_api_key
        .clone()
        .ok_or(ApiError::Configuration("PIXABAY_API_KEY"))?;

    Ok(Json(PublicConfigResponse {
        recaptcha_site_key,
        pixabay_api_key,
    }))
}
