//! Direct order flow: reCAPTCHA-gated postcard submission.
//!
//! The request carries the full order fields plus the proof token inline.
//! Everything local (configuration presence, token presence, field
//! validation) is checked before the first outbound call, so an invalid
//! request costs zero network traffic.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use postcard_core::{Order, PostcardAssets, Recipient, Sender};

use crate::error::{ApiError, Result};
use crate::services::RecaptchaError;
use crate::state::AppState;

/// Direct order request body.
///
/// Fields default to blank so that missing data is reported as a named
/// validation failure rather than a deserialization rejection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendPostcardRequest {
    #[serde(default)]
    pub sender: Sender,
    #[serde(default)]
    pub recipient: Recipient,
    #[serde(flatten)]
    pub assets: PostcardAssets,
    #[serde(default)]
    pub recaptcha_token: String,
}

/// Direct order success body.
#[derive(Debug, Serialize)]
pub struct SendPostcardResponse {
    pub success: bool,
    pub message: &'static str,
}

/// POST /api/send-postcard
///
/// Sequence: provider configuration present, proof token present (local),
/// order fields valid (local), reCAPTCHA verify, then a single submission
/// to the fulfillment provider keyed by the sender's email.
///
/// # Errors
///
/// 500 on missing configuration or a provider failure; 400 on a missing
/// proof, invalid fields, or verification failure.
#[instrument(skip_all)]
pub async fn send_postcard(
    State(state): State<AppState>,
    Json(request): Json<SendPostcardRequest>,
) -> Result<Json<SendPostcardResponse>> {
    let recaptcha = state.recaptcha()?;
    let zappost = state.zappost()?;

    if request.recaptcha_token.trim().is_empty() {
        return Err(ApiError::Verification(RecaptchaError::MissingToken));
    }

    let order = Order::new(request.sender, request.recipient, request.assets);
    order.validate()?;

    recaptcha.verify(&request.recaptcha_token).await?;

    // The order is verified; submission is a pure transformation of it.
    zappost.submit_order(&order, &order.sender.email).await?;

    Ok(Json(SendPostcardResponse {
        success: true,
        message: "Postcard successfully sent for printing.",
    }))
}
