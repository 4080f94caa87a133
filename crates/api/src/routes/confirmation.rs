//! Immediate confirmation email endpoint.
//!
//! Sends the partner-branded confirmation for an order the client has just
//! submitted through the direct flow. Field validation happens before any
//! network call; a delivery failure here never affects the already-completed
//! print submission.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use postcard_core::{Order, PostcardAssets, Recipient, Sender};

use crate::error::Result;
use crate::services::ConfirmationTemplate;
use crate::state::AppState;

/// Confirmation request body: the order fields, no proof token.
#[derive(Debug, Deserialize)]
pub struct SendConfirmationRequest {
    #[serde(default)]
    pub sender: Sender,
    #[serde(default)]
    pub recipient: Recipient,
    #[serde(flatten)]
    pub assets: PostcardAssets,
}

/// Confirmation success body.
#[derive(Debug, Serialize)]
pub struct SendConfirmationResponse {
    pub success: bool,
}

/// POST /api/send-confirmation
///
/// # Errors
///
/// 500 on missing email configuration or a delivery failure; 400 on
/// missing order fields.
#[instrument(skip_all)]
pub async fn send_confirmation(
    State(state): State<AppState>,
    Json(request): Json<SendConfirmationRequest>,
) -> Result<Json<SendConfirmationResponse>> {
    let email = state.email()?;

    let order = Order::new(request.sender, request.recipient, request.assets);
    order.validate()?;

    email
        .send_confirmation(&order, ConfirmationTemplate::Partner, &state.config().base_url)
        .await?;

    Ok(Json(SendConfirmationResponse { success: true }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    use crate::routes::routes;
    use crate::routes::test_support::{bare_config, full_config, state};

    async fn post_confirmation(
        config: crate::config::Config,
        body: serde_json::Value,
    ) -> (StatusCode, serde_json::Value) {
        let app = routes().with_state(state(config));
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/send-confirmation")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_missing_email_config_is_500() {
        let (status, body) = post_confirmation(bare_config(), serde_json::json!({})).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_missing_order_data_is_400_before_any_send() {
        let (status, body) = post_confirmation(
            full_config(),
            serde_json::json!({
                "sender": { "name": "Ada", "email": "ada@example.com" }
            }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "missing required field: recipient.name");
    }
}
