//! Confirmation email delivery via the SendGrid v3 API.
//!
//! Renders one of two askama HTML bodies and dispatches it to the sender's
//! address. Delivery is not transactional with the print submission: a
//! failed send is reported to the caller but never rolls back an order the
//! fulfillment provider has already accepted.

use askama::Template;
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use thiserror::Error;

use postcard_core::Order;

use crate::config::SendgridConfig;

use super::REQUEST_TIMEOUT;

/// Errors that can occur when sending a confirmation email.
#[derive(Debug, Error)]
pub enum EmailError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The delivery provider returned an error response.
    #[error("email provider error: {status}")]
    Api {
        status: u16,
        /// Detailed provider error body, logged server-side only.
        message: String,
    },

    /// Template rendering error.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    /// The API key could not be encoded into a header.
    #[error("invalid API key: {0}")]
    InvalidApiKey(String),
}

/// The closed set of confirmation email variants.
///
/// Selected by the entry flow rather than duplicated inline markup, so the
/// rendering stays testable independently of transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationTemplate {
    /// Straightforward confirmation used by the token-verified flow.
    Plain,
    /// Branded variant with a partner promotion, used by the immediate flow.
    Partner,
}

impl ConfirmationTemplate {
    /// Default from-name shown in the recipient's inbox.
    const fn from_name(self) -> &'static str {
        match self {
            Self::Plain => "ZAP~POST",
            Self::Partner => "ZAP~POST - Free postcard",
        }
    }

    /// Subject line for this variant.
    fn subject(self, recipient_name: &str) -> String {
        match self {
            Self::Plain => "Your Postcard Confirmation".to_string(),
            Self::Partner => format!("Postcard sent to {recipient_name}"),
        }
    }
}

/// HTML body for the plain confirmation.
#[derive(Template)]
#[template(path = "email/confirmation.html")]
struct ConfirmationHtml<'a> {
    sender_name: &'a str,
    recipient_name: &'a str,
    front_image_url: &'a str,
    back_image_url: &'a str,
    base_url: &'a str,
}

/// HTML body for the partner-branded confirmation.
#[derive(Template)]
#[template(path = "email/confirmation_partner.html")]
struct ConfirmationPartnerHtml<'a> {
    sender_name: &'a str,
    recipient_name: &'a str,
    front_image_url: &'a str,
    back_image_url: &'a str,
    base_url: &'a str,
}

/// Client for the SendGrid mail-send API.
#[derive(Clone)]
pub struct EmailClient {
    client: reqwest::Client,
    send_url: String,
    from_email: String,
    from_name: Option<String>,
}

impl EmailClient {
    /// Create a new email delivery client.
    ///
    /// # Errors
    ///
    /// Returns error if the API key cannot form a valid header or the HTTP
    /// client fails to build.
    pub fn new(config: &SendgridConfig) -> Result<Self, EmailError> {
        let mut auth_value =
            HeaderValue::from_str(&format!("Bearer {}", config.api_key.expose_secret()))
                .map_err(|e| EmailError::InvalidApiKey(e.to_string()))?;
        auth_value.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert("Authorization", auth_value);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            send_url: config.send_url.clone(),
            from_email: config.from_email.clone(),
            from_name: config.from_name.clone(),
        })
    }

    /// Send a confirmation email for a completed order to its sender.
    ///
    /// # Errors
    ///
    /// Returns [`EmailError::Api`] on a non-success provider response (the
    /// detailed body is logged, not surfaced) or [`EmailError::Http`] on
    /// transport errors.
    pub async fn send_confirmation(
        &self,
        order: &Order,
        template: ConfirmationTemplate,
        base_url: &str,
    ) -> Result<(), EmailError> {
        let html = render_confirmation(order, template, base_url)?;
        let subject = template.subject(&order.recipient.name);
        let from_name = self
            .from_name
            .as_deref()
            .unwrap_or_else(|| template.from_name());

        let body = serde_json::json!({
            "personalizations": [{
                "to": [{ "email": order.sender.email }]
            }],
            "from": {
                "email": self.from_email,
                "name": from_name
            },
            "subject": subject,
            "content": [{
                "type": "text/html",
                "value": html
            }]
        });

        let response = self.client.post(&self.send_url).json(&body).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), body = %message, "SendGrid rejected confirmation email");
            return Err(EmailError::Api {
                status: status.as_u16(),
                message,
            });
        }

        tracing::info!(to = %order.sender.email, subject = %subject, "Confirmation email sent");
        Ok(())
    }
}

/// Render the HTML body for a confirmation variant.
fn render_confirmation(
    order: &Order,
    template: ConfirmationTemplate,
    base_url: &str,
) -> Result<String, askama::Error> {
    match template {
        ConfirmationTemplate::Plain => ConfirmationHtml {
            sender_name: &order.sender.name,
            recipient_name: &order.recipient.name,
            front_image_url: &order.assets.front_image_url,
            back_image_url: &order.assets.back_image_url,
            base_url,
        }
        .render(),
        ConfirmationTemplate::Partner => ConfirmationPartnerHtml {
            sender_name: &order.sender.name,
            recipient_name: &order.recipient.name,
            front_image_url: &order.assets.front_image_url,
            back_image_url: &order.assets.back_image_url,
            base_url,
        }
        .render(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use postcard_core::{PostcardAssets, Recipient, Sender};

    use super::*;

    fn sample_order() -> Order {
        Order::new(
            Sender {
                name: "Ada Lovelace".to_owned(),
                email: "ada@example.com".to_owned(),
            },
            Recipient {
                name: "Charles Babbage".to_owned(),
                line1: "1 Dorset Street".to_owned(),
                line2: None,
                city: "London".to_owned(),
                postcode: "W1U 4EG".to_owned(),
                country: "GB".to_owned(),
            },
            PostcardAssets {
                front_image_url: "https://img.example.com/front.png".to_owned(),
                back_image_url: "https://img.example.com/back.png".to_owned(),
            },
        )
    }

    #[test]
    fn test_plain_template_renders_order_fields() {
        let order = sample_order();
        let html = render_confirmation(
            &order,
            ConfirmationTemplate::Plain,
            "https://postcards.example.com",
        )
        .unwrap();

        assert!(html.contains("Ada Lovelace"));
        assert!(html.contains("Charles Babbage"));
        assert!(html.contains("https://img.example.com/front.png"));
        assert!(html.contains("https://img.example.com/back.png"));
        assert!(html.contains("https://postcards.example.com/?sendAgain=true"));
    }

    #[test]
    fn test_partner_template_renders_order_images() {
        let order = sample_order();
        let html = render_confirmation(
            &order,
            ConfirmationTemplate::Partner,
            "https://postcards.example.com",
        )
        .unwrap();

        // The variant renders this order's own images, not out-of-scope ones.
        assert!(html.contains("https://img.example.com/front.png"));
        assert!(html.contains("https://img.example.com/back.png"));
        assert!(html.contains("Ada Lovelace"));
    }

    #[test]
    fn test_subjects_per_variant() {
        assert_eq!(
            ConfirmationTemplate::Plain.subject("Charles"),
            "Your Postcard Confirmation"
        );
        assert_eq!(
            ConfirmationTemplate::Partner.subject("Charles"),
            "Postcard sent to Charles"
        );
    }

    #[test]
    fn test_from_names_per_variant() {
        assert_eq!(ConfirmationTemplate::Plain.from_name(), "ZAP~POST");
        assert_eq!(
            ConfirmationTemplate::Partner.from_name(),
            "ZAP~POST - Free postcard"
        );
    }
}
