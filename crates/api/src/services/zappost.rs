//! ZAP~POST print-fulfillment client.
//!
//! Normalizes a validated [`Order`] into the record shape the fulfillment
//! API expects and submits it as a one-element batch. Submission is a pure
//! transformation of the order; the caller supplies the customer identifier
//! (the two entry flows derive it differently). A non-200 response is fatal
//! for the request - there are no retries, and an accepted submission
//! cannot be cancelled.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Serialize;
use thiserror::Error;

use postcard_core::Order;

use crate::config::ZappostConfig;

use super::REQUEST_TIMEOUT;

/// Records endpoint, relative to the configured base URL.
const RECORDS_PATH: &str = "/api/v1/records";

/// Errors that can occur when submitting an order for printing.
#[derive(Debug, Error)]
pub enum ZappostError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API returned a non-200 response.
    #[error("print service returned an error: {status}")]
    Api {
        status: u16,
        /// Response body, logged server-side only.
        message: String,
    },

    /// Credentials could not be encoded into a header.
    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),
}

/// Client for the ZAP~POST records API.
#[derive(Clone)]
pub struct ZappostClient {
    client: reqwest::Client,
    base_url: String,
    campaign_id: String,
}

impl ZappostClient {
    /// Create a new fulfillment client.
    ///
    /// The Basic-auth header is computed once from the configured
    /// credentials and attached to every request.
    ///
    /// # Errors
    ///
    /// Returns error if the credentials cannot form a valid header or the
    /// HTTP client fails to build.
    pub fn new(config: &ZappostConfig) -> Result<Self, ZappostError> {
        let credentials = format!(
            "{}:{}",
            config.username,
            config.password.expose_secret()
        );
        let mut auth_value =
            HeaderValue::from_str(&format!("Basic {}", BASE64.encode(credentials)))
                .map_err(|e| ZappostError::InvalidCredentials(e.to_string()))?;
        auth_value.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert("Authorization", auth_value);
        headers.insert("Accept", HeaderValue::from_static("*/*"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            // Tolerate a configured base URL with a trailing slash.
            base_url: config.base_url.trim_end_matches('/').to_string(),
            campaign_id: config.campaign_id.clone(),
        })
    }

    /// Submit one order to the configured campaign.
    ///
    /// # Errors
    ///
    /// Returns [`ZappostError::Api`] carrying the provider's status and body
    /// on any non-200 response, or [`ZappostError::Http`] on transport
    /// errors.
    pub async fn submit_order(&self, order: &Order, customer_id: &str) -> Result<(), ZappostError> {
        let payload = SubmitRecordsRequest {
            campaign_id: &self.campaign_id,
            scheduled_send_date_id: "",
            only_valid_records: true,
            submissions: vec![Submission::from_order(order, customer_id)],
        };

        let url = format!("{}{RECORDS_PATH}", self.base_url);
        let response = self.client.post(&url).json(&payload).send().await?;
        let status = response.status();

        // The API signals acceptance with 200 exactly.
        if status.as_u16() != 200 {
            let message = response.text().await.unwrap_or_default();
            return Err(ZappostError::Api {
                status: status.as_u16(),
                message,
            });
        }

        tracing::info!(customer_id = %customer_id, "Order submitted for printing");
        Ok(())
    }
}

/// Request body for the records endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmitRecordsRequest<'a> {
    campaign_id: &'a str,
    scheduled_send_date_id: &'a str,
    only_valid_records: bool,
    submissions: Vec<Submission<'a>>,
}

/// One normalized order record in the shape the fulfillment API requires.
#[derive(Debug, Serialize)]
pub struct Submission<'a> {
    #[serde(rename = "customerid")]
    customer_id: &'a str,
    email: &'a str,
    salutation: &'a str,
    firstname: &'a str,
    surname: &'a str,
    #[serde(rename = "companyname")]
    company_name: &'a str,
    address1: &'a str,
    address2: &'a str,
    address3: &'a str,
    city: &'a str,
    postcode: &'a str,
    country: &'a str,
    currency: &'a str,
    language: &'a str,
    customdata: CustomData<'a>,
}

/// Free-form data bag carried alongside the address record.
#[derive(Debug, Serialize)]
struct CustomData<'a> {
    /// Front image URL.
    front: &'a str,
    /// Back image URL (without the address overlay).
    message: &'a str,
    /// Sender's display name.
    sender: &'a str,
}

impl<'a> Submission<'a> {
    /// Normalize an order into the provider record shape.
    ///
    /// The recipient's full name goes into `firstname` and `surname` is
    /// always empty; `address2` defaults to empty when the order has no
    /// second address line; currency and language are fixed.
    fn from_order(order: &'a Order, customer_id: &'a str) -> Self {
        Self {
            customer_id,
            email: &order.sender.email,
            salutation: "",
            firstname: &order.recipient.name,
            surname: "",
            company_name: "",
            address1: &order.recipient.line1,
            address2: order.recipient.line2.as_deref().unwrap_or(""),
            address3: "",
            city: &order.recipient.city,
            postcode: &order.recipient.postcode,
            country: &order.recipient.country,
            currency: "GBP",
            language: "en",
            customdata: CustomData {
                front: &order.assets.front_image_url,
                message: &order.assets.back_image_url,
                sender: &order.sender.name,
            },
        }
    }
}
