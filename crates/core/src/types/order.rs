//! Postcard order model.
//!
//! An [`Order`] is the ephemeral unit of work for the whole service: it is
//! built from one incoming request (or decoded from a signed deferred token),
//! validated, normalized for the fulfillment provider, and then dropped.
//! Nothing here performs I/O.

use serde::{Deserialize, Serialize};

use super::email::{Email, EmailError};

/// Errors that can occur when validating an [`Order`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum OrderError {
    /// A required field is missing or blank.
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    /// The sender's email address is structurally invalid.
    #[error("invalid sender email: {0}")]
    InvalidEmail(#[from] EmailError),
}

/// The person sending the postcard.
///
/// Used as the billing and notification identity: the confirmation email
/// goes to this address, and it anchors the provider customer identifier.
///
/// Fields default to blank when absent from the wire so that missing data
/// surfaces as a field-naming [`OrderError`] from [`Order::validate`]
/// rather than a deserialization rejection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sender {
    pub name: String,
    pub email: String,
}

/// The postal delivery address for the postcard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Recipient {
    pub name: String,
    pub line1: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    pub city: String,
    pub postcode: String,
    pub country: String,
}

impl Default for Recipient {
    fn default() -> Self {
        Self {
            name: String::new(),
            line1: String::new(),
            line2: None,
            city: String::new(),
            postcode: String::new(),
            // Postcards default to domestic UK delivery.
            country: "GB".to_owned(),
        }
    }
}

/// URLs of the two pre-rendered postcard images.
///
/// The images are produced upstream; only presence is checked here, never
/// content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PostcardAssets {
    pub front_image_url: String,
    pub back_image_url: String,
}

/// A complete postcard order.
///
/// Invariant: an order is never submitted to the fulfillment provider
/// without a successful verification step (reCAPTCHA proof or deferred
/// token decode), and no field is mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub sender: Sender,
    pub recipient: Recipient,
    #[serde(flatten)]
    pub assets: PostcardAssets,
}

impl Order {
    /// Create a new order from its parts.
    #[must_use]
    pub const fn new(sender: Sender, recipient: Recipient, assets: PostcardAssets) -> Self {
        Self {
            sender,
            recipient,
            assets,
        }
    }

    /// Check that every required field is present and non-blank.
    ///
    /// Required: sender name and email, recipient name/line1/city/postcode,
    /// and both image URLs. `recipient.line2` is optional and `country` has
    /// a deserialization default, so neither is checked here.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::MissingField`] naming the first blank field, or
    /// [`OrderError::InvalidEmail`] if the sender email does not parse.
    pub fn validate(&self) -> Result<(), OrderError> {
        require("sender.name", &self.sender.name)?;
        require("sender.email", &self.sender.email)?;
        Email::parse(&self.sender.email)?;
        require("recipient.name", &self.recipient.name)?;
        require("recipient.line1", &self.recipient.line1)?;
        require("recipient.city", &self.recipient.city)?;
        require("recipient.postcode", &self.recipient.postcode)?;
        require("frontImageUrl", &self.assets.front_image_url)?;
        require("backImageUrl", &self.assets.back_image_url)?;
        Ok(())
    }

    /// Derive the deferred-flow customer identifier.
    ///
    /// Sender email concatenated with the recipient postcode, with all
    /// whitespace stripped from the postcode: email `a@b.com` and postcode
    /// `SW1 1AA` yield `a@b.comSW11AA`.
    #[must_use]
    pub fn customer_id(&self) -> String {
        let stripped: String = self
            .recipient
            .postcode
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        format!("{}{stripped}", self.sender.email)
    }
}

/// Reject blank (empty or whitespace-only) required fields.
fn require(name: &'static str, value: &str) -> Result<(), OrderError> {
    if value.trim().is_empty() {
        return Err(OrderError::MissingField(name));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
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
    fn test_validate_complete_order() {
        assert!(sample_order().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_blank_sender_name() {
        let mut order = sample_order();
        order.sender.name = "  ".to_owned();
        assert!(matches!(
            order.validate(),
            Err(OrderError::MissingField("sender.name"))
        ));
    }

    #[test]
    fn test_validate_rejects_missing_postcode() {
        let mut order = sample_order();
        order.recipient.postcode = String::new();
        assert!(matches!(
            order.validate(),
            Err(OrderError::MissingField("recipient.postcode"))
        ));
    }

    #[test]
    fn test_validate_rejects_missing_image_urls() {
        let mut order = sample_order();
        order.assets.front_image_url = String::new();
        assert!(matches!(
            order.validate(),
            Err(OrderError::MissingField("frontImageUrl"))
        ));

        let mut order = sample_order();
        order.assets.back_image_url = String::new();
        assert!(matches!(
            order.validate(),
            Err(OrderError::MissingField("backImageUrl"))
        ));
    }

    #[test]
    fn test_validate_rejects_bad_email() {
        let mut order = sample_order();
        order.sender.email = "not-an-email".to_owned();
        assert!(matches!(
            order.validate(),
            Err(OrderError::InvalidEmail(_))
        ));
    }

    #[test]
    fn test_line2_is_optional() {
        let order = sample_order();
        assert!(order.recipient.line2.is_none());
        assert!(order.validate().is_ok());
    }

    #[test]
    fn test_customer_id_strips_postcode_whitespace() {
        let mut order = sample_order();
        order.sender.email = "a@b.com".to_owned();
        order.recipient.postcode = "SW1 1AA".to_owned();
        assert_eq!(order.customer_id(), "a@b.comSW11AA");
    }

    #[test]
    fn test_customer_id_plain_when_postcode_has_no_whitespace() {
        let mut order = sample_order();
        order.recipient.postcode = "W1U4EG".to_owned();
        assert_eq!(order.customer_id(), "ada@example.comW1U4EG");
    }

    #[test]
    fn test_deserialize_order_with_flattened_assets() {
        let json = serde_json::json!({
            "sender": { "name": "Ada", "email": "ada@example.com" },
            "recipient": {
                "name": "Charles",
                "line1": "1 Dorset Street",
                "city": "London",
                "postcode": "W1U 4EG"
            },
            "frontImageUrl": "https://img.example.com/front.png",
            "backImageUrl": "https://img.example.com/back.png"
        });

        let order: Order = serde_json::from_value(json).unwrap();
        assert_eq!(order.assets.front_image_url, "https://img.example.com/front.png");
        // Country defaults when the client omits it.
        assert_eq!(order.recipient.country, "GB");
        assert!(order.validate().is_ok());
    }
}
