//! Payment API models.

use serde::{Deserialize, Serialize};

/// Structured error payload returned by the API outside the success range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code defined by the API.
    pub code: String,
    /// Human readable message.
    pub message: String,
    /// Additional detail, when the API provides it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A card token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Unique identifier for the object.
    #[serde(rename = "id")]
    pub identifier: String,
    /// Object type, `token` for tokens.
    pub object: String,
    /// Tokenized card.
    #[serde(default)]
    pub card: Option<TokenCard>,
    /// Token type, e.g. `card`.
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    /// Creation time, in seconds since the Unix epoch.
    #[serde(default, rename = "created")]
    pub creation_date: Option<i64>,
    /// Client IP address.
    #[serde(default)]
    pub client_ip: Option<String>,
    /// Live mode.
    #[serde(default, rename = "livemode")]
    pub is_live_mode: bool,
    /// Whether the token was already used.
    #[serde(default, rename = "used")]
    pub is_used: bool,
}

/// Card attached to a [`Token`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenCard {
    /// Unique identifier for the object.
    #[serde(rename = "id")]
    pub identifier: Option<String>,
    /// Object type.
    pub object: Option<String>,
    /// Last four digits of the card number.
    #[serde(rename = "last4")]
    pub last_four_digits: Option<String>,
    /// Expiration month.
    pub exp_month: u8,
    /// Expiration year, two or four digits.
    pub exp_year: u16,
    /// Card brand (Visa, MasterCard, ...).
    pub brand: Option<String>,
    /// Customer the card belongs to.
    pub customer: Option<String>,
    /// Funding type (credit, debit).
    #[serde(rename = "funding")]
    pub card_type: Option<String>,
    /// Card fingerprint.
    pub fingerprint: Option<String>,
    /// Street address / PO box / company name.
    pub address_line1: Option<String>,
    /// Address line 2.
    pub address_line2: Option<String>,
    /// Billing address country.
    pub address_country: Option<String>,
    /// City, district, suburb, town or village.
    pub address_city: Option<String>,
    /// Zip or postal code.
    pub address_zip: Option<u32>,
}
