//! Checkout input and order receipts.
//!
//! Orders themselves live in the inventory provider. This module only models
//! what the checkout form collects and what the provider hands back.

use serde::{Deserialize, Serialize};

use super::email::{Email, EmailError};
use super::price::Price;

/// Errors found while validating shipping details.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ShippingError {
    /// A required field is blank.
    #[error("{0} is required")]
    Missing(&'static str),
    /// The email address is malformed.
    #[error("invalid email address: {0}")]
    InvalidEmail(#[from] EmailError),
}

/// Shipping fields collected by the checkout form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    #[serde(default)]
    pub notes: Option<String>,
}

impl ShippingDetails {
    /// Trim every field and check that the required ones are present.
    ///
    /// Returns the normalized details together with the parsed email.
    ///
    /// # Errors
    ///
    /// Returns the first missing field, or an invalid email error.
    pub fn validate(&self) -> Result<(Self, Email), ShippingError> {
        let normalized = Self {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            phone: self.phone.trim().to_string(),
            address: self.address.trim().to_string(),
            city: self.city.trim().to_string(),
            state: self.state.trim().to_string(),
            postal_code: self.postal_code.trim().to_string(),
            notes: self
                .notes
                .as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(String::from),
        };

        let required = [
            ("First name", &normalized.first_name),
            ("Last name", &normalized.last_name),
            ("Email", &normalized.email),
            ("Phone", &normalized.phone),
            ("Address", &normalized.address),
            ("City", &normalized.city),
            ("State", &normalized.state),
            ("Postal code", &normalized.postal_code),
        ];
        if let Some((label, _)) = required.iter().find(|(_, value)| value.is_empty()) {
            return Err(ShippingError::Missing(*label));
        }

        let email = Email::parse(&normalized.email)?;
        Ok((normalized, email))
    }

    /// "First Last".
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// What the provider returns after an order is placed or looked up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderReceipt {
    pub order_id: String,
    pub order_number: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<Price>,
}
