//! Zoho Inventory wire types and request inputs.

use serde::{Deserialize, Deserializer, Serialize};
use watchpost_core::{Category, Price, Subcategory};

/// Custom field API names used by the storefront.
pub mod fields {
    pub const CATEGORY: &str = "cf_category";
    pub const SUBCATEGORY: &str = "cf_subcategory";
    pub const FEATURES: &str = "cf_features";
    pub const BRAND_LOGO: &str = "cf_brand_logo";
}

/// Separator between features in the `cf_features` custom field.
pub const FEATURE_SEPARATOR: char = '|';

// =============================================================================
// Responses
// =============================================================================

/// Status fields present in every Zoho response.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiStatus {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ItemsResponse {
    pub items: Vec<Item>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ItemResponse {
    pub item: Item,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ContactsResponse {
    #[serde(default)]
    pub contacts: Vec<Contact>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ContactResponse {
    pub contact: Contact,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SalesOrderResponse {
    pub salesorder: SalesOrder,
}

/// An inventory item as returned by Zoho.
#[derive(Debug, Clone, Deserialize)]
pub struct Item {
    pub item_id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub rate: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub stock_on_hand: Option<f64>,
    #[serde(default)]
    pub image_name: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub custom_fields: Vec<CustomField>,
}

/// A custom field value attached to an item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomField {
    pub api_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub value: String,
}

impl Item {
    /// Value of a custom field, if set and not blank.
    #[must_use]
    pub fn custom_field(&self, api_name: &str) -> Option<&str> {
        self.custom_fields
            .iter()
            .find(|f| f.api_name == api_name)
            .map(|f| f.value.trim())
            .filter(|v| !v.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Contact {
    pub contact_id: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SalesOrder {
    pub salesorder_id: String,
    #[serde(default)]
    pub salesorder_number: String,
    #[serde(default)]
    pub status: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total: Option<f64>,
}

/// Zoho sends numbers as strings (and empty strings) in some list responses.
fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => s,
        Some(serde_json::Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    })
}

// =============================================================================
// Requests
// =============================================================================

/// Item fields submitted by the admin form or the seeding routine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemInput {
    pub name: String,
    pub description: String,
    pub price: Price,
    pub category: Category,
    pub subcategory: Subcategory,
    pub features: Vec<String>,
    pub brand: Option<String>,
    pub brand_logo: Option<String>,
}

/// Body of `POST /items` and `PUT /items/{id}`.
#[derive(Debug, Serialize)]
pub(crate) struct ItemRequest {
    pub name: String,
    pub description: String,
    pub rate: f64,
    pub unit: &'static str,
    pub product_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    pub custom_fields: Vec<CustomField>,
}

/// One product line of a checkout order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLine {
    pub item_id: String,
    pub name: String,
    pub rate: Price,
    pub quantity: u32,
}

#[derive(Debug, Serialize)]
pub(crate) struct ContactRequest {
    pub contact_name: String,
    pub contact_type: &'static str,
    pub contact_persons: Vec<ContactPerson>,
    pub billing_address: Address,
    pub shipping_address: Address,
}

#[derive(Debug, Serialize)]
pub(crate) struct ContactPerson {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub is_primary_contact: bool,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct Address {
    pub attention: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub phone: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct SalesOrderRequest {
    pub customer_id: String,
    pub date: String,
    pub line_items: Vec<LineItemRequest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct LineItemRequest {
    pub item_id: String,
    pub name: String,
    pub rate: f64,
    pub quantity: u32,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_item_accepts_string_numbers() {
        let json = r#"{
            "item_id": "4815000000044208",
            "name": "Dome Camera",
            "rate": "89.50",
            "stock_on_hand": "",
            "custom_fields": [{"api_name": "cf_category", "value": "cameras"}]
        }"#;
        let item: Item = serde_json::from_str(json).unwrap();
        assert_eq!(item.rate, Some(89.5));
        assert_eq!(item.stock_on_hand, None);
        assert_eq!(item.custom_field(fields::CATEGORY), Some("cameras"));
        assert_eq!(item.custom_field(fields::SUBCATEGORY), None);
    }

    #[test]
    fn test_items_response_requires_items() {
        assert!(serde_json::from_str::<ItemsResponse>(r#"{"code":0}"#).is_err());
        let empty: ItemsResponse = serde_json::from_str(r#"{"code":0,"items":[]}"#).unwrap();
        assert!(empty.items.is_empty());
    }
}
