//! Conversions between Zoho items and storefront products.

use watchpost_core::catalog::PLACEHOLDER_IMAGE;
use watchpost_core::{Category, OrderReceipt, Price, Product, Subcategory};

use super::types::{
    CustomField, FEATURE_SEPARATOR, Item, ItemInput, ItemRequest, SalesOrder, fields,
};

/// Map a Zoho item into the storefront product shape.
///
/// Unset category fields default to cameras / IP cameras, and items without
/// an uploaded image use the placeholder.
pub fn convert_item(item: Item) -> Product {
    let subcategory = item
        .custom_field(fields::SUBCATEGORY)
        .and_then(|v| v.parse::<Subcategory>().ok());
    let category = item
        .custom_field(fields::CATEGORY)
        .and_then(|v| v.parse::<Category>().ok())
        .or_else(|| subcategory.map(|s| s.category()))
        .unwrap_or_default();

    let features = item
        .custom_field(fields::FEATURES)
        .map(|v| {
            v.split(FEATURE_SEPARATOR)
                .map(str::trim)
                .filter(|f| !f.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default();

    let brand_logo = item.custom_field(fields::BRAND_LOGO).map(String::from);

    let image = if item.image_name.as_deref().is_some_and(|n| !n.trim().is_empty()) {
        format!("/api/images/{}", item.item_id)
    } else {
        PLACEHOLDER_IMAGE.to_string()
    };

    Product {
        price: item
            .rate
            .and_then(Price::from_f64)
            .unwrap_or(Price::ZERO),
        in_stock: item.stock_on_hand.is_some_and(|s| s > 0.0),
        brand: item.brand.filter(|b| !b.trim().is_empty()),
        category,
        subcategory: subcategory.unwrap_or_default(),
        features,
        brand_logo,
        image,
        id: item.item_id,
        name: item.name,
        description: item.description,
    }
}

/// Build the Zoho request body for creating or updating an item.
pub fn item_request(input: &ItemInput) -> ItemRequest {
    let mut custom_fields = vec![
        CustomField {
            api_name: fields::CATEGORY.to_string(),
            value: input.category.slug().to_string(),
        },
        CustomField {
            api_name: fields::SUBCATEGORY.to_string(),
            value: input.subcategory.slug().to_string(),
        },
        CustomField {
            api_name: fields::FEATURES.to_string(),
            value: input
                .features
                .iter()
                .map(|f| f.trim())
                .filter(|f| !f.is_empty())
                .collect::<Vec<_>>()
                .join(&FEATURE_SEPARATOR.to_string()),
        },
    ];
    if let Some(logo) = &input.brand_logo {
        custom_fields.push(CustomField {
            api_name: fields::BRAND_LOGO.to_string(),
            value: logo.clone(),
        });
    }

    ItemRequest {
        name: input.name.clone(),
        description: input.description.clone(),
        rate: input.price.as_f64(),
        unit: "pcs",
        product_type: "goods",
        brand: input.brand.clone(),
        custom_fields,
    }
}

impl From<&Product> for ItemInput {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
            category: product.category,
            subcategory: product.subcategory,
            features: product.features.clone(),
            brand: product.brand.clone(),
            brand_logo: product.brand_logo.clone(),
        }
    }
}

pub fn convert_sales_order(order: SalesOrder) -> OrderReceipt {
    OrderReceipt {
        order_id: order.salesorder_id,
        order_number: order.salesorder_number,
        status: order.status,
        total: order.total.and_then(Price::from_f64),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn item(json: &str) -> Item {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_convert_item_defaults() {
        let product = convert_item(item(r#"{"item_id":"42","name":"Mystery Box"}"#));

        assert_eq!(product.id, "42");
        assert_eq!(product.category, Category::Cameras);
        assert_eq!(product.subcategory, Subcategory::IpCameras);
        assert_eq!(product.image, PLACEHOLDER_IMAGE);
        assert_eq!(product.price, Price::ZERO);
        assert!(!product.in_stock);
        assert!(product.features.is_empty());
    }

    #[test]
    fn test_convert_item_custom_fields() {
        let product = convert_item(item(
            r#"{
                "item_id": "7",
                "name": "16 Channel NVR",
                "description": "Recorder",
                "rate": 549.0,
                "stock_on_hand": 3,
                "image_name": "nvr.jpg",
                "brand": "Hikvision",
                "custom_fields": [
                    {"api_name": "cf_subcategory", "value": "nvr"},
                    {"api_name": "cf_features", "value": "16 PoE ports | 4K | "},
                    {"api_name": "cf_brand_logo", "value": "/static/images/brands/hikvision.svg"}
                ]
            }"#,
        ));

        assert_eq!(product.subcategory, Subcategory::Nvr);
        assert_eq!(product.category, Category::Recorders);
        assert_eq!(product.image, "/api/images/7");
        assert_eq!(product.price, Price::from_cents(54_900));
        assert!(product.in_stock);
        assert_eq!(product.features, vec!["16 PoE ports", "4K"]);
        assert_eq!(
            product.brand_logo.as_deref(),
            Some("/static/images/brands/hikvision.svg")
        );
    }

    #[test]
    fn test_item_request_roundtrips_custom_fields() {
        let input = ItemInput {
            name: "Junction Box".to_string(),
            description: "Mount".to_string(),
            price: Price::from_cents(2_900),
            category: Category::Accessories,
            subcategory: Subcategory::Mounts,
            features: vec!["Aluminium".to_string(), " ".to_string(), "IP66".to_string()],
            brand: None,
            brand_logo: None,
        };

        let request = item_request(&input);
        let features = request
            .custom_fields
            .iter()
            .find(|f| f.api_name == fields::FEATURES)
            .unwrap();
        assert_eq!(features.value, "Aluminium|IP66");
        assert!((request.rate - 29.0).abs() < f64::EPSILON);
        assert_eq!(request.custom_fields.len(), 3);
    }
}
