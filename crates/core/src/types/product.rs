//! Product catalog types.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use super::price::Price;

/// Error returned when a category or subcategory slug is not recognised.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind}: {value}")]
pub struct ParseEnumError {
    /// Which enum was being parsed.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

/// Top-level product category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    #[default]
    Cameras,
    Recorders,
    Accessories,
    Kits,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Self; 4] = [Self::Cameras, Self::Recorders, Self::Accessories, Self::Kits];

    /// URL slug (also the value stored in the provider's custom field).
    #[must_use]
    pub const fn slug(&self) -> &'static str {
        match self {
            Self::Cameras => "cameras",
            Self::Recorders => "recorders",
            Self::Accessories => "accessories",
            Self::Kits => "kits",
        }
    }

    /// Human readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Cameras => "Cameras",
            Self::Recorders => "Recorders",
            Self::Accessories => "Accessories",
            Self::Kits => "Complete Kits",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Category {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.slug().eq_ignore_ascii_case(needle))
            .ok_or_else(|| ParseEnumError {
                kind: "category",
                value: s.to_string(),
            })
    }
}

/// Product subcategory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Subcategory {
    #[default]
    IpCameras,
    AnalogCameras,
    PtzCameras,
    Nvr,
    Dvr,
    Cables,
    PowerSupplies,
    Storage,
    Mounts,
    CompleteKits,
}

impl Subcategory {
    /// All subcategories in display order.
    pub const ALL: [Self; 10] = [
        Self::IpCameras,
        Self::AnalogCameras,
        Self::PtzCameras,
        Self::Nvr,
        Self::Dvr,
        Self::Cables,
        Self::PowerSupplies,
        Self::Storage,
        Self::Mounts,
        Self::CompleteKits,
    ];

    /// URL slug (also the value stored in the provider's custom field).
    #[must_use]
    pub const fn slug(&self) -> &'static str {
        match self {
            Self::IpCameras => "ip-cameras",
            Self::AnalogCameras => "analog-cameras",
            Self::PtzCameras => "ptz-cameras",
            Self::Nvr => "nvr",
            Self::Dvr => "dvr",
            Self::Cables => "cables",
            Self::PowerSupplies => "power-supplies",
            Self::Storage => "storage",
            Self::Mounts => "mounts",
            Self::CompleteKits => "complete-kits",
        }
    }

    /// Human readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::IpCameras => "IP Cameras",
            Self::AnalogCameras => "Analog Cameras",
            Self::PtzCameras => "PTZ Cameras",
            Self::Nvr => "Network Video Recorders",
            Self::Dvr => "Digital Video Recorders",
            Self::Cables => "Cables & Connectors",
            Self::PowerSupplies => "Power Supplies",
            Self::Storage => "Storage",
            Self::Mounts => "Mounts & Brackets",
            Self::CompleteKits => "Complete Kits",
        }
    }

    /// The category this subcategory is filed under.
    #[must_use]
    pub const fn category(&self) -> Category {
        match self {
            Self::IpCameras | Self::AnalogCameras | Self::PtzCameras => Category::Cameras,
            Self::Nvr | Self::Dvr => Category::Recorders,
            Self::Cables | Self::PowerSupplies | Self::Storage | Self::Mounts => {
                Category::Accessories
            }
            Self::CompleteKits => Category::Kits,
        }
    }
}

impl fmt::Display for Subcategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Subcategory {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.slug().eq_ignore_ascii_case(needle))
            .ok_or_else(|| ParseEnumError {
                kind: "subcategory",
                value: s.to_string(),
            })
    }
}

/// A product as displayed on the site.
///
/// Sourced either from the static catalog or mapped from the inventory
/// provider's item representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: Price,
    pub category: Category,
    pub subcategory: Subcategory,
    /// Image path or URL.
    pub image: String,
    #[serde(default)]
    pub features: Vec<String>,
    pub in_stock: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_logo: Option<String>,
}

impl Product {
    /// Case-insensitive match against name, description and brand.
    #[must_use]
    pub fn matches_query(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(&needle)
            || self.description.to_lowercase().contains(&needle)
            || self
                .brand
                .as_deref()
                .is_some_and(|b| b.to_lowercase().contains(&needle))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse_is_case_insensitive() {
        assert_eq!("Recorders".parse::<Category>().unwrap(), Category::Recorders);
        assert_eq!(" kits ".parse::<Category>().unwrap(), Category::Kits);
        let err = "drones".parse::<Category>().unwrap_err();
        assert_eq!(err.to_string(), "unknown category: drones");
    }

    #[test]
    fn test_subcategory_slug_roundtrip() {
        for sub in Subcategory::ALL {
            assert_eq!(sub.slug().parse::<Subcategory>().unwrap(), sub);
        }
    }

    #[test]
    fn test_subcategory_serde_uses_slugs() {
        let json = serde_json::to_string(&Subcategory::PowerSupplies).unwrap();
        assert_eq!(json, "\"power-supplies\"");
    }

    #[test]
    fn test_subcategory_category() {
        assert_eq!(Subcategory::PtzCameras.category(), Category::Cameras);
        assert_eq!(Subcategory::Nvr.category(), Category::Recorders);
        assert_eq!(Subcategory::Storage.category(), Category::Accessories);
    }

    #[test]
    fn test_matches_query() {
        let product = Product {
            id: "1".to_string(),
            name: "4MP Turret Camera".to_string(),
            description: "Night vision up to 30m".to_string(),
            price: Price::from_cents(12_900),
            category: Category::Cameras,
            subcategory: Subcategory::IpCameras,
            image: "/static/images/products/turret.jpg".to_string(),
            features: vec![],
            in_stock: true,
            brand: Some("Hikvision".to_string()),
            brand_logo: None,
        };

        assert!(product.matches_query("turret"));
        assert!(product.matches_query("NIGHT"));
        assert!(product.matches_query("hikvision"));
        assert!(product.matches_query("  "));
        assert!(!product.matches_query("doorbell"));
    }
}
