//! Homepage hero carousel slides.
//!
//! Slides are stored as a JSON array and always rewritten as a whole. Each
//! slide links a product; optional custom text overrides the product's own
//! name and description when the slide is rendered.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::price::Price;
use super::product::Product;

/// Visual theme of a hero slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HeroTheme {
    #[default]
    Dark,
    Light,
    Blue,
    Red,
}

impl HeroTheme {
    /// All themes in the order the editor offers them.
    pub const ALL: [Self; 4] = [Self::Dark, Self::Light, Self::Blue, Self::Red];

    /// Stored value and CSS modifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
            Self::Blue => "blue",
            Self::Red => "red",
        }
    }

    /// Parse a stored theme value, falling back to the default theme.
    #[must_use]
    pub fn from_str_or_default(value: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(value.trim()))
            .unwrap_or_default()
    }
}

/// One entry in the homepage carousel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroSlide {
    pub id: String,
    pub product_id: String,
    #[serde(default)]
    pub theme: HeroTheme,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_description: Option<String>,
    #[serde(default)]
    pub brand_logo: String,
    #[serde(default)]
    pub image: String,
}

/// A slide merged with its product, ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSlide {
    pub id: String,
    pub product_id: String,
    pub theme: HeroTheme,
    pub title: String,
    pub description: String,
    pub image: String,
    pub brand_logo: Option<String>,
    pub price: Price,
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

impl HeroSlide {
    /// Create an empty slide for a product with a fresh identifier.
    #[must_use]
    pub fn new(product_id: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            product_id: product_id.into(),
            theme: HeroTheme::default(),
            custom_title: None,
            custom_description: None,
            brand_logo: String::new(),
            image: String::new(),
        }
    }

    /// Link the slide to `product` and fill any empty fields from it.
    ///
    /// Returns `true` if any field was filled.
    pub fn select_product(&mut self, product: &Product) -> bool {
        self.product_id.clone_from(&product.id);
        self.fill_from_product(product)
    }

    /// Fill empty title, description, image and brand logo from `product`.
    ///
    /// Fields that already hold text are left untouched, so a field is
    /// auto-filled at most once and never overwrites what the editor typed.
    pub fn fill_from_product(&mut self, product: &Product) -> bool {
        let mut changed = false;

        if is_blank(self.custom_title.as_deref()) {
            self.custom_title = Some(product.name.clone());
            changed = true;
        }
        if is_blank(self.custom_description.as_deref()) {
            self.custom_description = Some(product.description.clone());
            changed = true;
        }
        if self.image.trim().is_empty() {
            self.image.clone_from(&product.image);
            changed = true;
        }
        if self.brand_logo.trim().is_empty()
            && let Some(logo) = &product.brand_logo
        {
            self.brand_logo.clone_from(logo);
            changed = true;
        }

        changed
    }

    /// Merge the slide with its linked product for rendering.
    ///
    /// Custom text wins over the product's own fields. Returns `None` when
    /// `product` does not match the slide's linked product.
    #[must_use]
    pub fn resolve(&self, product: &Product) -> Option<ResolvedSlide> {
        if product.id != self.product_id {
            return None;
        }

        let pick = |custom: Option<&str>, fallback: &str| {
            custom
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(fallback)
                .to_string()
        };

        let image = if self.image.trim().is_empty() {
            product.image.clone()
        } else {
            self.image.clone()
        };
        let brand_logo = Some(self.brand_logo.clone())
            .filter(|v| !v.trim().is_empty())
            .or_else(|| product.brand_logo.clone());

        Some(ResolvedSlide {
            id: self.id.clone(),
            product_id: self.product_id.clone(),
            theme: self.theme,
            title: pick(self.custom_title.as_deref(), &product.name),
            description: pick(self.custom_description.as_deref(), &product.description),
            image,
            brand_logo,
            price: product.price,
        })
    }
}

/// Resolve every slide against `products`, skipping slides whose product is unknown.
#[must_use]
pub fn resolve_slides(slides: &[HeroSlide], products: &[Product]) -> Vec<ResolvedSlide> {
    slides
        .iter()
        .filter_map(|slide| {
            products
                .iter()
                .find(|p| p.id == slide.product_id)
                .and_then(|p| slide.resolve(p))
        })
        .collect()
}

/// Slides that link a product not present in `products`.
#[must_use]
pub fn missing_products<'a>(slides: &'a [HeroSlide], products: &[Product]) -> Vec<&'a HeroSlide> {
    slides
        .iter()
        .filter(|slide| !products.iter().any(|p| p.id == slide.product_id))
        .collect()
}
