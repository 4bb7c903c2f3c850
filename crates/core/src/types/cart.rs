//! Shopping cart held per browser session.
//!
//! The cart never leaves the session store. Lines are keyed by product
//! identifier and every quantity is between 1 and [`MAX_QUANTITY`].

use serde::{Deserialize, Serialize};

use super::price::Price;
use super::product::Product;

/// Largest quantity accepted for a single line.
pub const MAX_QUANTITY: u32 = 99;

const fn clamp_quantity(quantity: u32) -> u32 {
    if quantity < 1 {
        1
    } else if quantity > MAX_QUANTITY {
        MAX_QUANTITY
    } else {
        quantity
    }
}

/// One product line in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    pub product_id: String,
    pub name: String,
    pub price: Price,
    pub image: String,
    pub quantity: u32,
}

impl CartLineItem {
    /// Build a line for `product` with the given quantity, clamped to 1..=99.
    #[must_use]
    pub fn new(product: &Product, quantity: u32) -> Self {
        Self {
            product_id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            image: product.image.clone(),
            quantity: clamp_quantity(quantity),
        }
    }

    /// Price of the whole line.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }
}

/// A shopping cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartLineItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Find the line for a product.
    #[must_use]
    pub fn get(&self, product_id: &str) -> Option<&CartLineItem> {
        self.items.iter().find(|item| item.product_id == product_id)
    }

    /// Add `quantity` units of `product`.
    ///
    /// If the product is already in the cart its quantity is incremented
    /// instead of adding a second line. The merged quantity is capped at
    /// [`MAX_QUANTITY`].
    pub fn add(&mut self, product: &Product, quantity: u32) {
        let quantity = clamp_quantity(quantity);
        if let Some(line) = self
            .items
            .iter_mut()
            .find(|item| item.product_id == product.id)
        {
            line.quantity = clamp_quantity(line.quantity.saturating_add(quantity));
        } else {
            self.items.push(CartLineItem::new(product, quantity));
        }
    }

    /// Set the quantity of a line, clamped to 1..=99.
    ///
    /// Returns `false` if the product is not in the cart.
    pub fn set_quantity(&mut self, product_id: &str, quantity: u32) -> bool {
        match self
            .items
            .iter_mut()
            .find(|item| item.product_id == product_id)
        {
            Some(line) => {
                line.quantity = clamp_quantity(quantity);
                true
            }
            None => false,
        }
    }

    /// Remove a line. Returns the removed line, if any.
    pub fn remove(&mut self, product_id: &str) -> Option<CartLineItem> {
        let index = self
            .items
            .iter()
            .position(|item| item.product_id == product_id)?;
        Some(self.items.remove(index))
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |acc, item| acc.saturating_add(item.quantity))
    }

    /// Sum of all line totals.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.items.iter().map(CartLineItem::line_total).sum()
    }
}
