//! Cart route handlers.
//!
//! The cart lives in the visitor's session (in-memory store) and is never
//! written to disk. Every mutation redirects back to `/cart`.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;
use watchpost_core::{Cart, MAX_QUANTITY, Price};

use crate::error::{AppError, Result};
use crate::filters;
use crate::state::AppState;

/// Session key holding the serialized cart.
pub const CART_KEY: &str = "cart";

/// Parse a submitted quantity, clamped to 1..=99.
///
/// Blank, negative or unparseable values count as 1.
#[must_use]
pub fn parse_quantity(value: Option<&str>) -> u32 {
    value
        .and_then(|v| v.trim().parse::<i64>().ok())
        .map_or(1, |q| u32::try_from(q.clamp(1, i64::from(MAX_QUANTITY))).unwrap_or(1))
}

/// Load the cart from the session. A missing or unreadable cart is empty.
pub async fn load_cart(session: &Session) -> Cart {
    match session.get::<Cart>(CART_KEY).await {
        Ok(cart) => cart.unwrap_or_default(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read cart from session");
            Cart::new()
        }
    }
}

/// Store the cart in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be written.
pub async fn save_cart(session: &Session, cart: &Cart) -> Result<()> {
    session.insert(CART_KEY, cart).await?;
    Ok(())
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: String,
    #[serde(default)]
    pub quantity: Option<String>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: String,
    #[serde(default)]
    pub quantity: Option<String>,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: String,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: Cart,
    pub subtotal: Price,
    pub item_count: u32,
}

/// Display cart page.
#[instrument(skip(session))]
pub async fn show(session: Session) -> impl IntoResponse {
    let cart = load_cart(&session).await;
    CartShowTemplate {
        subtotal: cart.subtotal(),
        item_count: cart.item_count(),
        cart,
    }
}

/// Add a product to the cart.
///
/// Adding a product already in the cart increases its quantity.
///
/// # Errors
///
/// Returns 404 for unknown products and 400 for products out of stock.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Redirect> {
    let product = state
        .inventory()
        .product(&form.product_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Product {}", form.product_id)))?;

    if !product.in_stock {
        return Err(AppError::BadRequest(format!(
            "{} is out of stock",
            product.name
        )));
    }

    let mut cart = load_cart(&session).await;
    cart.add(&product, parse_quantity(form.quantity.as_deref()));
    save_cart(&session, &cart).await?;

    tracing::debug!(product_id = %product.id, items = cart.item_count(), "Added to cart");
    Ok(Redirect::to("/cart"))
}

/// Change the quantity of a cart line. Quantities below 1 become 1.
///
/// # Errors
///
/// Returns an error if the session cannot be written.
#[instrument(skip(session))]
pub async fn update(session: Session, Form(form): Form<UpdateCartForm>) -> Result<Redirect> {
    let mut cart = load_cart(&session).await;
    if cart.set_quantity(&form.product_id, parse_quantity(form.quantity.as_deref())) {
        save_cart(&session, &cart).await?;
    }
    Ok(Redirect::to("/cart"))
}

/// Remove a line from the cart.
///
/// # Errors
///
/// Returns an error if the session cannot be written.
#[instrument(skip(session))]
pub async fn remove(session: Session, Form(form): Form<RemoveFromCartForm>) -> Result<Redirect> {
    let mut cart = load_cart(&session).await;
    if cart.remove(&form.product_id).is_some() {
        save_cart(&session, &cart).await?;
    }
    Ok(Redirect::to("/cart"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quantity_clamps() {
        assert_eq!(parse_quantity(Some("3")), 3);
        assert_eq!(parse_quantity(Some(" 7 ")), 7);
        assert_eq!(parse_quantity(Some("0")), 1);
        assert_eq!(parse_quantity(Some("-1")), 1);
        assert_eq!(parse_quantity(Some("250")), MAX_QUANTITY);
        assert_eq!(parse_quantity(Some("99999999999999")), MAX_QUANTITY);
    }

    #[test]
    fn test_parse_quantity_blank_or_garbage_is_one() {
        assert_eq!(parse_quantity(None), 1);
        assert_eq!(parse_quantity(Some("")), 1);
        assert_eq!(parse_quantity(Some("lots")), 1);
    }
}
