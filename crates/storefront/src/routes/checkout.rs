//! Checkout route handlers.
//!
//! An order holds a single product line. The form collects shipping details,
//! then the handler finds or creates the Zoho customer and places a sales
//! order priced from the catalog.
//!
//! There is no idempotency key: resubmitting the form creates a second order.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;
use watchpost_core::{MAX_QUANTITY, OrderReceipt, Price, Product, ShippingDetails};

use crate::error::{AppError, Result};
use crate::filters;
use crate::routes::cart::{load_cart, save_cart};
use crate::state::AppState;
use crate::zoho::OrderLine;

/// Checkout page query.
#[derive(Debug, Deserialize)]
pub struct CheckoutQuery {
    pub product: Option<String>,
    pub quantity: Option<u32>,
}

/// Checkout form data.
#[derive(Debug, Default, Deserialize)]
pub struct CheckoutForm {
    pub product_id: String,
    pub quantity: u32,
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

impl CheckoutForm {
    fn shipping(&self) -> ShippingDetails {
        ShippingDetails {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            address: self.address.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            postal_code: self.postal_code.clone(),
            notes: self.notes.clone(),
        }
    }
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutTemplate {
    pub product: Product,
    pub quantity: u32,
    pub line_total: Price,
    pub shipping: ShippingDetails,
    pub error: Option<String>,
}

/// Order confirmation template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/confirmation.html")]
pub struct ConfirmationTemplate {
    pub receipt: OrderReceipt,
    pub product_name: String,
    pub quantity: u32,
    pub total: Price,
    pub email: String,
}

fn clamp_quantity(quantity: Option<u32>) -> u32 {
    quantity.unwrap_or(1).clamp(1, MAX_QUANTITY)
}

async fn find_product(state: &AppState, id: &str) -> Result<Product> {
    state
        .inventory()
        .product(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Product {id}")))
}

fn form_page(
    product: Product,
    quantity: u32,
    shipping: ShippingDetails,
    error: Option<String>,
) -> CheckoutTemplate {
    CheckoutTemplate {
        line_total: product.price.times(quantity),
        product,
        quantity,
        shipping,
        error,
    }
}

/// Display the checkout form.
///
/// Without a `product` query the visitor is sent back to the cart. When the
/// product is in the cart, its cart quantity is the default.
///
/// # Errors
///
/// Returns 404 if the product doesn't exist.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<CheckoutQuery>,
) -> Result<Response> {
    let Some(product_id) = query.product.filter(|p| !p.trim().is_empty()) else {
        return Ok(Redirect::to("/cart").into_response());
    };

    let product = find_product(&state, &product_id).await?;
    let cart_quantity = load_cart(&session)
        .await
        .get(&product.id)
        .map(|line| line.quantity);
    let quantity = clamp_quantity(query.quantity.or(cart_quantity));

    Ok(form_page(product, quantity, ShippingDetails::default(), None).into_response())
}

/// Place the order.
///
/// Validation and provider errors re-render the form with the message.
///
/// # Errors
///
/// Returns 404 if the product doesn't exist.
#[instrument(skip(state, session, form), fields(product_id = %form.product_id, quantity = form.quantity))]
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CheckoutForm>,
) -> Result<Response> {
    let product = find_product(&state, &form.product_id).await?;
    let quantity = clamp_quantity(Some(form.quantity));
    let submitted = form.shipping();

    let reject = |product: Product, message: String| {
        Ok((
            StatusCode::UNPROCESSABLE_ENTITY,
            form_page(product, quantity, submitted.clone(), Some(message)),
        )
            .into_response())
    };

    if !product.in_stock {
        let message = format!("{} is out of stock. Call us to arrange a backorder.", product.name);
        return reject(product, message);
    }

    let (shipping, email) = match submitted.validate() {
        Ok(valid) => valid,
        Err(e) => return reject(product, e.to_string()),
    };

    let line = OrderLine {
        item_id: product.id.clone(),
        name: product.name.clone(),
        rate: product.price,
        quantity,
    };

    let inventory = state.inventory();
    let placed = async {
        let customer_id = inventory.find_or_create_customer(&shipping, &email).await?;
        inventory
            .create_sales_order(&customer_id, &line, shipping.notes.as_deref())
            .await
    }
    .await;

    let receipt = match placed {
        Ok(receipt) => receipt,
        Err(e) => {
            tracing::error!(error = %e, "Checkout failed");
            return reject(product, format!("We couldn't place your order: {e}"));
        }
    };

    tracing::info!(
        order_id = %receipt.order_id,
        order_number = %receipt.order_number,
        "Sales order created"
    );

    let mut cart = load_cart(&session).await;
    if cart.remove(&product.id).is_some() {
        save_cart(&session, &cart).await?;
    }

    if let Some(mailer) = state.mailer()
        && let Err(e) = mailer
            .send_order_alert(&receipt, &line, &shipping, &email)
            .await
    {
        tracing::warn!(error = %e, order_number = %receipt.order_number, "Failed to send order alert");
    }

    Ok(ConfirmationTemplate {
        total: receipt.total.unwrap_or_else(|| line.rate.times(quantity)),
        receipt,
        product_name: product.name,
        quantity,
        email: email.to_string(),
    }
    .into_response())
}
