//! Admin product management.
//!
//! Each action builds a Zoho item request from the submitted form. Success
//! redirects to the list with a notice; a provider error re-renders the form
//! with the provider's message. The product cache is invalidated by the
//! inventory client on every successful mutation.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;
use watchpost_core::{Category, Price, Product, Subcategory};

use crate::error::Result;
use crate::filters;
use crate::state::AppState;
use crate::zoho::{CatalogSource, ItemInput};

/// Product list template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/products/index.html")]
pub struct ProductListTemplate {
    pub products: Vec<Product>,
    pub fallback: bool,
    pub notice: Option<&'static str>,
    pub error: Option<String>,
}

/// Product form field values.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductForm {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: String,
    #[serde(default)]
    pub category: String,
    pub subcategory: String,
    /// One feature per line.
    #[serde(default)]
    pub features: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub brand_logo: String,
}

/// Select option for the subcategory dropdown.
pub struct SubcategoryOption {
    pub value: &'static str,
    pub label: String,
    pub selected: bool,
}

/// New/edit product form template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/products/form.html")]
pub struct ProductFormTemplate {
    pub heading: String,
    pub action: String,
    pub form: ProductForm,
    pub subcategories: Vec<SubcategoryOption>,
    pub error: Option<String>,
}

/// List page query.
#[derive(Debug, Deserialize)]
pub struct NoticeQuery {
    pub notice: Option<String>,
}

fn notice_text(code: Option<&str>) -> Option<&'static str> {
    match code? {
        "created" => Some("Product created."),
        "updated" => Some("Product updated."),
        "deleted" => Some("Product deleted."),
        _ => None,
    }
}

fn optional(value: &str) -> Option<String> {
    Some(value.trim())
        .filter(|v| !v.is_empty())
        .map(String::from)
}

impl From<&Product> for ProductForm {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price.amount().to_string(),
            category: product.category.slug().to_string(),
            subcategory: product.subcategory.slug().to_string(),
            features: product.features.join("\n"),
            brand: product.brand.clone().unwrap_or_default(),
            brand_logo: product.brand_logo.clone().unwrap_or_default(),
        }
    }
}

impl ProductForm {
    /// Validate the form into an item request.
    ///
    /// The category follows the subcategory unless one is chosen explicitly.
    pub fn to_input(&self) -> std::result::Result<ItemInput, String> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err("Name is required.".to_string());
        }

        let price = self
            .price
            .trim()
            .trim_start_matches('$')
            .parse::<Decimal>()
            .ok()
            .filter(|p| !p.is_sign_negative())
            .ok_or_else(|| format!("Invalid price: {}", self.price.trim()))?;

        let subcategory: Subcategory = self
            .subcategory
            .parse()
            .map_err(|_| "Choose a subcategory.".to_string())?;
        let category = self
            .category
            .parse::<Category>()
            .unwrap_or_else(|_| subcategory.category());

        Ok(ItemInput {
            name: name.to_string(),
            description: self.description.trim().to_string(),
            price: Price::new(price),
            category,
            subcategory,
            features: self
                .features
                .lines()
                .map(str::trim)
                .filter(|f| !f.is_empty())
                .map(String::from)
                .collect(),
            brand: optional(&self.brand),
            brand_logo: optional(&self.brand_logo),
        })
    }
}

fn subcategory_options(selected: &str) -> Vec<SubcategoryOption> {
    Subcategory::ALL
        .iter()
        .map(|s| SubcategoryOption {
            value: s.slug(),
            label: format!("{} / {}", s.category().label(), s.label()),
            selected: s.slug() == selected,
        })
        .collect()
}

fn form_page(heading: &str, action: String, form: ProductForm, error: Option<String>) -> ProductFormTemplate {
    ProductFormTemplate {
        heading: heading.to_string(),
        action,
        subcategories: subcategory_options(&form.subcategory),
        form,
        error,
    }
}

fn rejected(template: ProductFormTemplate) -> Response {
    (StatusCode::UNPROCESSABLE_ENTITY, template).into_response()
}

async fn list_page(state: &AppState, notice: Option<&'static str>, error: Option<String>) -> ProductListTemplate {
    let catalog = state.inventory().catalog().await;
    let mut products = catalog.products.as_ref().clone();
    products.sort_by_key(|p| p.name.to_lowercase());

    ProductListTemplate {
        products,
        fallback: catalog.source == CatalogSource::Fallback,
        notice,
        error,
    }
}

/// Product list.
///
/// GET /admin/products
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>, Query(query): Query<NoticeQuery>) -> impl IntoResponse {
    list_page(&state, notice_text(query.notice.as_deref()), None).await
}

/// Empty product form.
///
/// GET /admin/products/new
pub async fn new_product() -> impl IntoResponse {
    let form = ProductForm {
        subcategory: Subcategory::default().slug().to_string(),
        ..ProductForm::default()
    };
    form_page("New product", "/admin/products".to_string(), form, None)
}

/// Create a product.
///
/// POST /admin/products
#[instrument(skip(state, form), fields(name = %form.name))]
pub async fn create(State(state): State<AppState>, Form(form): Form<ProductForm>) -> Response {
    let action = "/admin/products".to_string();
    let input = match form.to_input() {
        Ok(input) => input,
        Err(e) => return rejected(form_page("New product", action, form, Some(e))),
    };

    match state.inventory().create_item(&input).await {
        Ok(product) => {
            tracing::info!(product_id = %product.id, "Product created");
            Redirect::to("/admin/products?notice=created").into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Product creation rejected");
            rejected(form_page("New product", action, form, Some(e.to_string())))
        }
    }
}

/// Edit form for an existing product.
///
/// GET /admin/products/{id}/edit
///
/// # Errors
///
/// Returns 404 if Zoho has no such item.
#[instrument(skip(state))]
pub async fn edit(State(state): State<AppState>, Path(id): Path<String>) -> Result<impl IntoResponse> {
    let product = state.inventory().item(&id).await?;
    Ok(form_page(
        &format!("Edit {}", product.name),
        format!("/admin/products/{}", urlencoding::encode(&id)),
        ProductForm::from(&product),
        None,
    ))
}

/// Update a product.
///
/// POST /admin/products/{id}
#[instrument(skip(state, form))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<ProductForm>,
) -> Response {
    let heading = format!("Edit {}", form.name.trim());
    let action = format!("/admin/products/{}", urlencoding::encode(&id));
    let input = match form.to_input() {
        Ok(input) => input,
        Err(e) => return rejected(form_page(&heading, action, form, Some(e))),
    };

    match state.inventory().update_item(&id, &input).await {
        Ok(_) => {
            tracing::info!(product_id = %id, "Product updated");
            Redirect::to("/admin/products?notice=updated").into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Product update rejected");
            rejected(form_page(&heading, action, form, Some(e.to_string())))
        }
    }
}

/// Delete a product. The browser asks for confirmation first.
///
/// POST /admin/products/{id}/delete
#[instrument(skip(state))]
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.inventory().delete_item(&id).await {
        Ok(()) => {
            tracing::info!(product_id = %id, "Product deleted");
            Redirect::to("/admin/products?notice=deleted").into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Product deletion rejected");
            let page = list_page(&state, None, Some(format!("Could not delete product: {e}"))).await;
            (StatusCode::BAD_GATEWAY, page).into_response()
        }
    }
}

/// Build the product admin router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin/products", get(index).post(create))
        .route("/admin/products/new", get(new_product))
        .route("/admin/products/{id}", post(update))
        .route("/admin/products/{id}/edit", get(edit))
        .route("/admin/products/{id}/delete", post(delete))
}
