//! Product route handlers.
//!
//! The listing is filtered and sorted in memory; the catalog is small enough
//! that Zoho is only ever asked for the full item list.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::instrument;
use watchpost_core::{Category, Product, Subcategory};

use crate::error::{AppError, Result};
use crate::filters;
use crate::state::AppState;

/// Related products shown under a product.
const RELATED_COUNT: usize = 4;

/// Listing sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Name,
    PriceAsc,
    PriceDesc,
}

impl SortOrder {
    /// Parse the `sort` query value, defaulting to name order.
    #[must_use]
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some("price-asc") => Self::PriceAsc,
            Some("price-desc") => Self::PriceDesc,
            _ => Self::Name,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
        }
    }
}

/// Listing query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub q: Option<String>,
    /// Any non-empty value restricts the listing to in-stock items.
    pub in_stock: Option<String>,
    pub sort: Option<String>,
}

/// Parsed listing filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub category: Option<Category>,
    pub subcategory: Option<Subcategory>,
    pub query: String,
    pub in_stock_only: bool,
    pub sort: SortOrder,
}

/// Parse an optional slug, ignoring blank and unknown values.
fn parse_slug<T: std::str::FromStr>(value: Option<&str>) -> Option<T> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse().ok())
}

impl From<&ProductQuery> for ProductFilter {
    fn from(query: &ProductQuery) -> Self {
        Self {
            category: parse_slug(query.category.as_deref()),
            subcategory: parse_slug(query.subcategory.as_deref()),
            query: query.q.as_deref().unwrap_or_default().trim().to_string(),
            in_stock_only: query.in_stock.as_deref().is_some_and(|v| !v.is_empty()),
            sort: SortOrder::from_param(query.sort.as_deref()),
        }
    }
}

impl ProductFilter {
    fn matches(&self, product: &Product) -> bool {
        self.category.is_none_or(|c| product.category == c)
            && self.subcategory.is_none_or(|s| product.subcategory == s)
            && (!self.in_stock_only || product.in_stock)
            && product.matches_query(&self.query)
    }

    /// Filter and sort `products`.
    #[must_use]
    pub fn apply(&self, products: &[Product]) -> Vec<Product> {
        let mut matched: Vec<Product> = products
            .iter()
            .filter(|p| self.matches(p))
            .cloned()
            .collect();
        match self.sort {
            SortOrder::Name => matched.sort_by_key(|p| p.name.to_lowercase()),
            SortOrder::PriceAsc => matched.sort_by_key(|p| p.price),
            SortOrder::PriceDesc => matched.sort_by_key(|p| std::cmp::Reverse(p.price)),
        }
        matched
    }
}

/// Select option for a filter dropdown.
#[derive(Clone)]
pub struct FilterOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub products: Vec<Product>,
    pub total: usize,
    pub categories: Vec<FilterOption>,
    pub subcategories: Vec<FilterOption>,
    pub sorts: Vec<FilterOption>,
    pub query: String,
    pub in_stock_only: bool,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub product: Product,
    pub related_products: Vec<Product>,
}

type FilterOptions = (Vec<FilterOption>, Vec<FilterOption>, Vec<FilterOption>);

fn filter_options(filter: &ProductFilter) -> FilterOptions {
    let categories = Category::ALL
        .iter()
        .map(|c| FilterOption {
            value: c.slug(),
            label: c.label(),
            selected: filter.category == Some(*c),
        })
        .collect();

    // Only offer subcategories of the chosen category
    let subcategories = Subcategory::ALL
        .iter()
        .filter(|s| filter.category.is_none_or(|c| s.category() == c))
        .map(|s| FilterOption {
            value: s.slug(),
            label: s.label(),
            selected: filter.subcategory == Some(*s),
        })
        .collect();

    let sorts = [
        (SortOrder::Name, "Name"),
        (SortOrder::PriceAsc, "Price: low to high"),
        (SortOrder::PriceDesc, "Price: high to low"),
    ]
    .into_iter()
    .map(|(order, label)| FilterOption {
        value: order.as_str(),
        label,
        selected: filter.sort == order,
    })
    .collect();

    (categories, subcategories, sorts)
}

/// Display product listing page.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> impl IntoResponse {
    let filter = ProductFilter::from(&query);
    let all = state.inventory().products().await;
    let products = filter.apply(&all);
    let (categories, subcategories, sorts) = filter_options(&filter);

    ProductsIndexTemplate {
        total: products.len(),
        products,
        categories,
        subcategories,
        sorts,
        query: filter.query,
        in_stock_only: filter.in_stock_only,
    }
}

/// Products in the same subcategory, excluding `product`.
fn related(product: &Product, products: &[Product]) -> Vec<Product> {
    products
        .iter()
        .filter(|p| p.id != product.id && p.subcategory == product.subcategory)
        .take(RELATED_COUNT)
        .cloned()
        .collect()
}

/// Display product detail page.
///
/// # Errors
///
/// Returns 404 if no product has this identifier.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let products = state.inventory().products().await;
    let product = products
        .iter()
        .find(|p| p.id == id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("Product {id}")))?;

    Ok(ProductShowTemplate {
        related_products: related(&product, &products),
        product,
    })
}

#[cfg(test)]
mod tests {
    use watchpost_core::catalog;

    use super::*;

    fn query(pairs: &[(&str, &str)]) -> ProductFilter {
        let mut q = ProductQuery::default();
        for (key, value) in pairs {
            let value = Some((*value).to_string());
            match *key {
                "category" => q.category = value,
                "subcategory" => q.subcategory = value,
                "q" => q.q = value,
                "in_stock" => q.in_stock = value,
                "sort" => q.sort = value,
                _ => {}
            }
        }
        ProductFilter::from(&q)
    }

    #[test]
    fn test_default_filter_returns_everything_by_name() {
        let products = query(&[]).apply(catalog::products());
        assert_eq!(products.len(), catalog::products().len());
        assert!(
            products
                .windows(2)
                .all(|w| w[0].name.to_lowercase() <= w[1].name.to_lowercase())
        );
    }

    #[test]
    fn test_category_filter() {
        let products = query(&[("category", "recorders")]).apply(catalog::products());
        assert!(!products.is_empty());
        assert!(products.iter().all(|p| p.category == Category::Recorders));
    }

    #[test]
    fn test_unknown_category_is_ignored() {
        let filter = query(&[("category", "drones")]);
        assert_eq!(filter.category, None);
    }

    #[test]
    fn test_price_sorting() {
        let asc = query(&[("sort", "price-asc")]).apply(catalog::products());
        assert!(asc.windows(2).all(|w| w[0].price <= w[1].price));

        let desc = query(&[("sort", "price-desc")]).apply(catalog::products());
        assert!(desc.windows(2).all(|w| w[0].price >= w[1].price));
    }

    #[test]
    fn test_in_stock_and_query() {
        let products = query(&[("in_stock", "1"), ("q", "camera")]).apply(catalog::products());
        assert!(products.iter().all(|p| p.in_stock && p.matches_query("camera")));
    }

    #[test]
    fn test_subcategory_options_follow_category() {
        let (_, subcategories, _) = filter_options(&query(&[("category", "cameras")]));
        assert!(subcategories.iter().any(|o| o.value == "ip-cameras"));
        assert!(!subcategories.iter().any(|o| o.value == "nvr"));
    }

    #[test]
    fn test_related_excludes_self() {
        let products = catalog::products();
        let first = &products[0];
        let related = related(first, products);
        assert!(related.iter().all(|p| p.id != first.id && p.subcategory == first.subcategory));
    }
}
