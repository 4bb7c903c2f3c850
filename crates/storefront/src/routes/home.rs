//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;
use watchpost_core::{Category, Product, ResolvedSlide, resolve_slides};

use crate::filters;
use crate::state::AppState;

/// Number of products shown in the featured grid.
const FEATURED_COUNT: usize = 4;

/// Category tile on the home page.
#[derive(Clone)]
pub struct CategoryTile {
    pub slug: &'static str,
    pub label: &'static str,
    pub count: usize,
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct HomeTemplate {
    pub slides: Vec<ResolvedSlide>,
    pub featured: Vec<Product>,
    pub categories: Vec<CategoryTile>,
}

/// In-stock products first, in catalog order.
fn featured(products: &[Product]) -> Vec<Product> {
    products
        .iter()
        .filter(|p| p.in_stock)
        .chain(products.iter().filter(|p| !p.in_stock))
        .take(FEATURED_COUNT)
        .cloned()
        .collect()
}

fn category_tiles(products: &[Product]) -> Vec<CategoryTile> {
    Category::ALL
        .iter()
        .map(|category| CategoryTile {
            slug: category.slug(),
            label: category.label(),
            count: products.iter().filter(|p| p.category == *category).count(),
        })
        .collect()
}

/// Display the home page.
///
/// A hero file that cannot be read renders an empty carousel.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> impl IntoResponse {
    let products = state.inventory().products().await;

    let slides = match state.hero().load().await {
        Ok(slides) => resolve_slides(&slides, &products),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load hero slides");
            Vec::new()
        }
    };

    HomeTemplate {
        slides,
        featured: featured(&products),
        categories: category_tiles(&products),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_featured_prefers_in_stock() {
        let products = watchpost_core::catalog::products();
        let picked = featured(products);
        assert_eq!(picked.len(), FEATURED_COUNT.min(products.len()));

        let in_stock = products.iter().filter(|p| p.in_stock).count();
        if in_stock >= FEATURED_COUNT {
            assert!(picked.iter().all(|p| p.in_stock));
        }
    }

    #[test]
    fn test_category_tiles_cover_catalog() {
        let products = watchpost_core::catalog::products();
        let tiles = category_tiles(products);
        assert_eq!(tiles.len(), Category::ALL.len());
        assert_eq!(tiles.iter().map(|t| t.count).sum::<usize>(), products.len());
    }
}
