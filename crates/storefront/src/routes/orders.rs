//! Order tracking and the item image proxy.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderValue, header},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;
use watchpost_core::OrderReceipt;

use crate::error::Result;
use crate::filters;
use crate::state::AppState;
use crate::zoho::ZohoError;

/// Browser cache lifetime for proxied item images.
const IMAGE_MAX_AGE: &str = "public, max-age=3600";

/// Tracking page query.
#[derive(Debug, Deserialize)]
pub struct TrackQuery {
    pub order: Option<String>,
}

/// Order tracking page template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/track.html")]
pub struct TrackTemplate {
    pub order: String,
    pub receipt: Option<OrderReceipt>,
    pub error: Option<String>,
}

/// Display the tracking page, looking up `?order=` when given.
#[instrument(skip(state))]
pub async fn track(
    State(state): State<AppState>,
    Query(query): Query<TrackQuery>,
) -> impl IntoResponse {
    let order = query.order.unwrap_or_default().trim().to_string();
    if order.is_empty() {
        return TrackTemplate {
            order,
            receipt: None,
            error: None,
        };
    }

    match state.inventory().sales_order(&order).await {
        Ok(receipt) => TrackTemplate {
            order,
            receipt: Some(receipt),
            error: None,
        },
        Err(ZohoError::NotFound(_)) => TrackTemplate {
            error: Some(format!("No order found with reference {order}.")),
            order,
            receipt: None,
        },
        Err(e) => {
            tracing::warn!(error = %e, "Order lookup failed");
            TrackTemplate {
                order,
                receipt: None,
                error: Some("Order tracking is unavailable right now. Please try again later.".to_string()),
            }
        }
    }
}

/// Order status as JSON.
///
/// GET /api/orders/{id}
///
/// # Errors
///
/// Returns 404 for unknown orders, 503 when Zoho is not configured.
#[instrument(skip(state))]
pub async fn status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<OrderReceipt>> {
    Ok(Json(state.inventory().sales_order(&id).await?))
}

/// Serve a Zoho item image.
///
/// GET /api/images/{item_id}
///
/// # Errors
///
/// Returns 404 if the item has no image.
#[instrument(skip(state))]
pub async fn image(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
) -> Result<Response> {
    let image = state.inventory().item_image(&item_id).await?;

    let content_type = HeaderValue::from_str(&image.content_type)
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));

    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (header::CACHE_CONTROL, HeaderValue::from_static(IMAGE_MAX_AGE)),
        ],
        image.bytes,
    )
        .into_response())
}
