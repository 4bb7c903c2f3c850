//! Checkout and order tracking against a fake Zoho Inventory.

#![allow(clippy::unwrap_used)]

mod common;

use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};

use common::{app, body_json, body_text, config, cookie, get as get_page, post_form, spawn};

#[derive(Clone, Default)]
struct Recorded {
    contacts: Arc<Mutex<Vec<Value>>>,
    orders: Arc<Mutex<Vec<Value>>>,
}

fn items() -> Value {
    json!({
        "code": 0,
        "message": "success",
        "items": [
            {"item_id": "9001", "name": "Zoho Turret", "rate": 149.5, "stock_on_hand": 12},
            {"item_id": "9002", "name": "Zoho Retired Dome", "rate": 80, "stock_on_hand": 0}
        ]
    })
}

fn zoho(recorded: Recorded) -> Router {
    Router::new()
        .route(
            "/oauth/v2/token",
            post(|| async { Json(json!({"access_token": "tok", "expires_in": 3600})) }),
        )
        .route("/inventory/v1/items", get(|| async { Json(items()) }))
        .route(
            "/inventory/v1/contacts",
            get(|| async { Json(json!({"code": 0, "message": "success", "contacts": []})) }).post(
                |State(recorded): State<Recorded>, Json(body): Json<Value>| async move {
                    recorded.contacts.lock().unwrap().push(body);
                    Json(json!({"code": 0, "message": "created", "contact": {"contact_id": "c-77"}}))
                },
            ),
        )
        .route(
            "/inventory/v1/salesorders",
            post(
                |State(recorded): State<Recorded>, Json(body): Json<Value>| async move {
                    recorded.orders.lock().unwrap().push(body);
                    Json(json!({
                        "code": 0,
                        "message": "created",
                        "salesorder": {
                            "salesorder_id": "so-1",
                            "salesorder_number": "SO-00042",
                            "status": "draft",
                            "total": 299.0
                        }
                    }))
                },
            ),
        )
        .route(
            "/inventory/v1/salesorders/{id}",
            get(|Path(id): Path<String>| async move {
                if id == "SO-00042" {
                    (
                        StatusCode::OK,
                        Json(json!({
                            "code": 0,
                            "message": "success",
                            "salesorder": {
                                "salesorder_id": "so-1",
                                "salesorder_number": "SO-00042",
                                "status": "confirmed",
                                "total": 299.0
                            }
                        })),
                    )
                } else {
                    (
                        StatusCode::NOT_FOUND,
                        Json(json!({"code": 1002, "message": "Sales order does not exist"})),
                    )
                }
            }),
        )
        .with_state(recorded)
}

async fn checkout_app() -> (tempfile::TempDir, Recorded, Router) {
    let recorded = Recorded::default();
    let base = spawn(zoho(recorded.clone())).await;

    let dir = tempfile::tempdir().unwrap();
    let mut config = config(&dir.path().join("hero.json"));
    config.zoho = common::zoho(&base);
    (dir, recorded, app(config))
}

const SHIPPING: &str = "first_name=Dana&last_name=Reyes&email=Dana%40Example.com&phone=555-0100\
&address=12+Harbor+Rd&city=Portland&state=ME&postal_code=04101&notes=Gate+code+1234";

#[tokio::test]
async fn test_listing_comes_from_zoho() {
    let (_dir, _recorded, app) = checkout_app().await;

    let html = body_text(get_page(&app, "/products", None).await).await;
    assert!(html.contains("Zoho Turret"));
    assert!(!html.contains("4MP AcuSense Turret Camera"));

    assert_eq!(get_page(&app, "/health/ready", None).await.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_checkout_without_product_redirects_to_cart() {
    let (_dir, _recorded, app) = checkout_app().await;
    common::assert_redirect(&get_page(&app, "/checkout", None).await, "/cart");
}

#[tokio::test]
async fn test_checkout_defaults_quantity_from_cart() {
    let (_dir, _recorded, app) = checkout_app().await;

    let added = post_form(&app, "/cart/add", "product_id=9001&quantity=4", None).await;
    let session = cookie(added.headers(), "wp_session").unwrap();

    let html = body_text(get_page(&app, "/checkout?product=9001", Some(&session)).await).await;
    assert!(html.contains("name=\"quantity\" value=\"4\""));
    assert!(html.contains("$598.00"));
}

#[tokio::test]
async fn test_checkout_places_order_and_clears_line() {
    let (_dir, recorded, app) = checkout_app().await;

    let added = post_form(&app, "/cart/add", "product_id=9001&quantity=2", None).await;
    let session = cookie(added.headers(), "wp_session").unwrap();

    let response = post_form(
        &app,
        "/checkout",
        &format!("product_id=9001&quantity=2&{SHIPPING}"),
        Some(&session),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("SO-00042"));
    assert!(html.contains("dana@example.com"));

    let contacts = recorded.contacts.lock().unwrap().clone();
    assert_eq!(contacts.len(), 1);
    assert_eq!(contacts[0]["contact_name"], "Dana Reyes");
    assert_eq!(contacts[0]["contact_persons"][0]["email"], "dana@example.com");

    let orders = recorded.orders.lock().unwrap().clone();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["customer_id"], "c-77");
    assert_eq!(orders[0]["line_items"][0]["item_id"], "9001");
    assert_eq!(orders[0]["line_items"][0]["quantity"], 2);
    assert_eq!(orders[0]["line_items"][0]["rate"], 149.5);
    assert_eq!(orders[0]["notes"], "Gate code 1234");

    let cart = body_text(get_page(&app, "/cart", Some(&session)).await).await;
    assert!(cart.contains("Your cart is empty"));
}

#[tokio::test]
async fn test_checkout_rejects_invalid_details() {
    let (_dir, recorded, app) = checkout_app().await;

    let response = post_form(
        &app,
        "/checkout",
        "product_id=9001&quantity=1&first_name=Dana&last_name=&email=dana%40example.com&phone=1\
&address=1+Main&city=Portland&state=ME&postal_code=04101",
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let html = body_text(response).await;
    assert!(html.contains("Last name is required"));
    assert!(html.contains("value=\"Dana\""));
    assert!(recorded.orders.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_checkout_rejects_out_of_stock() {
    let (_dir, recorded, app) = checkout_app().await;

    let response = post_form(
        &app,
        "/checkout",
        &format!("product_id=9002&quantity=1&{SHIPPING}"),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_text(response).await.contains("out of stock"));
    assert!(recorded.orders.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_checkout_unknown_product() {
    let (_dir, _recorded, app) = checkout_app().await;

    let response = post_form(
        &app,
        "/checkout",
        &format!("product_id=wp-cam-4mp-turret&quantity=1&{SHIPPING}"),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_order_tracking() {
    let (_dir, _recorded, app) = checkout_app().await;

    let found = body_text(get_page(&app, "/track?order=SO-00042", None).await).await;
    assert!(found.contains("confirmed"));
    assert!(found.contains("$299.00"));

    let missing = body_text(get_page(&app, "/track?order=SO-99999", None).await).await;
    assert!(missing.contains("No order found with reference SO-99999."));

    let api = get_page(&app, "/api/orders/SO-00042", None).await;
    assert_eq!(api.status(), StatusCode::OK);
    let receipt = body_json(api).await;
    assert_eq!(receipt["order_number"], "SO-00042");
    assert_eq!(receipt["status"], "confirmed");

    let api_missing = get_page(&app, "/api/orders/SO-99999", None).await;
    assert_eq!(api_missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_order_api_without_zoho_is_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(config(&dir.path().join("hero.json")));

    let response = get_page(&app, "/api/orders/SO-00042", None).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
