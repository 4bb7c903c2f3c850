//! Zoho Inventory REST client.
//!
//! Every call carries `organization_id` and a cached OAuth access token.
//! Listings degrade to the static catalog on any failure.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use moka::future::Cache;
use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};
use watchpost_core::{Email, OrderReceipt, Product, ShippingDetails, catalog};

use super::ZohoError;
use super::auth::{AccessToken, exchange_refresh_token};
use super::cache::{CacheKey, CacheValue};
use super::conversions::{convert_item, convert_sales_order, item_request};
use super::types::{
    Address, ApiStatus, ContactPerson, ContactRequest, ContactResponse, ContactsResponse,
    ItemInput, ItemResponse, ItemsResponse, LineItemRequest, OrderLine, SalesOrderRequest,
    SalesOrderResponse,
};
use crate::config::{ZohoConfig, ZohoCredentials};

/// Listing and image cache lifetime.
const CACHE_TTL: Duration = Duration::from_secs(60);

/// Where a product listing came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogSource {
    /// Live data from Zoho.
    Provider,
    /// The static catalog (Zoho unconfigured or unreachable).
    Fallback,
}

/// A product listing together with its source.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub products: Arc<Vec<Product>>,
    pub source: CatalogSource,
}

/// Image bytes fetched from Zoho.
#[derive(Debug, Clone)]
pub struct ItemImage {
    pub content_type: String,
    pub bytes: Bytes,
}

/// Zoho Inventory API client.
///
/// Cheap to clone; all clones share the token slot and the cache.
#[derive(Clone)]
pub struct InventoryClient {
    inner: Arc<InventoryClientInner>,
}

struct InventoryClientInner {
    client: reqwest::Client,
    accounts_url: String,
    api_url: String,
    credentials: Option<ZohoCredentials>,
    /// In-memory token cache
    token: RwLock<Option<AccessToken>>,
    cache: Cache<CacheKey, CacheValue>,
    fallback: Arc<Vec<Product>>,
}

impl InventoryClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns `ZohoError::Http` if the HTTP client cannot be built.
    pub fn new(config: &ZohoConfig) -> Result<Self, ZohoError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        let cache = Cache::builder()
            .max_capacity(500)
            .time_to_live(CACHE_TTL)
            .build();

        Ok(Self {
            inner: Arc::new(InventoryClientInner {
                client,
                accounts_url: config.accounts_url.clone(),
                api_url: config.api_url.clone(),
                credentials: config.credentials.clone(),
                token: RwLock::new(None),
                cache,
                fallback: Arc::new(catalog::products().to_vec()),
            }),
        })
    }

    /// Whether Zoho credentials are configured.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.inner.credentials.is_some()
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Get a fresh access token, exchanging the refresh token when needed.
    ///
    /// Returns `None` when credentials are missing or the exchange fails.
    /// Failures are logged, not propagated.
    pub async fn access_token(&self) -> Option<SecretString> {
        if let Some(token) = self.inner.token.read().await.as_ref()
            && !token.is_expired()
        {
            return Some(token.value.clone());
        }

        // The lock is not held across the exchange; concurrent refreshes
        // may each exchange once and the last write wins.
        match self.refresh_token().await {
            Ok(token) => Some(token.value),
            Err(ZohoError::NotConfigured) => None,
            Err(e) => {
                warn!(error = %e, "Zoho token exchange failed");
                None
            }
        }
    }

    /// Exchange the refresh token now and cache the result.
    ///
    /// # Errors
    ///
    /// Returns `ZohoError::NotConfigured` without credentials, or the
    /// exchange error.
    #[instrument(skip(self))]
    pub async fn refresh_token(&self) -> Result<AccessToken, ZohoError> {
        let credentials = self
            .inner
            .credentials
            .as_ref()
            .ok_or(ZohoError::NotConfigured)?;

        let token =
            exchange_refresh_token(&self.inner.client, &self.inner.accounts_url, credentials)
                .await?;
        *self.inner.token.write().await = Some(token.clone());
        debug!(expires_at = token.expires_at, "Zoho access token refreshed");

        Ok(token)
    }

    /// Build an authorized request for `path` under the API base URL.
    async fn request(&self, method: Method, path: &str) -> Result<reqwest::RequestBuilder, ZohoError> {
        let credentials = self
            .inner
            .credentials
            .as_ref()
            .ok_or(ZohoError::NotConfigured)?;
        let token = self.access_token().await.ok_or(ZohoError::NoAccessToken)?;

        Ok(self
            .inner
            .client
            .request(method, format!("{}/{path}", self.inner.api_url))
            .query(&[("organization_id", credentials.organization_id.as_str())])
            .header(
                "Authorization",
                format!("Zoho-oauthtoken {}", token.expose_secret()),
            ))
    }

    /// Send a request and decode the Zoho envelope.
    async fn send<T: DeserializeOwned>(request: reqwest::RequestBuilder) -> Result<T, ZohoError> {
        let response = request.send().await?;
        let status = response.status();

        // Check for rate limiting
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(60);
            return Err(ZohoError::RateLimited(retry_after));
        }

        let text = response.text().await?;

        let api_status: ApiStatus = match serde_json::from_str(&text) {
            Ok(s) => s,
            Err(e) if status.is_success() => return Err(ZohoError::Parse(e)),
            Err(_) => {
                return Err(ZohoError::Api {
                    code: i64::from(status.as_u16()),
                    message: text.chars().take(200).collect(),
                });
            }
        };

        if api_status.code != 0 || !status.is_success() {
            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(ZohoError::NotFound(api_status.message));
            }
            return Err(ZohoError::Api {
                code: api_status.code,
                message: api_status.message,
            });
        }

        serde_json::from_str(&text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %text.chars().take(500).collect::<String>(),
                "Failed to parse Zoho response"
            );
            ZohoError::Parse(e)
        })
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Get the product listing with its source.
    ///
    /// Without credentials, or on any fetch or parse failure, returns the
    /// static catalog unmodified. Fallback results are never cached.
    #[instrument(skip(self))]
    pub async fn catalog(&self) -> Catalog {
        if !self.is_configured() {
            return self.fallback();
        }

        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&CacheKey::Products).await
        {
            debug!("Cache hit for products");
            return Catalog {
                products,
                source: CatalogSource::Provider,
            };
        }

        match self.fetch_items().await {
            Ok(products) => {
                let products = Arc::new(products);
                self.inner
                    .cache
                    .insert(CacheKey::Products, CacheValue::Products(Arc::clone(&products)))
                    .await;
                Catalog {
                    products,
                    source: CatalogSource::Provider,
                }
            }
            Err(e) => {
                warn!(error = %e, "Zoho listing failed, serving static catalog");
                self.fallback()
            }
        }
    }

    /// Get the product list (provider or static fallback).
    pub async fn products(&self) -> Arc<Vec<Product>> {
        self.catalog().await.products
    }

    /// Find a product by identifier in the current listing.
    pub async fn product(&self, id: &str) -> Option<Product> {
        self.products().await.iter().find(|p| p.id == id).cloned()
    }

    /// Drop the cached listing so the next request refetches it.
    pub async fn invalidate_products(&self) {
        self.inner.cache.invalidate(&CacheKey::Products).await;
    }

    fn fallback(&self) -> Catalog {
        Catalog {
            products: Arc::clone(&self.inner.fallback),
            source: CatalogSource::Fallback,
        }
    }

    async fn fetch_items(&self) -> Result<Vec<Product>, ZohoError> {
        let request = self
            .request(Method::GET, "items")
            .await?
            .query(&[("per_page", "200")]);
        let response: ItemsResponse = Self::send(request).await?;
        Ok(response.items.into_iter().map(convert_item).collect())
    }

    // =========================================================================
    // Item Mutations
    // =========================================================================

    /// Fetch a single item directly from Zoho.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the item does not exist.
    #[instrument(skip(self), fields(item_id = %id))]
    pub async fn item(&self, id: &str) -> Result<Product, ZohoError> {
        let request = self.request(Method::GET, &item_path(id)).await?;
        let response: ItemResponse = Self::send(request).await?;
        Ok(convert_item(response.item))
    }

    /// Create an item.
    ///
    /// # Errors
    ///
    /// Returns the provider error if Zoho rejects the item.
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_item(&self, input: &ItemInput) -> Result<Product, ZohoError> {
        let request = self
            .request(Method::POST, "items")
            .await?
            .json(&item_request(input));
        let response: ItemResponse = Self::send(request).await?;
        self.invalidate_products().await;
        Ok(convert_item(response.item))
    }

    /// Update an item.
    ///
    /// # Errors
    ///
    /// Returns the provider error if Zoho rejects the update.
    #[instrument(skip(self, input), fields(item_id = %id))]
    pub async fn update_item(&self, id: &str, input: &ItemInput) -> Result<Product, ZohoError> {
        let request = self
            .request(Method::PUT, &item_path(id))
            .await?
            .json(&item_request(input));
        let response: ItemResponse = Self::send(request).await?;
        self.invalidate_products().await;
        Ok(convert_item(response.item))
    }

    /// Delete an item.
    ///
    /// # Errors
    ///
    /// Returns the provider error if Zoho refuses the deletion.
    #[instrument(skip(self), fields(item_id = %id))]
    pub async fn delete_item(&self, id: &str) -> Result<(), ZohoError> {
        let request = self.request(Method::DELETE, &item_path(id)).await?;
        let _: ApiStatus = Self::send(request).await?;
        self.invalidate_products().await;
        self.inner
            .cache
            .invalidate(&CacheKey::Image(id.to_string()))
            .await;
        Ok(())
    }

    /// Fetch an item's image, cached alongside the listing.
    ///
    /// # Errors
    ///
    /// Returns `ZohoError::NotFound` if the item has no image.
    #[instrument(skip(self), fields(item_id = %id))]
    pub async fn item_image(&self, id: &str) -> Result<ItemImage, ZohoError> {
        let key = CacheKey::Image(id.to_string());
        if let Some(CacheValue::Image(image)) = self.inner.cache.get(&key).await {
            debug!("Cache hit for item image");
            return Ok(image);
        }

        let response = self
            .request(Method::GET, &format!("{}/image", item_path(id)))
            .await?
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ZohoError::NotFound(format!("Image for item {id}")));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();

        // Zoho reports "no image" as a JSON envelope with HTTP 200
        if content_type.starts_with("application/json") {
            return Err(ZohoError::NotFound(format!("Image for item {id}")));
        }

        let image = ItemImage {
            content_type,
            bytes: response.bytes().await?,
        };
        self.inner
            .cache
            .insert(key, CacheValue::Image(image.clone()))
            .await;

        Ok(image)
    }

    // =========================================================================
    // Customers & Sales Orders
    // =========================================================================

    /// Find a customer by email, creating one from the shipping details on a miss.
    ///
    /// Returns the Zoho contact identifier.
    ///
    /// # Errors
    ///
    /// Returns the provider error if lookup or creation fails.
    #[instrument(skip(self, shipping, email), fields(email_domain = %email.domain()))]
    pub async fn find_or_create_customer(
        &self,
        shipping: &ShippingDetails,
        email: &Email,
    ) -> Result<String, ZohoError> {
        let lookup = self
            .request(Method::GET, "contacts")
            .await?
            .query(&[("email", email.as_str())]);
        let existing: ContactsResponse = Self::send(lookup).await?;

        if let Some(contact) = existing.contacts.into_iter().find(|c| {
            c.email
                .as_deref()
                .is_some_and(|e| e.eq_ignore_ascii_case(email.as_str()))
        }) {
            debug!(contact_id = %contact.contact_id, "Found existing customer");
            return Ok(contact.contact_id);
        }

        let address = Address {
            attention: shipping.full_name(),
            address: shipping.address.clone(),
            city: shipping.city.clone(),
            state: shipping.state.clone(),
            zip: shipping.postal_code.clone(),
            phone: shipping.phone.clone(),
        };
        let body = ContactRequest {
            contact_name: shipping.full_name(),
            contact_type: "customer",
            contact_persons: vec![ContactPerson {
                first_name: shipping.first_name.clone(),
                last_name: shipping.last_name.clone(),
                email: email.as_str().to_string(),
                phone: shipping.phone.clone(),
                is_primary_contact: true,
            }],
            billing_address: address.clone(),
            shipping_address: address,
        };

        let create = self.request(Method::POST, "contacts").await?.json(&body);
        let created: ContactResponse = Self::send(create).await?;
        debug!(contact_id = %created.contact.contact_id, "Created customer");

        Ok(created.contact.contact_id)
    }

    /// Create a sales order with a single line item.
    ///
    /// # Errors
    ///
    /// Returns the provider error if Zoho rejects the order.
    #[instrument(skip(self, line, notes), fields(item_id = %line.item_id, quantity = line.quantity))]
    pub async fn create_sales_order(
        &self,
        customer_id: &str,
        line: &OrderLine,
        notes: Option<&str>,
    ) -> Result<OrderReceipt, ZohoError> {
        let body = SalesOrderRequest {
            customer_id: customer_id.to_string(),
            date: chrono::Utc::now().format("%Y-%m-%d").to_string(),
            line_items: vec![LineItemRequest {
                item_id: line.item_id.clone(),
                name: line.name.clone(),
                rate: line.rate.as_f64(),
                quantity: line.quantity.max(1),
            }],
            notes: notes.map(String::from),
        };

        let request = self.request(Method::POST, "salesorders").await?.json(&body);
        let response: SalesOrderResponse = Self::send(request).await?;

        Ok(convert_sales_order(response.salesorder))
    }

    /// Look up a sales order's status.
    ///
    /// # Errors
    ///
    /// Returns `ZohoError::NotFound` or the provider error.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn sales_order(&self, id: &str) -> Result<OrderReceipt, ZohoError> {
        let request = self
            .request(Method::GET, &format!("salesorders/{}", urlencoding::encode(id)))
            .await?;
        let response: SalesOrderResponse = Self::send(request).await?;
        Ok(convert_sales_order(response.salesorder))
    }
}

fn item_path(id: &str) -> String {
    format!("items/{}", urlencoding::encode(id))
}
