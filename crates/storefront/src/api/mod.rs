//! REST client for the SLAYK backend.
//!
//! # Endpoints
//!
//! - `GET /products?category=&search=` - product listing
//! - `GET /products/slug/{slug}` - single product
//! - `GET /categories` - category tiles
//! - `POST /orders` - place an order
//!
//! Admin endpoints (bearer token, see [`admin`](crate::admin)):
//!
//! - `POST /auth/login` - exchange credentials for a token
//! - `GET /dashboard/stats`, `GET /dashboard/inventory`
//! - `GET /orders`, `PUT /orders/{id}`
//! - `PATCH /products/{id}/stock`
//!
//! Catalog reads are cached in memory via `moka` for the configured TTL.
//! Orders and admin responses are never cached.

mod admin;
mod cache;

use std::sync::Arc;

use moka::future::Cache;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use slayk_core::{Category, Product};
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use crate::checkout::{Order, OrderDraft, OrderGateway};
use crate::config::ApiConfig;

use cache::{CacheKey, CacheValue};

const USER_AGENT: &str = concat!("slayk-storefront/", env!("CARGO_PKG_VERSION"));

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Missing, expired or insufficient admin token.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Base URL cannot carry a path.
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),
}

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the SLAYK REST backend.
///
/// Cheap to clone; clones share the HTTP connection pool and the cache.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    cache: Cache<CacheKey, CacheValue>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns error if the base URL cannot carry a path or the HTTP client
    /// fails to build.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        if config.base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(config.base_url.to_string()));
        }

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()?;

        let cache = Cache::builder()
            .max_capacity(256)
            .time_to_live(config.cache_ttl)
            .build();

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.base_url.clone(),
                cache,
            }),
        })
    }

    /// Base URL every endpoint is resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Resolve `segments` below the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidUrl(self.inner.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// `GET /products` URL with only the non-blank filters attached.
    fn products_url(&self, category: Option<&str>, search: Option<&str>) -> Result<Url, ApiError> {
        let mut url = self.endpoint(&["products"])?;
        {
            let mut query = url.query_pairs_mut();
            if let Some(category) = category.filter(|c| !c.trim().is_empty()) {
                query.append_pair("category", category.trim());
            }
            if let Some(search) = search.filter(|s| !s.trim().is_empty()) {
                query.append_pair("search", search.trim());
            }
        }
        if url.query() == Some("") {
            url.set_query(None);
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        debug!(%url, "GET");
        let response = self.inner.client.get(url).send().await?;
        read_json(response).await
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// List products, optionally narrowed by category slug or search text.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body does not parse.
    #[instrument(skip(self))]
    pub async fn products(
        &self,
        category: Option<&str>,
        search: Option<&str>,
    ) -> Result<Vec<Product>, ApiError> {
        let cache_key = CacheKey::products(category, search);

        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for products");
            return Ok(products.as_ref().clone());
        }

        let url = self.products_url(category, search)?;
        let products: Vec<Product> = self.get_json(url).await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Products(Arc::new(products.clone())))
            .await;

        Ok(products)
    }

    /// Get a product by its slug.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if no product has the slug, or an
    /// error if the request fails.
    #[instrument(skip(self))]
    pub async fn product_by_slug(&self, slug: &str) -> Result<Product, ApiError> {
        let cache_key = CacheKey::Product(slug.to_owned());

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let url = self.endpoint(&["products", "slug", slug])?;
        let product: Product = self.get_json(url).await.map_err(|e| match e {
            ApiError::NotFound(_) => ApiError::NotFound(format!("Product not found: {slug}")),
            other => other,
        })?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// List the category tiles.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body does not parse.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        if let Some(CacheValue::Categories(categories)) =
            self.inner.cache.get(&CacheKey::Categories).await
        {
            debug!("Cache hit for categories");
            return Ok(categories.as_ref().clone());
        }

        let url = self.endpoint(&["categories"])?;
        let categories: Vec<Category> = self.get_json(url).await?;

        self.inner
            .cache
            .insert(
                CacheKey::Categories,
                CacheValue::Categories(Arc::new(categories.clone())),
            )
            .await;

        Ok(categories)
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Place an order.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects the
    /// payload.
    #[instrument(skip_all, fields(items = draft.items.len()))]
    pub async fn create_order(&self, draft: &OrderDraft) -> Result<Order, ApiError> {
        let url = self.endpoint(&["orders"])?;
        debug!(%url, "POST");
        let response = self.inner.client.post(url).json(draft).send().await?;
        read_json(response).await
    }

    // =========================================================================
    // Cache Management
    // =========================================================================

    /// Drop every cached response.
    pub async fn invalidate_all(&self) {
        self.inner.cache.invalidate_all();
        self.inner.cache.run_pending_tasks().await;
    }
}

impl OrderGateway for ApiClient {
    async fn submit_order(&self, draft: &OrderDraft) -> Result<Order, ApiError> {
        self.create_order(draft).await
    }
}

/// Check the status and decode the JSON body.
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();

    if status == StatusCode::NOT_FOUND {
        return Err(ApiError::NotFound(response.url().path().to_owned()));
    }

    if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
        let message = response.text().await.unwrap_or_default();
        return Err(ApiError::Unauthorized(message));
    }

    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(ApiError::Api {
            status: status.as_u16(),
            message,
        });
    }

    response
        .json()
        .await
        .map_err(|e| ApiError::Parse(e.to_string()))
}
