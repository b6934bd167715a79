//! Admin endpoints.
//!
//! Everything except `login` sends the session token as a bearer header.

use reqwest::RequestBuilder;
use secrecy::{ExposeSecret, SecretString};
use slayk_core::{Email, OrderId, ProductId};
use tracing::{debug, info, instrument};
use url::Url;

use super::{ApiClient, ApiError, read_json};
use crate::admin::{
    AdminSession, DashboardStats, InventoryReport, OrderQuery, OrderUpdate, StockUpdate,
    TokenResponse,
};
use crate::checkout::Order;

impl ApiClient {
    fn authorized(builder: RequestBuilder, token: &SecretString) -> RequestBuilder {
        builder.bearer_auth(token.expose_secret())
    }

    /// `GET /orders` URL with the optional filters attached.
    pub(super) fn orders_url(&self, query: &OrderQuery) -> Result<Url, ApiError> {
        let mut url = self.endpoint(&["orders"])?;
        {
            let mut pairs = url.query_pairs_mut();
            if let Some(status) = query.status {
                pairs.append_pair("status", &status.to_string());
            }
            if let Some(limit) = query.limit {
                pairs.append_pair("limit", &limit.to_string());
            }
        }
        if url.query() == Some("") {
            url.set_query(None);
        }
        Ok(url)
    }

    /// `PATCH /products/{id}/stock` URL; the backend takes the quantity as a
    /// query parameter.
    pub(super) fn stock_url(&self, product_id: &ProductId, quantity: u32) -> Result<Url, ApiError> {
        let mut url = self.endpoint(&["products", product_id.as_str(), "stock"])?;
        url.query_pairs_mut()
            .append_pair("stock_quantity", &quantity.to_string());
        Ok(url)
    }

    /// Exchange admin credentials for a bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] for wrong credentials, or an error
    /// if the request fails.
    #[instrument(skip_all, fields(email = %email))]
    pub async fn login(&self, email: &Email, password: &SecretString) -> Result<AdminSession, ApiError> {
        let url = self.endpoint(&["auth", "login"])?;
        let body = serde_json::json!({
            "email": email.as_str(),
            "password": password.expose_secret(),
        });

        let response = self.inner.client.post(url).json(&body).send().await?;
        let session = AdminSession::from(read_json::<TokenResponse>(response).await?);

        info!(role = %session.user.role, "Admin logged in");
        Ok(session)
    }

    /// Dashboard totals and the latest orders.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the token is rejected.
    #[instrument(skip_all)]
    pub async fn dashboard_stats(&self, token: &SecretString) -> Result<DashboardStats, ApiError> {
        let url = self.endpoint(&["dashboard", "stats"])?;
        debug!(%url, "GET");
        let response = Self::authorized(self.inner.client.get(url), token).send().await?;
        read_json(response).await
    }

    /// Every product bucketed by stock level.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the token is rejected.
    #[instrument(skip_all)]
    pub async fn inventory(&self, token: &SecretString) -> Result<InventoryReport, ApiError> {
        let url = self.endpoint(&["dashboard", "inventory"])?;
        debug!(%url, "GET");
        let response = Self::authorized(self.inner.client.get(url), token).send().await?;
        read_json(response).await
    }

    /// Orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the token is rejected.
    #[instrument(skip(self, token))]
    pub async fn orders(&self, token: &SecretString, query: &OrderQuery) -> Result<Vec<Order>, ApiError> {
        let url = self.orders_url(query)?;
        debug!(%url, "GET");
        let response = Self::authorized(self.inner.client.get(url), token).send().await?;
        read_json(response).await
    }

    /// Change an order's status and/or tracking number.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] for an unknown order, or an error if
    /// the request fails.
    #[instrument(skip(self, token))]
    pub async fn update_order(
        &self,
        token: &SecretString,
        order_id: &OrderId,
        update: &OrderUpdate,
    ) -> Result<Order, ApiError> {
        let url = self.endpoint(&["orders", order_id.as_str()])?;
        debug!(%url, "PUT");
        let response = Self::authorized(self.inner.client.put(url), token)
            .json(update)
            .send()
            .await?;
        let order: Order = read_json(response).await.map_err(|e| match e {
            ApiError::NotFound(_) => ApiError::NotFound(format!("Order not found: {order_id}")),
            other => other,
        })?;

        info!(order_number = %order.order_number, status = %order.status, "Order updated");
        Ok(order)
    }

    /// Set a product's stock. Cached catalog reads are dropped afterwards so
    /// the new stock shows up immediately.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] for an unknown product, or an error if
    /// the request fails.
    #[instrument(skip(self, token))]
    pub async fn update_stock(
        &self,
        token: &SecretString,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<StockUpdate, ApiError> {
        let url = self.stock_url(product_id, quantity)?;
        debug!(%url, "PATCH");
        let response = Self::authorized(self.inner.client.patch(url), token).send().await?;
        let update: StockUpdate = read_json(response).await.map_err(|e| match e {
            ApiError::NotFound(_) => ApiError::NotFound(format!("Product not found: {product_id}")),
            other => other,
        })?;

        self.invalidate_all().await;
        info!(stock = update.stock_quantity, in_stock = update.in_stock, "Stock updated");
        Ok(update)
    }
}
