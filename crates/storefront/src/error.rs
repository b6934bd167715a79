//! Unified error handling with Sentry integration.
//!
//! Provides a top-level `StorefrontError` for callers that drive several
//! storefront pieces at once (the CLI, mostly). Each module keeps its own
//! narrower error type.

use thiserror::Error;

use crate::api::ApiError;
use crate::catalog::SortKeyError;
use crate::checkout::CheckoutError;
use crate::config::ConfigError;
use crate::storage::StorageError;

/// Storefront-level error type.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// Configuration failed to load.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Durable storage failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Backend request failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Checkout could not complete.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Unknown sort order requested.
    #[error(transparent)]
    Sort(#[from] SortKeyError),

    /// A local catalog file could not be parsed.
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Reading input or writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad input from the user.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl StorefrontError {
    /// Whether this is worth reporting to Sentry.
    ///
    /// User mistakes and missing products are not.
    #[must_use]
    pub const fn is_reportable(&self) -> bool {
        match self {
            Self::Storage(_) | Self::Config(_) | Self::Catalog(_) | Self::Io(_) => true,
            Self::Api(err) | Self::Checkout(CheckoutError::Submit(err)) => {
                !matches!(err, ApiError::NotFound(_) | ApiError::Unauthorized(_))
            }
            Self::Checkout(_) | Self::Sort(_) | Self::NotFound(_) | Self::BadRequest(_) => false,
        }
    }

    /// Capture to Sentry if reportable, then log.
    pub fn report(&self) {
        if self.is_reportable() {
            let event_id = sentry::capture_error(self);
            tracing::error!(error = %self, sentry_event_id = %event_id, "Command failed");
        } else {
            tracing::error!(error = %self, "Command failed");
        }
    }
}

/// Result type alias for `StorefrontError`.
pub type Result<T> = std::result::Result<T, StorefrontError>;

/// Add a breadcrumb for shopper actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added to cart", Some(&[("product_id", "123")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
