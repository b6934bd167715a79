//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional.
//!
//! - `SLAYK_API_URL` - REST backend base URL (default: `http://127.0.0.1:8000/api`)
//! - `SLAYK_API_TIMEOUT_SECS` - Per-request timeout (default: 10)
//! - `SLAYK_CATALOG_CACHE_TTL_SECS` - Read cache TTL (default: 300)
//! - `SLAYK_DATA_DIR` - Directory for persisted cart/wishlist (default: `.slayk`)
//! - `SLAYK_FREE_SHIPPING_THRESHOLD` - Subtotal for free shipping, rupees (default: 999)
//! - `SLAYK_SHIPPING_FEE` - Flat shipping fee below the threshold, rupees (default: 99)
//! - `SLAYK_ADMIN_TOKEN` - Admin bearer token; overrides the one saved by `admin login`
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use slayk_core::Price;
use thiserror::Error;
use url::Url;

use crate::checkout::ShippingPolicy;

const DEFAULT_API_URL: &str = "http://127.0.0.1:8000/api";
const DEFAULT_DATA_DIR: &str = ".slayk";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// REST backend configuration
    pub api: ApiConfig,
    /// Directory the file-backed storage writes into
    pub data_dir: PathBuf,
    /// Shipping charges applied at checkout
    pub shipping: ShippingPolicy,
    /// Admin bearer token from the environment
    pub admin_token: Option<SecretString>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// REST backend configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL, e.g. `https://slayk.in/api`
    pub base_url: Url,
    /// How long read responses stay cached
    pub cache_ttl: Duration,
    /// Per-request timeout
    pub timeout: Duration,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but does not parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(&lookup);

        let base_url = env.or_default("SLAYK_API_URL", DEFAULT_API_URL);
        let base_url = Url::parse(&base_url)
            .map_err(|e| ConfigError::InvalidEnvVar("SLAYK_API_URL".to_string(), e.to_string()))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidEnvVar(
                "SLAYK_API_URL".to_string(),
                format!("unsupported scheme '{}'", base_url.scheme()),
            ));
        }

        let api = ApiConfig {
            base_url,
            cache_ttl: Duration::from_secs(env.parse("SLAYK_CATALOG_CACHE_TTL_SECS", 300)?),
            timeout: Duration::from_secs(env.parse("SLAYK_API_TIMEOUT_SECS", 10)?),
        };

        let shipping = ShippingPolicy {
            free_threshold: Price::rupees(env.parse("SLAYK_FREE_SHIPPING_THRESHOLD", 999)?),
            flat_fee: Price::rupees(env.parse("SLAYK_SHIPPING_FEE", 99)?),
        };

        Ok(Self {
            api,
            data_dir: PathBuf::from(env.or_default("SLAYK_DATA_DIR", DEFAULT_DATA_DIR)),
            shipping,
            admin_token: env.optional("SLAYK_ADMIN_TOKEN").map(SecretString::from),
            sentry_dsn: env.optional("SENTRY_DSN"),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<'a, F>(&'a F);

impl<F: Fn(&str) -> Option<String>> Env<'_, F> {
    /// Get an optional variable, treating blank values as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Parse a variable, falling back to `default` when unset.
    fn parse<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.optional(key).map_or(Ok(default), |raw| {
            raw.trim()
                .parse()
                .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
        })
    }
}
