use std::path::PathBuf;

use crate::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Process-level settings read from the environment.
///
/// Per-site selectors live in [`crate::SiteConfig`]; this struct only carries
/// what changes between machines or runs (paths, transport tuning, destination
/// credentials).
#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub site_path: PathBuf,
    /// Root for the catalog file and the cached page markup.
    pub data_dir: PathBuf,
    pub fetch_timeout_secs: u64,
    pub fetch_user_agent: String,
    /// Additional attempts after the first failed page load.
    pub fetch_max_retries: u32,
    /// Fixed pause between attempts on the same URL.
    pub fetch_retry_backoff_ms: u64,
    /// Pause applied after every page load, successful or not.
    pub inter_request_delay_ms: u64,
    pub shopify_store_url: Option<String>,
    pub shopify_access_token: Option<String>,
    pub shopify_api_version: String,
    pub provision_delay_ms: u64,
}

impl AppConfig {
    #[must_use]
    pub fn catalog_path(&self) -> PathBuf {
        self.data_dir.join("catalog.json")
    }

    #[must_use]
    pub fn collection_cache_dir(&self) -> PathBuf {
        self.data_dir.join("collections")
    }

    #[must_use]
    pub fn product_cache_dir(&self) -> PathBuf {
        self.data_dir.join("products")
    }

    /// Store URL and access token, both required for provisioning.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] naming the first one unset.
    pub fn shopify_credentials(&self) -> Result<(&str, &str), ConfigError> {
        let store_url = self
            .shopify_store_url
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar("CATLIFT_SHOPIFY_STORE_URL".to_string()))?;
        let token = self
            .shopify_access_token
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar("CATLIFT_SHOPIFY_ACCESS_TOKEN".to_string()))?;
        Ok((store_url, token))
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("site_path", &self.site_path)
            .field("data_dir", &self.data_dir)
            .field("fetch_timeout_secs", &self.fetch_timeout_secs)
            .field("fetch_user_agent", &self.fetch_user_agent)
            .field("fetch_max_retries", &self.fetch_max_retries)
            .field("fetch_retry_backoff_ms", &self.fetch_retry_backoff_ms)
            .field("inter_request_delay_ms", &self.inter_request_delay_ms)
            .field("shopify_store_url", &self.shopify_store_url)
            .field(
                "shopify_access_token",
                &self.shopify_access_token.as_ref().map(|_| "[redacted]"),
            )
            .field("shopify_api_version", &self.shopify_api_version)
            .field("provision_delay_ms", &self.provision_delay_ms)
            .finish()
    }
}
