//! Page fetching.
//!
//! The traversal only needs "markup for this URL, or nothing". [`PageFetcher`]
//! is that seam; [`fetch_page`] layers the retry, settle and give-up policy
//! over any implementation and turns exhaustion into `None`.

use std::future::Future;
use std::time::Duration;

use catlift_core::{AppConfig, SiteConfig};
use reqwest::Client;

use crate::error::ScraperError;
use crate::retry::retry_with_fixed_backoff;

/// Loads the markup of one page.
///
/// Sites that render client-side need an implementation that executes
/// scripts; [`HttpPageFetcher`] returns the server response as-is.
pub trait PageFetcher {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, ScraperError>> + Send;
}

/// Timing and retry knobs shared by every page load of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchPolicy {
    /// Wait after a successful load before the markup is handed over.
    pub settle: Duration,
    /// Additional attempts after the first failure.
    pub max_retries: u32,
    /// Fixed pause between attempts.
    pub backoff: Duration,
    /// Pause after every page load, successful or not.
    pub inter_request_delay: Duration,
}

impl FetchPolicy {
    #[must_use]
    pub fn new(app: &AppConfig, site: &SiteConfig) -> Self {
        Self {
            settle: site.page_load_wait(),
            max_retries: app.fetch_max_retries,
            backoff: Duration::from_millis(app.fetch_retry_backoff_ms),
            inter_request_delay: Duration::from_millis(app.inter_request_delay_ms),
        }
    }

    /// No waiting at all; for tests and replaying cached pages.
    #[must_use]
    pub fn immediate(max_retries: u32) -> Self {
        Self {
            settle: Duration::ZERO,
            max_retries,
            backoff: Duration::ZERO,
            inter_request_delay: Duration::ZERO,
        }
    }

    /// Sleeps for the inter-request delay.
    pub async fn pause(&self) {
        if !self.inter_request_delay.is_zero() {
            tokio::time::sleep(self.inter_request_delay).await;
        }
    }
}

/// Fetches `url` under `policy`. Returns `None` once retries are exhausted or
/// the failure is not retriable; the failure is logged, never raised.
pub async fn fetch_page<F: PageFetcher>(fetcher: &F, url: &str, policy: &FetchPolicy) -> Option<String> {
    tracing::debug!(url, "fetching page");
    let result = retry_with_fixed_backoff(policy.max_retries, policy.backoff, || fetcher.fetch(url)).await;

    match result {
        Ok(body) => {
            if !policy.settle.is_zero() {
                tokio::time::sleep(policy.settle).await;
            }
            Some(body)
        }
        Err(e) => {
            tracing::warn!(url, error = %e, "giving up on page");
            None
        }
    }
}

/// Plain HTTP GET fetcher.
pub struct HttpPageFetcher {
    client: Client,
}

impl HttpPageFetcher {
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the client cannot be constructed.
    pub fn from_config(config: &AppConfig) -> Result<Self, ScraperError> {
        Self::new(config.fetch_timeout_secs, &config.fetch_user_agent)
    }
}

impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &str) -> Result<String, ScraperError> {
        let parsed = reqwest::Url::parse(url).map_err(|e| ScraperError::InvalidUrl {
            url: url.to_owned(),
            reason: e.to_string(),
        })?;

        let response = self
            .client
            .get(parsed)
            .header(
                reqwest::header::ACCEPT,
                "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8",
            )
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .header(reqwest::header::CACHE_CONTROL, "no-cache")
            .send()
            .await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ScraperError::NotFound {
                url: url.to_owned(),
            });
        }
        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        Ok(response.text().await?)
    }
}
