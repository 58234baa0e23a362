//! Provisioning stage: push extracted catalog records to the storefront.

use std::time::Duration;

use catlift_core::AppConfig;
use catlift_shopify::AdminClient;
use catlift_store::CatalogStore;

use crate::pipeline::StageSummary;

/// Builds the Admin API client from configuration.
///
/// # Errors
///
/// Fails if the store URL or access token is unset, or the client cannot be
/// constructed.
pub(crate) fn build_admin_client(config: &AppConfig) -> anyhow::Result<AdminClient> {
    let (store_url, token) = config.shopify_credentials()?;
    Ok(AdminClient::new(
        store_url,
        token,
        &config.shopify_api_version,
        config.fetch_timeout_secs,
    )?)
}

/// Creates every catalog record that has been extracted (has a title), one
/// at a time with the configured pause between products.
///
/// # Errors
///
/// Fails only if the catalog cannot be read.
pub(crate) async fn provision_catalog(
    config: &AppConfig,
    client: &AdminClient,
) -> anyhow::Result<StageSummary> {
    let records = CatalogStore::open(config.catalog_path()).load()?;
    let delay = Duration::from_millis(config.provision_delay_ms);
    let mut summary = StageSummary::default();

    let extracted: Vec<_> = records.iter().filter(|r| r.is_enriched()).collect();
    let total = extracted.len();
    for (i, record) in extracted.into_iter().enumerate() {
        match client.provision(record).await {
            Ok(outcome) => {
                tracing::info!(
                    handle = %record.handle,
                    product_id = outcome.product_id,
                    images = outcome.images_attached,
                    failed_images = outcome.images_failed,
                    "product provisioned"
                );
                summary.succeeded += 1;
            }
            Err(e) => {
                tracing::warn!(handle = %record.handle, error = %e, "product provisioning failed");
                summary.failed += 1;
            }
        }

        if i + 1 < total && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    Ok(summary.log("provision"))
}

#[cfg(test)]
#[path = "provision_test.rs"]
mod tests;
