//! Crawl stages: collections, product pages, extraction.
//!
//! Each stage works through its items one at a time. A failing item is
//! logged and counted, and the stage moves on to the next one.

use std::collections::HashSet;

use anyhow::Context;
use catlift_core::{handleize, AppConfig, ProductUpdate, SiteConfig};
use catlift_scraper::{
    extract_navigation_links, fetch_page, parse_collection_page, FetchPolicy, Html,
    InventorySource, PageFetcher, ProductTraversal,
};
use catlift_store::{CatalogStore, PageCache};

/// Per-stage counts, logged when the stage ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct StageSummary {
    pub succeeded: usize,
    pub failed: usize,
}

impl StageSummary {
    pub(crate) fn log(self, stage: &'static str) -> Self {
        if self.failed > 0 {
            tracing::warn!(stage, succeeded = self.succeeded, failed = self.failed, "stage finished with failures");
        } else {
            tracing::info!(stage, succeeded = self.succeeded, "stage finished");
        }
        self
    }
}

pub(crate) struct Pipeline<'a, F> {
    app: &'a AppConfig,
    site: &'a SiteConfig,
    fetcher: &'a F,
    policy: FetchPolicy,
}

impl<'a, F: PageFetcher> Pipeline<'a, F> {
    pub(crate) fn new(app: &'a AppConfig, site: &'a SiteConfig, fetcher: &'a F) -> Self {
        Self {
            app,
            site,
            fetcher,
            policy: FetchPolicy::new(app, site),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_policy(mut self, policy: FetchPolicy) -> Self {
        self.policy = policy;
        self
    }

    fn store(&self) -> CatalogStore {
        CatalogStore::open(self.app.catalog_path())
    }

    /// Collection pages to crawl: the configured list, or the entries of the
    /// navigation menu when one is configured.
    ///
    /// # Errors
    ///
    /// Fails if the navigation page cannot be fetched or its selector does not
    /// parse.
    pub(crate) async fn collection_urls(&self) -> anyhow::Result<Vec<String>> {
        let Some(nav) = &self.site.navigation else {
            return Ok(self.site.collection_urls.clone());
        };

        let html = fetch_page(self.fetcher, &nav.url, &self.policy).await;
        self.policy.pause().await;
        let html = html.with_context(|| format!("failed to fetch navigation page {}", nav.url))?;

        let links = extract_navigation_links(&Html::parse_document(&html), &nav.selector)?;
        let urls: Vec<String> = links
            .iter()
            .filter_map(|link| self.site.absolute_url(&link.href))
            .collect();
        tracing::info!(links = links.len(), collections = urls.len(), "navigation links extracted");
        Ok(urls)
    }

    /// Fetches every collection page, caches it, and reseeds the catalog from
    /// the product links found.
    ///
    /// The cache and the catalog are only replaced once at least one page has
    /// been parsed.
    ///
    /// # Errors
    ///
    /// Fails if the collection list cannot be built, no page could be
    /// collected, or the cache or catalog cannot be written.
    pub(crate) async fn collect(&self) -> anyhow::Result<StageSummary> {
        let urls = self.collection_urls().await?;

        let mut summary = StageSummary::default();
        let mut names = HashSet::new();
        let mut parsed = Vec::new();

        for (index, url) in urls.iter().enumerate() {
            let html = fetch_page(self.fetcher, url, &self.policy).await;
            self.policy.pause().await;
            let Some(html) = html else {
                summary.failed += 1;
                continue;
            };

            let page = match parse_collection_page(&html, self.site) {
                Ok(page) => page,
                Err(e) => {
                    tracing::warn!(url = %url, error = %e, "skipping collection page");
                    summary.failed += 1;
                    continue;
                }
            };

            let name = unique_name(&mut names, &page.category, index);
            tracing::info!(url = %url, category = %page.category, products = page.seeds.len(), "collection parsed");
            parsed.push((name, html, page));
            summary.succeeded += 1;
        }

        if summary.succeeded == 0 {
            summary.log("collect");
            anyhow::bail!(
                "none of {} collection pages could be collected; catalog left unchanged",
                urls.len()
            );
        }

        let cache = PageCache::new(self.app.collection_cache_dir());
        cache.clear()?;
        let mut seeds = Vec::new();
        for (name, html, mut page) in parsed {
            let path = cache.save(&name, &html)?;
            page.set_collection_file(&path.to_string_lossy());
            seeds.extend(page.seeds);
        }

        let seeded = self.store().seed(seeds)?;
        tracing::info!(stored = seeded.stored, duplicates = seeded.duplicates, "catalog seeded");
        Ok(summary.log("collect"))
    }

    /// Fetches the primary page of every catalog record and caches it as
    /// `<handle>.html`, recording the path on the record.
    ///
    /// # Errors
    ///
    /// Fails if the catalog cannot be read or the cache cannot be cleared.
    pub(crate) async fn fetch_products(&self) -> anyhow::Result<StageSummary> {
        let mut store = self.store();
        let records = store.load()?;
        let cache = PageCache::new(self.app.product_cache_dir());
        cache.clear()?;

        let mut summary = StageSummary::default();
        for record in records {
            let Some(url) = record.product_url.as_deref() else {
                tracing::debug!(handle = %record.handle, "record has no product url");
                continue;
            };

            let html = fetch_page(self.fetcher, url, &self.policy).await;
            self.policy.pause().await;
            let Some(html) = html else {
                summary.failed += 1;
                continue;
            };

            let saved = cache.save(&record.handle, &html).and_then(|path| {
                let update = ProductUpdate {
                    product_file: Some(path.to_string_lossy().into_owned()),
                    ..ProductUpdate::default()
                };
                store.upsert(&record.handle, update)
            });
            match saved {
                Ok(()) => summary.succeeded += 1,
                Err(e) => {
                    tracing::warn!(handle = %record.handle, error = %e, "failed to cache product page");
                    summary.failed += 1;
                }
            }
        }

        Ok(summary.log("fetch"))
    }

    /// Runs the traversal over every record with a cached product page and
    /// merges the results into the catalog.
    ///
    /// # Errors
    ///
    /// Fails only if the catalog cannot be read.
    pub(crate) async fn extract<I: InventorySource>(&self, inventory: I) -> anyhow::Result<StageSummary> {
        let mut store = self.store();
        let records = store.load()?;
        let mut traversal = ProductTraversal::new(self.site, self.fetcher, self.policy, inventory);

        let mut summary = StageSummary::default();
        for record in records {
            let Some(file) = record.product_file.as_deref() else {
                tracing::debug!(handle = %record.handle, "no cached product page");
                continue;
            };

            let html = match PageCache::load(std::path::Path::new(file)) {
                Ok(html) => html,
                Err(e) => {
                    tracing::warn!(handle = %record.handle, error = %e, "skipping product");
                    summary.failed += 1;
                    continue;
                }
            };

            match traversal.run(&record.handle, &html, &mut store).await {
                Ok(outcome) => {
                    for warning in &outcome.warnings {
                        tracing::warn!(handle = %record.handle, warning = %warning, "partial product");
                    }
                    summary.succeeded += 1;
                }
                Err(e) => {
                    tracing::warn!(handle = %record.handle, error = %e, "product extraction failed");
                    summary.failed += 1;
                }
            }
        }

        Ok(summary.log("extract"))
    }
}

/// Cache file name for a collection page: the category handle, made unique
/// within the run. Pages without a category fall back to their position.
fn unique_name(used: &mut HashSet<String>, category: &str, index: usize) -> String {
    let base = match handleize(category) {
        handle if handle.is_empty() => format!("collection-{}", index + 1),
        handle => handle,
    };

    let mut name = base.clone();
    let mut n = 2;
    while !used.insert(name.clone()) {
        name = format!("{base}-{n}");
        n += 1;
    }
    name
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
