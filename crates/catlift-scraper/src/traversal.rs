//! Page Traversal Controller.
//!
//! Drives one product from its primary page through every secondary page to
//! a single [`ProductUpdate`] handed to a [`MergeTarget`]:
//!
//! ```text
//! Start -> PrimaryPageExtracted -> SecondaryPageExtracted* -> Merged -> Done
//! ```
//!
//! A secondary page that cannot be fetched or read is skipped with a warning
//! and the traversal carries on. A primary page that cannot be read aborts
//! this product only. Pages are fetched one at a time with the inter-request
//! pause after every load.

use std::collections::HashSet;

use catlift_core::{options_from_names, Image, MergeTarget, ProductUpdate, SiteConfig, Variant};

use crate::error::ScraperError;
use crate::fetch::{fetch_page, FetchPolicy, PageFetcher};
use crate::images::ImageSet;
use crate::page::{extract_primary, extract_secondary, PageAttributes, PrimaryPage};
use crate::variants::{build_single_variant, build_variants, InventorySource};

/// Primary option value used when a page names no colour.
pub const DEFAULT_OPTION1: &str = "Default";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalState {
    Start,
    PrimaryPageExtracted,
    SecondaryPageExtracted { visited: usize },
    Merged,
    Done,
}

/// What one product traversal produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraversalOutcome {
    pub handle: String,
    pub variants: usize,
    pub images: usize,
    /// Secondary links that contributed nothing, one message each.
    pub warnings: Vec<String>,
}

/// Walks product pages for one site.
///
/// Borrowed collaborators are shared across products; the controller itself
/// holds no per-product state between calls to [`ProductTraversal::run`].
pub struct ProductTraversal<'a, F, I> {
    site: &'a SiteConfig,
    fetcher: &'a F,
    policy: FetchPolicy,
    inventory: I,
}

impl<'a, F, I> ProductTraversal<'a, F, I>
where
    F: PageFetcher,
    I: InventorySource,
{
    pub fn new(site: &'a SiteConfig, fetcher: &'a F, policy: FetchPolicy, inventory: I) -> Self {
        Self {
            site,
            fetcher,
            policy,
            inventory,
        }
    }

    /// Traverses the product whose primary page markup is `primary_html` and
    /// merges the result into `target` under `handle`.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::SelectorSyntax`] / [`ScraperError::ContainerNotFound`]
    ///   if the primary page cannot be read.
    /// - [`ScraperError::Merge`] if `target` rejects the update.
    pub async fn run<T: MergeTarget>(
        &mut self,
        handle: &str,
        primary_html: &str,
        target: &mut T,
    ) -> Result<TraversalOutcome, ScraperError> {
        let mut state = TraversalState::Start;
        tracing::debug!(handle, ?state, "traversal started");

        let primary = extract_primary(primary_html, self.site)?;
        let mut assembly = ProductAssembly::new(handle, self.site, &primary);
        assembly.add_page(&primary.attributes, None, &mut self.inventory);
        state = TraversalState::PrimaryPageExtracted;
        tracing::debug!(
            handle,
            ?state,
            links = primary.links.len(),
            variants = assembly.variants.len(),
            "primary page extracted"
        );

        let mut visited = 0usize;
        for link in &primary.links {
            let Some(url) = self.site.absolute_url(&link.href) else {
                assembly.warn(format!("unresolvable secondary link {:?}", link.href));
                continue;
            };

            let html = fetch_page(self.fetcher, &url, &self.policy).await;
            self.policy.pause().await;

            let Some(html) = html else {
                tracing::warn!(handle, url = %url, "skipping secondary page after fetch failure");
                assembly.warn(format!("fetch failed for {url}"));
                continue;
            };

            match extract_secondary(&html, self.site, link.color.as_deref()) {
                Ok(page) => {
                    assembly.add_page(&page, Some(&primary.attributes), &mut self.inventory);
                    visited += 1;
                    state = TraversalState::SecondaryPageExtracted { visited };
                    tracing::debug!(handle, url = %url, ?state, "secondary page extracted");
                }
                Err(e) => {
                    tracing::warn!(handle, url = %url, error = %e, "skipping unreadable secondary page");
                    assembly.warn(format!("could not read {url}: {e}"));
                }
            }
        }

        let outcome = assembly.merge_into(target)?;
        state = TraversalState::Merged;
        tracing::info!(
            handle,
            ?state,
            variants = outcome.variants,
            images = outcome.images,
            skipped = outcome.warnings.len(),
            "product merged"
        );

        state = TraversalState::Done;
        tracing::debug!(handle, ?state, "traversal finished");
        Ok(outcome)
    }
}

/// The product being assembled. Owned by one traversal and consumed when it
/// is merged.
struct ProductAssembly {
    handle: String,
    update: ProductUpdate,
    variants: Vec<Variant>,
    variant_keys: HashSet<(String, Option<String>)>,
    images: ImageSet,
    swatches: Vec<Image>,
    warnings: Vec<String>,
}

impl ProductAssembly {
    fn new(handle: &str, site: &SiteConfig, primary: &PrimaryPage) -> Self {
        let options = &site.variant_options;
        let update = ProductUpdate {
            title: primary.title.clone(),
            description: primary.description.clone(),
            sku: primary.attributes.sku.clone(),
            price: primary.attributes.price.clone(),
            vendor: site.product.vendor.clone(),
            options: Some(options_from_names(
                Some(options.option1_name.as_str()),
                options.option2_name.as_deref(),
            )),
            metafields: Some(primary.metafields.clone()),
            ..ProductUpdate::default()
        };

        Self {
            handle: handle.to_string(),
            update,
            variants: Vec::new(),
            variant_keys: HashSet::new(),
            images: ImageSet::new(),
            swatches: primary.swatches.clone(),
            warnings: Vec::new(),
        }
    }

    /// Adds one page's variants and images. `primary` supplies the sizes,
    /// sku and price a secondary page does not state itself.
    fn add_page(
        &mut self,
        page: &PageAttributes,
        primary: Option<&PageAttributes>,
        inventory: &mut dyn InventorySource,
    ) {
        let color = page.color.as_deref().unwrap_or(DEFAULT_OPTION1);
        let sku = page
            .sku
            .as_deref()
            .or_else(|| primary.and_then(|p| p.sku.as_deref()));
        let price = page
            .price
            .as_deref()
            .or_else(|| primary.and_then(|p| p.price.as_deref()));

        let sizes = match (&page.sizes, primary.and_then(|p| p.sizes.as_ref())) {
            (Some(own), Some(fallback)) if own.is_empty() => Some(fallback),
            (own, _) => own.as_ref(),
        };

        let built = match sizes {
            Some(sizes) => build_variants(color, sizes, sku, price, inventory),
            None => vec![build_single_variant(color, sku, price, inventory)],
        };

        for variant in built {
            let key = (variant.option1.clone(), variant.option2.clone());
            if self.variant_keys.insert(key) {
                self.variants.push(variant);
            } else {
                tracing::debug!(
                    handle = %self.handle,
                    option1 = %variant.option1,
                    option2 = ?variant.option2,
                    "duplicate variant dropped"
                );
            }
        }

        self.images.extend(page.images.iter().cloned());
    }

    fn warn(&mut self, message: String) {
        self.warnings.push(message);
    }

    fn merge_into<T: MergeTarget>(self, target: &mut T) -> Result<TraversalOutcome, ScraperError> {
        let Self {
            handle,
            mut update,
            variants,
            mut images,
            swatches,
            warnings,
            ..
        } = self;

        images.extend(swatches);
        if images.is_empty() {
            tracing::debug!(handle = %handle, "no images found for product");
        }
        let outcome = TraversalOutcome {
            handle: handle.clone(),
            variants: variants.len(),
            images: images.len(),
            warnings,
        };
        update.variants = Some(variants);
        update.images = Some(images.into_vec());

        target
            .merge(&handle, update)
            .map_err(|e| ScraperError::Merge {
                handle,
                reason: e.to_string(),
            })?;

        Ok(outcome)
    }
}

#[cfg(test)]
#[path = "traversal_test.rs"]
mod tests;
