//! Collection (listing) page parsing.

use catlift_core::{ProductDraft, SelectorRule, SiteConfig, ValueKind};
use scraper::Html;

use crate::error::ScraperError;
use crate::selector::{compile, element_text, evaluate, first_text};

/// Everything the collection stage reads from one listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionPage {
    /// Collection heading; empty when the page has none.
    pub category: String,
    pub tags: Vec<String>,
    /// One minimal record per product link, in document order.
    pub seeds: Vec<ProductDraft>,
}

/// Parses a collection page into seed records.
///
/// Each product link becomes a record keyed by the handle of its text, with
/// the link resolved against the site's base URL and the page's category and
/// breadcrumb tags attached. Links without an href or without usable text are
/// skipped.
///
/// # Errors
///
/// Returns [`ScraperError::SelectorSyntax`] if a collection selector does not
/// parse.
pub fn parse_collection_page(html: &str, site: &SiteConfig) -> Result<CollectionPage, ScraperError> {
    let document = Html::parse_document(html);
    let selectors = &site.collection;

    let category = first_text(&document, &selectors.category)?.unwrap_or_default();
    let tags = evaluate(
        &document,
        &SelectorRule::new(selectors.breadcrumbs.clone(), ValueKind::Breadcrumbs),
    )?
    .into_list();

    let link = compile(&selectors.product_link)?;
    let mut seeds = Vec::new();

    for anchor in document.select(&link) {
        let title = element_text(anchor);
        let Some(url) = anchor.value().attr("href").and_then(|h| site.absolute_url(h)) else {
            tracing::debug!(title = %title, "product link without usable href");
            continue;
        };
        match ProductDraft::seed(url, &title) {
            Ok(mut seed) => {
                seed.product_type = Some(category.clone());
                seed.tags.clone_from(&tags);
                seeds.push(seed);
            }
            Err(e) => tracing::warn!(error = %e, "skipping product link"),
        }
    }

    Ok(CollectionPage {
        category,
        tags,
        seeds,
    })
}

impl CollectionPage {
    /// Records the cached copy of this page on every seed.
    pub fn set_collection_file(&mut self, path: &str) {
        for seed in &mut self.seeds {
            seed.collection_file = Some(path.to_string());
        }
    }
}
