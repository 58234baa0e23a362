//! Owned per-page extraction.
//!
//! A parsed `scraper::Html` cannot cross an `.await`, so each page is parsed,
//! read into one of these plain structs, and dropped before the next fetch.

use catlift_core::{Image, LinkMode, Metafield, SelectorRule, SiteConfig, ValueKind};
use scraper::Html;

use crate::error::ScraperError;
use crate::images::{extract_images, extract_swatch_images};
use crate::links::{extract_links, extract_tagged_links};
use crate::metafields::build_metafields;
use crate::selector::{evaluate, first_text};

/// A link to a secondary page, with the colour it was tagged with if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecondaryLink {
    pub href: String,
    pub color: Option<String>,
}

/// Fields that every page (primary or secondary) contributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageAttributes {
    pub sku: Option<String>,
    pub price: Option<String>,
    pub color: Option<String>,
    /// `None` when the site has no secondary option configured.
    pub sizes: Option<Vec<String>>,
    pub images: Vec<Image>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrimaryPage {
    pub title: Option<String>,
    pub description: Option<String>,
    pub attributes: PageAttributes,
    pub swatches: Vec<Image>,
    pub links: Vec<SecondaryLink>,
    pub metafields: Vec<Metafield>,
}

/// Reads everything the traversal needs from the primary product page.
///
/// # Errors
///
/// Returns [`ScraperError::SelectorSyntax`] for a malformed core selector and
/// [`ScraperError::ContainerNotFound`] when the secondary-link container is
/// missing in [`LinkMode::Container`].
pub fn extract_primary(html: &str, site: &SiteConfig) -> Result<PrimaryPage, ScraperError> {
    let document = Html::parse_document(html);
    let product = &site.product;

    let title = first_text(&document, &product.title)?;
    let description = first_text(&document, &product.description)?;
    let attributes = extract_attributes(&document, site, None)?;

    let swatches = match product.swatch_images.as_deref() {
        Some(selector) => extract_swatch_images(&document, selector)?,
        None => Vec::new(),
    };

    let options = &site.variant_options;
    let links = match options.link_mode {
        LinkMode::Container => extract_links(&document, &options.option1_links)?
            .into_iter()
            .map(|href| SecondaryLink { href, color: None })
            .collect(),
        LinkMode::Tagged => {
            extract_tagged_links(&document, &options.option1_links, &options.link_color_attribute)?
                .into_iter()
                .map(|link| SecondaryLink {
                    href: link.href,
                    color: Some(link.color),
                })
                .collect()
        }
    };

    let metafields = build_metafields(&document, &site.metafields);

    Ok(PrimaryPage {
        title,
        description,
        attributes,
        swatches,
        links,
        metafields,
    })
}

/// Reads the per-colour fields of a secondary page. `tagged_color` is used
/// when the page itself names no colour.
///
/// # Errors
///
/// Returns [`ScraperError::SelectorSyntax`] for a malformed selector.
pub fn extract_secondary(
    html: &str,
    site: &SiteConfig,
    tagged_color: Option<&str>,
) -> Result<PageAttributes, ScraperError> {
    let document = Html::parse_document(html);
    extract_attributes(&document, site, tagged_color)
}

fn extract_attributes(
    document: &Html,
    site: &SiteConfig,
    fallback_color: Option<&str>,
) -> Result<PageAttributes, ScraperError> {
    let product = &site.product;

    let sku = evaluate(
        document,
        &SelectorRule::sku(product.sku.clone(), product.sku_prefix.clone()),
    )?
    .into_scalar();
    let price = first_text(document, &product.price)?;
    let color = first_text(document, &site.variant_page.color)?
        .or_else(|| fallback_color.map(ToString::to_string));

    let options = &site.variant_options;
    let sizes = match options.option2_selector.as_deref() {
        Some(selector) => {
            let split_at = options.option2_filter.clone();
            let kind = if options.option2_skip_placeholder {
                ValueKind::OptionsSkipFirst { split_at }
            } else {
                ValueKind::Options { split_at }
            };
            let sizes = evaluate(document, &SelectorRule::new(selector, kind))?
                .into_list()
                .into_iter()
                .filter(|s| !s.is_empty())
                .collect();
            Some(sizes)
        }
        None => None,
    };

    let mut images = Vec::new();
    if let Some(selector) = site.variant_page.image.as_deref() {
        let main = evaluate(document, &SelectorRule::attribute(selector, "src"))?;
        if let Some(src) = main.into_scalar() {
            images.push(Image {
                src,
                alt: None,
                associated_color: color.clone(),
            });
        }
    }
    images.extend(extract_images(document, &product.gallery, color.as_deref())?);

    Ok(PageAttributes {
        sku,
        price,
        color,
        sizes,
        images,
    })
}
