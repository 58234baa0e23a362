//! Per-site selector configuration, loaded from YAML.

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::selector::SelectorRule;
use crate::ConfigError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    pub name: String,
    /// Origin that relative links on the site are resolved against.
    pub base_url: String,
    /// Settle time after a page load before its markup is read.
    #[serde(default = "default_page_load_wait_ms")]
    pub page_load_wait_ms: u64,
    /// Collection pages to crawl, used when `navigation` is not set.
    #[serde(default)]
    pub collection_urls: Vec<String>,
    /// Derive the collection pages from a navigation menu instead.
    #[serde(default)]
    pub navigation: Option<NavigationSource>,
    pub collection: CollectionSelectors,
    pub product: ProductSelectors,
    pub variant_options: VariantOptionSelectors,
    pub variant_page: VariantPageSelectors,
    #[serde(default)]
    pub metafields: Vec<MetafieldRule>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationSource {
    pub url: String,
    /// Selects the `<a>` elements of the menu.
    pub selector: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionSelectors {
    /// Heading that names the collection; becomes the product type.
    pub category: String,
    /// Breadcrumb container; its items (minus "Home") become tags.
    pub breadcrumbs: String,
    /// Product links on the listing.
    pub product_link: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductSelectors {
    pub title: String,
    pub description: String,
    pub sku: String,
    /// Label stripped from the SKU text, e.g. `"Style #"`.
    #[serde(default)]
    pub sku_prefix: Option<String>,
    pub price: String,
    /// Literal vendor name; not read from the page.
    #[serde(default)]
    pub vendor: Option<String>,
    pub gallery: GallerySelectors,
    /// Colour-swatch thumbnails.
    #[serde(default)]
    pub swatch_images: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GallerySelectors {
    pub selector: String,
    /// Drop the first match (usually a placeholder or hero duplicate).
    #[serde(default)]
    pub skip_first: bool,
    /// Drop any image whose `src` contains this substring.
    #[serde(default)]
    pub exclude: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkMode {
    /// Every `<a>` inside the first element matching `option1_links`.
    #[default]
    Container,
    /// Every element matching `option1_links`, read as an `(href, colour)` pair.
    Tagged,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantOptionSelectors {
    pub option1_name: String,
    /// Where the links to secondary (per-colour) pages live.
    pub option1_links: String,
    #[serde(default)]
    pub link_mode: LinkMode,
    /// Attribute holding the colour in [`LinkMode::Tagged`].
    #[serde(default = "default_link_color_attribute")]
    pub link_color_attribute: String,
    #[serde(default)]
    pub option2_name: Option<String>,
    /// The size `<select>`.
    #[serde(default)]
    pub option2_selector: Option<String>,
    /// Size option texts are cut at the first occurrence of this marker.
    #[serde(default)]
    pub option2_filter: Option<String>,
    /// The first `<option>` is a "Select a size" placeholder.
    #[serde(default = "default_true")]
    pub option2_skip_placeholder: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantPageSelectors {
    /// Colour label of the page being viewed.
    pub color: String,
    /// Main image of the page being viewed.
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetafieldRule {
    pub key: String,
    #[serde(rename = "type", default = "default_metafield_type")]
    pub value_type: String,
    pub rule: SelectorRule,
}

fn default_page_load_wait_ms() -> u64 {
    2000
}

fn default_link_color_attribute() -> String {
    "alt".to_string()
}

fn default_metafield_type() -> String {
    "string".to_string()
}

fn default_true() -> bool {
    true
}

impl SiteConfig {
    #[must_use]
    pub fn page_load_wait(&self) -> Duration {
        Duration::from_millis(self.page_load_wait_ms)
    }

    /// Resolves `href` against [`Self::base_url`]. Absolute links pass through.
    ///
    /// Returns `None` for an empty href or one that cannot be joined.
    #[must_use]
    pub fn absolute_url(&self, href: &str) -> Option<String> {
        let href = href.trim();
        if href.is_empty() {
            return None;
        }
        let base = Url::parse(&self.base_url).ok()?;
        base.join(href).ok().map(String::from)
    }
}

/// Load and validate a site configuration from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_site(path: &Path) -> Result<SiteConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::SiteFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let site: SiteConfig = serde_yaml::from_str(&content)?;

    validate_site(&site)?;

    Ok(site)
}

fn validate_site(site: &SiteConfig) -> Result<(), ConfigError> {
    if site.name.trim().is_empty() {
        return Err(ConfigError::Validation(
            "site name must be non-empty".to_string(),
        ));
    }

    match Url::parse(&site.base_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => {
            return Err(ConfigError::Validation(format!(
                "base_url '{}' must use http or https, not '{}'",
                site.base_url,
                url.scheme()
            )));
        }
        Err(e) => {
            return Err(ConfigError::Validation(format!(
                "base_url '{}' is not a valid URL: {e}",
                site.base_url
            )));
        }
    }

    if site.collection_urls.is_empty() && site.navigation.is_none() {
        return Err(ConfigError::Validation(
            "either collection_urls or navigation must be set".to_string(),
        ));
    }

    let required = [
        ("collection.product_link", &site.collection.product_link),
        ("product.title", &site.product.title),
        ("product.gallery.selector", &site.product.gallery.selector),
        (
            "variant_options.option1_links",
            &site.variant_options.option1_links,
        ),
        ("variant_page.color", &site.variant_page.color),
    ];
    for (field, selector) in required {
        if selector.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "selector {field} must be non-empty"
            )));
        }
    }

    let mut seen_keys = HashSet::new();
    for field in &site.metafields {
        if field.key.trim().is_empty() {
            return Err(ConfigError::Validation(
                "metafield key must be non-empty".to_string(),
            ));
        }
        if !seen_keys.insert(field.key.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate metafield key: '{}'",
                field.key
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "site_test.rs"]
mod tests;
