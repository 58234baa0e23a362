//! Secondary-page and navigation link extraction.

use scraper::Html;
use serde::{Deserialize, Serialize};

use crate::error::ScraperError;
use crate::selector::{compile, descendants, element_text};

/// A secondary-page link read together with the colour it leads to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedLink {
    pub href: String,
    pub color: String,
}

/// A named entry of a site navigation menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavLink {
    pub name: String,
    pub href: String,
}

/// Hrefs of every `<a>` inside the first element matching `container`, in
/// document order. Anchors without an href are skipped.
///
/// # Errors
///
/// Returns [`ScraperError::ContainerNotFound`] if nothing matches `container`
/// and [`ScraperError::SelectorSyntax`] if it does not parse.
pub fn extract_links(document: &Html, container: &str) -> Result<Vec<String>, ScraperError> {
    let container_selector = compile(container)?;
    let anchor = compile("a")?;

    let root = document
        .select(&container_selector)
        .next()
        .ok_or_else(|| ScraperError::ContainerNotFound {
            selector: container.to_string(),
        })?;

    Ok(descendants(root, &anchor)
        .into_iter()
        .filter_map(|a| a.value().attr("href"))
        .map(str::trim)
        .filter(|href| !href.is_empty())
        .map(ToString::to_string)
        .collect())
}

/// Every element matching `selector` read as an `(href, colour)` pair, the
/// colour taken from `color_attribute`. Elements missing either part are
/// dropped.
///
/// # Errors
///
/// Returns [`ScraperError::SelectorSyntax`] if `selector` does not parse.
pub fn extract_tagged_links(
    document: &Html,
    selector: &str,
    color_attribute: &str,
) -> Result<Vec<TaggedLink>, ScraperError> {
    let selector = compile(selector)?;

    Ok(document
        .select(&selector)
        .filter_map(|el| {
            let href = el.value().attr("href")?.trim();
            let color = el.value().attr(color_attribute)?.trim();
            if href.is_empty() || color.is_empty() {
                return None;
            }
            Some(TaggedLink {
                href: href.to_string(),
                color: color.to_string(),
            })
        })
        .collect())
}

/// `(name, href)` pairs for every element matching `selector`. The name is
/// the element's text; entries with an empty name or href are dropped.
///
/// # Errors
///
/// Returns [`ScraperError::SelectorSyntax`] if `selector` does not parse.
pub fn extract_navigation_links(
    document: &Html,
    selector: &str,
) -> Result<Vec<NavLink>, ScraperError> {
    let selector = compile(selector)?;

    Ok(document
        .select(&selector)
        .filter_map(|el| {
            let href = el.value().attr("href")?.trim();
            let name = element_text(el);
            if href.is_empty() || name.is_empty() {
                return None;
            }
            Some(NavLink {
                name,
                href: href.to_string(),
            })
        })
        .collect())
}
