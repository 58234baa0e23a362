//! Selector evaluation over a parsed document.
//!
//! [`evaluate`] never fails because a page lacks an element: no match yields
//! [`Extracted::Absent`]. The only error is a selector that does not parse.

use catlift_core::{SelectorRule, SiteConfig, ValueKind};
use scraper::{ElementRef, Html, Selector};

use crate::error::ScraperError;

const ALL_TEXT_CHILDREN: &str = "div, p, li, span";

/// Result of evaluating one [`SelectorRule`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extracted {
    /// Nothing matched the selector; the field is unknown.
    Absent,
    Scalar(String),
    List(Vec<String>),
}

impl Extracted {
    /// Scalar text, with list values joined one per line. Empty text and
    /// empty lists count as absent.
    #[must_use]
    pub fn into_scalar(self) -> Option<String> {
        match self {
            Extracted::Absent => None,
            Extracted::Scalar(s) => Some(s).filter(|s| !s.is_empty()),
            Extracted::List(items) => Some(items.join("\n")).filter(|s| !s.is_empty()),
        }
    }

    /// List value; a scalar becomes a one-element list.
    #[must_use]
    pub fn into_list(self) -> Vec<String> {
        match self {
            Extracted::Absent => Vec::new(),
            Extracted::Scalar(s) => vec![s],
            Extracted::List(items) => items,
        }
    }

    /// Scalar text or the empty string when absent.
    #[must_use]
    pub fn into_text(self) -> String {
        self.into_scalar().unwrap_or_default()
    }
}

/// Parses a CSS selector.
///
/// # Errors
///
/// Returns [`ScraperError::SelectorSyntax`] if `selector` is not valid CSS.
pub fn compile(selector: &str) -> Result<Selector, ScraperError> {
    Selector::parse(selector).map_err(|e| ScraperError::SelectorSyntax {
        selector: selector.to_string(),
        reason: format!("{e:?}"),
    })
}

/// Evaluates `rule` against `document`.
///
/// # Errors
///
/// Returns [`ScraperError::SelectorSyntax`] if the rule's selector (or the
/// sub-selector of a list kind) does not parse.
pub fn evaluate(document: &Html, rule: &SelectorRule) -> Result<Extracted, ScraperError> {
    let selector = compile(&rule.selector)?;
    let Some(first) = document.select(&selector).next() else {
        tracing::debug!(selector = %rule.selector, "no element matched");
        return Ok(Extracted::Absent);
    };

    let value = match &rule.kind {
        ValueKind::Text => Extracted::Scalar(element_text(first)),
        ValueKind::Attribute(name) => match first.value().attr(name) {
            Some(value) => Extracted::Scalar(value.trim().to_string()),
            None => Extracted::Absent,
        },
        ValueKind::AttributeList { name, child } => {
            let child = compile(child)?;
            Extracted::List(
                descendants(first, &child)
                    .into_iter()
                    .filter_map(|el| el.value().attr(name))
                    .map(|v| v.trim().to_string())
                    .collect(),
            )
        }
        ValueKind::TextList { child } => {
            let child = compile(child)?;
            Extracted::List(
                descendants(first, &child)
                    .into_iter()
                    .map(element_text)
                    .collect(),
            )
        }
        ValueKind::Options { split_at } => {
            Extracted::List(option_texts(first, split_at.as_deref())?)
        }
        ValueKind::OptionsSkipFirst { split_at } => {
            let mut options = option_texts(first, split_at.as_deref())?;
            if !options.is_empty() {
                options.remove(0);
            }
            Extracted::List(options)
        }
        ValueKind::Sku { prefix } => {
            let text = element_text(first);
            let stripped = match prefix.as_deref().filter(|p| !p.is_empty()) {
                Some(p) => text.strip_prefix(p).map_or(text.as_str(), str::trim),
                None => text.as_str(),
            };
            Extracted::Scalar(stripped.to_string())
        }
        ValueKind::Breadcrumbs => Extracted::List(breadcrumb_texts(first)?),
        ValueKind::AllText => {
            let children = compile(ALL_TEXT_CHILDREN)?;
            let lines: Vec<String> = descendants(first, &children)
                .into_iter()
                .map(element_text)
                .filter(|t| !t.is_empty())
                .collect();
            Extracted::Scalar(lines.join("\n"))
        }
    };

    Ok(value)
}

/// Convenience for the common "trimmed text of the first match" case.
///
/// # Errors
///
/// Returns [`ScraperError::SelectorSyntax`] if `selector` does not parse.
pub fn first_text(document: &Html, selector: &str) -> Result<Option<String>, ScraperError> {
    evaluate(document, &SelectorRule::text(selector)).map(Extracted::into_scalar)
}

/// Compiles every selector a site configuration refers to, so a malformed one
/// is reported before any page is fetched.
///
/// # Errors
///
/// Returns the first [`ScraperError::SelectorSyntax`] encountered.
pub fn validate_site_selectors(site: &SiteConfig) -> Result<(), ScraperError> {
    let mut selectors: Vec<&str> = vec![
        site.collection.category.as_str(),
        site.collection.breadcrumbs.as_str(),
        site.collection.product_link.as_str(),
        site.product.title.as_str(),
        site.product.description.as_str(),
        site.product.sku.as_str(),
        site.product.price.as_str(),
        site.product.gallery.selector.as_str(),
        site.variant_options.option1_links.as_str(),
        site.variant_page.color.as_str(),
    ];
    selectors.extend(site.product.swatch_images.as_deref());
    selectors.extend(site.variant_options.option2_selector.as_deref());
    selectors.extend(site.variant_page.image.as_deref());
    selectors.extend(site.navigation.as_ref().map(|n| n.selector.as_str()));

    for field in &site.metafields {
        selectors.push(field.rule.selector.as_str());
        match &field.rule.kind {
            ValueKind::AttributeList { child, .. } | ValueKind::TextList { child } => {
                selectors.push(child.as_str());
            }
            _ => {}
        }
    }

    for selector in selectors {
        compile(selector)?;
    }
    Ok(())
}

/// Text content of an element, trimmed at both ends only.
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Elements under `container` matching `selector`, in document order,
/// excluding `container` itself.
pub(crate) fn descendants<'a>(container: ElementRef<'a>, selector: &Selector) -> Vec<ElementRef<'a>> {
    container
        .select(selector)
        .filter(|el| el.id() != container.id())
        .collect()
}

fn option_texts(container: ElementRef<'_>, split_at: Option<&str>) -> Result<Vec<String>, ScraperError> {
    let option = compile("option")?;
    Ok(descendants(container, &option)
        .into_iter()
        .map(|el| {
            let text = element_text(el);
            match split_at.filter(|s| !s.is_empty()) {
                Some(marker) => text
                    .split(marker)
                    .next()
                    .unwrap_or_default()
                    .trim()
                    .to_string(),
                None => text,
            }
        })
        .collect())
}

fn breadcrumb_texts(container: ElementRef<'_>) -> Result<Vec<String>, ScraperError> {
    let item = compile("li")?;
    let span = compile("span")?;
    Ok(descendants(container, &item)
        .into_iter()
        .map(|li| {
            li.select(&span)
                .next()
                .map_or_else(|| element_text(li), element_text)
        })
        .skip(1)
        .collect())
}

#[cfg(test)]
#[path = "selector_test.rs"]
mod tests;
