//! Gallery and swatch image extraction.

use std::collections::HashSet;

use catlift_core::{GallerySelectors, Image};
use scraper::Html;

use crate::error::ScraperError;
use crate::selector::compile;

const SWATCH_SUFFIX: &str = "swatch";

/// Insertion-ordered image list with set semantics over `src`.
///
/// The first image seen for a given `src` wins; later duplicates are dropped.
#[derive(Debug, Default)]
pub struct ImageSet {
    seen: HashSet<String>,
    images: Vec<Image>,
}

impl ImageSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `image` unless its `src` is already present. Returns whether it
    /// was added.
    pub fn insert(&mut self, image: Image) -> bool {
        if self.seen.contains(&image.src) {
            return false;
        }
        self.seen.insert(image.src.clone());
        self.images.push(image);
        true
    }

    pub fn extend(&mut self, images: impl IntoIterator<Item = Image>) {
        for image in images {
            self.insert(image);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.images.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<Image> {
        self.images
    }
}

/// Gallery images of `document`, tagged with `associated_color`.
///
/// Matches are walked in document order. With `skip_first` the match at
/// index 0 is dropped whatever its `src`; images whose `src` contains the
/// exclusion substring, images without a `src`, and repeated `src` values
/// are dropped too.
///
/// # Errors
///
/// Returns [`ScraperError::SelectorSyntax`] if the gallery selector does not
/// parse.
pub fn extract_images(
    document: &Html,
    gallery: &GallerySelectors,
    associated_color: Option<&str>,
) -> Result<Vec<Image>, ScraperError> {
    let selector = compile(&gallery.selector)?;
    let exclude = gallery.exclude.as_deref().filter(|e| !e.is_empty());
    let mut set = ImageSet::new();

    for (index, img) in document.select(&selector).enumerate() {
        if gallery.skip_first && index == 0 {
            continue;
        }
        let Some(src) = img.value().attr("src").map(str::trim).filter(|s| !s.is_empty()) else {
            continue;
        };
        if exclude.is_some_and(|e| src.contains(e)) {
            tracing::debug!(src, "image excluded by filter");
            continue;
        }
        set.insert(Image {
            src: src.to_string(),
            alt: img.value().attr("alt").map(|a| a.trim().to_string()),
            associated_color: associated_color.map(ToString::to_string),
        });
    }

    Ok(set.into_vec())
}

/// Colour-swatch thumbnails. Each `alt` carries a trailing `" swatch"` so the
/// thumbnails can be told apart from gallery photography.
///
/// # Errors
///
/// Returns [`ScraperError::SelectorSyntax`] if `selector` does not parse.
pub fn extract_swatch_images(document: &Html, selector: &str) -> Result<Vec<Image>, ScraperError> {
    let selector = compile(selector)?;
    let mut set = ImageSet::new();

    for img in document.select(&selector) {
        let Some(src) = img.value().attr("src").map(str::trim).filter(|s| !s.is_empty()) else {
            continue;
        };
        let alt = match img.value().attr("alt").map(str::trim).filter(|a| !a.is_empty()) {
            Some(alt) => format!("{alt} {SWATCH_SUFFIX}"),
            None => SWATCH_SUFFIX.to_string(),
        };
        set.insert(Image {
            src: src.to_string(),
            alt: Some(alt),
            associated_color: None,
        });
    }

    Ok(set.into_vec())
}
