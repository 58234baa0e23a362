//! Admin API request and response shapes.

use catlift_core::{Image, Metafield, OptionName, ProductDraft, Variant};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub(crate) struct ProductEnvelope<'a> {
    pub product: ProductPayload<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ProductPayload<'a> {
    pub title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_html: Option<&'a str>,
    pub handle: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_type: Option<&'a str>,
    /// Comma-separated, as the REST API expects.
    pub tags: String,
    pub variants: &'a [Variant],
    pub options: &'a [OptionName],
    pub metafields: &'a [Metafield],
}

impl<'a> ProductPayload<'a> {
    /// `None` when the record has not been extracted yet.
    pub fn from_draft(draft: &'a ProductDraft) -> Option<Self> {
        let title = draft.title.as_deref().filter(|t| !t.is_empty())?;
        Some(Self {
            title,
            body_html: draft.description.as_deref(),
            handle: &draft.handle,
            vendor: draft.vendor.as_deref(),
            product_type: draft.product_type.as_deref(),
            tags: draft.tags.join(", "),
            variants: &draft.variants,
            options: &draft.options,
            metafields: &draft.metafields,
        })
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ImageEnvelope<'a> {
    pub image: ImagePayload<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ImagePayload<'a> {
    pub src: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<&'a str>,
    pub variant_ids: &'a [i64],
}

impl<'a> ImagePayload<'a> {
    pub fn new(image: &'a Image, variant_ids: &'a [i64]) -> Self {
        Self {
            src: &image.src,
            alt: image.alt.as_deref(),
            variant_ids,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreatedProductEnvelope {
    pub product: CreatedProduct,
}

/// The parts of a created product the image step needs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatedProduct {
    pub id: i64,
    #[serde(default)]
    pub variants: Vec<CreatedVariant>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatedVariant {
    pub id: i64,
    #[serde(default)]
    pub option1: Option<String>,
}

impl CreatedProduct {
    /// Ids of the variants whose primary option equals the image's colour.
    /// An image without a colour is attached to no variant.
    #[must_use]
    pub fn variant_ids_for(&self, image: &Image) -> Vec<i64> {
        let Some(color) = image.associated_color.as_deref() else {
            return Vec::new();
        };
        self.variants
            .iter()
            .filter(|v| v.option1.as_deref() == Some(color))
            .map(|v| v.id)
            .collect()
    }
}
