use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Destination inventory tracker stamped on every generated variant.
pub const INVENTORY_MANAGEMENT: &str = "shopify";
/// Overselling policy stamped on every generated variant.
pub const INVENTORY_POLICY: &str = "deny";

/// One catalog record, keyed by `handle`.
///
/// Created by the collection stage with only the listing fields populated,
/// then enriched in place by product-page traversal. Fields that the current
/// stage has not reached yet stay `None` / empty and are left out of the
/// serialized JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub handle: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_url: Option<String>,
    /// Cached collection page this record was discovered on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_file: Option<String>,
    /// Cached product page markup, set once the page has been fetched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_type: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(
        rename = "body_html",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    #[serde(default)]
    pub options: Vec<OptionName>,
    #[serde(default)]
    pub variants: Vec<Variant>,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub metafields: Vec<Metafield>,
    /// Keys this record carries that no stage models, kept verbatim across
    /// merges.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ProductDraft {
    /// Builds the minimal listing record for a product link.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::EmptyHandle`] if `title` contains no ASCII
    /// letters or digits.
    pub fn seed(product_url: impl Into<String>, title: &str) -> Result<Self, CoreError> {
        let handle = handleize(title);
        if handle.is_empty() {
            return Err(CoreError::EmptyHandle(title.to_string()));
        }
        Ok(Self {
            handle,
            product_url: Some(product_url.into()),
            ..Self::default()
        })
    }

    /// Overwrites exactly the fields that are `Some` in `update`.
    pub fn apply(&mut self, update: ProductUpdate) {
        let ProductUpdate {
            product_file,
            title,
            description,
            sku,
            price,
            vendor,
            options,
            variants,
            images,
            metafields,
        } = update;

        if product_file.is_some() {
            self.product_file = product_file;
        }
        if title.is_some() {
            self.title = title;
        }
        if description.is_some() {
            self.description = description;
        }
        if sku.is_some() {
            self.sku = sku;
        }
        if price.is_some() {
            self.price = price;
        }
        if vendor.is_some() {
            self.vendor = vendor;
        }
        if let Some(options) = options {
            self.options = options;
        }
        if let Some(variants) = variants {
            self.variants = variants;
        }
        if let Some(images) = images {
            self.images = images;
        }
        if let Some(metafields) = metafields {
            self.metafields = metafields;
        }
    }

    /// `true` once product-page traversal has produced a title.
    #[must_use]
    pub fn is_enriched(&self) -> bool {
        self.title.as_deref().is_some_and(|t| !t.is_empty())
    }
}

/// Partial update applied by [`ProductDraft::apply`]. `None` means "leave as is".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductUpdate {
    pub product_file: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub sku: Option<String>,
    pub price: Option<String>,
    pub vendor: Option<String>,
    pub options: Option<Vec<OptionName>>,
    pub variants: Option<Vec<Variant>>,
    pub images: Option<Vec<Image>>,
    pub metafields: Option<Vec<Metafield>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionName {
    pub name: String,
}

/// Builds the product option list from the configured option names,
/// skipping names that are absent or blank.
#[must_use]
pub fn options_from_names(option1: Option<&str>, option2: Option<&str>) -> Vec<OptionName> {
    [option1, option2]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| OptionName {
            name: name.to_string(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    /// Primary attribute, e.g. the colour.
    pub option1: String,
    /// Secondary attribute, e.g. the size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(default)]
    pub compare_at_price: String,
    /// Placeholder stock level generated at build time, not scraped.
    pub inventory_quantity: u32,
    pub inventory_management: String,
    pub inventory_policy: String,
}

impl Variant {
    /// The `(option1, option2)` pair that identifies a variant within a product.
    #[must_use]
    pub fn option_pair(&self) -> (&str, Option<&str>) {
        (self.option1.as_str(), self.option2.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub src: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    /// Primary option value (colour) of the page the image was found on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub associated_color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metafield {
    pub namespace: String,
    pub key: String,
    pub value: String,
    #[serde(rename = "type")]
    pub value_type: String,
}

impl Metafield {
    /// Builds a metafield whose namespace is the title-cased key:
    /// `"size_and_fit"` becomes `"Size And Fit"`.
    #[must_use]
    pub fn new(key: &str, value: String, value_type: &str) -> Self {
        Self {
            namespace: namespace_for_key(key),
            key: key.to_string(),
            value,
            value_type: value_type.to_string(),
        }
    }
}

fn namespace_for_key(key: &str) -> String {
    key.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Derives the catalog key from a product title: lowercase ASCII letters and
/// digits, with every other run of characters collapsed to a single `-` and
/// no leading or trailing dash.
#[must_use]
pub fn handleize(title: &str) -> String {
    let mut handle = String::with_capacity(title.len());
    let mut pending_dash = false;

    for c in title.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !handle.is_empty() {
                handle.push('-');
            }
            pending_dash = false;
            handle.push(c);
        } else {
            pending_dash = true;
        }
    }

    handle
}

/// Seam between the traversal controller and the catalog store.
///
/// Implementors apply `update` to the record stored under `handle`.
pub trait MergeTarget {
    type Error: std::error::Error + Send + Sync + 'static;

    /// # Errors
    ///
    /// Implementation-defined; the catalog store fails when `handle` has no
    /// seeded record.
    fn merge(&mut self, handle: &str, update: ProductUpdate) -> Result<(), Self::Error>;
}

#[cfg(test)]
#[path = "products_test.rs"]
mod tests;
