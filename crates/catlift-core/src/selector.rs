//! Typed selector rules.
//!
//! A [`SelectorRule`] pairs a CSS selector with the [`ValueKind`] that decides
//! how the matched element is turned into a value. Rules are plain data; the
//! evaluation itself lives in the scraper crate.
//!
//! In YAML a rule is written flat:
//!
//! ```yaml
//! selector: "[itemprop=sku]"
//! kind: sku
//! filter: "Style #"
//! ```
//!
//! `attribute` names the attribute for `attribute`/`attribute_list`, `child`
//! overrides the fixed sub-selector of the list kinds, and `filter` is the
//! prefix for `sku` or the split marker for `options`/`options_skip_first`.

use serde::{Deserialize, Serialize};

/// Sub-selector used by [`ValueKind::AttributeList`] when none is configured.
pub const DEFAULT_ATTRIBUTE_LIST_CHILD: &str = "img";
/// Sub-selector used by [`ValueKind::TextList`] when none is configured.
pub const DEFAULT_TEXT_LIST_CHILD: &str = "li";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueKind {
    /// Trimmed text of the first match.
    Text,
    /// Named attribute of the first match.
    Attribute(String),
    /// Named attribute of every `child` element inside the first match.
    AttributeList { name: String, child: String },
    /// Trimmed text of every `child` element inside the first match.
    TextList { child: String },
    /// `<option>` texts inside the first match, each cut at `split_at`.
    Options { split_at: Option<String> },
    /// Like [`ValueKind::Options`] with the leading placeholder option dropped.
    OptionsSkipFirst { split_at: Option<String> },
    /// First-match text with `prefix` removed when present.
    Sku { prefix: Option<String> },
    /// List-item texts of a breadcrumb trail, minus the leading "Home" item.
    Breadcrumbs,
    /// Texts of every `div, p, li, span` inside the first match, one per line.
    AllText,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSelectorRule", into = "RawSelectorRule")]
pub struct SelectorRule {
    pub selector: String,
    pub kind: ValueKind,
}

impl SelectorRule {
    #[must_use]
    pub fn new(selector: impl Into<String>, kind: ValueKind) -> Self {
        Self {
            selector: selector.into(),
            kind,
        }
    }

    #[must_use]
    pub fn text(selector: impl Into<String>) -> Self {
        Self::new(selector, ValueKind::Text)
    }

    #[must_use]
    pub fn attribute(selector: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(selector, ValueKind::Attribute(name.into()))
    }

    #[must_use]
    pub fn sku(selector: impl Into<String>, prefix: Option<String>) -> Self {
        Self::new(selector, ValueKind::Sku { prefix })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum KindName {
    #[default]
    Text,
    Attribute,
    AttributeList,
    TextList,
    Options,
    OptionsSkipFirst,
    Sku,
    Breadcrumbs,
    AllText,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawSelectorRule {
    selector: String,
    #[serde(default)]
    kind: KindName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    attribute: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    child: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    filter: Option<String>,
}

impl TryFrom<RawSelectorRule> for SelectorRule {
    type Error = String;

    fn try_from(raw: RawSelectorRule) -> Result<Self, Self::Error> {
        let require_attribute = |raw: &RawSelectorRule| {
            raw.attribute
                .clone()
                .filter(|a| !a.trim().is_empty())
                .ok_or_else(|| {
                    format!(
                        "selector {:?} needs an `attribute` for kind {:?}",
                        raw.selector, raw.kind
                    )
                })
        };

        let kind = match raw.kind {
            KindName::Text => ValueKind::Text,
            KindName::Attribute => ValueKind::Attribute(require_attribute(&raw)?),
            KindName::AttributeList => ValueKind::AttributeList {
                name: require_attribute(&raw)?,
                child: raw
                    .child
                    .clone()
                    .unwrap_or_else(|| DEFAULT_ATTRIBUTE_LIST_CHILD.to_string()),
            },
            KindName::TextList => ValueKind::TextList {
                child: raw
                    .child
                    .clone()
                    .unwrap_or_else(|| DEFAULT_TEXT_LIST_CHILD.to_string()),
            },
            KindName::Options => ValueKind::Options {
                split_at: raw.filter.clone(),
            },
            KindName::OptionsSkipFirst => ValueKind::OptionsSkipFirst {
                split_at: raw.filter.clone(),
            },
            KindName::Sku => ValueKind::Sku {
                prefix: raw.filter.clone(),
            },
            KindName::Breadcrumbs => ValueKind::Breadcrumbs,
            KindName::AllText => ValueKind::AllText,
        };

        Ok(SelectorRule {
            selector: raw.selector,
            kind,
        })
    }
}

impl From<SelectorRule> for RawSelectorRule {
    fn from(rule: SelectorRule) -> Self {
        let mut raw = RawSelectorRule {
            selector: rule.selector,
            kind: KindName::Text,
            attribute: None,
            child: None,
            filter: None,
        };
        match rule.kind {
            ValueKind::Text => {}
            ValueKind::Attribute(name) => {
                raw.kind = KindName::Attribute;
                raw.attribute = Some(name);
            }
            ValueKind::AttributeList { name, child } => {
                raw.kind = KindName::AttributeList;
                raw.attribute = Some(name);
                raw.child = Some(child);
            }
            ValueKind::TextList { child } => {
                raw.kind = KindName::TextList;
                raw.child = Some(child);
            }
            ValueKind::Options { split_at } => {
                raw.kind = KindName::Options;
                raw.filter = split_at;
            }
            ValueKind::OptionsSkipFirst { split_at } => {
                raw.kind = KindName::OptionsSkipFirst;
                raw.filter = split_at;
            }
            ValueKind::Sku { prefix } => {
                raw.kind = KindName::Sku;
                raw.filter = prefix;
            }
            ValueKind::Breadcrumbs => raw.kind = KindName::Breadcrumbs,
            ValueKind::AllText => raw.kind = KindName::AllText,
        }
        raw
    }
}
