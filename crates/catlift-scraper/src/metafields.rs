use catlift_core::{Metafield, MetafieldRule};
use scraper::Html;

use crate::selector::evaluate;

/// One metafield per rule, in rule order.
///
/// A rule that matches nothing still produces its metafield, with an empty
/// value. A rule whose selector does not parse is logged and left out.
pub fn build_metafields(document: &Html, rules: &[MetafieldRule]) -> Vec<Metafield> {
    let mut metafields = Vec::with_capacity(rules.len());

    for rule in rules {
        match evaluate(document, &rule.rule) {
            Ok(value) => {
                metafields.push(Metafield::new(&rule.key, value.into_text(), &rule.value_type));
            }
            Err(e) => {
                tracing::warn!(key = %rule.key, error = %e, "skipping metafield");
            }
        }
    }

    metafields
}
