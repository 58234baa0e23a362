use super::*;

fn make_variant(option1: &str, option2: &str) -> Variant {
    Variant {
        option1: option1.to_string(),
        option2: Some(option2.to_string()),
        sku: Some("123".to_string()),
        price: Some("€25.00".to_string()),
        compare_at_price: String::new(),
        inventory_quantity: 7,
        inventory_management: INVENTORY_MANAGEMENT.to_string(),
        inventory_policy: INVENTORY_POLICY.to_string(),
    }
}

fn make_seed() -> ProductDraft {
    let mut draft = ProductDraft::seed("/p/oxford-shirt", "Oxford Shirt").unwrap();
    draft.product_type = Some("Shirts".to_string());
    draft.tags = vec!["Men".to_string(), "Clothing".to_string()];
    draft
}

// -----------------------------------------------------------------------
// handleize
// -----------------------------------------------------------------------

#[test]
fn handleize_lowercases_and_dashes() {
    assert_eq!(handleize("Oxford Shirt"), "oxford-shirt");
}

#[test]
fn handleize_collapses_punctuation_runs() {
    assert_eq!(handleize("Men's  Slim-Fit -- Shirt!"), "men-s-slim-fit-shirt");
}

#[test]
fn handleize_trims_leading_and_trailing_separators() {
    assert_eq!(handleize("  (New) Linen Shirt  "), "new-linen-shirt");
}

#[test]
fn handleize_non_ascii_acts_as_separator() {
    assert_eq!(handleize("Café Crème"), "caf-cr-me");
}

#[test]
fn seed_rejects_title_without_ascii_content() {
    let err = ProductDraft::seed("/p/x", "  ***  ").unwrap_err();
    assert!(matches!(err, CoreError::EmptyHandle(_)));
}

// -----------------------------------------------------------------------
// apply
// -----------------------------------------------------------------------

#[test]
fn apply_overwrites_only_present_fields() {
    let mut draft = make_seed();
    draft.sku = Some("old-sku".to_string());

    draft.apply(ProductUpdate {
        title: Some("Oxford Shirt".to_string()),
        price: Some("€25.00".to_string()),
        ..ProductUpdate::default()
    });

    assert_eq!(draft.title.as_deref(), Some("Oxford Shirt"));
    assert_eq!(draft.price.as_deref(), Some("€25.00"));
    assert_eq!(draft.sku.as_deref(), Some("old-sku"));
    assert_eq!(draft.product_type.as_deref(), Some("Shirts"));
    assert_eq!(draft.tags, vec!["Men".to_string(), "Clothing".to_string()]);
}

#[test]
fn apply_replaces_collections_wholesale() {
    let mut draft = make_seed();
    draft.variants = vec![make_variant("Red", "S"), make_variant("Red", "M")];

    draft.apply(ProductUpdate {
        variants: Some(vec![make_variant("Blue", "L")]),
        ..ProductUpdate::default()
    });

    assert_eq!(draft.variants, vec![make_variant("Blue", "L")]);
}

#[test]
fn apply_is_idempotent() {
    let update = ProductUpdate {
        title: Some("Oxford Shirt".to_string()),
        variants: Some(vec![make_variant("Red", "S")]),
        images: Some(vec![Image {
            src: "https://cdn.example.com/a.jpg".to_string(),
            alt: None,
            associated_color: Some("Red".to_string()),
        }]),
        ..ProductUpdate::default()
    };

    let mut once = make_seed();
    once.apply(update.clone());
    let mut twice = once.clone();
    twice.apply(update);

    assert_eq!(once, twice);
}

#[test]
fn is_enriched_requires_non_empty_title() {
    let mut draft = make_seed();
    assert!(!draft.is_enriched());
    draft.title = Some(String::new());
    assert!(!draft.is_enriched());
    draft.title = Some("Oxford Shirt".to_string());
    assert!(draft.is_enriched());
}

// -----------------------------------------------------------------------
// options / metafields
// -----------------------------------------------------------------------

#[test]
fn options_skip_blank_names() {
    let options = options_from_names(Some("Colour"), Some("  "));
    assert_eq!(
        options,
        vec![OptionName {
            name: "Colour".to_string()
        }]
    );
    assert!(options_from_names(None, None).is_empty());
}

#[test]
fn metafield_namespace_is_title_cased_key() {
    let field = Metafield::new("size_and_fit", "True to size".to_string(), "string");
    assert_eq!(field.namespace, "Size And Fit");
    assert_eq!(field.key, "size_and_fit");
    assert_eq!(field.value_type, "string");
}

// -----------------------------------------------------------------------
// serialization
// -----------------------------------------------------------------------

#[test]
fn seed_serializes_without_unreached_fields() {
    let json = serde_json::to_value(make_seed()).unwrap();
    let obj = json.as_object().unwrap();
    assert_eq!(obj["handle"], "oxford-shirt");
    assert_eq!(obj["product_url"], "/p/oxford-shirt");
    assert!(!obj.contains_key("title"));
    assert!(!obj.contains_key("body_html"));
}

#[test]
fn description_serializes_as_body_html() {
    let mut draft = make_seed();
    draft.description = Some("Crisp cotton.".to_string());
    let json = serde_json::to_value(&draft).unwrap();
    assert_eq!(json["body_html"], "Crisp cotton.");
    let back: ProductDraft = serde_json::from_value(json).unwrap();
    assert_eq!(back, draft);
}
