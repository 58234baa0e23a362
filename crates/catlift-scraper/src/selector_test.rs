use super::*;

fn doc(body: &str) -> Html {
    Html::parse_document(&format!("<html><body>{body}</body></html>"))
}

// ---------------------------------------------------------------------------
// Absence and syntax
// ---------------------------------------------------------------------------

#[test]
fn no_match_is_absent_for_every_kind() {
    let document = doc("<p>nothing here</p>");
    let kinds = [
        ValueKind::Text,
        ValueKind::Attribute("href".to_string()),
        ValueKind::AttributeList {
            name: "src".to_string(),
            child: "img".to_string(),
        },
        ValueKind::TextList {
            child: "li".to_string(),
        },
        ValueKind::Options { split_at: None },
        ValueKind::OptionsSkipFirst { split_at: None },
        ValueKind::Sku { prefix: None },
        ValueKind::Breadcrumbs,
        ValueKind::AllText,
    ];
    for kind in kinds {
        let rule = SelectorRule::new(".missing", kind.clone());
        let result = evaluate(&document, &rule);
        assert!(
            matches!(result, Ok(Extracted::Absent)),
            "expected Absent for {kind:?}, got: {result:?}"
        );
    }
}

#[test]
fn malformed_selector_is_a_syntax_error() {
    let document = doc("<p>x</p>");
    let result = evaluate(&document, &SelectorRule::text("div[[["));
    assert!(
        matches!(result, Err(ScraperError::SelectorSyntax { ref selector, .. }) if selector == "div[[["),
        "expected SelectorSyntax, got: {result:?}"
    );
}

// ---------------------------------------------------------------------------
// Scalar kinds
// ---------------------------------------------------------------------------

#[test]
fn text_is_trimmed_first_match() {
    let document = doc("<h1 class='t'>\n   Linen Shirt \n</h1><h1 class='t'>Other</h1>");
    let value = evaluate(&document, &SelectorRule::text("h1.t")).unwrap();
    assert_eq!(value, Extracted::Scalar("Linen Shirt".to_string()));
}

#[test]
fn text_keeps_inner_line_breaks() {
    let document = doc("<div class='desc'>\n  Relaxed fit.<br>\nMachine wash.\n</div>");
    let value = evaluate(&document, &SelectorRule::text(".desc")).unwrap();
    assert_eq!(
        value,
        Extracted::Scalar("Relaxed fit.\nMachine wash.".to_string())
    );
}

#[test]
fn attribute_reads_first_match() {
    let document = doc("<a class='x' href='/one'>1</a><a class='x' href='/two'>2</a>");
    let value = evaluate(&document, &SelectorRule::attribute("a.x", "href")).unwrap();
    assert_eq!(value, Extracted::Scalar("/one".to_string()));
}

#[test]
fn missing_attribute_is_absent() {
    let document = doc("<a class='x'>1</a>");
    let value = evaluate(&document, &SelectorRule::attribute("a.x", "href")).unwrap();
    assert_eq!(value, Extracted::Absent);
}

#[test]
fn sku_prefix_is_stripped() {
    let document = doc("<span itemprop='sku'>Style #123</span>");
    let rule = SelectorRule::sku("[itemprop=sku]", Some("Style #".to_string()));
    assert_eq!(evaluate(&document, &rule).unwrap().into_text(), "123");
}

#[test]
fn sku_without_prefix_is_kept_verbatim() {
    let document = doc("<span itemprop='sku'>ABC-9</span>");
    let rule = SelectorRule::sku("[itemprop=sku]", Some("Style #".to_string()));
    assert_eq!(evaluate(&document, &rule).unwrap().into_text(), "ABC-9");
}

// ---------------------------------------------------------------------------
// List kinds
// ---------------------------------------------------------------------------

#[test]
fn attribute_list_reads_children_in_document_order() {
    let document = doc(
        "<div class='g'><img src='a.jpg'><p><img src='b.jpg'></p><img alt='no src'></div>\
         <div class='g'><img src='c.jpg'></div>",
    );
    let rule = SelectorRule::new(
        ".g",
        ValueKind::AttributeList {
            name: "src".to_string(),
            child: "img".to_string(),
        },
    );
    assert_eq!(
        evaluate(&document, &rule).unwrap().into_list(),
        vec!["a.jpg", "b.jpg"]
    );
}

#[test]
fn text_list_reads_child_texts() {
    let document = doc("<ul class='f'><li> Cotton </li><li>Machine wash</li></ul>");
    let rule = SelectorRule::new(
        "ul.f",
        ValueKind::TextList {
            child: "li".to_string(),
        },
    );
    assert_eq!(
        evaluate(&document, &rule).unwrap().into_list(),
        vec!["Cotton", "Machine wash"]
    );
}

#[test]
fn options_are_cut_at_filter() {
    let document = doc(
        "<select id='s'><option>10 (in stock)</option><option>12 (low)</option></select>",
    );
    let rule = SelectorRule::new(
        "#s",
        ValueKind::Options {
            split_at: Some(" ".to_string()),
        },
    );
    assert_eq!(evaluate(&document, &rule).unwrap().into_list(), vec!["10", "12"]);
}

#[test]
fn options_skip_first_drops_placeholder() {
    let document = doc(
        "<select id='s'><option>Select a size</option><option>S</option><option>M</option></select>",
    );
    let rule = SelectorRule::new("#s", ValueKind::OptionsSkipFirst { split_at: None });
    assert_eq!(evaluate(&document, &rule).unwrap().into_list(), vec!["S", "M"]);
}

#[test]
fn breadcrumbs_drop_home() {
    let document = doc(
        "<ol class='bc'><li><a><span>Home</span></a></li><li><span>Women</span></li><li>Dresses</li></ol>",
    );
    let rule = SelectorRule::new(".bc", ValueKind::Breadcrumbs);
    assert_eq!(
        evaluate(&document, &rule).unwrap().into_list(),
        vec!["Women", "Dresses"]
    );
}

#[test]
fn all_text_joins_non_empty_blocks() {
    let document = doc("<div id='care'><p>Wash cold</p><p> </p><ul><li>Do not tumble</li></ul></div>");
    let rule = SelectorRule::new("#care", ValueKind::AllText);
    assert_eq!(
        evaluate(&document, &rule).unwrap().into_text(),
        "Wash cold\nDo not tumble"
    );
}

// ---------------------------------------------------------------------------
// Extracted helpers
// ---------------------------------------------------------------------------

#[test]
fn empty_values_collapse_to_none() {
    assert_eq!(Extracted::Scalar(String::new()).into_scalar(), None);
    assert_eq!(Extracted::List(Vec::new()).into_scalar(), None);
    assert_eq!(Extracted::Absent.into_list(), Vec::<String>::new());
    assert_eq!(Extracted::Scalar("x".to_string()).into_list(), vec!["x"]);
}

#[test]
fn first_text_returns_none_when_missing() {
    let document = doc("<p>x</p>");
    assert_eq!(first_text(&document, "h1").unwrap(), None);
    assert_eq!(first_text(&document, "p").unwrap(), Some("x".to_string()));
}

// ---------------------------------------------------------------------------
// Site-wide validation
// ---------------------------------------------------------------------------

const SITE_YAML: &str = r#"
name: Test
base_url: https://shop.example.com
collection_urls: ["https://shop.example.com/c"]
collection:
  category: h1
  breadcrumbs: .bc
  product_link: a.product
product:
  title: h1.title
  description: .desc
  sku: .sku
  price: .price
  gallery:
    selector: img.gallery
variant_options:
  option1_name: Colour
  option1_links: .swatches
variant_page:
  color: .colour
metafields:
  - key: fit
    rule:
      selector: .fit
"#;

fn site() -> SiteConfig {
    serde_yaml::from_str(SITE_YAML).expect("test site parses")
}

#[test]
fn valid_site_selectors_pass() {
    let result = validate_site_selectors(&site());
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
}

#[test]
fn broken_metafield_selector_is_reported() {
    let mut site = site();
    site.metafields[0].rule.selector = "p:::".to_string();
    let result = validate_site_selectors(&site);
    assert!(
        matches!(result, Err(ScraperError::SelectorSyntax { ref selector, .. }) if selector == "p:::"),
        "expected SelectorSyntax, got: {result:?}"
    );
}

#[test]
fn bundled_site_selectors_compile() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../../config/site.yaml");
    let site = catlift_core::load_site(&path).expect("bundled site config loads");
    let result = validate_site_selectors(&site);
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
}
