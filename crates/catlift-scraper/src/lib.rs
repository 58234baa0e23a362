pub mod collection;
pub mod error;
pub mod fetch;
pub mod images;
pub mod links;
pub mod metafields;
pub mod page;
mod retry;
pub mod selector;
pub mod traversal;
pub mod variants;

pub use collection::{parse_collection_page, CollectionPage};
pub use error::ScraperError;
pub use fetch::{fetch_page, FetchPolicy, HttpPageFetcher, PageFetcher};
pub use images::{extract_images, extract_swatch_images, ImageSet};
pub use links::{extract_links, extract_navigation_links, extract_tagged_links, NavLink, TaggedLink};
pub use metafields::build_metafields;
pub use selector::{evaluate, validate_site_selectors, Extracted};
pub use traversal::{ProductTraversal, TraversalOutcome, TraversalState};
pub use scraper::Html;
pub use variants::{build_variants, FixedInventory, InventorySource, RandomInventory};
