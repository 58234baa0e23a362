pub mod client;
pub mod error;
pub mod types;

pub use client::{AdminClient, ProvisionOutcome};
pub use error::ShopifyError;
pub use types::{CreatedProduct, CreatedVariant};
