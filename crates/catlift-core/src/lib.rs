mod app_config;
mod config;
mod products;
mod selector;
mod site;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use products::{
    handleize, options_from_names, Image, MergeTarget, Metafield, OptionName, ProductDraft,
    ProductUpdate, Variant, INVENTORY_MANAGEMENT, INVENTORY_POLICY,
};
pub use selector::{SelectorRule, ValueKind};
pub use site::{
    load_site, CollectionSelectors, GallerySelectors, LinkMode, MetafieldRule, NavigationSource,
    ProductSelectors, SiteConfig, VariantOptionSelectors, VariantPageSelectors,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read site config {path}: {source}")]
    SiteFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse site config: {0}")]
    SiteFileParse(#[from] serde_yaml::Error),

    #[error("site config validation failed: {0}")]
    Validation(String),
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("handle could not be derived from title {0:?}")]
    EmptyHandle(String),
}
