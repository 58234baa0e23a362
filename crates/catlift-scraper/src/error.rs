use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("invalid selector \"{selector}\": {reason}")]
    SelectorSyntax { selector: String, reason: String },

    #[error("no element matches required container \"{selector}\"")]
    ContainerNotFound { selector: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("page not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("merge failed for product {handle}: {reason}")]
    Merge { handle: String, reason: String },
}
