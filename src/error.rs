//! Error types for the store client and the diagram collaborator.
//!
//! Library seams return these typed errors. The CLI wraps them in `anyhow`;
//! the knowledge base service logs them and returns empty results.

use thiserror::Error;

/// Failures talking to the document store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// No usable API key was found in the configured environment variable.
    #[error("Notion API key is missing: set the {0} environment variable")]
    MissingCredential(String),

    /// Transport failure (connect, timeout, TLS, body read).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The store answered with a non-success status.
    #[error("Notion API returned {status}: {body}")]
    Api { status: u16, body: String },

    /// A block or page id that cannot be placed in a request path.
    #[error("Invalid Notion id: '{0}'")]
    InvalidId(String),

    /// The response body did not have the expected shape.
    #[error("Unexpected response shape: {0}")]
    Decode(String),
}

impl StoreError {
    /// Machine-readable category used in log fields.
    pub fn category(&self) -> &'static str {
        match self {
            Self::MissingCredential(_) => "credential",
            Self::Network(_) => "network",
            Self::Api { .. } => "api",
            Self::InvalidId(_) => "invalid_id",
            Self::Decode(_) => "decode",
        }
    }
}

/// Failures turning diagram source into a graphic.
#[derive(Error, Debug)]
pub enum DiagramError {
    #[error("diagram rendering is disabled")]
    Disabled,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("diagram service returned {status}: {body}")]
    Service { status: u16, body: String },

    #[error("diagram service returned an empty graphic")]
    Empty,
}
