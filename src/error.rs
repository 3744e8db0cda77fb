// src/error.rs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StockInfoError {
    #[error("An error has occurred while calling url=[{url}]: {source}")]
    Fetch {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Unable to find stock ticker `{ticker}`")]
    NotFound { ticker: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl StockInfoError {
    pub fn fetch<E>(url: impl Into<String>, source: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::Fetch {
            url: url.into(),
            source: source.into(),
        }
    }

    /// True for the request-level failures `create` can raise.
    pub fn is_request_error(&self) -> bool {
        matches!(self, Self::Fetch { .. } | Self::NotFound { .. })
    }
}
