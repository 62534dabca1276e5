pub mod chat;
pub mod prompt;
pub mod reply;

pub use chat::ChatEnricher;
pub use reqwest::StatusCode;

/// Lookup service interface
#[async_trait::async_trait]
pub trait Enricher: Send + Sync {
    /// Translation and notes for `word` as used in `context`
    async fn enrich(&self, word: &str, context: &str) -> Result<Enrichment, EnrichmentError>;

    /// Context-free translation of arbitrary text
    async fn translate(&self, text: &str) -> Result<String, EnrichmentError>;

    /// Whether a credential is available; calls short-circuit otherwise
    fn is_configured(&self) -> bool;

    /// Provider metadata
    fn metadata(&self) -> ProviderMetadata;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enrichment {
    pub translation: String,
    /// Empty when the service had nothing to add
    pub notes: String,
}

#[derive(Debug, Clone)]
pub struct ProviderMetadata {
    pub name: String,
    pub model: String,
    pub requires_api_key: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum EnrichmentError {
    #[error("lookup service not configured: missing API key")]
    NotConfigured,

    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status}: {snippet}")]
    HttpStatus {
        status: reqwest::StatusCode,
        snippet: String,
    },

    #[error("could not decode reply ({reason}): {raw}")]
    Parse { reason: String, raw: String },

    #[error("reply is missing field `{0}`")]
    MissingField(&'static str),
}

impl EnrichmentError {
    pub fn is_config(&self) -> bool {
        matches!(self, Self::NotConfigured)
    }

    /// Transport failures and non-success statuses
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::HttpStatus { .. })
    }

    /// Reply arrived but could not be used
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. } | Self::MissingField(_))
    }
}
