#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("vocabulary storage error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid vocabulary record '{0}': word must be non-empty and normalized")]
    InvalidRecord(String),
}
