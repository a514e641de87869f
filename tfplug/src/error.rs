use thiserror::Error;

#[derive(Debug, Error)]
pub enum TfplugError {
    /// A provider method that needs the configured client ran before `configure`
    #[error("provider has not been configured")]
    ProviderNotConfigured,

    #[error("config values could not be decoded: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("expected a {expected} value, found {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, TfplugError>;
