//! Error types for the rendering pipeline
//!
//! Only the outer surfaces (payload decoding, configuration, final
//! serialization) return these errors. Individual passes swallow their
//! own failures and skip the offending node instead.

use thiserror::Error;

/// Result type alias for pipeline operations
pub type MailviewResult<T> = Result<T, MailviewError>;

/// Error types for payload ingestion, configuration and serialization
#[derive(Debug, Error)]
pub enum MailviewError {
    /// The host parameter string was not valid payload JSON
    #[error("Invalid host payload JSON: {0}")]
    PayloadJson(#[from] serde_json::Error),

    /// The html field was not valid base64
    #[error("Invalid base64 payload: {0}")]
    PayloadBase64(#[from] base64::DecodeError),

    /// The decoded html bytes were not valid UTF-8
    #[error("Payload is not valid UTF-8: {0}")]
    PayloadUtf8(#[from] std::string::FromUtf8Error),

    /// A CSS selector failed to parse
    #[error("Invalid CSS selector '{0}'")]
    Selector(String),

    /// Writing the transformed tree back to HTML failed
    #[error("Failed to serialize document: {0}")]
    Serialize(#[from] std::io::Error),

    /// Rejected by `RenderConfigBuilder::build`
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for MailviewError {
    fn from(error: anyhow::Error) -> Self {
        MailviewError::Other(error.to_string())
    }
}

impl MailviewError {
    /// Whether the failure came from the host payload rather than from us
    #[must_use]
    pub fn is_payload_error(&self) -> bool {
        matches!(
            self,
            MailviewError::PayloadJson(_)
                | MailviewError::PayloadBase64(_)
                | MailviewError::PayloadUtf8(_)
        )
    }
}
