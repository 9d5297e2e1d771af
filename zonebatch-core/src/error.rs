//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

// Re-export library error type
pub use zonebatch_provider::ProviderError;

/// Core layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// Zone not found
    #[error("Zone not found: {0}")]
    ZoneNotFound(String),

    /// Import errors (malformed file, unsupported format)
    #[error("Import error: {0}")]
    ImportError(String),

    /// Export errors
    #[error("Export error: {0}")]
    ExportError(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Provider error (converted from the API client)
    #[error("{0}")]
    Provider(#[from] ProviderError),
}

impl CoreError {
    /// Whether it is expected behavior (user input, resource does not exist,
    /// etc.), used for log level selection.
    ///
    /// Level `warn` should be used when returning `true` and level `error`
    /// when returning `false`.
    /// **Please update this method simultaneously when new variants are added.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::ZoneNotFound(_)
            | Self::ImportError(_)
            | Self::ExportError(_)
            | Self::ValidationError(_) => true,
            Self::Provider(e) => e.is_expected(),
            Self::SerializationError(_) => false,
        }
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;
