//! Error types for referenceables

use thiserror::Error;

/// Main error type for the registry and its collaborators
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Invalid record at {locator}: missing identifier")]
    InvalidRecord { locator: String },

    #[error("Duplicate identifier '{identifier}' found in {count} records")]
    DuplicateIdentifier { identifier: String, count: usize },

    #[error("Unresolved reference: {0}")]
    UnresolvedReference(String),

    #[error("Discovery failed for asset kind {asset}: {reason}")]
    DiscoveryFailure { asset: String, reason: String },

    #[error("Could not read records for {category}: {reason}")]
    UnreadableRecords { category: String, reason: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

/// Result type alias for registry operations
pub type Result<T> = std::result::Result<T, RegistryError>;
