//! Error handling module for the combo resolver
//!
//! Provides centralized error handling with proper error types using thiserror.
//! Resolver operations return these values instead of panicking; only
//! malformed input (programmer error at the call site) is a hard failure.

use crate::types::OptionId;
use thiserror::Error;

/// Main error type for the combo resolver
#[derive(Error, Debug)]
pub enum ComboError {
    /// Malformed input (incomplete selection, index out of range, bad price)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Well-formed selection that matches no registered combo
    #[error("Selected combination unavailable: {0}")]
    NotFound(String),

    /// A combo or request references an option that no longer exists
    #[error("Option {option_id} no longer exists")]
    OrphanedReference { option_id: OptionId },

    /// More than one combo registered for the same option set
    #[error("Duplicate combo: {0}")]
    DuplicateCombo(String),

    /// Configuration errors (loading, parsing, validation)
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors (catalog and config files)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for resolver operations
pub type Result<T> = std::result::Result<T, ComboError>;

// Convenient error constructors
impl ComboError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a "combination unavailable" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create an orphaned reference error
    pub fn orphaned(option_id: OptionId) -> Self {
        Self::OrphanedReference { option_id }
    }

    /// Create a duplicate combo error
    pub fn duplicate_combo(msg: impl Into<String>) -> Self {
        Self::DuplicateCombo(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// True for conditions the UI should surface to the shopper
    /// ("pick a different combination") rather than treat as a fault.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::OrphanedReference { .. })
    }
}
