//! Error types for RosterForge

use thiserror::Error;

/// Main error type for RosterForge operations.
///
/// `UnknownEntity`, `UnknownAttribute` and `DuplicateEntity` are
/// data-integrity faults: the pool handed to the engine is assumed to be
/// well formed, and nothing here tries to repair it. An empty result is never
/// reported through this type.
#[derive(Debug, Error)]
pub enum RosterForgeError {
    /// A tuple referenced an id the store does not hold
    #[error("Unknown entity id: {0}")]
    UnknownEntity(u32),

    /// A known entity has no value for the requested attribute
    #[error("Unknown attribute '{attribute}' for entity '{entity}'")]
    UnknownAttribute { entity: String, attribute: String },

    /// Two pool rows share the same key
    #[error("Duplicate entity: {0}")]
    DuplicateEntity(String),

    /// Error in rule profile or run configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Enumeration was cancelled or hit its deadline before completion
    #[error("Enumeration was cancelled")]
    Cancelled,

    /// Internal error (should not occur in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for RosterForge operations
pub type Result<T> = std::result::Result<T, RosterForgeError>;
