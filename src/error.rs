//! Error handling module for the charm
//!
//! Provides centralized error handling with proper error types using thiserror.
//! All errors in the crate should use these types for consistency.

use thiserror::Error;

/// Main error type for the charm
#[derive(Error, Debug)]
pub enum CharmError {
    /// IO errors (file writes, subprocess spawning)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors (loading, parsing, validation)
    #[error("Configuration error: {0}")]
    Config(String),

    /// An overlay-network-type token outside the supported set was supplied
    #[error("Unsupported overlay-network-type {0}")]
    UnsupportedOverlayType(String),

    /// The installed package reports a release with no known profile
    #[error("Unsupported OpenStack release: {0}")]
    UnsupportedRelease(String),

    /// Package installation failures (apt or pip), propagated unmodified
    #[error("Package installation failed: {0}")]
    Installation(String),

    /// A required relation has no principal unit attached
    #[error("Required relation not joined: {0}")]
    MissingRelation(String),

    /// Relation channel errors (hook tool invocation, payload transmission)
    #[error("Relation error: {0}")]
    Relation(String),

    /// System errors (commands, processes)
    #[error("System error: {0}")]
    System(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// General errors (catch-all for edge cases)
    #[error("{0}")]
    General(String),
}

/// Result type alias for charm operations
pub type Result<T> = std::result::Result<T, CharmError>;

// Convenient error constructors
impl CharmError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an unsupported overlay-network-type error
    pub fn unsupported_overlay_type(token: impl Into<String>) -> Self {
        Self::UnsupportedOverlayType(token.into())
    }

    /// Create an unsupported release error
    pub fn unsupported_release(tag: impl Into<String>) -> Self {
        Self::UnsupportedRelease(tag.into())
    }

    /// Create an installation error
    pub fn installation(msg: impl Into<String>) -> Self {
        Self::Installation(msg.into())
    }

    /// Create a missing relation error
    pub fn missing_relation(relation: impl Into<String>) -> Self {
        Self::MissingRelation(relation.into())
    }

    /// Create a relation channel error
    pub fn relation(msg: impl Into<String>) -> Self {
        Self::Relation(msg.into())
    }

    /// Create a system error
    pub fn system(msg: impl Into<String>) -> Self {
        Self::System(msg.into())
    }

    /// Create a general error
    pub fn general(msg: impl Into<String>) -> Self {
        Self::General(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CharmError::unsupported_overlay_type("vxlan");
        assert_eq!(err.to_string(), "Unsupported overlay-network-type vxlan");

        let err = CharmError::unsupported_release("mitaka");
        assert_eq!(err.to_string(), "Unsupported OpenStack release: mitaka");

        let err = CharmError::config("invalid overlay-network-type");
        assert_eq!(
            err.to_string(),
            "Configuration error: invalid overlay-network-type"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: CharmError = io_err.into();
        assert!(matches!(err, CharmError::Io(_)));
    }

    #[test]
    fn test_error_constructors() {
        let err = CharmError::installation("pip exited with status 1");
        assert!(matches!(err, CharmError::Installation(_)));

        let err = CharmError::missing_relation("neutron-plugin-api-subordinate");
        assert!(matches!(err, CharmError::MissingRelation(_)));
    }
}
