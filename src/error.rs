//! Error types for the GPFS provisioner
//!
//! Splits the error surface along the startup/runtime boundary: GitHub
//! authentication and member-listing failures are fatal and abort the
//! process, while per-user provisioning failures are logged and dropped
//! by the worker loop.

use thiserror::Error;

/// Unified error type for the provisioner
#[derive(Error, Debug)]
pub enum Error {
    // =========================================================================
    // Internal Errors
    // =========================================================================
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    // =========================================================================
    // Kubernetes Errors
    // =========================================================================
    #[error("Kubernetes API error: {0}")]
    Kube(#[from] kube::Error),

    #[error("PersistentVolume already exists: {name}")]
    ResourceExists { name: String },

    // =========================================================================
    // GitHub Errors
    // =========================================================================
    #[error("GitHub API error: status {status} - {message}")]
    GithubApi { status: u16, message: String },

    #[error("GitHub transport error: {0}")]
    GithubTransport(#[from] reqwest::Error),

    // =========================================================================
    // Parse Errors
    // =========================================================================
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    // =========================================================================
    // IO Errors
    // =========================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error is a resource-creation conflict.
    ///
    /// Conflicts come back for users whose PersistentVolume survived a prior
    /// run of the provisioner; the worker treats them like any other create
    /// failure (log and drop).
    pub fn is_conflict(&self) -> bool {
        match self {
            Error::ResourceExists { .. } => true,
            Error::Kube(kube::Error::Api(resp)) => resp.code == 409,
            _ => false,
        }
    }
}

/// Result type alias for the provisioner
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_detection() {
        let err = Error::ResourceExists {
            name: "gpfs-alice".into(),
        };
        assert!(err.is_conflict());

        let err = Error::Configuration("missing token".into());
        assert!(!err.is_conflict());

        let err = Error::GithubApi {
            status: 404,
            message: "Not Found".into(),
        };
        assert!(!err.is_conflict());
    }

    #[test]
    fn test_error_display() {
        let err = Error::GithubApi {
            status: 422,
            message: "Hook already exists".into(),
        };
        assert_eq!(
            err.to_string(),
            "GitHub API error: status 422 - Hook already exists"
        );
    }
}
