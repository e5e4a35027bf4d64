//! Error types for the workspace model.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for workspace operations.
pub type WorkspaceResult<T> = Result<T, WorkspaceError>;

/// Errors that can occur while building or mutating a workspace.
#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("{} is not inside a version-controlled repository", .path.display())]
    NotInRepository { path: PathBuf },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("package '{0}' is declared more than once in the workspace")]
    DuplicatePackage(String),

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse manifest {}: {source}", .path.display())]
    Manifest {
        path: PathBuf,
        source: toml::de::Error,
    },
}
