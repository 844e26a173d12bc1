//! Application layer errors.
//!
//! These errors represent failures in orchestration, not in parsing.
//! Parse errors are `StructuralError` and `BlockError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur while reconciling or executing a plan.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// The target root path was empty.
    #[error("Root path is empty")]
    EmptyRootPath,

    /// The target root does not exist on disk.
    #[error("Root directory does not exist: {path}")]
    RootNotFound { path: PathBuf },

    /// The target root exists but is a file.
    #[error("Root path is not a directory: {path}")]
    RootNotADirectory { path: PathBuf },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    Filesystem { path: PathBuf, reason: String },

    /// Shared state lock poisoned by a panicked holder.
    #[error("State lock poisoned")]
    LockPoisoned,
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::EmptyRootPath => vec![
                "Pass the directory to plan into, e.g. --root ./my-project".into(),
            ],
            Self::RootNotFound { path } => vec![
                format!("Create it first: mkdir -p {}", path.display()),
                "Planning never creates the root itself".into(),
            ],
            Self::RootNotADirectory { path } => vec![
                format!("'{}' is a file; point --root at a directory", path.display()),
            ],
            Self::Filesystem { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have the needed permissions".into(),
            ],
            Self::LockPoisoned => vec!["Try again in a moment".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::EmptyRootPath | Self::RootNotADirectory { .. } => ErrorCategory::Validation,
            Self::RootNotFound { .. } => ErrorCategory::NotFound,
            Self::Filesystem { .. } | Self::LockPoisoned => ErrorCategory::Internal,
        }
    }
}
