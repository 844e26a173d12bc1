//! Unified error handling for Planter Core.
//!
//! This module provides a unified error type that wraps parse and
//! application errors, with rich context and user-actionable suggestions.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::{BlockError, StructuralError};

/// Root error type for Planter Core operations.
///
/// This enum wraps all possible errors that can occur when using
/// planter-core, providing a unified interface for error handling.
#[derive(Debug, Error, Clone)]
pub enum PlanterError {
    /// Errors from parsing tree structure text.
    #[error("Tree structure error: {0}")]
    Structure(#[from] StructuralError),

    /// Errors from parsing block content text.
    #[error("Content block error: {0}")]
    Block(#[from] BlockError),

    /// Errors from the application layer (orchestration failures).
    #[error("Application error: {0}")]
    Application(#[from] ApplicationError),

    /// Configuration or setup errors.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl PlanterError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Structure(e) => e.suggestions(),
            Self::Block(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Configuration { message } => vec![
                format!("Configuration issue: {}", message),
                "Check your setup and try again".into(),
            ],
            Self::Internal { .. } => vec![
                "This appears to be a bug in Planter".into(),
                "Please report this issue at: https://github.com/cosecruz/planter/issues".into(),
            ],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Structure(e) => map_category(e.category()),
            Self::Block(e) => map_category(e.category()),
            Self::Application(e) => e.category(),
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// Line of input the error points at, when it points at one.
    pub fn line(&self) -> Option<u32> {
        match self {
            Self::Structure(e) => e.line(),
            Self::Block(e) => Some(e.line()),
            _ => None,
        }
    }

    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Application(ApplicationError::LockPoisoned))
    }
}

fn map_category(inner: crate::domain::ErrorCategory) -> ErrorCategory {
    match inner {
        crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
        crate::domain::ErrorCategory::NotFound => ErrorCategory::NotFound,
        crate::domain::ErrorCategory::Internal => ErrorCategory::Internal,
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Configuration,
    Internal,
}

/// Convenient result type alias.
pub type PlanterResult<T> = Result<T, PlanterError>;

/// Extension trait for adding context to errors.
pub trait Context<T> {
    /// Add context to an error.
    fn context(self, msg: impl Into<String>) -> PlanterResult<T>;
}

impl<T, E> Context<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, msg: impl Into<String>) -> PlanterResult<T> {
        self.map_err(|e| PlanterError::Internal {
            message: format!("{}: {}", msg.into(), e),
        })
    }
}
