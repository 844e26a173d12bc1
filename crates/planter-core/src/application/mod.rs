//! Application layer for Planter.
//!
//! This layer contains:
//! - **Reconciler**: Use case orchestration (inputs to plan)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! parsing rules itself. All parsing lives in `crate::parser`, all planning
//! vocabulary in `crate::domain`.

pub mod error;
pub mod ports;
pub mod reconcile;

// Re-export the main service
pub use reconcile::Reconciler;

// Re-export port traits (for adapter implementation)
pub use ports::{FsInspector, FsWriter};

pub use error::ApplicationError;
