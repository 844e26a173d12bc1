//! Infrastructure adapters for Planter.
//!
//! This crate implements the ports defined in `planter-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod executor;
pub mod filesystem;
pub mod safety;
pub mod scan;

// Re-export commonly used adapters
pub use executor::{ExecuteOptions, ExecutionReport, PlanExecutor};
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use safety::{BlockedReason, RootCheck, check_root};
pub use scan::{ScanOptions, scan_existing_files, scan_tree_entries};
