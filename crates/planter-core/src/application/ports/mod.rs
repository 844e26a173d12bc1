//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `planter-adapters` implement
//! these.
//!
//! Both ports here are driven (output) ports: called by the application,
//! implemented by infrastructure. Driving ports are the public methods of
//! [`Reconciler`](crate::application::Reconciler) itself.

use std::path::Path;

use crate::domain::NodeKind;
use crate::error::PlanterResult;

/// Port for the read-only filesystem snapshot planning runs against.
///
/// Implemented by:
/// - `planter_adapters::filesystem::LocalFilesystem` (production)
/// - `planter_adapters::filesystem::MemoryFilesystem` (testing)
pub trait FsInspector: Send + Sync {
    /// What, if anything, sits at `path` right now.
    ///
    /// `None` means nothing exists there. The probe must not create,
    /// modify, or lock anything.
    fn inspect(&self, path: &Path) -> Option<NodeKind>;
}

/// Port for the mutations an accepted plan is allowed to make.
///
/// Implemented by:
/// - `planter_adapters::filesystem::LocalFilesystem` (production)
/// - `planter_adapters::filesystem::MemoryFilesystem` (testing)
pub trait FsWriter: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> PlanterResult<()>;

    /// Write content to a file, replacing whatever was there.
    fn write_file(&self, path: &Path, content: &str) -> PlanterResult<()>;
}
