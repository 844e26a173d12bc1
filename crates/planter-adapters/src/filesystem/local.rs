//! Local filesystem adapter using std::fs.

use std::io;
use std::path::Path;

use planter_core::{
    application::ports::{FsInspector, FsWriter},
    domain::NodeKind,
    error::PlanterResult,
};

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FsInspector for LocalFilesystem {
    fn inspect(&self, path: &Path) -> Option<NodeKind> {
        // Follows symlinks, like the rest of the planner.
        match std::fs::metadata(path) {
            Ok(meta) if meta.is_dir() => Some(NodeKind::Directory),
            Ok(_) => Some(NodeKind::File),
            Err(_) => None,
        }
    }
}

impl FsWriter for LocalFilesystem {
    fn create_dir_all(&self, path: &Path) -> PlanterResult<()> {
        std::fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn write_file(&self, path: &Path, content: &str) -> PlanterResult<()> {
        std::fs::write(path, content).map_err(|e| map_io_error(path, e, "write file"))
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> planter_core::error::PlanterError {
    use planter_core::application::ApplicationError;

    ApplicationError::Filesystem {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: {}", operation, e),
    }
    .into()
}
