//! Existing-file scan feeding name analysis.
//!
//! Walks the root and collects file paths for the reconciler's duplicate
//! and similarity checks. The scan is plain data gathering; interpretation
//! happens in planter-core.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use planter_core::domain::NodeKind;

/// What to collect while scanning.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// File name suffixes worth collecting. Empty means every file.
    ///
    /// Suffixes match the end of the file name, so compound ones like
    /// `.Build.cs` work.
    pub extensions: Vec<String>,
    /// Hard cap on collected paths.
    pub max_files: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            extensions: [
                ".h",
                ".hpp",
                ".cpp",
                ".c",
                ".cs",
                ".Build.cs",
                ".Target.cs",
                ".uproject",
                ".uplugin",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            max_files: 10_000,
        }
    }
}

impl ScanOptions {
    fn matches(&self, name: &str) -> bool {
        self.extensions.is_empty() || self.extensions.iter().any(|ext| name.ends_with(ext.as_str()))
    }
}

/// Collect existing files under `root`, skipping hidden entries.
///
/// Unreadable subtrees are logged and skipped; the scan never fails.
pub fn scan_existing_files(root: &Path, options: &ScanOptions) -> Vec<PathBuf> {
    let mut files = Vec::new();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| !is_hidden(entry.file_name().to_str(), entry.depth()));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "skipping unreadable entry during scan");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(name) = entry.file_name().to_str() else {
            continue;
        };
        if !options.matches(name) {
            continue;
        }

        files.push(entry.into_path());
        if files.len() >= options.max_files {
            warn!(max = options.max_files, "scan hit the file cap; result is partial");
            break;
        }
    }

    debug!(root = %root.display(), files = files.len(), "scan finished");
    files
}

/// Collect every visible entry under `root` as a root-relative path.
///
/// Directories and files both come back, in walk order, ready for
/// [`planter_core::parser::generate_tree_text`]. Same failure posture as
/// [`scan_existing_files`]: unreadable subtrees are logged and skipped.
pub fn scan_tree_entries(root: &Path) -> Vec<(PathBuf, NodeKind)> {
    let mut entries = Vec::new();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| !is_hidden(entry.file_name().to_str(), entry.depth()));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "skipping unreadable entry during tree walk");
                continue;
            }
        };
        if entry.depth() == 0 {
            continue;
        }

        let kind = if entry.file_type().is_dir() {
            NodeKind::Directory
        } else if entry.file_type().is_file() {
            NodeKind::File
        } else {
            continue;
        };
        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        entries.push((relative.to_path_buf(), kind));
    }

    debug!(root = %root.display(), entries = entries.len(), "tree walk finished");
    entries
}

// The root itself (depth 0) may be hidden, e.g. planning inside ".config".
fn is_hidden(name: Option<&str>, depth: usize) -> bool {
    depth > 0 && name.is_some_and(|n| n.starts_with('.'))
}
