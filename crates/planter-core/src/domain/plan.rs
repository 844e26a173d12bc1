//! The immutable scaffolding plan.
//!
//! A [`Plan`] is the whole point of this crate: the reconciled view of what
//! the tree text asks for, what content the blocks attach, and how every
//! planned path relates to what already sits on disk. It performs no I/O
//! itself; renderers, executors, and safety gates consume it.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::domain::node::NodeKind;

/// Relation of one planned path to the current filesystem state.
///
/// Closed set: match exhaustively, never with a catch-all arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PathState {
    /// Nothing exists at the path; it would be created.
    New,
    /// An entry of the planned kind exists and would be left alone.
    Exists,
    /// A file exists and attached content would replace it.
    Overwrite,
    /// An entry of the opposite kind occupies the path.
    Conflict,
}

impl PathState {
    pub fn is_conflict(self) -> bool {
        matches!(self, Self::Conflict)
    }

    /// Stable lowercase tag used by plain renderers and tests.
    pub fn label(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Exists => "exists",
            Self::Overwrite => "overwrite",
            Self::Conflict => "conflict",
        }
    }
}

impl fmt::Display for PathState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Non-fatal findings recorded while reconciling.
///
/// Warnings never change a path's state; they exist so callers can surface
/// them instead of silently losing information.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlanWarning {
    /// A capture block resolved to a path that is not a planned file; its
    /// content was dropped.
    UnmatchedContent { identifier: String, line: u32 },
    /// A capture block carried no identifier at all.
    MissingContentTarget { line: u32 },
    /// A planned file shares its name with existing files elsewhere under
    /// the root.
    DuplicateName {
        planned: PathBuf,
        existing: Vec<PathBuf>,
    },
    /// A planned file's name closely resembles an existing file's name.
    SimilarName {
        planned: PathBuf,
        existing: PathBuf,
        ratio: f64,
    },
}

impl fmt::Display for PlanWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnmatchedContent { identifier, line } => write!(
                f,
                "content block '{identifier}' (line {line}) matches no planned file; content dropped"
            ),
            Self::MissingContentTarget { line } => {
                write!(f, "content block at line {line} names no target path")
            }
            Self::DuplicateName { planned, existing } => write!(
                f,
                "'{}' duplicates the name of {} existing file(s)",
                planned.display(),
                existing.len()
            ),
            Self::SimilarName {
                planned,
                existing,
                ratio,
            } => write!(
                f,
                "'{}' resembles existing '{}' ({:.0}% similar)",
                planned.display(),
                existing.display(),
                ratio * 100.0
            ),
        }
    }
}

/// Counts per state plus warning total, for summary lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PlanSummary {
    pub new: usize,
    pub exists: usize,
    pub overwrite: usize,
    pub conflicts: usize,
    pub warnings: usize,
}

/// Immutable reconciliation result.
///
/// Construction happens only through the reconciler; everything here is a
/// pure function of the parsed inputs and the snapshot answers, so two runs
/// over the same inputs produce identical plans.
#[derive(Debug, Clone, Serialize)]
pub struct Plan {
    pub(crate) root: PathBuf,
    pub(crate) planned_dirs: Vec<PathBuf>,
    pub(crate) planned_files: Vec<PathBuf>,
    pub(crate) file_contents: BTreeMap<PathBuf, String>,
    pub(crate) path_states: BTreeMap<PathBuf, PathState>,
    pub(crate) warnings: Vec<PlanWarning>,
}

impl Plan {
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Planned directories in declaration order.
    pub fn planned_dirs(&self) -> &[PathBuf] {
        &self.planned_dirs
    }

    /// Planned files in declaration order.
    pub fn planned_files(&self) -> &[PathBuf] {
        &self.planned_files
    }

    /// Content attached to a planned file, if any block provided one.
    pub fn content_for(&self, path: &Path) -> Option<&str> {
        self.file_contents.get(path).map(String::as_str)
    }

    /// All attached contents, in path order.
    pub fn file_contents(&self) -> impl Iterator<Item = (&Path, &str)> {
        self.file_contents
            .iter()
            .map(|(p, c)| (p.as_path(), c.as_str()))
    }

    pub fn state_of(&self, path: &Path) -> Option<PathState> {
        self.path_states.get(path).copied()
    }

    /// All planned paths with their states, in path order.
    pub fn states(&self) -> impl Iterator<Item = (&Path, PathState)> {
        self.path_states.iter().map(|(p, s)| (p.as_path(), *s))
    }

    /// Planned kind of a path, `None` when the path is not planned.
    pub fn kind_of(&self, path: &Path) -> Option<NodeKind> {
        if self.planned_dirs.iter().any(|p| p == path) {
            Some(NodeKind::Directory)
        } else if self.planned_files.iter().any(|p| p == path) {
            Some(NodeKind::File)
        } else {
            None
        }
    }

    pub fn warnings(&self) -> &[PlanWarning] {
        &self.warnings
    }

    pub fn has_conflicts(&self) -> bool {
        self.path_states.values().any(|s| s.is_conflict())
    }

    pub fn is_empty(&self) -> bool {
        self.planned_dirs.is_empty() && self.planned_files.is_empty()
    }

    pub fn summary(&self) -> PlanSummary {
        let mut summary = PlanSummary {
            warnings: self.warnings.len(),
            ..PlanSummary::default()
        };
        for state in self.path_states.values() {
            match state {
                PathState::New => summary.new += 1,
                PathState::Exists => summary.exists += 1,
                PathState::Overwrite => summary.overwrite += 1,
                PathState::Conflict => summary.conflicts += 1,
            }
        }
        summary
    }
}
