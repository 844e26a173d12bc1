// ============================================================================
// domain/error.rs - PARSE ERROR DOMAIN
// ============================================================================

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::node::{IndentUnit, NodeKind};

/// Errors raised while parsing tree structure text.
///
/// All errors are:
/// - Cloneable (for retry logic)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
///
/// Every variant that concerns a specific line carries its 1-based number.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StructuralError {
    // ========================================================================
    // Declaration Errors
    // ========================================================================
    #[error("Tree text must contain an '@ROOT {{{{alias}}}}' declaration")]
    MissingRootDeclaration,

    #[error("Invalid '@ROOT' declaration at line {line}: expected an alias like '{{{{Root}}}}'")]
    InvalidRootDeclaration { line: u32 },

    #[error("Tree text declares root '{alias}' but contains no entries")]
    EmptyTree { alias: String },

    #[error("The first tree entry must be the root alias '{alias}/', found '{found}' at line {line}")]
    FirstEntryNotRoot {
        line: u32,
        alias: String,
        found: String,
    },

    #[error("Root alias entry '{alias}' at line {line} must be a directory (end with '/')")]
    RootEntryNotDirectory { line: u32, alias: String },

    // ========================================================================
    // Indentation Errors
    // ========================================================================
    #[error("Mixed tabs and spaces in the indentation at line {line}")]
    MixedIndentation { line: u32 },

    #[error("Indentation at line {line} is {width} space(s), not a whole number of 4-space units")]
    PartialIndentation { line: u32, width: usize },

    #[error("Indentation at line {line} uses {found} but this tree uses {expected}")]
    IndentUnitMismatch {
        line: u32,
        expected: IndentUnit,
        found: IndentUnit,
    },

    #[error(
        "Entry at line {line} jumps to depth {depth} under a parent at depth {parent_depth}; nesting may only deepen one level at a time"
    )]
    LevelSkip {
        line: u32,
        depth: usize,
        parent_depth: usize,
    },

    // ========================================================================
    // Entry Errors
    // ========================================================================
    #[error("Entry '{found}' at line {line} is outside the declared root")]
    UnrootedEntry { line: u32, found: String },

    #[error("Entry at line {line} has no name")]
    EmptyEntryName { line: u32 },

    #[error("Entry name '{name}' at line {line} must not start with a path separator")]
    AbsoluteEntryName { line: u32, name: String },

    #[error("Entry name '{name}' at line {line} must not contain '..'")]
    TraversalEntryName { line: u32, name: String },

    #[error("Entry name '{name}' at line {line} must not contain a drive letter")]
    DriveEntryName { line: u32, name: String },

    #[error("Entry name '{name}' at line {line} must be a single path component")]
    SeparatorInEntryName { line: u32, name: String },

    #[error("Conflicting declarations for '{path}': {second} at line {line} after {first}")]
    KindConflict {
        line: u32,
        path: PathBuf,
        first: NodeKind,
        second: NodeKind,
    },
}

impl StructuralError {
    /// Line the error concerns, when it concerns one.
    pub fn line(&self) -> Option<u32> {
        match self {
            Self::MissingRootDeclaration | Self::EmptyTree { .. } => None,
            Self::InvalidRootDeclaration { line }
            | Self::FirstEntryNotRoot { line, .. }
            | Self::RootEntryNotDirectory { line, .. }
            | Self::MixedIndentation { line }
            | Self::PartialIndentation { line, .. }
            | Self::IndentUnitMismatch { line, .. }
            | Self::LevelSkip { line, .. }
            | Self::UnrootedEntry { line, .. }
            | Self::EmptyEntryName { line }
            | Self::AbsoluteEntryName { line, .. }
            | Self::TraversalEntryName { line, .. }
            | Self::DriveEntryName { line, .. }
            | Self::SeparatorInEntryName { line, .. }
            | Self::KindConflict { line, .. } => Some(*line),
        }
    }

    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::MissingRootDeclaration | Self::InvalidRootDeclaration { .. } => vec![
                "Start the tree text with a declaration like: @ROOT {{Root}}".into(),
                "The alias is then the first entry: {{Root}}/".into(),
            ],
            Self::FirstEntryNotRoot { alias, .. } | Self::EmptyTree { alias } => vec![
                format!("Add '{alias}/' as the first (unindented) entry"),
                "Every other entry nests under it by indentation".into(),
            ],
            Self::MixedIndentation { .. }
            | Self::PartialIndentation { .. }
            | Self::IndentUnitMismatch { .. } => vec![
                "Indent with tabs, or with runs of exactly 4 spaces".into(),
                "Pick one style and keep it for the whole tree".into(),
            ],
            Self::LevelSkip { .. } => vec![
                "Each entry may be at most one level deeper than the entry above it".into(),
            ],
            Self::KindConflict { path, .. } => vec![
                format!("'{}' is declared both with and without a trailing '/'", path.display()),
                "A path is either a directory or a file, never both".into(),
            ],
            _ => vec!["Entry names are single path components like 'src/' or 'main.rs'".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::Validation
    }
}

/// Errors raised while parsing block content text.
///
/// Structure is validated over the whole text before any body is extracted,
/// so these fire even for blocks whose keyword would be discarded.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BlockError {
    #[error(
        "Nested block: '{keyword}' begins at line {line} before '{open_keyword}' from line {open_line} was closed"
    )]
    NestedBlock {
        line: u32,
        keyword: String,
        open_keyword: String,
        open_line: u32,
    },

    #[error("Mismatched block tags: expected '@@@{expected}_END' but found '@@@{found}_END' at line {line}")]
    MismatchedEnd {
        line: u32,
        expected: String,
        found: String,
    },

    #[error("Unexpected '@@@{keyword}_END' at line {line} with no open block")]
    StrayEnd { line: u32, keyword: String },

    #[error("Block '{keyword}' begins at line {line} but is never closed")]
    UnterminatedBlock { line: u32, keyword: String },
}

impl BlockError {
    /// Line the error concerns (1-based).
    pub fn line(&self) -> u32 {
        match self {
            Self::NestedBlock { line, .. }
            | Self::MismatchedEnd { line, .. }
            | Self::StrayEnd { line, .. }
            | Self::UnterminatedBlock { line, .. } => *line,
        }
    }

    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::NestedBlock { open_keyword, open_line, .. } => vec![
                format!("Close the '{open_keyword}' block from line {open_line} before opening another"),
                "Blocks never nest".into(),
            ],
            Self::MismatchedEnd { expected, .. } => {
                vec![format!("Close the open block with '@@@{expected}_END'")]
            }
            Self::StrayEnd { .. } => {
                vec!["Remove the stray end marker or add the matching begin marker above it".into()]
            }
            Self::UnterminatedBlock { keyword, .. } => {
                vec![format!("Add '@@@{keyword}_END' after the block body")]
            }
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::Validation
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Internal,
}
