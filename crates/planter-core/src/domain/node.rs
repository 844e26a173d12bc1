//! Tree nodes and the root declaration.
//!
//! A tree text names one logical root via `@ROOT {{Alias}}` and then lists
//! entries relative to it, one per line, nested by indentation. Parsing
//! produces a [`ParsedTree`]: the declaration plus the ordered
//! [`PlannedNode`]s with their paths already resolved under the real root
//! directory.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// Kind of a planned entry, decided solely by the trailing `/` in tree text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Directory,
    File,
}

impl NodeKind {
    pub fn is_dir(self) -> bool {
        matches!(self, Self::Directory)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Directory => write!(f, "directory"),
            Self::File => write!(f, "file"),
        }
    }
}

/// Indentation unit in force for one tree text.
///
/// The first indented entry fixes the unit; later entries must keep using it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndentUnit {
    Tabs,
    /// Runs of four spaces per level, as the canonical generator writes.
    Spaces,
}

impl fmt::Display for IndentUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tabs => write!(f, "tabs"),
            Self::Spaces => write!(f, "4-space runs"),
        }
    }
}

/// The `@ROOT` declaration binding an alias token to the logical root.
///
/// The alias is either a placeholder like `{{Root}}` or a bare token. Tree
/// entries and block identifiers reference the root through it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootDeclaration {
    alias: String,
    line: u32,
}

impl RootDeclaration {
    pub(crate) fn new(alias: impl Into<String>, line: u32) -> Self {
        Self {
            alias: alias.into(),
            line,
        }
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// Line the declaration was found on (1-based).
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Strip the alias prefix from a block identifier.
    ///
    /// Returns the remainder with leading separators removed, or `None` when
    /// the identifier does not start with the alias.
    pub fn strip_alias<'a>(&self, identifier: &'a str) -> Option<&'a str> {
        identifier
            .strip_prefix(self.alias.as_str())
            .map(|rest| rest.trim_start_matches(['/', '\\']))
    }
}

impl fmt::Display for RootDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@ROOT {}", self.alias)
    }
}

/// One entry of the parsed tree, path resolved under the real root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedNode {
    pub path: PathBuf,
    pub kind: NodeKind,
    /// Nesting depth: direct children of the root are at depth 1.
    pub depth: usize,
}

/// Output of the tree parser: root, declaration, and ordered nodes.
///
/// Nodes appear in source order of their first declaration. The root alias
/// entry itself is consumed by validation and is not a node.
#[derive(Debug, Clone)]
pub struct ParsedTree {
    pub(crate) root: PathBuf,
    pub(crate) declaration: RootDeclaration,
    pub(crate) nodes: Vec<PlannedNode>,
}

impl ParsedTree {
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn declaration(&self) -> &RootDeclaration {
        &self.declaration
    }

    pub fn nodes(&self) -> &[PlannedNode] {
        &self.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn directories(&self) -> impl Iterator<Item = &PlannedNode> {
        self.nodes.iter().filter(|n| n.kind.is_dir())
    }

    pub fn files(&self) -> impl Iterator<Item = &PlannedNode> {
        self.nodes.iter().filter(|n| !n.kind.is_dir())
    }
}
