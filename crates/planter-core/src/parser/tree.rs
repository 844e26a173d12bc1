//! Indentation-based tree structure parser.
//!
//! ## Format
//!
//! ```text
//! # comment lines and blank lines are skipped
//! @ROOT {{Root}}
//!
//! {{Root}}/
//!     Source/
//!         Core/
//!             Engine.h
//!             Engine.cpp
//!     README.md
//! ```
//!
//! Rules enforced here:
//!
//! - exactly one `@ROOT` declaration binds the alias (the first one wins)
//! - the first entry is the alias itself, as a directory; everything else
//!   nests under it
//! - indentation is tabs or 4-space runs, never mixed within a tree
//! - each entry is at most one level deeper than the entry above it
//! - entry names are single path components; a trailing `/` marks a
//!   directory
//! - re-declaring a path with the same kind is idempotent, with a
//!   conflicting kind it is an error
//!
//! Errors carry 1-based line numbers.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use crate::domain::{
    IndentUnit, NodeKind, ParsedTree, PlannedNode, RootDeclaration, error::StructuralError,
};

/// One line of tree text after indentation measurement.
struct RawEntry {
    depth: usize,
    name: String,
    kind: NodeKind,
    line: u32,
}

/// Parse tree text into a [`ParsedTree`] with paths resolved under `root`.
#[instrument(skip_all, fields(root = %root.display()))]
pub fn parse_tree(text: &str, root: &Path) -> Result<ParsedTree, StructuralError> {
    let mut declaration: Option<RootDeclaration> = None;
    let mut entries: Vec<RawEntry> = Vec::new();
    let mut unit: Option<IndentUnit> = None;

    for (idx, raw) in text.split('\n').enumerate() {
        let line = idx as u32 + 1;
        let trimmed = raw.trim();

        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        if trimmed.starts_with("@ROOT") {
            // The first declaration binds; later ones are ignored.
            if declaration.is_none() {
                declaration = Some(parse_root_declaration(trimmed, line)?);
            }
            continue;
        }

        let (depth, content) = measure_indent(raw, line, &mut unit)?;
        if content.is_empty() {
            continue;
        }

        let kind = if content.ends_with('/') {
            NodeKind::Directory
        } else {
            NodeKind::File
        };
        let name = content.strip_suffix('/').unwrap_or(content);
        validate_entry_name(name, line)?;

        entries.push(RawEntry {
            depth,
            name: name.to_string(),
            kind,
            line,
        });
    }

    let declaration = declaration.ok_or(StructuralError::MissingRootDeclaration)?;

    let Some(first) = entries.first() else {
        return Err(StructuralError::EmptyTree {
            alias: declaration.alias().to_string(),
        });
    };
    if first.depth != 0 || first.name != declaration.alias() {
        return Err(StructuralError::FirstEntryNotRoot {
            line: first.line,
            alias: declaration.alias().to_string(),
            found: first.name.clone(),
        });
    }
    if first.kind != NodeKind::Directory {
        return Err(StructuralError::RootEntryNotDirectory {
            line: first.line,
            alias: declaration.alias().to_string(),
        });
    }

    let nodes = resolve_nodes(root, &declaration, &entries)?;
    debug!(nodes = nodes.len(), "tree text parsed");

    Ok(ParsedTree {
        root: root.to_path_buf(),
        declaration,
        nodes,
    })
}

/// Walk the entries, resolving each against its parent on a depth stack.
fn resolve_nodes(
    root: &Path,
    declaration: &RootDeclaration,
    entries: &[RawEntry],
) -> Result<Vec<PlannedNode>, StructuralError> {
    // The bottom element is the root itself and is never popped.
    let mut stack: Vec<(usize, PathBuf)> = vec![(0, root.to_path_buf())];
    let mut nodes: Vec<PlannedNode> = Vec::new();
    let mut seen: HashMap<PathBuf, NodeKind> = HashMap::new();

    for entry in &entries[1..] {
        if entry.depth == 0 {
            // Only the alias itself may sit at the top level.
            if entry.name != declaration.alias() {
                return Err(StructuralError::UnrootedEntry {
                    line: entry.line,
                    found: entry.name.clone(),
                });
            }
            if entry.kind != NodeKind::Directory {
                return Err(StructuralError::RootEntryNotDirectory {
                    line: entry.line,
                    alias: declaration.alias().to_string(),
                });
            }
            stack.truncate(1);
            continue;
        }

        while stack.last().is_some_and(|(d, _)| *d >= entry.depth) {
            stack.pop();
        }
        let Some((parent_depth, parent)) = stack.last() else {
            return Err(StructuralError::UnrootedEntry {
                line: entry.line,
                found: entry.name.clone(),
            });
        };
        if entry.depth > parent_depth + 1 {
            return Err(StructuralError::LevelSkip {
                line: entry.line,
                depth: entry.depth,
                parent_depth: *parent_depth,
            });
        }

        let path = parent.join(&entry.name);
        match seen.get(&path) {
            Some(kind) if *kind == entry.kind => {
                // Idempotent re-declaration; re-anchor directories so their
                // children still resolve.
                if entry.kind == NodeKind::Directory {
                    stack.push((entry.depth, path));
                }
                continue;
            }
            Some(kind) => {
                return Err(StructuralError::KindConflict {
                    line: entry.line,
                    path,
                    first: *kind,
                    second: entry.kind,
                });
            }
            None => {}
        }

        seen.insert(path.clone(), entry.kind);
        nodes.push(PlannedNode {
            path: path.clone(),
            kind: entry.kind,
            depth: entry.depth,
        });
        if entry.kind == NodeKind::Directory {
            stack.push((entry.depth, path));
        }
    }

    Ok(nodes)
}

/// Measure leading whitespace into a depth, enforcing one unit per tree.
fn measure_indent<'a>(
    raw: &'a str,
    line: u32,
    unit: &mut Option<IndentUnit>,
) -> Result<(usize, &'a str), StructuralError> {
    let content_start = raw
        .find(|c: char| c != ' ' && c != '\t')
        .unwrap_or(raw.len());
    let prefix = &raw[..content_start];
    let content = raw[content_start..].trim_end();

    let tabs = prefix.bytes().filter(|b| *b == b'\t').count();
    let spaces = prefix.len() - tabs;

    if tabs > 0 && spaces > 0 {
        return Err(StructuralError::MixedIndentation { line });
    }

    let (found, depth) = if tabs > 0 {
        (IndentUnit::Tabs, tabs)
    } else if spaces > 0 {
        if spaces % 4 != 0 {
            return Err(StructuralError::PartialIndentation {
                line,
                width: spaces,
            });
        }
        (IndentUnit::Spaces, spaces / 4)
    } else {
        return Ok((0, content));
    };

    match unit {
        None => *unit = Some(found),
        Some(expected) if *expected != found => {
            return Err(StructuralError::IndentUnitMismatch {
                line,
                expected: *expected,
                found,
            });
        }
        Some(_) => {}
    }

    Ok((depth, content))
}

/// Parse `@ROOT {{Alias}}` or `@ROOT bare-token`.
fn parse_root_declaration(trimmed: &str, line: u32) -> Result<RootDeclaration, StructuralError> {
    let rest = &trimmed["@ROOT".len()..];
    if !rest.starts_with([' ', '\t']) {
        return Err(StructuralError::InvalidRootDeclaration { line });
    }
    let Some(token) = rest.split_whitespace().next() else {
        return Err(StructuralError::InvalidRootDeclaration { line });
    };

    let valid = if let Some(inner) = token.strip_prefix("{{") {
        match inner.strip_suffix("}}") {
            Some(word) => {
                !word.is_empty() && word.chars().all(|c| c.is_alphanumeric() || c == '_')
            }
            None => false,
        }
    } else {
        !token.contains(['{', '}'])
    };
    if !valid {
        return Err(StructuralError::InvalidRootDeclaration { line });
    }

    Ok(RootDeclaration::new(token, line))
}

/// Reject names that would escape the root or span components.
fn validate_entry_name(name: &str, line: u32) -> Result<(), StructuralError> {
    if name.is_empty() {
        return Err(StructuralError::EmptyEntryName { line });
    }
    if name.starts_with('/') || name.starts_with('\\') {
        return Err(StructuralError::AbsoluteEntryName {
            line,
            name: name.to_string(),
        });
    }
    if name.starts_with("..") || name.contains("/..") || name.contains("\\..") {
        return Err(StructuralError::TraversalEntryName {
            line,
            name: name.to_string(),
        });
    }
    if name.chars().nth(1) == Some(':') {
        return Err(StructuralError::DriveEntryName {
            line,
            name: name.to_string(),
        });
    }
    if name.contains('/') || name.contains('\\') {
        return Err(StructuralError::SeparatorInEntryName {
            line,
            name: name.to_string(),
        });
    }
    Ok(())
}
