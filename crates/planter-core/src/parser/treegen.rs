//! Canonical tree text generation, the inverse of the tree parser.
//!
//! Given root-relative paths, produce tree text that [`parse_tree`] accepts
//! back: `@ROOT` header, the alias directory line, 4-space indentation,
//! directories before files, names ordered case-insensitively.
//!
//! [`parse_tree`]: crate::parser::tree::parse_tree

use std::collections::HashMap;
use std::path::PathBuf;

use crate::domain::NodeKind;

const INDENT: &str = "    ";

#[derive(Default)]
struct DirNode {
    dirs: HashMap<String, DirNode>,
    files: Vec<String>,
}

impl DirNode {
    fn insert(&mut self, components: &[&str], kind: NodeKind) {
        let Some((head, rest)) = components.split_first() else {
            return;
        };
        if rest.is_empty() && kind == NodeKind::File {
            if !self.files.iter().any(|f| f == head) {
                self.files.push((*head).to_string());
            }
            return;
        }
        let child = self.dirs.entry((*head).to_string()).or_default();
        if !rest.is_empty() {
            child.insert(rest, kind);
        }
    }

    fn render(&self, depth: usize, out: &mut String) {
        let mut dir_names: Vec<&String> = self.dirs.keys().collect();
        dir_names.sort_by_key(|n| n.to_lowercase());
        for name in dir_names {
            for _ in 0..depth {
                out.push_str(INDENT);
            }
            out.push_str(name);
            out.push_str("/\n");
            if let Some(child) = self.dirs.get(name) {
                child.render(depth + 1, out);
            }
        }

        let mut file_names: Vec<&String> = self.files.iter().collect();
        file_names.sort_by_key(|n| n.to_lowercase());
        for name in file_names {
            for _ in 0..depth {
                out.push_str(INDENT);
            }
            out.push_str(name);
            out.push('\n');
        }
    }
}

/// Render root-relative entries as canonical tree text.
///
/// Ancestor directories are created implicitly, so a bare file list is
/// enough to produce a full tree.
pub fn generate_tree_text(alias: &str, entries: &[(PathBuf, NodeKind)]) -> String {
    let mut root = DirNode::default();
    for (path, kind) in entries {
        let text = path.to_string_lossy();
        let components: Vec<&str> = text
            .split(['/', '\\'])
            .filter(|c| !c.is_empty() && *c != ".")
            .collect();
        if components.is_empty() {
            continue;
        }
        root.insert(&components, *kind);
    }

    let mut out = format!("@ROOT {alias}\n\n{alias}/\n");
    root.render(1, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::tree::parse_tree;
    use std::path::Path;

    fn entries(items: &[(&str, NodeKind)]) -> Vec<(PathBuf, NodeKind)> {
        items
            .iter()
            .map(|(p, k)| (PathBuf::from(p), *k))
            .collect()
    }

    #[test]
    fn renders_header_and_sorted_children() {
        let text = generate_tree_text(
            "{{Root}}",
            &entries(&[
                ("zeta.txt", NodeKind::File),
                ("Alpha/inner.rs", NodeKind::File),
                ("beta", NodeKind::Directory),
            ]),
        );
        assert_eq!(
            text,
            "@ROOT {{Root}}\n\n{{Root}}/\n    Alpha/\n        inner.rs\n    beta/\n    zeta.txt\n"
        );
    }

    #[test]
    fn directories_sort_before_files_case_insensitively() {
        let text = generate_tree_text(
            "{{R}}",
            &entries(&[
                ("bb.txt", NodeKind::File),
                ("AA.txt", NodeKind::File),
                ("zz", NodeKind::Directory),
            ]),
        );
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[3], "    zz/");
        assert_eq!(lines[4], "    AA.txt");
        assert_eq!(lines[5], "    bb.txt");
    }

    #[test]
    fn ancestors_are_created_implicitly() {
        let text = generate_tree_text("{{R}}", &entries(&[("a/b/c.txt", NodeKind::File)]));
        assert!(text.contains("    a/\n        b/\n            c.txt\n"));
    }

    #[test]
    fn round_trips_through_the_parser() {
        let input = entries(&[
            ("Source/Core/Engine.h", NodeKind::File),
            ("Source/Core", NodeKind::Directory),
            ("README.md", NodeKind::File),
        ]);
        let text = generate_tree_text("{{Root}}", &input);
        let tree = parse_tree(&text, Path::new("/r")).unwrap();

        let mut got: Vec<(PathBuf, NodeKind)> = tree
            .nodes()
            .iter()
            .map(|n| (n.path.clone(), n.kind))
            .collect();
        got.sort_by(|a, b| a.0.cmp(&b.0));
        assert_eq!(
            got,
            vec![
                (PathBuf::from("/r/README.md"), NodeKind::File),
                (PathBuf::from("/r/Source"), NodeKind::Directory),
                (PathBuf::from("/r/Source/Core"), NodeKind::Directory),
                (PathBuf::from("/r/Source/Core/Engine.h"), NodeKind::File),
            ]
        );
    }

    #[test]
    fn duplicate_entries_render_once() {
        let text = generate_tree_text(
            "{{R}}",
            &entries(&[("a/x.h", NodeKind::File), ("a/x.h", NodeKind::File)]),
        );
        assert_eq!(text.matches("x.h").count(), 1);
    }
}
