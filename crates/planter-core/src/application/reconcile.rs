//! Reconciler - main application orchestrator.
//!
//! This service merges the three planning inputs into one [`Plan`]:
//! 1. Parsed tree nodes (what should exist)
//! 2. Parsed content blocks (what some files should contain)
//! 3. A read-only filesystem snapshot (what already exists)
//!
//! Nothing here writes to disk. Conflicts are recorded in the plan, never
//! raised; the only hard failures are parse errors and an unusable root.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::{
    application::{ApplicationError, ports::FsInspector},
    domain::{
        AnalysisOptions, CapturePolicy, ContentBlock, NodeKind, ParsedTree, PathState, Plan,
        PlanWarning, analysis, policy_for,
    },
    error::PlanterResult,
    parser::{parse_blocks, parse_tree, text_before_first_marker},
};

/// Builds plans from parsed inputs and a filesystem snapshot.
pub struct Reconciler {
    inspector: Box<dyn FsInspector>,
}

impl Reconciler {
    /// Create a reconciler over the given snapshot source.
    pub fn new(inspector: Box<dyn FsInspector>) -> Self {
        Self { inspector }
    }

    /// Build a plan from one combined input text.
    ///
    /// Tree entries come first; the first block marker line ends the tree
    /// section. Everything from that line on is block text.
    pub fn plan_from_text(&self, root: &Path, text: &str) -> PlanterResult<Plan> {
        self.plan_from_text_analyzed(root, text, &[], &AnalysisOptions::default())
    }

    /// Like [`Self::plan_from_text`], with an existing-file scan for name
    /// analysis.
    pub fn plan_from_text_analyzed(
        &self,
        root: &Path,
        text: &str,
        existing: &[PathBuf],
        options: &AnalysisOptions,
    ) -> PlanterResult<Plan> {
        let tree = parse_tree(text_before_first_marker(text), root)?;
        let blocks = parse_blocks(text)?;
        self.build_plan_analyzed(&tree, &blocks, existing, options)
    }

    /// Build a plan from already-parsed inputs.
    pub fn build_plan(&self, tree: &ParsedTree, blocks: &[ContentBlock]) -> PlanterResult<Plan> {
        self.build_plan_analyzed(tree, blocks, &[], &AnalysisOptions::default())
    }

    /// Build a plan and compare planned files against an existing-file scan.
    ///
    /// `existing` is whatever snapshot of current files the caller gathered;
    /// pass an empty slice to skip name analysis entirely.
    #[instrument(
        skip_all,
        fields(root = %tree.root().display(), nodes = tree.nodes().len(), blocks = blocks.len())
    )]
    pub fn build_plan_analyzed(
        &self,
        tree: &ParsedTree,
        blocks: &[ContentBlock],
        existing: &[PathBuf],
        options: &AnalysisOptions,
    ) -> PlanterResult<Plan> {
        // 1. The root must be a directory that already exists.
        self.check_root(tree.root())?;

        // 2. Split nodes by kind.
        let mut planned_dirs: Vec<PathBuf> = Vec::new();
        let mut planned_files: Vec<PathBuf> = Vec::new();
        for node in tree.nodes() {
            match node.kind {
                NodeKind::Directory => planned_dirs.push(node.path.clone()),
                NodeKind::File => planned_files.push(node.path.clone()),
            }
        }

        // 3. Attach block content to planned files.
        let mut warnings: Vec<PlanWarning> = Vec::new();
        let file_contents = self.resolve_contents(tree, blocks, &planned_files, &mut warnings);

        // 4. Classify every planned path against the snapshot, exactly once.
        let mut path_states: BTreeMap<PathBuf, PathState> = BTreeMap::new();
        for dir in &planned_dirs {
            let state = match self.inspector.inspect(dir) {
                None => PathState::New,
                Some(NodeKind::Directory) => PathState::Exists,
                Some(NodeKind::File) => PathState::Conflict,
            };
            path_states.insert(dir.clone(), state);
        }
        for file in &planned_files {
            let state = match self.inspector.inspect(file) {
                None => PathState::New,
                Some(NodeKind::File) if file_contents.contains_key(file) => PathState::Overwrite,
                Some(NodeKind::File) => PathState::Exists,
                Some(NodeKind::Directory) => PathState::Conflict,
            };
            path_states.insert(file.clone(), state);
        }

        // 5. Compare names against the existing-file scan.
        warnings.extend(analysis::analyze(&planned_files, existing, options));

        let plan = Plan {
            root: tree.root().to_path_buf(),
            planned_dirs,
            planned_files,
            file_contents,
            path_states,
            warnings,
        };

        let summary = plan.summary();
        info!(
            new = summary.new,
            exists = summary.exists,
            overwrite = summary.overwrite,
            conflicts = summary.conflicts,
            warnings = summary.warnings,
            "plan reconciled"
        );
        Ok(plan)
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    /// Reject roots the planner cannot work under.
    fn check_root(&self, root: &Path) -> Result<(), ApplicationError> {
        if root.as_os_str().is_empty() {
            return Err(ApplicationError::EmptyRootPath);
        }
        match self.inspector.inspect(root) {
            Some(NodeKind::Directory) => Ok(()),
            Some(NodeKind::File) => Err(ApplicationError::RootNotADirectory {
                path: root.to_path_buf(),
            }),
            None => Err(ApplicationError::RootNotFound {
                path: root.to_path_buf(),
            }),
        }
    }

    /// Map capture blocks onto planned file paths.
    ///
    /// Membership in `planned_files` is the gate: content only ever attaches
    /// to a file the tree names. Everything else becomes a warning, and for
    /// one path declared twice the later block wins.
    fn resolve_contents(
        &self,
        tree: &ParsedTree,
        blocks: &[ContentBlock],
        planned_files: &[PathBuf],
        warnings: &mut Vec<PlanWarning>,
    ) -> BTreeMap<PathBuf, String> {
        let file_set: HashSet<&Path> = planned_files.iter().map(PathBuf::as_path).collect();
        let mut contents: BTreeMap<PathBuf, String> = BTreeMap::new();

        for block in blocks {
            // The parser only emits capture blocks, but blocks are plain data
            // and callers can hand-build them.
            if policy_for(&block.keyword) != Some(CapturePolicy::Capture) {
                continue;
            }
            let Some(identifier) = block.identifier.as_deref() else {
                warnings.push(PlanWarning::MissingContentTarget { line: block.line });
                continue;
            };

            let path = resolve_identifier(tree, identifier);
            if file_set.contains(path.as_path()) {
                debug!(path = %path.display(), line = block.line, "content attached");
                contents.insert(path, block.body.clone());
            } else {
                debug!(identifier, line = block.line, "content matches no planned file");
                warnings.push(PlanWarning::UnmatchedContent {
                    identifier: identifier.to_string(),
                    line: block.line,
                });
            }
        }

        contents
    }
}

/// Resolve a block identifier to an absolute path under the tree's root.
///
/// The root alias prefix is optional; with or without it, the remainder is
/// joined component by component so both separator styles resolve the same.
fn resolve_identifier(tree: &ParsedTree, identifier: &str) -> PathBuf {
    let relative = tree
        .declaration()
        .strip_alias(identifier)
        .unwrap_or(identifier);

    let mut path = tree.root().to_path_buf();
    for component in relative
        .split(['/', '\\'])
        .filter(|c| !c.is_empty() && *c != ".")
    {
        path.push(component);
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Snapshot fake: a fixed map from path to kind.
    struct FakeInspector {
        entries: HashMap<PathBuf, NodeKind>,
    }

    impl FakeInspector {
        fn new(entries: &[(&str, NodeKind)]) -> Self {
            Self {
                entries: entries
                    .iter()
                    .map(|(p, k)| (PathBuf::from(p), *k))
                    .collect(),
            }
        }
    }

    impl FsInspector for FakeInspector {
        fn inspect(&self, path: &Path) -> Option<NodeKind> {
            self.entries.get(path).copied()
        }
    }

    fn reconciler(entries: &[(&str, NodeKind)]) -> Reconciler {
        Reconciler::new(Box::new(FakeInspector::new(entries)))
    }

    fn tree(text: &str) -> ParsedTree {
        parse_tree(text, Path::new("/project")).unwrap()
    }

    fn file_block(identifier: &str, body: &str, line: u32) -> ContentBlock {
        ContentBlock {
            keyword: "FILE".to_string(),
            identifier: Some(identifier.to_string()),
            body: body.to_string(),
            line,
        }
    }

    const TREE: &str = "@ROOT {{Root}}\n{{Root}}/\n\tsrc/\n\t\tmain.rs\n\tREADME.md\n";

    // ── root checks ──────────────────────────────────────────────────────

    #[test]
    fn missing_root_directory_is_an_error() {
        let r = reconciler(&[]);
        let err = r.build_plan(&tree(TREE), &[]).unwrap_err();
        assert!(matches!(
            err,
            crate::error::PlanterError::Application(ApplicationError::RootNotFound { .. })
        ));
    }

    #[test]
    fn root_that_is_a_file_is_an_error() {
        let r = reconciler(&[("/project", NodeKind::File)]);
        let err = r.build_plan(&tree(TREE), &[]).unwrap_err();
        assert!(matches!(
            err,
            crate::error::PlanterError::Application(ApplicationError::RootNotADirectory { .. })
        ));
    }

    #[test]
    fn empty_root_path_is_an_error() {
        let r = reconciler(&[]);
        let parsed = parse_tree(TREE, Path::new("")).unwrap();
        let err = r.build_plan(&parsed, &[]).unwrap_err();
        assert!(matches!(
            err,
            crate::error::PlanterError::Application(ApplicationError::EmptyRootPath)
        ));
    }

    // ── classification ───────────────────────────────────────────────────

    #[test]
    fn absent_paths_classify_as_new() {
        let r = reconciler(&[("/project", NodeKind::Directory)]);
        let plan = r.build_plan(&tree(TREE), &[]).unwrap();

        assert_eq!(plan.state_of(Path::new("/project/src")), Some(PathState::New));
        assert_eq!(
            plan.state_of(Path::new("/project/src/main.rs")),
            Some(PathState::New)
        );
        assert_eq!(
            plan.state_of(Path::new("/project/README.md")),
            Some(PathState::New)
        );
        assert!(!plan.has_conflicts());
    }

    #[test]
    fn matching_kinds_classify_as_exists() {
        let r = reconciler(&[
            ("/project", NodeKind::Directory),
            ("/project/src", NodeKind::Directory),
            ("/project/README.md", NodeKind::File),
        ]);
        let plan = r.build_plan(&tree(TREE), &[]).unwrap();

        assert_eq!(plan.state_of(Path::new("/project/src")), Some(PathState::Exists));
        assert_eq!(
            plan.state_of(Path::new("/project/README.md")),
            Some(PathState::Exists)
        );
    }

    #[test]
    fn existing_file_with_content_classifies_as_overwrite() {
        let r = reconciler(&[
            ("/project", NodeKind::Directory),
            ("/project/README.md", NodeKind::File),
        ]);
        let blocks = vec![file_block("{{Root}}/README.md", "# hi\n", 1)];
        let plan = r.build_plan(&tree(TREE), &blocks).unwrap();

        assert_eq!(
            plan.state_of(Path::new("/project/README.md")),
            Some(PathState::Overwrite)
        );
        assert_eq!(plan.content_for(Path::new("/project/README.md")), Some("# hi\n"));
    }

    #[test]
    fn absent_file_with_content_stays_new() {
        let r = reconciler(&[("/project", NodeKind::Directory)]);
        let blocks = vec![file_block("{{Root}}/README.md", "# hi\n", 1)];
        let plan = r.build_plan(&tree(TREE), &blocks).unwrap();

        assert_eq!(
            plan.state_of(Path::new("/project/README.md")),
            Some(PathState::New)
        );
        assert_eq!(plan.content_for(Path::new("/project/README.md")), Some("# hi\n"));
    }

    #[test]
    fn kind_mismatch_is_recorded_not_raised() {
        let r = reconciler(&[
            ("/project", NodeKind::Directory),
            ("/project/src", NodeKind::File),
            ("/project/README.md", NodeKind::Directory),
        ]);
        let plan = r.build_plan(&tree(TREE), &[]).unwrap();

        assert_eq!(plan.state_of(Path::new("/project/src")), Some(PathState::Conflict));
        assert_eq!(
            plan.state_of(Path::new("/project/README.md")),
            Some(PathState::Conflict)
        );
        assert!(plan.has_conflicts());
        // Non-conflicting siblings still classify normally.
        assert_eq!(
            plan.state_of(Path::new("/project/src/main.rs")),
            Some(PathState::New)
        );
    }

    #[test]
    fn summary_counts_every_state() {
        let r = reconciler(&[
            ("/project", NodeKind::Directory),
            ("/project/src", NodeKind::Directory),
            ("/project/README.md", NodeKind::Directory),
        ]);
        let plan = r.build_plan(&tree(TREE), &[]).unwrap();
        let summary = plan.summary();

        assert_eq!(summary.new, 1);
        assert_eq!(summary.exists, 1);
        assert_eq!(summary.overwrite, 0);
        assert_eq!(summary.conflicts, 1);
    }

    // ── content resolution ───────────────────────────────────────────────

    #[test]
    fn identifier_without_alias_prefix_still_resolves() {
        let r = reconciler(&[("/project", NodeKind::Directory)]);
        let blocks = vec![file_block("src/main.rs", "fn main() {}\n", 1)];
        let plan = r.build_plan(&tree(TREE), &blocks).unwrap();

        assert_eq!(
            plan.content_for(Path::new("/project/src/main.rs")),
            Some("fn main() {}\n")
        );
        assert!(plan.warnings().is_empty());
    }

    #[test]
    fn backslash_identifier_resolves_like_forward_slash() {
        let r = reconciler(&[("/project", NodeKind::Directory)]);
        let blocks = vec![file_block("{{Root}}\\src\\main.rs", "x\n", 1)];
        let plan = r.build_plan(&tree(TREE), &blocks).unwrap();

        assert_eq!(plan.content_for(Path::new("/project/src/main.rs")), Some("x\n"));
    }

    #[test]
    fn unmatched_identifier_drops_content_with_warning() {
        let r = reconciler(&[("/project", NodeKind::Directory)]);
        let blocks = vec![file_block("{{Root}}/nowhere.txt", "lost\n", 7)];
        let plan = r.build_plan(&tree(TREE), &blocks).unwrap();

        assert!(plan.content_for(Path::new("/project/nowhere.txt")).is_none());
        assert_eq!(
            plan.warnings(),
            &[PlanWarning::UnmatchedContent {
                identifier: "{{Root}}/nowhere.txt".to_string(),
                line: 7,
            }]
        );
        // The path never entered the plan at all.
        assert_eq!(plan.state_of(Path::new("/project/nowhere.txt")), None);
    }

    #[test]
    fn identifier_naming_a_directory_is_unmatched() {
        let r = reconciler(&[("/project", NodeKind::Directory)]);
        let blocks = vec![file_block("{{Root}}/src", "not file content\n", 3)];
        let plan = r.build_plan(&tree(TREE), &blocks).unwrap();

        assert!(matches!(
            plan.warnings(),
            [PlanWarning::UnmatchedContent { .. }]
        ));
    }

    #[test]
    fn missing_identifier_warns() {
        let r = reconciler(&[("/project", NodeKind::Directory)]);
        let blocks = vec![ContentBlock {
            keyword: "FILE".to_string(),
            identifier: None,
            body: "orphan\n".to_string(),
            line: 4,
        }];
        let plan = r.build_plan(&tree(TREE), &blocks).unwrap();

        assert_eq!(
            plan.warnings(),
            &[PlanWarning::MissingContentTarget { line: 4 }]
        );
    }

    #[test]
    fn later_block_for_same_path_wins() {
        let r = reconciler(&[("/project", NodeKind::Directory)]);
        let blocks = vec![
            file_block("{{Root}}/README.md", "first\n", 1),
            file_block("{{Root}}/README.md", "second\n", 5),
        ];
        let plan = r.build_plan(&tree(TREE), &blocks).unwrap();

        assert_eq!(plan.content_for(Path::new("/project/README.md")), Some("second\n"));
    }

    #[test]
    fn non_capture_blocks_never_attach() {
        let r = reconciler(&[("/project", NodeKind::Directory)]);
        let blocks = vec![ContentBlock {
            keyword: "COMMENT".to_string(),
            identifier: Some("{{Root}}/README.md".to_string()),
            body: "note\n".to_string(),
            line: 1,
        }];
        let plan = r.build_plan(&tree(TREE), &blocks).unwrap();

        assert!(plan.content_for(Path::new("/project/README.md")).is_none());
        assert!(plan.warnings().is_empty());
    }

    // ── combined input ───────────────────────────────────────────────────

    #[test]
    fn plan_from_text_splits_tree_and_blocks() {
        let r = reconciler(&[("/project", NodeKind::Directory)]);
        let text = "@ROOT {{Root}}\n\
                    {{Root}}/\n\
                    \tsrc/\n\
                    \t\tmain.rs\n\
                    @@@FILE_BEGIN {{Root}}/src/main.rs\n\
                    fn main() {}\n\
                    @@@FILE_END\n";
        let plan = r.plan_from_text(Path::new("/project"), text).unwrap();

        assert_eq!(plan.planned_dirs(), &[PathBuf::from("/project/src")]);
        assert_eq!(
            plan.content_for(Path::new("/project/src/main.rs")),
            Some("fn main() {}\n")
        );
    }

    #[test]
    fn plan_from_text_propagates_block_errors() {
        let r = reconciler(&[("/project", NodeKind::Directory)]);
        let text = "@ROOT {{R}}\n\
                    {{R}}/\n\
                    \ta.txt\n\
                    @@@FILE_BEGIN {{R}}/a.txt\n\
                    body\n";
        let err = r.plan_from_text(Path::new("/project"), text).unwrap_err();
        assert!(matches!(err, crate::error::PlanterError::Block(_)));
    }

    // ── analysis passthrough ─────────────────────────────────────────────

    #[test]
    fn analyzed_plan_carries_name_warnings() {
        let r = reconciler(&[("/project", NodeKind::Directory)]);
        let existing = vec![PathBuf::from("/project/docs/README.md")];
        let plan = r
            .build_plan_analyzed(&tree(TREE), &[], &existing, &AnalysisOptions::default())
            .unwrap();

        assert!(plan
            .warnings()
            .iter()
            .any(|w| matches!(w, PlanWarning::DuplicateName { .. })));
    }

    #[test]
    fn plan_from_text_analyzed_runs_the_same_checks() {
        let r = reconciler(&[("/project", NodeKind::Directory)]);
        let existing = vec![PathBuf::from("/project/docs/README.md")];
        let plan = r
            .plan_from_text_analyzed(
                Path::new("/project"),
                TREE,
                &existing,
                &AnalysisOptions::default(),
            )
            .unwrap();

        assert!(plan
            .warnings()
            .iter()
            .any(|w| matches!(w, PlanWarning::DuplicateName { .. })));
    }
}
