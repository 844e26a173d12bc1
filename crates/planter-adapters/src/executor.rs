//! Plan execution against a write-capable filesystem port.
//!
//! The executor consumes a finished [`Plan`]; it never re-inspects or
//! re-plans. Directories go first, shallowest to deepest, then files the
//! same way, so every parent exists before anything inside it.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use planter_core::{
    application::ports::FsWriter,
    domain::{PathState, Plan},
    error::PlanterResult,
};

/// Knobs for one execution run.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExecuteOptions {
    /// Rewrite `Overwrite` files instead of skipping them.
    pub force: bool,
    /// Walk the plan and log actions without touching the port.
    pub dry_run: bool,
}

/// One executed (or skipped) step, in execution order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    CreateDir,
    SkipDir,
    CreateFile,
    OverwriteFile,
    SkipFile,
    SkipConflict,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Action {
    pub path: PathBuf,
    pub kind: ActionKind,
}

/// Outcome counts plus the ordered action log.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExecutionReport {
    pub dirs_created: usize,
    pub dirs_skipped: usize,
    pub files_created: usize,
    pub files_overwritten: usize,
    pub files_skipped: usize,
    pub conflicts_skipped: usize,
    pub actions: Vec<Action>,
}

impl ExecutionReport {
    /// True when the run changed (or would change) nothing.
    pub fn is_noop(&self) -> bool {
        self.dirs_created == 0 && self.files_created == 0 && self.files_overwritten == 0
    }

    fn record(&mut self, path: &Path, kind: ActionKind) {
        match kind {
            ActionKind::CreateDir => self.dirs_created += 1,
            ActionKind::SkipDir => self.dirs_skipped += 1,
            ActionKind::CreateFile => self.files_created += 1,
            ActionKind::OverwriteFile => self.files_overwritten += 1,
            ActionKind::SkipFile => self.files_skipped += 1,
            ActionKind::SkipConflict => self.conflicts_skipped += 1,
        }
        self.actions.push(Action {
            path: path.to_path_buf(),
            kind,
        });
    }
}

/// Applies plans through an [`FsWriter`].
pub struct PlanExecutor {
    writer: Box<dyn FsWriter>,
}

impl PlanExecutor {
    /// Create an executor over the given write port.
    pub fn new(writer: Box<dyn FsWriter>) -> Self {
        Self { writer }
    }

    /// Apply `plan`, returning what happened.
    ///
    /// Stops at the first write failure; everything already written stays.
    /// A re-plan over the partial result classifies it as `Exists`.
    #[instrument(skip_all, fields(root = %plan.root().display(), dry_run = options.dry_run))]
    pub fn execute(&self, plan: &Plan, options: &ExecuteOptions) -> PlanterResult<ExecutionReport> {
        let mut report = ExecutionReport::default();

        for dir in sorted_by_depth(plan.planned_dirs()) {
            match plan.state_of(dir) {
                Some(PathState::Conflict) => {
                    warn!(path = %dir.display(), "conflicting directory left untouched");
                    report.record(dir, ActionKind::SkipConflict);
                }
                Some(PathState::Exists) => report.record(dir, ActionKind::SkipDir),
                _ => {
                    if !options.dry_run {
                        self.writer.create_dir_all(dir)?;
                    }
                    debug!(path = %dir.display(), "directory created");
                    report.record(dir, ActionKind::CreateDir);
                }
            }
        }

        for file in sorted_by_depth(plan.planned_files()) {
            match plan.state_of(file) {
                Some(PathState::Conflict) => {
                    warn!(path = %file.display(), "conflicting file left untouched");
                    report.record(file, ActionKind::SkipConflict);
                }
                Some(PathState::Exists) => report.record(file, ActionKind::SkipFile),
                Some(PathState::Overwrite) if !options.force => {
                    report.record(file, ActionKind::SkipFile);
                }
                Some(PathState::Overwrite) => {
                    if !options.dry_run {
                        self.writer
                            .write_file(file, plan.content_for(file).unwrap_or(""))?;
                    }
                    report.record(file, ActionKind::OverwriteFile);
                }
                _ => {
                    if !options.dry_run {
                        self.writer
                            .write_file(file, plan.content_for(file).unwrap_or(""))?;
                    }
                    report.record(file, ActionKind::CreateFile);
                }
            }
        }

        info!(
            dirs = report.dirs_created,
            files = report.files_created,
            overwritten = report.files_overwritten,
            skipped = report.dirs_skipped + report.files_skipped,
            conflicts = report.conflicts_skipped,
            "plan executed"
        );
        Ok(report)
    }
}

fn sorted_by_depth(paths: &[PathBuf]) -> Vec<&PathBuf> {
    let mut sorted: Vec<&PathBuf> = paths.iter().collect();
    sorted.sort_by(|a, b| {
        a.components()
            .count()
            .cmp(&b.components().count())
            .then_with(|| a.cmp(b))
    });
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filesystem::MemoryFilesystem;
    use planter_core::application::{Reconciler, ports::FsInspector};
    use std::path::Path;

    fn plan_on(fs: &MemoryFilesystem, text: &str) -> Plan {
        let reconciler = Reconciler::new(Box::new(fs.clone()));
        reconciler.plan_from_text(Path::new("/r"), text).unwrap()
    }

    const TEXT: &str = "@ROOT {{R}}\n\
                        {{R}}/\n\
                        \tsrc/\n\
                        \t\tmain.rs\n\
                        \tREADME.md\n\
                        @@@FILE_BEGIN {{R}}/src/main.rs\n\
                        fn main() {}\n\
                        @@@FILE_END\n";

    #[test]
    fn creates_dirs_then_files_with_content() {
        let fs = MemoryFilesystem::new();
        fs.add_dir("/r");
        let plan = plan_on(&fs, TEXT);

        let executor = PlanExecutor::new(Box::new(fs.clone()));
        let report = executor.execute(&plan, &ExecuteOptions::default()).unwrap();

        assert_eq!(report.dirs_created, 1);
        assert_eq!(report.files_created, 2);
        assert_eq!(
            fs.read_file(Path::new("/r/src/main.rs")).as_deref(),
            Some("fn main() {}\n")
        );
        // Files without content come out empty.
        assert_eq!(fs.read_file(Path::new("/r/README.md")).as_deref(), Some(""));
    }

    #[test]
    fn rerun_skips_everything() {
        let fs = MemoryFilesystem::new();
        fs.add_dir("/r");
        let executor = PlanExecutor::new(Box::new(fs.clone()));
        executor
            .execute(&plan_on(&fs, TEXT), &ExecuteOptions::default())
            .unwrap();

        // Second round: everything already there. main.rs now classifies as
        // Overwrite because content is attached, and force is off.
        let report = executor
            .execute(&plan_on(&fs, TEXT), &ExecuteOptions::default())
            .unwrap();

        assert!(report.is_noop());
        assert_eq!(report.dirs_skipped, 1);
        assert_eq!(report.files_skipped, 2);
    }

    #[test]
    fn force_rewrites_overwrite_files() {
        let fs = MemoryFilesystem::new();
        fs.add_dir("/r");
        fs.add_dir("/r/src");
        fs.add_file("/r/src/main.rs", "old\n");
        let plan = plan_on(&fs, TEXT);
        assert_eq!(
            plan.state_of(Path::new("/r/src/main.rs")),
            Some(PathState::Overwrite)
        );

        let executor = PlanExecutor::new(Box::new(fs.clone()));
        let report = executor
            .execute(
                &plan,
                &ExecuteOptions {
                    force: true,
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(report.files_overwritten, 1);
        assert_eq!(
            fs.read_file(Path::new("/r/src/main.rs")).as_deref(),
            Some("fn main() {}\n")
        );
    }

    #[test]
    fn without_force_overwrite_files_are_skipped() {
        let fs = MemoryFilesystem::new();
        fs.add_dir("/r");
        fs.add_dir("/r/src");
        fs.add_file("/r/src/main.rs", "old\n");
        let plan = plan_on(&fs, TEXT);

        let executor = PlanExecutor::new(Box::new(fs.clone()));
        executor.execute(&plan, &ExecuteOptions::default()).unwrap();

        assert_eq!(
            fs.read_file(Path::new("/r/src/main.rs")).as_deref(),
            Some("old\n")
        );
    }

    #[test]
    fn conflicts_are_never_touched_even_with_force() {
        let fs = MemoryFilesystem::new();
        fs.add_dir("/r");
        fs.add_dir("/r/README.md");
        let plan = plan_on(&fs, TEXT);
        assert_eq!(
            plan.state_of(Path::new("/r/README.md")),
            Some(PathState::Conflict)
        );

        let executor = PlanExecutor::new(Box::new(fs.clone()));
        let report = executor
            .execute(
                &plan,
                &ExecuteOptions {
                    force: true,
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(report.conflicts_skipped, 1);
        // Still a directory, not replaced by a file.
        assert!(fs.read_file(Path::new("/r/README.md")).is_none());
    }

    #[test]
    fn dry_run_reports_without_writing() {
        let fs = MemoryFilesystem::new();
        fs.add_dir("/r");
        let plan = plan_on(&fs, TEXT);

        let executor = PlanExecutor::new(Box::new(fs.clone()));
        let report = executor
            .execute(
                &plan,
                &ExecuteOptions {
                    dry_run: true,
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(report.dirs_created, 1);
        assert_eq!(report.files_created, 2);
        assert!(fs.list_files().is_empty());
        assert_eq!(fs.inspect(Path::new("/r/src")), None);
    }

    #[test]
    fn actions_come_out_in_execution_order() {
        let fs = MemoryFilesystem::new();
        fs.add_dir("/r");
        let plan = plan_on(&fs, TEXT);

        let executor = PlanExecutor::new(Box::new(fs.clone()));
        let report = executor.execute(&plan, &ExecuteOptions::default()).unwrap();

        let kinds: Vec<&ActionKind> = report.actions.iter().map(|a| &a.kind).collect();
        assert_eq!(
            kinds,
            vec![
                &ActionKind::CreateDir,
                &ActionKind::CreateFile,
                &ActionKind::CreateFile,
            ]
        );
        // README.md (depth 2) sorts before src/main.rs (depth 3).
        assert_eq!(report.actions[1].path, PathBuf::from("/r/README.md"));
    }
}
