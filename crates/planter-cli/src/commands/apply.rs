//! Implementation of the `planter apply` command.

use std::io::{self, Write};

use tracing::{info, instrument};

use planter_adapters::executor::{ActionKind, ExecuteOptions, ExecutionReport, PlanExecutor};
use planter_adapters::{LocalFilesystem, check_root, scan_existing_files};
use planter_core::application::Reconciler;

use crate::{
    cli::{ApplyArgs, GlobalArgs, OutputFormat},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
    render,
};

/// Execute the `planter apply` command.
///
/// Dispatch sequence:
/// 1. Run the safety gate on the root
/// 2. Read the structure file and build the plan
/// 3. Refuse recorded conflicts unless --force
/// 4. Show the preview and confirm, unless --yes / --quiet / --dry-run
/// 5. Execute through the local filesystem writer
/// 6. Report what happened
#[instrument(skip_all, fields(input = %args.input.display(), root = %args.root.display()))]
pub fn execute(
    args: ApplyArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let force = args.force || config.defaults.force;
    let dry_run = args.dry_run || config.defaults.dry_run;

    // ── 1. Safety gate ────────────────────────────────────────────────────
    let check = check_root(&args.root);
    if let Some(reason) = &check.blocked {
        return Err(CliError::RootRejected {
            path: args.root.clone(),
            reason: reason.to_string(),
        });
    }
    for warning in &check.warnings {
        output.warning(warning)?;
    }
    // --yes and --quiet skip the prompt, so a risky root needs the explicit
    // --allow-unsafe acknowledgment instead.
    let unattended = args.yes || global.quiet;
    if !check.warnings.is_empty() && !args.allow_unsafe && !dry_run && unattended {
        return Err(CliError::SafetyWarnings {
            path: args.root.clone(),
            warnings: check.warnings.clone(),
        });
    }

    // ── 2. Build the plan ─────────────────────────────────────────────────
    let text = super::plan::read_input(&args.input)?;
    let existing = if args.root.is_dir() {
        scan_existing_files(&args.root, &config.scan.scan_options())
    } else {
        Vec::new()
    };
    let reconciler = Reconciler::new(Box::new(LocalFilesystem::new()));
    let plan = reconciler
        .plan_from_text_analyzed(&args.root, &text, &existing, &config.scan.analysis_options())
        .map_err(CliError::Core)?;

    // ── 3. Conflicts stop an apply ────────────────────────────────────────
    let summary = plan.summary();
    if summary.conflicts > 0 && !force {
        return Err(CliError::ConflictsPresent {
            count: summary.conflicts,
        });
    }

    // ── 4. Preview and confirmation ───────────────────────────────────────
    if output.format() != OutputFormat::Json {
        output.print(&render::render_plan(&plan, output.supports_color()))?;
        for warning in plan.warnings() {
            output.warning(&warning.to_string())?;
        }
    }
    if !dry_run && !unattended && !confirm()? {
        return Err(CliError::Cancelled);
    }

    // ── 5. Execute ────────────────────────────────────────────────────────
    info!(force, dry_run, "applying plan");
    let executor = PlanExecutor::new(Box::new(LocalFilesystem::new()));
    let options = ExecuteOptions { force, dry_run };
    let report = executor.execute(&plan, &options).map_err(CliError::Core)?;

    // ── 6. Report ─────────────────────────────────────────────────────────
    report_outcome(&report, dry_run, &output)
}

/// Ask for confirmation on stdin.  Empty input counts as yes.
fn confirm() -> CliResult<bool> {
    print!("Continue? [Y/n] ");
    io::stdout().flush().map_err(|e| CliError::IoError {
        message: "failed to flush stdout".to_string(),
        source: e,
    })?;

    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .map_err(|e| CliError::IoError {
            message: "failed to read confirmation input".to_string(),
            source: e,
        })?;

    let input = input.trim().to_ascii_lowercase();
    Ok(input.is_empty() || input == "y" || input == "yes")
}

fn report_outcome(
    report: &ExecutionReport,
    dry_run: bool,
    output: &OutputManager,
) -> CliResult<()> {
    if output.format() == OutputFormat::Json {
        let json = serde_json::to_string_pretty(report).map_err(|e| CliError::IoError {
            message: "could not serialise the execution report".to_string(),
            source: e.into(),
        })?;
        println!("{json}");
        return Ok(());
    }

    for action in &report.actions {
        output.print(&format!(
            "{:<11} {}",
            action_label(&action.kind),
            action.path.display()
        ))?;
    }

    let line = format!(
        "{} dir(s) and {} file(s) created, {} overwritten, {} skipped, {} conflict(s) left untouched",
        report.dirs_created,
        report.files_created,
        report.files_overwritten,
        report.dirs_skipped + report.files_skipped,
        report.conflicts_skipped
    );
    if dry_run {
        output.info(&format!("Dry run: {line}"))?;
    } else if report.is_noop() {
        output.info("Nothing to do; everything is already in place")?;
    } else {
        output.success(&line)?;
    }
    Ok(())
}

fn action_label(kind: &ActionKind) -> &'static str {
    match kind {
        ActionKind::CreateDir => "[MKDIR]",
        ActionKind::SkipDir => "[SKIP DIR]",
        ActionKind::CreateFile => "[CREATE]",
        ActionKind::OverwriteFile => "[OVERWRITE]",
        ActionKind::SkipFile => "[SKIP]",
        ActionKind::SkipConflict => "[CONFLICT]",
    }
}
