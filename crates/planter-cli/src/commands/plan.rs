//! Implementation of the `planter plan` command.

use std::path::Path;

use tracing::{debug, instrument};

use planter_adapters::{LocalFilesystem, scan_existing_files};
use planter_core::application::Reconciler;

use crate::{
    cli::{OutputFormat, PlanArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
    render,
};

/// Execute the `planter plan` command.
///
/// Dispatch sequence:
/// 1. Read the structure file
/// 2. Scan the root for existing files (feeds the name analysis)
/// 3. Reconcile text and filesystem into a plan
/// 4. Render the plan (tree, plain, or JSON)
/// 5. Surface warnings and the conflict count
///
/// Conflicts are information here, not failures; the command exits 0 so the
/// plan can always be inspected.
#[instrument(skip_all, fields(input = %args.input.display(), root = %args.root.display()))]
pub fn execute(args: PlanArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    // ── 1. Read input ─────────────────────────────────────────────────────
    let text = read_input(&args.input)?;

    // ── 2. Scan existing files ────────────────────────────────────────────
    // Skipped when the root does not exist yet; the reconciler reports a
    // missing root with a proper error.
    let existing = if args.root.is_dir() {
        scan_existing_files(&args.root, &config.scan.scan_options())
    } else {
        Vec::new()
    };
    debug!(existing = existing.len(), "scan finished");

    // ── 3. Reconcile ──────────────────────────────────────────────────────
    let reconciler = Reconciler::new(Box::new(LocalFilesystem::new()));
    let plan = reconciler
        .plan_from_text_analyzed(&args.root, &text, &existing, &config.scan.analysis_options())
        .map_err(CliError::Core)?;

    // ── 4. Render ─────────────────────────────────────────────────────────
    if output.format() == OutputFormat::Json {
        let json = render::render_json(&plan).map_err(|e| CliError::IoError {
            message: "could not serialise the plan".to_string(),
            source: e.into(),
        })?;
        // Straight to stdout so the document stays parseable in pipes.
        println!("{json}");
        return Ok(());
    }

    output.print(&render::render_plan(&plan, output.supports_color()))?;

    // ── 5. Warnings and conflicts ─────────────────────────────────────────
    for warning in plan.warnings() {
        output.warning(&warning.to_string())?;
    }
    let summary = plan.summary();
    if summary.conflicts > 0 {
        output.warning(&format!(
            "{} conflict(s) recorded; `planter apply` refuses them without --force",
            summary.conflicts
        ))?;
    }

    Ok(())
}

/// Read the structure file, mapping any failure to a not-found CLI error.
pub(crate) fn read_input(path: &Path) -> CliResult<String> {
    std::fs::read_to_string(path).map_err(|e| CliError::InputUnreadable {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}
