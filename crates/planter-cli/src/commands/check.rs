//! Implementation of the `planter check` command.

use tracing::instrument;

use planter_adapters::check_root;

use crate::{
    cli::{CheckArgs, OutputFormat},
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Execute the `planter check` command.
///
/// Runs the safety gate without planning anything.  A blocked root also
/// fails the command so scripts can branch on the exit code; warnings
/// alone leave it at 0.
#[instrument(skip_all, fields(dir = %args.dir.display()))]
pub fn execute(args: CheckArgs, output: OutputManager) -> CliResult<()> {
    let check = check_root(&args.dir);

    if output.format() == OutputFormat::Json {
        let json = serde_json::to_string_pretty(&check).map_err(|e| CliError::IoError {
            message: "could not serialise the verdict".to_string(),
            source: e.into(),
        })?;
        // Straight to stdout so the document stays parseable in pipes.
        println!("{json}");
    } else if check.is_safe() {
        output.success(&format!("{} is safe to plan into", args.dir.display()))?;
        for warning in &check.warnings {
            output.warning(warning)?;
        }
    }

    match check.blocked {
        Some(reason) => Err(CliError::RootRejected {
            path: args.dir,
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}
