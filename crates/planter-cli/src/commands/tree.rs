//! Implementation of the `planter tree` command.

use std::path::Path;

use tracing::{debug, instrument};

use planter_adapters::scan_tree_entries;
use planter_core::parser::generate_tree_text;

use crate::{
    cli::TreeArgs,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Execute the `planter tree` command.
///
/// Walks the directory and prints canonical tree text to stdout, ready to
/// be saved to a file and fed back into `plan` or `apply`.
#[instrument(skip_all, fields(dir = %args.dir.display()))]
pub fn execute(args: TreeArgs, config: AppConfig, _output: OutputManager) -> CliResult<()> {
    if !args.dir.exists() {
        return Err(CliError::DirectoryNotFound {
            path: args.dir.clone(),
        });
    }
    if !args.dir.is_dir() {
        return Err(CliError::InvalidInput {
            message: format!("'{}' is not a directory", args.dir.display()),
            source: None,
        });
    }

    let alias = args
        .alias
        .or(config.defaults.alias)
        .or_else(|| dir_name(&args.dir))
        .map(|name| sanitize_alias(&name))
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "Root".to_string());
    debug!(%alias, "generating tree text");

    let entries = scan_tree_entries(&args.dir);
    // Straight to stdout: the text is an artifact, not chatter.
    print!("{}", generate_tree_text(&alias, &entries));
    Ok(())
}

/// Directory name after resolving `.` and friends.
fn dir_name(dir: &Path) -> Option<String> {
    dir.canonicalize()
        .ok()?
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
}

/// Aliases are single tokens in the generated text; whitespace or braces
/// would not survive a round trip through the parser.
fn sanitize_alias(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_whitespace() || c == '{' || c == '}' {
                '_'
            } else {
                c
            }
        })
        .collect()
}
