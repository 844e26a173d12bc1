//! Planter CLI entry point.
//!
//! Startup order matters here: `.env` first, then argument parsing, then
//! configuration (the file-logging layer needs the `[logging]` section),
//! then tracing, and only then the actual command.
//!
//! # Exit codes
//!
//! | Code | Meaning              |
//! |------|----------------------|
//! | 0    | Success              |
//! | 1    | Internal error       |
//! | 2    | User error           |
//! | 3    | Resource not found   |
//! | 4    | Configuration error  |

mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod output;
mod render;

use std::io::IsTerminal;
use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, info};

use crate::cli::{Cli, Commands};
use crate::config::AppConfig;
use crate::error::{CliError, CliResult};
use crate::logging::init_logging;
use crate::output::OutputManager;

fn main() -> ExitCode {
    // Load .env before anything else reads the environment.  Silently
    // ignored when no .env file exists.
    let _ = dotenvy::dotenv();

    // ── 1. Parse arguments ────────────────────────────────────────────────
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // clap renders its own help/usage output
            eprintln!("{}", e.render().ansi());
            return ExitCode::from(2);
        }
    };

    // ── 2. Load configuration ─────────────────────────────────────────────
    // Tracing is not up yet, so failures go straight to stderr.
    let config = match AppConfig::load(cli.global.config.as_ref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("planter: failed to load configuration: {e:#}");
            return ExitCode::from(4);
        }
    };

    // ── 3. Initialise tracing ─────────────────────────────────────────────
    // The guard flushes buffered file logs on drop; hold it for the whole run.
    let _guard = match init_logging(&cli.global, &config.logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialise logging: {e:#}");
            return ExitCode::from(1);
        }
    };

    debug!(
        verbose = cli.global.verbose,
        quiet = cli.global.quiet,
        no_color = cli.global.no_color,
        "CLI started"
    );

    // ── 4. Build the output manager ───────────────────────────────────────
    let output = OutputManager::new(&cli.global, &config);

    // ── 5. Dispatch ───────────────────────────────────────────────────────
    let verbose = cli.global.verbose > 0;
    match run(cli, config, output) {
        Ok(()) => {
            info!("planter completed successfully");
            ExitCode::SUCCESS
        }
        Err(e) => handle_error(e, verbose),
    }
}

fn run(cli: Cli, config: AppConfig, output: OutputManager) -> CliResult<()> {
    match cli.command {
        Commands::Plan(args) => commands::plan::execute(args, config, output),
        Commands::Apply(args) => commands::apply::execute(args, cli.global, config, output),
        Commands::Tree(args) => commands::tree::execute(args, config, output),
        Commands::Check(args) => commands::check::execute(args, output),
        Commands::Completions(args) => commands::completions::execute(args),
        Commands::Config(args) => commands::config::execute(args, config, output),
    }
}

/// Log the error, print it in the right format, and map it to an exit code.
fn handle_error(err: CliError, verbose: bool) -> ExitCode {
    err.log();

    let formatted = if std::io::stderr().is_terminal() {
        err.format_colored(verbose)
    } else {
        err.format_plain(verbose)
    };
    eprint!("{formatted}");

    ExitCode::from(err.exit_code())
}
