//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "planter",
    bin_name = "planter",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "\u{1f331} Conflict-aware filesystem scaffolding from tree text",
    long_about = "Planter turns an indented tree description into a scaffolding \
                  plan, compares it against what already exists on disk, and \
                  only then (on request) writes the missing pieces.",
    after_help = "EXAMPLES:\n\
        \x20 planter plan layout.txt --root ./game\n\
        \x20 planter apply layout.txt --root ./game --yes\n\
        \x20 planter tree ./game > layout.txt\n\
        \x20 planter completions bash > /usr/share/bash-completion/completions/planter",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Build and display a plan without writing anything.
    #[command(
        visible_alias = "p",
        about = "Preview what a structure file would create",
        after_help = "EXAMPLES:\n\
            \x20 planter plan layout.txt\n\
            \x20 planter plan layout.txt --root ./game\n\
            \x20 planter plan layout.txt --output-format json | jq .summary"
    )]
    Plan(PlanArgs),

    /// Build a plan and write it to disk.
    #[command(
        visible_alias = "a",
        about = "Apply a structure file to a directory",
        after_help = "EXAMPLES:\n\
            \x20 planter apply layout.txt --root ./game\n\
            \x20 planter apply layout.txt --root ./game --dry-run\n\
            \x20 planter apply layout.txt --root ./game --force --yes"
    )]
    Apply(ApplyArgs),

    /// Describe an existing directory as tree text.
    #[command(
        about = "Generate tree text from an existing directory",
        after_help = "EXAMPLES:\n\
            \x20 planter tree ./game > layout.txt\n\
            \x20 planter tree ./game --alias GameRoot"
    )]
    Tree(TreeArgs),

    /// Run the root safety gate and report the verdict.
    #[command(
        about = "Check whether a directory is safe to plan into",
        after_help = "EXAMPLES:\n\
            \x20 planter check ./game\n\
            \x20 planter check /etc            # blocked\n\
            \x20 planter check ./game --output-format json"
    )]
    Check(CheckArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 planter completions bash > ~/.local/share/bash-completion/completions/planter\n\
            \x20 planter completions zsh  > ~/.zfunc/_planter\n\
            \x20 planter completions fish > ~/.config/fish/completions/planter.fish"
    )]
    Completions(CompletionsArgs),

    /// Show the effective configuration.
    #[command(
        about = "Show configuration",
        after_help = "EXAMPLES:\n\
            \x20 planter config\n\
            \x20 planter config --show-path\n\
            \x20 planter config --output-format json"
    )]
    Config(ConfigArgs),
}

// ── plan ──────────────────────────────────────────────────────────────────────

/// Arguments for `planter plan`.
#[derive(Debug, Args)]
pub struct PlanArgs {
    /// Structure file containing the tree text and content blocks.
    #[arg(value_name = "INPUT", help = "Structure text file")]
    pub input: PathBuf,

    /// Directory the planned paths resolve under.  Must already exist.
    #[arg(
        short = 'r',
        long = "root",
        value_name = "DIR",
        default_value = ".",
        help = "Root directory the tree resolves under"
    )]
    pub root: PathBuf,
}

// ── apply ─────────────────────────────────────────────────────────────────────

/// Arguments for `planter apply`.
#[derive(Debug, Args)]
pub struct ApplyArgs {
    /// Structure file containing the tree text and content blocks.
    #[arg(value_name = "INPUT", help = "Structure text file")]
    pub input: PathBuf,

    /// Directory the planned paths resolve under.  Must already exist.
    #[arg(
        short = 'r',
        long = "root",
        value_name = "DIR",
        default_value = ".",
        help = "Root directory the tree resolves under"
    )]
    pub root: PathBuf,

    /// Rewrite files whose planned content differs and proceed past
    /// recorded conflicts (conflicting paths themselves stay untouched).
    #[arg(long = "force", help = "Overwrite changed files and ignore conflicts")]
    pub force: bool,

    /// Walk the plan and report actions without writing anything.
    #[arg(long = "dry-run", help = "Show what would be written without writing")]
    pub dry_run: bool,

    /// Skip the confirmation prompt.
    #[arg(short = 'y', long = "yes", help = "Skip confirmation and apply immediately")]
    pub yes: bool,

    /// Proceed although the safety gate flagged warnings for the root.
    #[arg(long = "allow-unsafe", help = "Proceed despite safety warnings")]
    pub allow_unsafe: bool,
}

// ── tree ──────────────────────────────────────────────────────────────────────

/// Arguments for `planter tree`.
#[derive(Debug, Args)]
pub struct TreeArgs {
    /// Directory to describe.
    #[arg(value_name = "DIR", default_value = ".", help = "Directory to describe")]
    pub dir: PathBuf,

    /// Alias name for the `@ROOT` declaration.  Defaults to the directory's
    /// own name.
    #[arg(
        short = 'a',
        long = "alias",
        value_name = "NAME",
        help = "Root alias for the generated text"
    )]
    pub alias: Option<String>,
}

// ── check ─────────────────────────────────────────────────────────────────────

/// Arguments for `planter check`.
#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Directory to validate.
    #[arg(value_name = "DIR", help = "Directory to validate")]
    pub dir: PathBuf,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `planter completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config ────────────────────────────────────────────────────────────────────

/// Arguments for `planter config`.
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Print the path of the active configuration file instead of its
    /// contents.
    #[arg(long = "show-path", help = "Print the configuration file path")]
    pub show_path: bool,
}

// ── tests ─────────────────────────────────────────────────────────────────────
