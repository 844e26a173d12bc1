//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. `PLANTER_*` environment variables (a `.env` file counts, via dotenvy)
//! 3. Config file (`--config`, or the default location when present)
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use planter_adapters::ScanOptions;
use planter_core::domain::AnalysisOptions;

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Default values for planning and applying.
    pub defaults: Defaults,
    /// Existing-file scan settings.
    pub scan: ScanConfig,
    /// File logging settings.
    pub logging: LoggingConfig,
    /// Output settings.
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    /// Alias used by `planter tree` when neither `--alias` nor the
    /// directory name should win.
    pub alias: Option<String>,
    /// Apply with `--force` semantics by default.
    pub force: bool,
    /// Apply with `--dry-run` semantics by default.
    pub dry_run: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// File name suffixes collected by the existing-file scan.
    pub extensions: Vec<String>,
    /// Similarity ratio at or above which near-miss names are reported.
    pub similarity_threshold: f64,
    /// Hard cap on scanned files.
    pub max_files: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        let scan = ScanOptions::default();
        Self {
            extensions: scan.extensions,
            similarity_threshold: AnalysisOptions::default().similarity_threshold,
            max_files: scan.max_files,
        }
    }
}

impl ScanConfig {
    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            extensions: self.extensions.clone(),
            max_files: self.max_files,
        }
    }

    pub fn analysis_options(&self) -> AnalysisOptions {
        AnalysisOptions {
            similarity_threshold: self.similarity_threshold,
            ..AnalysisOptions::default()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Also write logs to daily-rotated files.
    pub log_to_file: bool,
    /// Directory for log files; a platform data directory when unset.
    pub directory: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Disable colours even on a TTY.
    pub no_color: bool,
}

impl AppConfig {
    /// Load configuration, starting from defaults.
    ///
    /// `config_file` is the path the user passed via `--config`; when given
    /// it must exist and parse, otherwise the default location is used if
    /// present.  Environment overrides apply last.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let mut config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => {
                let path = Self::config_path();
                if path.exists() {
                    Self::from_file(&path)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_env(|var| std::env::var(var).ok());
        Ok(config)
    }

    fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{}'", path.display()))?;
        toml::from_str(&text)
            .with_context(|| format!("failed to parse config file '{}'", path.display()))
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.planter.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "planter", "planter")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".planter.toml"))
    }

    /// Overlay `PLANTER_*` environment variables.
    ///
    /// The lookup is injected so tests can run without touching the process
    /// environment.  Unparseable values are skipped, not errors.
    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(alias) = lookup("PLANTER_ALIAS") {
            if !alias.is_empty() {
                self.defaults.alias = Some(alias);
            }
        }
        if let Some(force) = lookup("PLANTER_FORCE").as_deref().and_then(parse_bool) {
            self.defaults.force = force;
        }
        if let Some(dry_run) = lookup("PLANTER_DRY_RUN").as_deref().and_then(parse_bool) {
            self.defaults.dry_run = dry_run;
        }

        if let Some(max) = lookup("PLANTER_SCAN_MAX_FILES").and_then(|v| v.parse().ok()) {
            self.scan.max_files = max;
        }
        if let Some(threshold) = lookup("PLANTER_SIMILARITY_THRESHOLD")
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|t| (0.0..=1.0).contains(t))
        {
            self.scan.similarity_threshold = threshold;
        }

        if let Some(to_file) = lookup("PLANTER_LOG_TO_FILE").as_deref().and_then(parse_bool) {
            self.logging.log_to_file = to_file;
        }
        if let Some(dir) = lookup("PLANTER_LOG_DIR") {
            if !dir.is_empty() {
                self.logging.directory = Some(PathBuf::from(dir));
            }
        }

        if let Some(no_color) = lookup("PLANTER_NO_COLOR").as_deref().and_then(parse_bool) {
            self.output.no_color = no_color;
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
