//! Implementation of the `planter config` command.

use crate::{
    cli::{ConfigArgs, OutputFormat},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Show the effective configuration (defaults, then file, then environment).
pub fn execute(args: ConfigArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    if args.show_path {
        output.print(&AppConfig::config_path().display().to_string())?;
        return Ok(());
    }

    if output.format() == OutputFormat::Json {
        let json = serde_json::to_string_pretty(&config).map_err(|e| CliError::IoError {
            message: "could not serialise the configuration".to_string(),
            source: e.into(),
        })?;
        println!("{json}");
        return Ok(());
    }

    let serialised = toml::to_string_pretty(&config).map_err(|e| CliError::ConfigError {
        message: format!("Failed to serialise config: {e}"),
        source: Some(Box::new(e)),
    })?;
    output.header("Current configuration")?;
    output.print(&serialised)?;
    Ok(())
}
