//! Implementation of the `planter completions` command.

use clap::CommandFactory;
use clap_complete::{Shell as ClapShell, generate};

use crate::{
    cli::{Cli, CompletionsArgs, Shell},
    error::CliResult,
};

/// Generate a completion script for the requested shell on stdout.
pub fn execute(args: CompletionsArgs) -> CliResult<()> {
    let shell = match args.shell {
        Shell::Bash => ClapShell::Bash,
        Shell::Zsh => ClapShell::Zsh,
        Shell::Fish => ClapShell::Fish,
        Shell::PowerShell => ClapShell::PowerShell,
        Shell::Elvish => ClapShell::Elvish,
    };

    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "planter", &mut std::io::stdout());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bash_script_mentions_the_binary() {
        let mut cmd = Cli::command();
        let mut buf = Vec::new();
        generate(ClapShell::Bash, &mut cmd, "planter", &mut buf);
        let script = String::from_utf8(buf).unwrap();
        assert!(script.contains("planter"));
    }
}
