//! Miscellaneous commands: ui, config, completions

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use colored::Colorize;
use std::io;

use schemascope::cli::{Cli, CompletionShell};
use schemascope::config::Config;
use schemascope::error::{Result, ScanError};

/// Interactive scanner
#[cfg(feature = "tui")]
pub fn cmd_ui() -> Result<()> {
    schemascope::tui::run()
}

#[cfg(not(feature = "tui"))]
pub fn cmd_ui() -> Result<()> {
    eprintln!("TUI not available. Rebuild with: cargo build --features tui");
    Ok(())
}

/// Print the effective configuration
pub fn cmd_config_show() -> Result<()> {
    let path = Config::config_path()?;
    let config = Config::load()?;
    let content = toml::to_string_pretty(&config).map_err(|e| ScanError::ConfigError(e.to_string()))?;

    let source = if path.exists() { "" } else { " (not created, showing defaults)" };
    println!("{} {}{}\n", "Config:".bold(), path.display(), source.dimmed());
    print!("{}", content);
    Ok(())
}

pub fn cmd_config_path() -> Result<()> {
    println!("{}", Config::config_path()?.display());
    Ok(())
}

/// Write the default configuration to disk
pub fn cmd_config_init(force: bool) -> Result<()> {
    let path = Config::config_path()?;
    if path.exists() && !force {
        return Err(ScanError::ConfigError(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }

    Config::default().save_to(&path)?;
    println!("{} Wrote {}", "✓".green(), path.display());
    Ok(())
}

/// Generate shell completions
pub fn cmd_completions(shell: CompletionShell) -> Result<()> {
    let mut cmd = Cli::command();
    let shell = match shell {
        CompletionShell::Bash => Shell::Bash,
        CompletionShell::Zsh => Shell::Zsh,
        CompletionShell::Fish => Shell::Fish,
        CompletionShell::Powershell => Shell::PowerShell,
    };
    generate(shell, &mut cmd, "schemascope", &mut io::stdout());
    Ok(())
}
