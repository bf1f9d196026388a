//! schemascope - find Schema.org structured data and tag-manager DataLayers

use clap::Parser;
use colored::Colorize;

use schemascope::cli::{Cli, Commands, ConfigCommands};
use schemascope::error::Result;

mod commands;
mod utils;

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {}", "Error:".red().bold(), e);
        if let Some(hint) = e.hint() {
            eprintln!("\n{}", hint.dimmed());
        }
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if !atty::is(atty::Stream::Stdout) {
        colored::control::set_override(false);
    }

    // The TUI owns the terminal; stderr logging would tear its frames
    if !matches!(cli.command, Commands::Ui) {
        schemascope::logging::init_logger(cli.verbose)?;
    }

    match cli.command {
        Commands::Schema { url, json, copy, file } => commands::cmd_schema(url, json, copy, file),
        Commands::Datalayer { url, json, copy, seed, instant } => {
            commands::cmd_datalayer(url, json, copy, seed, instant)
        }
        Commands::Ui => commands::cmd_ui(),
        Commands::Config(ConfigCommands::Show) => commands::cmd_config_show(),
        Commands::Config(ConfigCommands::Path) => commands::cmd_config_path(),
        Commands::Config(ConfigCommands::Init { force }) => commands::cmd_config_init(force),
        Commands::Completions { shell } => commands::cmd_completions(shell),
    }
}
