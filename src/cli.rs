use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Shell types for completion generation
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

#[derive(Parser)]
#[command(name = "schemascope")]
#[command(author, version, about = "Find Schema.org structured data and tag-manager DataLayers on a website", long_about = None)]
#[command(after_help = r#"Examples:
  schemascope schema example.com                 Scan for JSON-LD, Microdata and RDFa
  schemascope schema example.com --json          Machine-readable output
  schemascope schema --file saved.html           Scan a page saved to disk
  schemascope datalayer whitespark.ca            Simulated DataLayer capture
  schemascope ui                                 Interactive scanner (tui feature)
"#)]
pub struct Cli {
    /// Show debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan a page for Schema.org structured data
    #[command(after_help = r#"Examples:
  schemascope schema https://example.com/product/42
  schemascope schema example.com --copy 1       Copy the first item as JSON
  schemascope schema example.com --json | jq '.items[]."@type"'
"#)]
    Schema {
        /// Website URL (prompted for when omitted)
        #[arg(value_name = "URL")]
        url: Option<String>,

        /// Output the scan as JSON
        #[arg(long)]
        json: bool,

        /// Copy item N (1-based) to the clipboard as JSON
        #[arg(long, value_name = "N")]
        copy: Option<usize>,

        /// Read HTML from a local file instead of fetching through the relay
        #[arg(long, value_name = "PATH")]
        file: Option<PathBuf>,
    },

    /// Simulate DataLayer capture for a page (demo mode, nothing is executed)
    #[command(after_help = r#"Examples:
  schemascope datalayer example.com
  schemascope datalayer example.com --seed 42    Reproducible outcome
  schemascope datalayer example.com --instant    Skip the phase delays
"#)]
    Datalayer {
        /// Website URL (prompted for when omitted)
        #[arg(value_name = "URL")]
        url: Option<String>,

        /// Output the scan as JSON
        #[arg(long)]
        json: bool,

        /// Copy entry N (1-based) to the clipboard as JSON
        #[arg(long, value_name = "N")]
        copy: Option<usize>,

        /// Seed for the simulated detection draws
        #[arg(long)]
        seed: Option<u64>,

        /// Run the simulated phases without delays
        #[arg(long)]
        instant: bool,
    },

    /// Open the interactive scanner
    Ui,

    /// Inspect or create the configuration file
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: CompletionShell,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,
    /// Print the config file location
    Path,
    /// Write a config file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_schema_flags() {
        let cli = Cli::try_parse_from(["schemascope", "schema", "example.com", "--json", "--copy", "2"]).unwrap();
        match cli.command {
            Commands::Schema { url, json, copy, file } => {
                assert_eq!(url.as_deref(), Some("example.com"));
                assert!(json);
                assert_eq!(copy, Some(2));
                assert!(file.is_none());
            }
            _ => panic!("expected schema command"),
        }
    }

    #[test]
    fn test_parse_datalayer_seed() {
        let cli = Cli::try_parse_from(["schemascope", "-v", "datalayer", "--seed", "9", "--instant"]).unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Datalayer { url, seed, instant, .. } => {
                assert!(url.is_none());
                assert_eq!(seed, Some(9));
                assert!(instant);
            }
            _ => panic!("expected datalayer command"),
        }
    }
}
