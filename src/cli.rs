use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use crate::config::Overrides;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Parser)]
#[command(name = "teams-fetch")]
#[command(about = "Fetch football team names and logos from API-Sports", version)]
#[command(after_help = "EXAMPLES:
    teams-fetch fetch                      Save Belgian teams to belgian_teams_simple.json
    teams-fetch fetch --country France -o french_teams.json
    teams-fetch list --country Netherlands Show teams without saving
    teams-fetch init                       Create a config file")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (table, json)
    #[arg(long, global = true, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Output as JSON (alias for --format json)
    #[arg(long, global = true, hide = true)]
    pub json: bool,

    /// Suppress progress and success messages
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Show debug logs and detailed error information
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

impl Cli {
    /// Get the effective output format, considering --json flag
    pub fn output_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            self.format
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch teams for a country and save them as JSON
    #[command(
        alias = "f",
        after_help = "EXAMPLES:
    teams-fetch fetch
    teams-fetch fetch --country Belgium --output belgian_teams_simple.json
    teams-fetch fetch --retries 3 --timeout 10 --strict"
    )]
    Fetch(FetchArgs),
    /// Fetch teams for a country and print them without saving
    #[command(
        alias = "ls",
        after_help = "EXAMPLES:
    teams-fetch list
    teams-fetch list --country France --json"
    )]
    List(ListArgs),
    /// Generate shell completions
    #[command(after_help = "EXAMPLES:
    teams-fetch completions bash > ~/.bash_completion.d/teams-fetch
    teams-fetch completions zsh > ~/.zfunc/_teams-fetch
    teams-fetch completions fish > ~/.config/fish/completions/teams-fetch.fish")]
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
    /// Initialize configuration file interactively
    #[command(after_help = "EXAMPLES:
    teams-fetch init")]
    Init,
}

/// Where and how to query the provider
#[derive(Args, Clone, Default)]
pub struct SourceArgs {
    /// Country to fetch teams for (default: Belgium)
    #[arg(long, short)]
    pub country: Option<String>,

    /// API-Sports key (overrides APISPORTS_KEY and the config file)
    #[arg(long)]
    pub api_key: Option<String>,

    /// Request timeout in seconds, 0 to disable (default: 30)
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Extra attempts on timeouts, connection errors and 5xx responses (default: 0)
    #[arg(long)]
    pub retries: Option<u32>,

    /// Fail with a non-zero exit status when the provider returns no teams
    #[arg(long)]
    pub strict: bool,
}

impl SourceArgs {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            api_key: self.api_key.clone(),
            country: self.country.clone(),
            output_path: None,
            timeout_secs: self.timeout,
            retries: self.retries,
        }
    }
}

#[derive(Args, Clone)]
pub struct FetchArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Destination file, overwritten on every run (default: belgian_teams_simple.json)
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

impl FetchArgs {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            output_path: self.output.clone(),
            ..self.source.overrides()
        }
    }
}

#[derive(Args, Clone)]
pub struct ListArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}
