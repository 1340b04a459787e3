use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Compile filter bar state into a search query and a readable preview
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Compiler config file (TOML)
    #[arg(long, global = true, env = "FILTER_BAR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short = 'F', long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Also write the output to this file
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// When to use colors
    #[arg(long, global = true, value_enum, default_value_t = ColorMode::Auto)]
    pub color: ColorMode,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only print results, no warnings
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the search query document for a saved filter bar state
    Compile {
        /// Filter bar state file (JSON or JSON5)
        state: PathBuf,

        /// Single-line JSON instead of pretty-printed
        #[arg(long)]
        compact: bool,
    },
    /// Print the human-readable preview of a saved filter bar state
    Preview {
        /// Filter bar state file (JSON or JSON5)
        state: PathBuf,
    },
    /// Show the boolean tree, separators and skipped clauses of a state
    Explain {
        /// Filter bar state file (JSON or JSON5)
        state: PathBuf,
    },
    /// List catalog fields and the operators offered for each
    Fields {
        /// JSON array of {"name", "type"} objects; defaults to the config catalog
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Only show this field
        #[arg(long)]
        field: Option<String>,
    },
}

pub fn cli_parse() -> Cli {
    Cli::parse()
}
