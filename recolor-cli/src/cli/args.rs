use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use super::types::OutputFormat;

/// Ordered literal find & replace across a source tree
#[derive(Parser, Debug)]
#[command(name = "recolor")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Run as if started in <path> instead of the current working directory
    #[arg(short = 'C', global = true, value_name = "PATH")]
    pub directory: Option<PathBuf>,

    /// Config file to use instead of .recolor/config.toml
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Which files under the root get rewritten
#[derive(Args, Debug, Clone)]
pub struct FilterArgs {
    /// File extensions to rewrite (default: tsx,ts,css)
    #[arg(long = "ext", value_name = "EXT", value_delimiter = ',')]
    pub extensions: Vec<String>,

    /// Exclude glob patterns, relative to the root
    #[arg(long, value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Respect ignore files (.gitignore, .ignore, .recolorignore) and skip hidden files
    #[arg(long)]
    pub respect_ignore: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply the replacement mapping to every eligible file under ROOT
    Replace {
        /// Root directory to walk
        root: PathBuf,

        /// Mapping file with one `old<TAB>new` pair per line
        #[arg(long, value_name = "FILE")]
        mapping: Option<PathBuf>,

        #[command(flatten)]
        filter: FilterArgs,

        /// Append a timestamped line per file to this log
        #[arg(long, value_name = "PATH")]
        log_file: Option<PathBuf>,

        /// Output format for machine consumption
        #[arg(long, value_enum, default_value = "summary")]
        output: OutputFormat,

        /// Only print errors
        #[arg(long)]
        quiet: bool,
    },

    /// Print the mapping a replace run would use
    Mapping {
        /// Mapping file with one `old<TAB>new` pair per line
        #[arg(long, value_name = "FILE")]
        mapping: Option<PathBuf>,

        /// Output format for machine consumption
        #[arg(long, value_enum, default_value = "summary")]
        output: OutputFormat,
    },

    /// Show version information
    Version {
        /// Output format for machine consumption
        #[arg(long, value_enum, default_value = "summary")]
        output: OutputFormat,
    },
}
