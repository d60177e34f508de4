use crate::git::FileListing;
use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gmonth")]
#[command(about = "Monthly change timelines for every file in a git repository")]
#[command(version)]
pub struct Cli {
    #[clap(flatten)]
    pub common: CommonArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Clone, Debug)]
pub struct CommonArgs {
    #[arg(long, help = "Path to git repository", conflicts_with = "url")]
    pub repo: Option<PathBuf>,

    #[arg(long, help = "Clone and analyze a remote repository")]
    pub url: Option<String>,

    #[arg(long, help = "Directory for the cache database")]
    pub cache: Option<PathBuf>,

    #[arg(long, help = "Do not read or write the cache", default_value_t = false)]
    pub no_cache: bool,

    #[arg(long, value_enum, default_value_t = FileListing::Tree, help = "Which files count as touched by a commit")]
    pub listing: FileListing,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print per-file monthly timelines
    Timeline {
        #[arg(long, help = "Output as JSON", conflicts_with = "ndjson")]
        json: bool,

        #[arg(long, help = "Output as NDJSON")]
        ndjson: bool,

        #[arg(long, default_value_t = 50, help = "Number of files in the table")]
        top: usize,

        #[arg(long = "interactive", alias = "tui", help = "Browse timelines in a terminal UI")]
        interactive: bool,
    },
    /// Render an HTML page with one line chart per file
    Chart {
        #[arg(long, short, default_value = "charts.html", help = "Output file")]
        output: PathBuf,
    },
}

impl Cli {
    pub fn execute(self) -> Result<()> {
        match self.command {
            Commands::Timeline { json, ndjson, top, interactive } => {
                crate::report::exec(self.common, json, ndjson, top, interactive)
            }
            Commands::Chart { output } => crate::chart::exec(self.common, &output),
        }
    }
}
