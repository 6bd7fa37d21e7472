use clap::{Parser, Subcommand};
use sceneprep::{pipeline::Decision, scanner::ScanMode};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sceneprep")]
#[command(author, version, about = "Release classification and duplicate detection")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan a path, build metadata bundles and check for duplicates
    Scan {
        /// File or folder to scan
        #[arg(required = true)]
        path: PathBuf,

        /// How to interpret the path
        #[arg(short, long, value_enum, default_value_t = ScanMode::Single)]
        mode: ScanMode,

        /// Catalog snapshot (JSON) to check duplicates against
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// What to do with releases that have possible duplicates
        #[arg(long, value_enum, default_value_t = Decision::Skip)]
        on_duplicate: Decision,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Probe a media file and display information
    Probe {
        /// File to probe
        #[arg(required = true)]
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Normalize a release name and show what was recovered
    Normalize {
        /// Raw file or folder name
        #[arg(required = true)]
        name: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check that required external tools are available
    CheckTools,

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
