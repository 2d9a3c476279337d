use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "probekit")]
#[command(version, about = "Catalogue-driven HTTP bypass-probe runner")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory holding settings.json and presets.json
    #[arg(long, default_value = ".probekit", global = true)]
    pub config_dir: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the selected technique categories against a target
    Run {
        #[arg(short, long)]
        target: Option<String>,

        /// Name of a saved preset to probe instead of --target
        #[arg(long)]
        preset: Option<String>,

        /// Comma-separated category ids; defaults to the stored selection
        #[arg(short, long)]
        categories: Option<String>,

        #[arg(long)]
        delay_ms: Option<u64>,

        #[arg(short = 'T', long)]
        timeout: Option<u64>,

        /// Bounded fan-out width; 1 keeps the sequential ordering guarantee
        #[arg(short = 'j', long)]
        concurrency: Option<usize>,

        /// Write the JSON report here
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write a CSV report here
        #[arg(long)]
        csv: Option<PathBuf>,

        #[arg(short, long)]
        verbose: bool,
    },

    /// List catalogue categories and case counts
    List,

    /// Re-export a saved JSON report
    Report {
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long, default_value = "csv")]
        format: String,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Manage saved targets
    Preset {
        #[command(subcommand)]
        command: PresetCommands,
    },
}

#[derive(Subcommand)]
pub enum PresetCommands {
    List,
    Add { name: String, url: String },
    Delete { id: u64 },
}
