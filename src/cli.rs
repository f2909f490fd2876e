use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "rootsphere",
    version,
    about = "Irrigation and fertilizer advice from soil, weather and model signals"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config.yaml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the model artifact directory
    #[arg(short, long, global = true)]
    pub models_dir: Option<PathBuf>,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a recommendation from a request JSON file
    Recommend {
        /// Request file, or `-` for stdin
        #[arg(short, long)]
        input: PathBuf,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Show the thresholds in effect for a crop and growth stage
    Standards {
        #[arg(long)]
        crop: String,

        #[arg(long, default_value = "vegetative")]
        stage: String,
    },
    /// Validate config and report model availability
    Check,
    /// Run interactive setup
    Init,
}
