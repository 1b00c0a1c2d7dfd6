use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "visual-matcher",
    version,
    about = "Match an image or phrase against a pre-embedded product catalog"
)]
pub struct Cli {
    /// Config file (toml, yaml or json). Defaults to ./visual-matcher.*
    #[arg(long, global = true, env = "MATCHER_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server
    Serve {
        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run one match and print the results as JSON
    Match {
        #[command(flatten)]
        source: MatchSource,
        /// Drop results below this cosine similarity (-1 to 1)
        #[arg(long)]
        min_similarity: Option<f64>,
    },
    /// Print the first page of the catalog
    Products {
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Show catalog statistics
    Stats,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
pub struct MatchSource {
    /// Local image file, sent inline
    #[arg(long)]
    pub image_file: Option<PathBuf>,
    /// Direct image URL or a supported photo page
    #[arg(long)]
    pub image_url: Option<String>,
    /// Text phrase
    #[arg(long)]
    pub text: Option<String>,
}
