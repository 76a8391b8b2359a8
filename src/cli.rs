//! Command-line flags. Everything else comes from the config file.

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Config file (TOML or JSON); falls back to $MARKET_SENTIMENT_CONFIG and config/
    #[arg(short, long, env = "MARKET_SENTIMENT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the headline database path
    #[arg(long)]
    pub db: Option<PathBuf>,

    /// Override the validity window (hours)
    #[arg(short = 'w', long)]
    pub window_hours: Option<u32>,

    /// Print the report as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}
