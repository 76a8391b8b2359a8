//! Market Sentiment Tracker: binary entrypoint.
//! Loads config, opens the headline store, builds the classifier, runs every
//! configured asset once and prints the report.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use market_sentiment_tracker::analyze::build_classifier;
use market_sentiment_tracker::config::{load_config_default, load_config_from};
use market_sentiment_tracker::ingest::providers::{HtmlHeadlineExtractor, HttpFetcher};
use market_sentiment_tracker::{AssetProcessor, ContentStore};

use crate::cli::Cli;

/// Compact logs by default; JSON lines when LOG_FORMAT=json.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present; no-op otherwise.
    let _ = dotenvy::dotenv();
    init_tracing();

    let args = Cli::parse();
    let mut config = match args.config.as_deref() {
        Some(p) => load_config_from(p)?,
        None => load_config_default()?,
    };
    if let Some(db) = args.db {
        config.db_path = db;
    }
    if let Some(h) = args.window_hours {
        config.validity_window_hours = h;
    }
    let config = config.sanitize()?;
    info!(
        window_hours = config.validity_window_hours,
        db = %config.db_path.display(),
        "market sentiment run starting"
    );

    let store = ContentStore::open(&config.db_path)
        .with_context(|| format!("opening headline store {}", config.db_path.display()))?;

    let classifier = build_classifier(&config.classifier)
        .await
        .context("loading sentiment classifier")?;
    let fetcher = HttpFetcher::from_config(&config.http)?;
    let extractor = HtmlHeadlineExtractor::new();

    let report = {
        let processor = AssetProcessor::new(
            &config,
            &store,
            &fetcher,
            &extractor,
            classifier.as_ref(),
        );
        processor.run().await?
    };

    if let Err(e) = store.close() {
        warn!(error = %e, "closing headline store failed");
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.render_table());
    }
    Ok(())
}
