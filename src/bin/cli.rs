//! aiweekly CLI
//!
//! Local execution entry point. For AWS Lambda, use `aiweekly-lambda`.

use std::path::PathBuf;
use std::sync::Arc;

use aiweekly::{
    error::Result,
    models::Config,
    pipeline::{self, Pipeline},
    services::KeywordExtractor,
    storage::{KeywordStore, LocalStore},
    utils::http::HttpFetcher,
};
use clap::{Parser, Subcommand};

/// aiweekly - AI News Keyword Harvester
#[derive(Parser, Debug)]
#[command(
    name = "aiweekly",
    version,
    about = "Harvests AI headlines and stores newly seen keywords"
)]
struct Cli {
    /// Path to storage directory containing config.toml and keywords.json
    #[arg(short, long, default_value = "storage")]
    storage_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one harvesting cycle over all enabled sources
    Crawl {
        /// Store keywords without translating them
        #[arg(long)]
        no_translate: bool,
    },

    /// Print recently created keywords as JSON
    Keywords {
        /// Size of the window in days (default: pipeline.recent_days)
        #[arg(long)]
        days: Option<i64>,

        /// Include inactive records
        #[arg(long)]
        all: bool,
    },

    /// Show which dictionary terms a text contains
    Extract {
        /// Text to run through the extractor
        text: String,
    },

    /// Validate configuration
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = cli.storage_dir.join("config.toml");
    let mut config = Config::load_or_default(&config_path);
    config.apply_env_overrides();
    config.validate()?;

    log::info!("Loaded configuration from {}", cli.storage_dir.display());

    match cli.command {
        Command::Crawl { no_translate } => {
            if no_translate {
                config.translation.enabled = false;
            }

            let store: Arc<dyn KeywordStore> =
                Arc::new(LocalStore::open(&cli.storage_dir, &config.storage.file_name).await?);
            let fetcher = Arc::new(HttpFetcher::from_config(&config.crawler)?);
            let gateway = pipeline::build_gateway(&config, store.clone())?;
            let pipeline = Pipeline::from_config(&config, fetcher, gateway)?;

            let report = pipeline.run_cycle().await;
            println!("{}", serde_json::to_string_pretty(&report)?);

            let weekly =
                pipeline::recent_keywords(store.as_ref(), config.pipeline.recent_days, false)
                    .await?;
            log::info!("Keywords collected this week: {}", weekly.count);
        }

        Command::Keywords { days, all } => {
            let store = LocalStore::open(&cli.storage_dir, &config.storage.file_name).await?;
            let days = days.unwrap_or(config.pipeline.recent_days);
            let recent = pipeline::recent_keywords(&store, days, !all).await?;
            println!("{}", serde_json::to_string_pretty(&recent)?);
        }

        Command::Extract { text } => {
            let extractor = KeywordExtractor::default();
            let terms = extractor.extract(&text);
            if terms.is_empty() {
                log::info!("No dictionary terms found");
            }
            for term in terms {
                println!("{term}");
            }
        }

        Command::Validate => {
            log::info!("✓ Config OK ({} enabled sources)", config.enabled_sources().count());
            for source in config.enabled_sources() {
                log::info!("  {} [{}] {}", source.id, source.id.category(), source.url);
            }
        }
    }

    Ok(())
}
