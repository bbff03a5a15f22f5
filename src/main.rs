mod aggregate;
mod channel;
mod config;
mod extract;
mod fetch;
mod scrape;
mod store;

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};

use crate::config::{ScrapeConfig, SortMode};
use crate::fetch::ChromeFetcher;
use crate::store::ResultStore;

#[derive(Parser)]
#[command(
    name = "tg-channel-scraper",
    version,
    about = "Scrapes t.me channel IDs out of a keyword search widget"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scrape channel links for every keyword in a JSON file
    Search {
        /// JSON file with a top-level "keywords" array
        #[arg(long)]
        keywords: PathBuf,
        /// Directory all scrape records are written to
        #[arg(long, default_value = "Output")]
        output_dir: PathBuf,
        /// Result pages to attempt per keyword
        #[arg(long, default_value_t = 5)]
        pages: usize,
        /// Result ordering requested from the widget
        #[arg(long, value_enum, default_value_t = SortMode::Relevance)]
        sort: SortMode,
        /// Also save each run's unique channel IDs
        #[arg(long)]
        save_ids: bool,
        /// Combine all stored runs into a final ID list once scraping is done
        #[arg(long)]
        aggregate: bool,
    },
    /// Combine previously scraped runs into one deduplicated ID list
    Aggregate {
        /// Directory the scrape records were written to
        #[arg(long, default_value = "Output")]
        output_dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    run(Cli::parse().command).await
}

async fn run(command: Command) -> Result<()> {
    match command {
        Command::Search {
            keywords,
            output_dir,
            pages,
            sort,
            save_ids,
            aggregate,
        } => {
            if pages == 0 {
                bail!("--pages must be positive");
            }
            let keyword_list = config::load_keywords(&keywords);
            if keyword_list.is_empty() {
                bail!("no keywords loaded from {}", keywords.display());
            }

            // Nothing is created on disk until the input has passed
            let store = ResultStore::new(&output_dir)?;
            let fetcher = ChromeFetcher::new()?;
            println!(
                "🚀 Scraping {} keyword(s), {} page(s) each",
                keyword_list.len(),
                pages
            );

            let config = ScrapeConfig {
                pages,
                sort,
                save_ids,
            };
            scrape::run_search(&fetcher, &keyword_list, config, &store).await?;

            if aggregate {
                aggregate::run_aggregate(&store)?;
            }
        }
        Command::Aggregate { output_dir } => {
            let store = ResultStore::new(&output_dir)?;
            aggregate::run_aggregate(&store)?;
        }
    }

    Ok(())
}
