use std::time::Duration;

use anyhow::Result;
use tokio::time::sleep;
use tracing::warn;

use crate::channel;
use crate::config::ScrapeConfig;
use crate::extract;
use crate::fetch::PageFetcher;
use crate::store::ResultStore;

// Fixed spacing between page requests, applied after failed pages too
const PAGE_DELAY: Duration = Duration::from_secs(2);

/// Collects raw channel URLs for one keyword across all configured page
/// indices. A failed page is logged and skipped; the loop always visits
/// every index.
pub async fn scrape_keyword<F: PageFetcher>(
    fetcher: &F,
    keyword: &str,
    config: ScrapeConfig,
) -> Vec<String> {
    let mut urls = Vec::new();

    for page in 0..config.pages {
        match fetcher.fetch_rendered(keyword, page, config.sort).await {
            Ok(html) => {
                let links = extract::extract_channel_urls(&html);
                if links.is_empty() {
                    println!("No channels found on page {}", page + 1);
                } else {
                    println!("Found {} channels on page {}", links.len(), page + 1);
                    urls.extend(links);
                }
            }
            Err(e) => {
                warn!("page {} failed for '{}': {}", page + 1, keyword, e);
            }
        }
        sleep(PAGE_DELAY).await;
    }

    urls
}

/// Scrapes and persists every keyword in order. Only store writes can fail
/// the run; page-level trouble never does.
pub async fn run_search<F: PageFetcher>(
    fetcher: &F,
    keywords: &[String],
    config: ScrapeConfig,
    store: &ResultStore,
) -> Result<()> {
    for keyword in keywords {
        println!("🔎 Searching for keyword: {}", keyword);
        let urls = scrape_keyword(fetcher, keyword, config).await;

        let handle = store.save_run(keyword, &urls)?;
        println!("💾 Results saved to {}", handle.path.display());

        if config.save_ids {
            let ids = channel::unique_ids(&urls);
            let ids_path = store.save_ids(keyword, &ids, &handle.timestamp)?;
            println!("💾 Channel IDs saved to {}", ids_path.display());
        }
    }
    Ok(())
}
