use std::ffi::OsStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use headless_chrome::{Browser, LaunchOptions, Tab};
use tokio::time::sleep;

use crate::config::SortMode;

pub const SEARCH_BASE_URL: &str = "https://xtea.io/ts_en_channel.html";

// The widget injects this container once its script has booted; results keep
// streaming in for a few seconds after it appears.
const RESULTS_SELECTOR: &str = ".gsc-results";
const RESULTS_TIMEOUT: Duration = Duration::from_secs(15);
const SETTLE_DELAY: Duration = Duration::from_secs(5);

/// Builds the widget URL for one keyword page. The widget reads its state
/// from the fragment: `gsc.tab` is the zero-based page index, `gsc.q` the
/// encoded query and `gsc.sort` the requested ordering.
pub fn search_url(keyword: &str, page: usize, sort: SortMode) -> String {
    format!(
        "{}#gsc.tab={}&gsc.q={}&gsc.sort={}",
        SEARCH_BASE_URL,
        page,
        urlencoding::encode(keyword),
        sort.as_query()
    )
}

/// Supplies rendered HTML for one search-result page. The scrape loop only
/// ever talks to this trait, so tests can script page outcomes without a
/// browser.
pub trait PageFetcher {
    async fn fetch_rendered(&self, keyword: &str, page: usize, sort: SortMode) -> Result<String>;
}

/// Fetcher backed by one headless Chrome session, reused across every page
/// of a run. Dropping it shuts the browser down.
pub struct ChromeFetcher {
    _browser: Browser,
    tab: Arc<Tab>,
}

impl ChromeFetcher {
    pub fn new() -> Result<Self> {
        let browser = Browser::new(LaunchOptions {
            headless: true,
            window_size: Some((1920, 1080)),
            args: vec![
                OsStr::new("--no-sandbox"),
                OsStr::new("--disable-dev-shm-usage"),
            ],
            ..Default::default()
        })?;
        let tab = browser.new_tab()?;
        Ok(Self {
            _browser: browser,
            tab,
        })
    }
}

impl PageFetcher for ChromeFetcher {
    async fn fetch_rendered(&self, keyword: &str, page: usize, sort: SortMode) -> Result<String> {
        let url = search_url(keyword, page, sort);
        println!("Fetching {}", url);

        self.tab.navigate_to(&url)?;
        self.tab
            .wait_for_element_with_custom_timeout(RESULTS_SELECTOR, RESULTS_TIMEOUT)?;
        // Let the widget finish filling the container in
        sleep(SETTLE_DELAY).await;

        Ok(self.tab.get_content()?)
    }
}
