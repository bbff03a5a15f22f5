use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;

// The preview form (t.me/s/<id>) sits before the direct form so its capture
// wins whenever both could apply at the same position.
static CHANNEL_URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"t\.me/s/([^/?]+)|t\.me/([^/?]+)").unwrap());

/// Extracts the canonical channel ID from a scraped URL, or `None` when the
/// URL does not reference a t.me channel.
pub fn channel_id(url: &str) -> Option<&str> {
    let caps = CHANNEL_URL_RE.captures(url)?;
    caps.get(1).or_else(|| caps.get(2)).map(|m| m.as_str())
}

/// Collapses a raw URL list into the sorted set of bare channel IDs it
/// references. Lines that normalize to nothing are dropped.
pub fn unique_ids(urls: &[String]) -> Vec<String> {
    let ids: BTreeSet<&str> = urls.iter().filter_map(|url| channel_id(url)).collect();
    ids.into_iter().map(str::to_string).collect()
}
