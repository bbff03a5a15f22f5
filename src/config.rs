use std::collections::HashSet;
use std::fs;
use std::path::Path;

use clap::ValueEnum;
use serde::Deserialize;
use tracing::warn;

/// Result ordering requested from the search widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SortMode {
    #[default]
    Relevance,
    Date,
}

impl SortMode {
    /// Value placed in the widget's `gsc.sort` parameter. Relevance is the
    /// upstream default and is requested with an empty value.
    pub fn as_query(self) -> &'static str {
        match self {
            SortMode::Relevance => "",
            SortMode::Date => "date",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ScrapeConfig {
    /// Result pages attempted per keyword.
    pub pages: usize,
    pub sort: SortMode,
    /// Persist the derived unique-ID record next to each raw run.
    pub save_ids: bool,
}

#[derive(Deserialize)]
struct KeywordsFile {
    keywords: Vec<String>,
}

/// Loads the keyword list from a JSON file shaped `{"keywords": [...]}`.
/// Any read or parse failure is reported and yields an empty list, as is a
/// keyword that could not name a record on disk; deciding whether an empty
/// list is fatal is the caller's job.
pub fn load_keywords(path: &Path) -> Vec<String> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) => {
            warn!("could not read keywords file {}: {}", path.display(), e);
            return Vec::new();
        }
    };
    let parsed: KeywordsFile = match serde_json::from_str(&raw) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!("invalid keywords file {}: {}", path.display(), e);
            return Vec::new();
        }
    };

    let mut seen = HashSet::new();
    let mut keywords = Vec::new();
    for keyword in parsed.keywords {
        let keyword = keyword.trim();
        if keyword.is_empty() || !seen.insert(keyword.to_string()) {
            continue;
        }
        // Keywords become record filename stems, so separators cannot pass.
        if keyword.contains('/') || keyword.contains('\\') {
            warn!("dropping keyword '{}': path separators are not allowed", keyword);
            continue;
        }
        keywords.push(keyword.to_string());
    }
    keywords
}
