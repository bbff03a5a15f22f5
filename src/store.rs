use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";
const TIMESTAMP_LEN: usize = "0000-00-00_00-00-00".len();

/// One persisted keyword run, keyed by keyword and second-precision
/// timestamp. The same key addresses the run's derived-ID record.
#[derive(Debug, Clone)]
pub struct RunHandle {
    pub keyword: String,
    pub timestamp: String,
    pub path: PathBuf,
}

/// Append-only store of scrape records under one directory. Records are
/// plain text, one entry per line; nothing is ever updated or deleted.
pub struct ResultStore {
    output_dir: PathBuf,
}

impl ResultStore {
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self> {
        let output_dir = output_dir.into();
        fs::create_dir_all(&output_dir).with_context(|| {
            format!("Failed to create store directory {}", output_dir.display())
        })?;
        Ok(Self { output_dir })
    }

    /// Writes one keyword's raw URL list as a new timestamped record.
    pub fn save_run(&self, keyword: &str, urls: &[String]) -> Result<RunHandle> {
        let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
        let path = self.output_dir.join(format!("{}_{}.txt", keyword, timestamp));
        write_new(&path, urls)?;
        Ok(RunHandle {
            keyword: keyword.to_string(),
            timestamp,
            path,
        })
    }

    /// Writes the derived unique-ID list under the same keyword+timestamp
    /// key as its raw run.
    pub fn save_ids(&self, keyword: &str, ids: &[String], timestamp: &str) -> Result<PathBuf> {
        let path = self
            .output_dir
            .join(format!("{}_ids_{}.txt", keyword, timestamp));
        write_new(&path, ids)?;
        Ok(path)
    }

    /// Writes a cross-run aggregate ID list as a new timestamped record.
    pub fn save_aggregate(&self, ids: &[String]) -> Result<PathBuf> {
        let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
        let path = self
            .output_dir
            .join(format!("final_channel_ids_{}.txt", timestamp));
        write_new(&path, ids)?;
        Ok(path)
    }

    /// Lists every raw-run record currently in the store, ordered by
    /// filename.
    pub fn list_raw_runs(&self) -> Result<Vec<RunHandle>> {
        let entries = fs::read_dir(&self.output_dir).with_context(|| {
            format!("Failed to read store directory {}", self.output_dir.display())
        })?;

        let mut runs = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("txt") {
                continue;
            }
            let parsed = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .and_then(parse_run_stem)
                .map(|(keyword, timestamp)| (keyword.to_string(), timestamp.to_string()));
            if let Some((keyword, timestamp)) = parsed {
                runs.push(RunHandle {
                    keyword,
                    timestamp,
                    path,
                });
            }
        }
        runs.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(runs)
    }

    /// Reads one raw run back as trimmed, non-blank lines.
    pub fn load_raw_run(&self, run: &RunHandle) -> Result<Vec<String>> {
        let content = fs::read_to_string(&run.path)
            .with_context(|| format!("Failed to read record {}", run.path.display()))?;
        Ok(content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }
}

// Raw runs are named <keyword>_<timestamp>.txt. Derived-ID and aggregate
// records both end their keyword part with "_ids" ("<keyword>_ids",
// "final_channel_ids"), which keeps them out of the raw listing.
fn parse_run_stem(stem: &str) -> Option<(&str, &str)> {
    let split = stem.len().checked_sub(TIMESTAMP_LEN)?;
    let timestamp = stem.get(split..)?;
    NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT).ok()?;
    let keyword = stem.get(..split)?.strip_suffix('_')?;
    if keyword.is_empty() || keyword.ends_with("_ids") {
        return None;
    }
    Some((keyword, timestamp))
}

// create_new keeps every record write from clobbering an existing one
fn write_new(path: &Path, lines: &[String]) -> Result<()> {
    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .with_context(|| format!("Failed to create record {}", path.display()))?;
    file.write_all(lines.join("\n").as_bytes())
        .with_context(|| format!("Failed to write record {}", path.display()))?;
    Ok(())
}
