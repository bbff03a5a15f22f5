use std::path::PathBuf;

use anyhow::Result;
use tracing::warn;

use crate::channel;
use crate::store::ResultStore;

/// Merges every persisted raw run into one sorted, deduplicated list of
/// `@`-prefixed channel IDs. A record that cannot be read is skipped, so a
/// damaged store still aggregates what remains.
pub fn aggregate_all(store: &ResultStore) -> Result<Vec<String>> {
    let runs = store.list_raw_runs()?;
    println!("📦 Combining {} keyword runs", runs.len());

    let mut urls = Vec::new();
    for run in &runs {
        match store.load_raw_run(run) {
            Ok(lines) => urls.extend(lines),
            Err(e) => warn!("skipping record {}: {}", run.path.display(), e),
        }
    }

    let ids = channel::unique_ids(&urls);
    Ok(ids.into_iter().map(|id| format!("@{}", id)).collect())
}

/// Aggregates the whole store and persists the result as a new timestamped
/// record.
pub fn run_aggregate(store: &ResultStore) -> Result<PathBuf> {
    let ids = aggregate_all(store)?;
    let path = store.save_aggregate(&ids)?;
    println!("✅ {} unique channel IDs saved to {}", ids.len(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn store_with_runs(runs: &[(&str, &[&str])]) -> (tempfile::TempDir, ResultStore) {
        let dir = tempdir().unwrap();
        let store = ResultStore::new(dir.path()).unwrap();
        for (keyword, urls) in runs {
            let urls: Vec<String> = urls.iter().map(|u| u.to_string()).collect();
            store.save_run(keyword, &urls).unwrap();
        }
        (dir, store)
    }

    #[test]
    fn collapses_the_same_channel_across_runs() {
        let (_dir, store) = store_with_runs(&[
            ("kw1", &["https://t.me/s/chan1"]),
            ("kw2", &["https://t.me/s/chan1"]),
        ]);
        assert_eq!(aggregate_all(&store).unwrap(), vec!["@chan1"]);
    }

    #[test]
    fn merges_sorts_and_prefixes_ids() {
        let (_dir, store) = store_with_runs(&[
            ("kw1", &["https://t.me/s/zulu", "https://t.me/alpha?x=1"]),
            ("kw2", &["https://t.me/mike", "not a channel link"]),
        ]);
        assert_eq!(
            aggregate_all(&store).unwrap(),
            vec!["@alpha", "@mike", "@zulu"]
        );
    }

    #[test]
    fn empty_store_aggregates_to_nothing() {
        let (_dir, store) = store_with_runs(&[]);
        assert!(aggregate_all(&store).unwrap().is_empty());
    }

    #[test]
    fn aggregation_is_idempotent() {
        let (_dir, store) = store_with_runs(&[
            ("kw1", &["https://t.me/b", "https://t.me/a"]),
            ("kw2", &["https://t.me/a"]),
        ]);
        let first = aggregate_all(&store).unwrap();
        let second = aggregate_all(&store).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, vec!["@a", "@b"]);
    }

    #[test]
    fn unreadable_records_are_skipped() {
        let (dir, store) = store_with_runs(&[("kw1", &["https://t.me/kept"])]);
        // A directory named like a run record cannot be read as one
        fs::create_dir(dir.path().join("bad_2024-05-01_10-00-00.txt")).unwrap();

        assert_eq!(aggregate_all(&store).unwrap(), vec!["@kept"]);
    }

    #[test]
    fn derived_id_records_do_not_feed_back_into_the_aggregate() {
        let (_dir, store) = store_with_runs(&[("kw1", &["https://t.me/alpha"])]);
        let runs = store.list_raw_runs().unwrap();
        store
            .save_ids(
                "kw1",
                &["alpha".to_string(), "phantom".to_string()],
                &runs[0].timestamp,
            )
            .unwrap();

        assert_eq!(aggregate_all(&store).unwrap(), vec!["@alpha"]);
    }

    #[test]
    fn run_aggregate_writes_a_timestamped_record() {
        let (_dir, store) = store_with_runs(&[("kw1", &["https://t.me/s/chan1"])]);

        let path = run_aggregate(&store).unwrap();

        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("final_channel_ids_"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "@chan1");
    }

    #[test]
    fn earlier_aggregates_do_not_feed_back_in() {
        let (_dir, store) = store_with_runs(&[("kw1", &["https://t.me/chan1"])]);

        run_aggregate(&store).unwrap();
        let again = aggregate_all(&store).unwrap();

        assert_eq!(again, vec!["@chan1"]);
    }
}
