//! Historical session summary provider.
//!
//! Completed sessions are summarized by an external job into dated JSON
//! files (`<sortable timestamp>.json`) under the history directory. The
//! provider picks the lexicographically last one; having none is an
//! expected state, not an error.

use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::system::FileSystem;

/// Averages over the most recent completed session.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SessionSummary {
    pub avg_clients: f64,
    pub avg_ads_blocked: f64,
    pub avg_queries: f64,
    pub avg_ads_pct: f64,
}

/// Loads the most recent summary, or `None` when no usable one exists.
///
/// A corrupt file is logged and treated as absent; it must never take the
/// summary page down.
pub fn latest_summary<F: FileSystem>(fs: &F, dir: &Path) -> Option<SessionSummary> {
    let entries = match fs.read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!("history directory {:?} unreadable: {}", dir, e);
            return None;
        }
    };

    let latest = entries
        .into_iter()
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .max()?;

    let content = match fs.read_to_string(&latest) {
        Ok(content) => content,
        Err(e) => {
            warn!("summary file {:?} unreadable: {}", latest, e);
            return None;
        }
    };

    match serde_json::from_str(&content) {
        Ok(summary) => Some(summary),
        Err(e) => {
            warn!("summary file {:?} is corrupt: {}", latest, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::MockFs;

    const SUMMARY_JSON: &str = r#"{
        "avg_clients": 2.5,
        "avg_ads_blocked": 142.0,
        "avg_queries": 980.0,
        "avg_ads_pct": 14.5
    }"#;

    #[test]
    fn picks_the_lexicographically_last_file() {
        let fs = MockFs::new();
        fs.add_file(
            "/history/20250101-120000.json",
            r#"{"avg_clients": 1.0, "avg_ads_blocked": 1.0, "avg_queries": 1.0, "avg_ads_pct": 1.0}"#,
        );
        fs.add_file("/history/20250315-080000.json", SUMMARY_JSON);

        let summary = latest_summary(&fs, Path::new("/history")).unwrap();
        assert_eq!(summary.avg_clients, 2.5);
        assert_eq!(summary.avg_ads_pct, 14.5);
    }

    #[test]
    fn missing_directory_is_not_an_error() {
        let fs = MockFs::new();
        assert_eq!(latest_summary(&fs, Path::new("/history")), None);
    }

    #[test]
    fn empty_directory_yields_none() {
        let fs = MockFs::new();
        fs.add_dir("/history");
        assert_eq!(latest_summary(&fs, Path::new("/history")), None);
    }

    #[test]
    fn non_json_files_are_ignored() {
        let fs = MockFs::new();
        fs.add_file("/history/README.txt", "not a summary");
        assert_eq!(latest_summary(&fs, Path::new("/history")), None);
    }

    #[test]
    fn corrupt_latest_file_degrades_to_none() {
        let fs = MockFs::new();
        fs.add_file("/history/20250101-120000.json", SUMMARY_JSON);
        fs.add_file("/history/20250315-080000.json", "{ truncated");
        // The corrupt file is the latest one; it degrades instead of
        // falling back to the older file, so the page never shows stale
        // data for the wrong session.
        assert_eq!(latest_summary(&fs, Path::new("/history")), None);
    }

    #[test]
    fn reads_real_files_through_real_fs() {
        use crate::system::RealFs;
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("20250401-000000.json"), SUMMARY_JSON).unwrap();

        let summary = latest_summary(&RealFs::new(), dir.path()).unwrap();
        assert_eq!(summary.avg_queries, 980.0);
    }
}
