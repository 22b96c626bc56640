//! File-based staleness cache for the serialized inventory.
//!
//! Freshness is mtime-based. Every failure on the read path (missing file,
//! permission error, unreadable mtime) is a cache miss, never an error.

use anyhow::Context;
use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime};

/// Return the cached inventory verbatim when the file is younger than
/// `max_age` seconds. `max_age == 0` disables caching entirely.
pub fn read_fresh(path: &Path, max_age: u64) -> Option<String> {
    if max_age == 0 {
        return None;
    }

    let modified = fs::metadata(path).and_then(|meta| meta.modified()).ok()?;
    let age = SystemTime::now().duration_since(modified).ok()?;
    if !is_fresh(age, max_age) {
        return None;
    }

    fs::read_to_string(path).ok()
}

fn is_fresh(age: Duration, max_age: u64) -> bool {
    age < Duration::from_secs(max_age)
}

/// Persist the serialized inventory, creating parent directories on demand.
pub fn write(path: &Path, data: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create cache dir {}", parent.display()))?;
    }
    fs::write(path, data).with_context(|| format!("write cache file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn age_inside_window_is_fresh() {
        assert!(is_fresh(Duration::from_secs(100), 300));
    }

    #[test]
    fn age_past_window_is_stale() {
        assert!(!is_fresh(Duration::from_secs(400), 300));
        assert!(!is_fresh(Duration::from_secs(300), 300));
    }

    #[test]
    fn missing_file_is_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(read_fresh(&dir.path().join("inv.json"), 300), None);
    }

    #[test]
    fn zero_max_age_disables_caching() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inv.json");
        write(&path, "{}").unwrap();
        assert_eq!(read_fresh(&path, 0), None);
    }

    #[test]
    fn fresh_file_round_trips_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("inv.json");
        write(&path, "{\"all\": {}}").unwrap();
        assert_eq!(read_fresh(&path, 300).as_deref(), Some("{\"all\": {}}"));
    }
}
