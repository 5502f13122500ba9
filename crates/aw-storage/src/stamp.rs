//! Last-sync stamp
//!
//! A single RFC 3339 timestamp recording when the last reconciliation pass
//! completed. Anything that prevents reading it just means the sync is due.

use aw_core::error::Result;
use chrono::{DateTime, Duration, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// File-backed record of the last completed sync
pub struct SyncStamp {
    path: PathBuf,
}

impl SyncStamp {
    /// Create a stamp over a file location
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the stamp file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// When the last sync completed, if that can be determined
    pub fn last_sync(&self) -> Option<DateTime<Utc>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!("Failed to read sync stamp {:?}: {}", self.path, e);
                }
                return None;
            }
        };
        match DateTime::parse_from_rfc3339(text.trim()) {
            Ok(parsed) => Some(parsed.with_timezone(&Utc)),
            Err(e) => {
                warn!("Ignoring unparseable sync stamp {:?}: {}", self.path, e);
                None
            }
        }
    }

    /// Whether a sync is due: no readable stamp, or one older than the interval
    pub fn is_due(&self, interval_hours: u64) -> bool {
        match self.last_sync() {
            Some(last) => Utc::now() - last >= Duration::hours(interval_hours as i64),
            None => true,
        }
    }

    /// Record that a sync completed just now
    pub fn mark(&self) -> Result<()> {
        self.mark_at(Utc::now())
    }

    fn mark_at(&self, when: DateTime<Utc>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, format!("{}\n", when.to_rfc3339()))?;
        debug!("Marked sync stamp {:?} at {}", self.path, when);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_stamp() -> (SyncStamp, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let stamp = SyncStamp::new(temp_dir.path().join("state").join("last-sync"));
        (stamp, temp_dir)
    }

    #[test]
    fn test_missing_stamp_is_due() {
        let (stamp, _temp) = create_test_stamp();
        assert!(stamp.last_sync().is_none());
        assert!(stamp.is_due(24));
    }

    #[test]
    fn test_mark_creates_parents_and_clears_due() {
        let (stamp, _temp) = create_test_stamp();
        stamp.mark().unwrap();

        assert!(stamp.path().exists());
        assert!(stamp.last_sync().is_some());
        assert!(!stamp.is_due(24));
    }

    #[test]
    fn test_unparseable_stamp_is_due() {
        let (stamp, _temp) = create_test_stamp();
        fs::create_dir_all(stamp.path().parent().unwrap()).unwrap();
        fs::write(stamp.path(), "around lunchtime\n").unwrap();

        assert!(stamp.last_sync().is_none());
        assert!(stamp.is_due(24));
    }

    #[test]
    fn test_old_stamp_is_due_and_recent_is_not() {
        let (stamp, _temp) = create_test_stamp();
        stamp.mark_at(Utc::now() - Duration::hours(48)).unwrap();

        assert!(stamp.is_due(24));
        assert!(!stamp.is_due(72));
    }

    #[test]
    fn test_mark_overwrites_older_stamp() {
        let (stamp, _temp) = create_test_stamp();
        stamp.mark_at(Utc::now() - Duration::hours(48)).unwrap();
        assert!(stamp.is_due(24));

        stamp.mark().unwrap();
        assert!(!stamp.is_due(24));
    }
}
