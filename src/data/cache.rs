use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use super::error::DataSourceError;
use super::loader::load_file;
use super::model::InventoryTable;

// ---------------------------------------------------------------------------
// Source identity
// ---------------------------------------------------------------------------

/// Identity of a source file's content: byte length plus modification time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceFingerprint {
    len: u64,
    modified: Option<SystemTime>,
}

impl SourceFingerprint {
    pub fn of(path: &Path) -> Result<Self, DataSourceError> {
        let meta = fs::metadata(path).map_err(|e| DataSourceError::io(path, e))?;
        Ok(SourceFingerprint {
            len: meta.len(),
            modified: meta.modified().ok(),
        })
    }
}

// ---------------------------------------------------------------------------
// TableCache – load once, reuse across interactions
// ---------------------------------------------------------------------------

struct CachedTable {
    fingerprint: SourceFingerprint,
    table: Arc<InventoryTable>,
}

/// Memoizes loaded tables by source path.
///
/// A cached table is handed out again as long as the source fingerprint is
/// unchanged; a changed source is re-read on the next [`TableCache::load`].
/// Tables are immutable once cached, so the returned `Arc`s can be shared.
#[derive(Default)]
pub struct TableCache {
    entries: HashMap<PathBuf, CachedTable>,
}

impl TableCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&mut self, path: &Path) -> Result<Arc<InventoryTable>, DataSourceError> {
        let fingerprint = SourceFingerprint::of(path)?;

        if let Some(entry) = self.entries.get(path) {
            if entry.fingerprint == fingerprint {
                log::debug!("cache hit for {}", path.display());
                return Ok(Arc::clone(&entry.table));
            }
            log::debug!("{} changed on disk, reloading", path.display());
        }

        let table = Arc::new(load_file(path)?);
        self.entries.insert(
            path.to_path_buf(),
            CachedTable {
                fingerprint,
                table: Arc::clone(&table),
            },
        );
        Ok(table)
    }

    /// Drop the cached table for `path`. Returns whether one was cached.
    pub fn invalidate(&mut self, path: &Path) -> bool {
        self.entries.remove(path).is_some()
    }

    #[cfg(test)]
    fn contains(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const BODY: &str = "Date,Store ID,Region,Category,Inventory Level,Units Sold,Price,Seasonality\n\
                        01/15/24,S001,North,Toys,80,10,2.5,Winter\n\
                        xx/yy/zz,S002,South,Toys,250,3,1.25,Summer\n";

    #[test]
    fn unchanged_source_is_served_from_cache() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("inv.csv");
        fs::write(&path, BODY).unwrap();

        let mut cache = TableCache::new();
        let first = cache.load(&path).unwrap();
        let second = cache.load(&path).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        for (a, b) in first.records().iter().zip(second.records()) {
            assert_eq!(a.revenue().to_bits(), b.revenue().to_bits());
            assert_eq!(a.is_low_stock(), b.is_low_stock());
            assert_eq!(a.is_overstock(), b.is_overstock());
        }
    }

    #[test]
    fn changed_source_is_reloaded() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("inv.csv");
        fs::write(&path, BODY).unwrap();

        let mut cache = TableCache::new();
        let first = cache.load(&path).unwrap();
        assert_eq!(first.len(), 2);

        fs::write(&path, format!("{BODY}03/01/24,S003,East,Toys,500,1,9.0,Spring\n")).unwrap();
        let second = cache.load(&path).unwrap();

        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(second.len(), 3);
        // the table handed out earlier is untouched
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn invalidate_forces_a_reread() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("inv.csv");
        fs::write(&path, BODY).unwrap();

        let mut cache = TableCache::new();
        let first = cache.load(&path).unwrap();
        assert!(cache.contains(&path));
        assert!(cache.invalidate(&path));
        assert!(!cache.contains(&path));
        assert!(!cache.invalidate(&path));

        let second = cache.load(&path).unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(first.records(), second.records());
    }

    #[test]
    fn failed_load_is_not_cached() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("inv.csv");
        fs::write(&path, "Date,Region\n01/01/24,North\n").unwrap();

        let mut cache = TableCache::new();
        assert!(matches!(
            cache.load(&path),
            Err(DataSourceError::MissingColumns { .. })
        ));
        assert!(!cache.contains(&path));
    }
}
