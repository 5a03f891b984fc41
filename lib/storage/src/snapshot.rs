// Cache artifact: a bincode snapshot of a built catalog
use crate::catalog::{Catalog, CatalogRecord};
use atomicwrites::{AtomicFile, OverwriteBehavior};
use rxlink_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;
use std::path::Path;

/// Bumped whenever `CatalogRecord` or the snapshot layout changes, so stale
/// artifacts are rebuilt instead of misread.
pub const SNAPSHOT_VERSION: u32 = 1;

/// On-disk shape of the cache artifact
#[derive(Debug, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    pub version: u32,
    pub records: BTreeMap<String, CatalogRecord>,
    pub names: BTreeSet<String>,
}

impl CatalogSnapshot {
    pub fn from_catalog(catalog: &Catalog) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            records: catalog.records().clone(),
            names: catalog.names().clone(),
        }
    }

    /// Accept the snapshot only if it has the current version and its name
    /// set matches the record keys.
    pub fn into_catalog(self) -> Result<Catalog> {
        if self.version != SNAPSHOT_VERSION {
            return Err(Error::InvalidCache(format!(
                "version {} does not match {}",
                self.version, SNAPSHOT_VERSION
            )));
        }
        if self.names.len() != self.records.len()
            || !self.names.iter().all(|name| self.records.contains_key(name))
        {
            return Err(Error::InvalidCache(
                "name set does not match record keys".to_string(),
            ));
        }
        if self.names.iter().any(|name| name.is_empty()) {
            return Err(Error::InvalidCache("blank drug name".to_string()));
        }
        Ok(Catalog::from_normalized(self.records))
    }
}

/// Read and validate a snapshot. `Ok(None)` when the file does not exist.
pub fn load_snapshot<P: AsRef<Path>>(path: P) -> Result<Option<Catalog>> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(None);
    }

    let data = std::fs::read(path)?;
    let snapshot: CatalogSnapshot = bincode::deserialize(&data)?;
    snapshot.into_catalog().map(Some)
}

/// Write the snapshot atomically; readers never observe a partial file.
pub fn save_snapshot<P: AsRef<Path>>(path: P, catalog: &Catalog) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let data = bincode::serialize(&CatalogSnapshot::from_catalog(catalog))?;
    AtomicFile::new(path, OverwriteBehavior::AllowOverwrite)
        .write(|f| f.write_all(&data))
        .map_err(|e| match e {
            atomicwrites::Error::Internal(e) | atomicwrites::Error::User(e) => Error::Io(e),
        })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample() -> Catalog {
        Catalog::from_records(vec![
            (
                "metformin",
                CatalogRecord {
                    generic_name: "metformin".to_string(),
                    side_effects: "Nausea. Diarrhea.".to_string(),
                    ..Default::default()
                },
            ),
            ("metformin hcl", CatalogRecord::default()),
        ])
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("catalog.bin");

        let catalog = sample();
        save_snapshot(&path, &catalog).unwrap();
        let loaded = load_snapshot(&path).unwrap().unwrap();
        assert_eq!(loaded, catalog);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        assert!(load_snapshot(dir.path().join("none.bin")).unwrap().is_none());
    }

    #[test]
    fn test_garbage_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("catalog.bin");
        std::fs::write(&path, b"not a snapshot").unwrap();
        assert!(load_snapshot(&path).is_err());
    }

    #[test]
    fn test_version_mismatch_rejected() {
        let snapshot = CatalogSnapshot {
            version: SNAPSHOT_VERSION + 1,
            ..CatalogSnapshot::from_catalog(&sample())
        };
        assert!(matches!(snapshot.into_catalog(), Err(Error::InvalidCache(_))));
    }

    #[test]
    fn test_inconsistent_names_rejected() {
        let mut snapshot = CatalogSnapshot::from_catalog(&sample());
        snapshot.names.insert("ghost".to_string());
        assert!(matches!(snapshot.into_catalog(), Err(Error::InvalidCache(_))));
    }

    #[test]
    fn test_creates_parent_dir() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("catalog.bin");
        save_snapshot(&path, &sample()).unwrap();
        assert!(path.exists());
    }
}
