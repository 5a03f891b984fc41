use crate::catalog::Catalog;
use crate::snapshot::{load_snapshot, save_snapshot};
use crate::source::read_csv_path;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Loads the drug catalog, preferring the cache artifact over the bulk source.
///
/// Neither `load` nor `rebuild` fails: a missing or unreadable source yields
/// an empty catalog, and a cache that cannot be read or written is logged and
/// otherwise ignored.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    source_path: PathBuf,
    cache_path: PathBuf,
}

impl CatalogStore {
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(source_path: P, cache_path: Q) -> Self {
        Self {
            source_path: source_path.as_ref().to_path_buf(),
            cache_path: cache_path.as_ref().to_path_buf(),
        }
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    pub fn cache_path(&self) -> &Path {
        &self.cache_path
    }

    /// Load from the cache artifact if it is present and valid, otherwise
    /// rebuild from the bulk source and rewrite the cache.
    pub fn load(&self) -> Catalog {
        match load_snapshot(&self.cache_path) {
            Ok(Some(catalog)) => {
                info!(
                    "Loaded {} drugs from cache {:?}",
                    catalog.len(),
                    self.cache_path
                );
                return catalog;
            }
            Ok(None) => {
                info!("No catalog cache at {:?}, building from source", self.cache_path);
            }
            Err(e) => {
                warn!(
                    "Catalog cache {:?} is invalid ({}), rebuilding from source",
                    self.cache_path, e
                );
            }
        }
        self.rebuild()
    }

    /// Build from the bulk source, ignoring any cache, and persist the result.
    pub fn rebuild(&self) -> Catalog {
        let catalog = match read_csv_path(&self.source_path) {
            Ok(catalog) => catalog,
            Err(e) => {
                // Not cached: a later run with the source present must rebuild.
                warn!(
                    "Could not read catalog source {:?}: {}. Continuing with an empty catalog",
                    self.source_path, e
                );
                return Catalog::empty();
            }
        };
        info!(
            "Processed {} unique drugs from {:?}",
            catalog.len(),
            self.source_path
        );

        match save_snapshot(&self.cache_path, &catalog) {
            Ok(()) => info!("Catalog cache written to {:?}", self.cache_path),
            Err(e) => warn!("Could not write catalog cache {:?}: {}", self.cache_path, e),
        }
        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const CSV: &str = "drug_name,generic_name,side_effects\n\
                       Metformin,metformin,Nausea. Diarrhea.\n\
                       Metformin HCl,metformin,Stomach upset\n";

    #[test]
    fn test_load_builds_and_caches() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("drugs.csv");
        let cache = dir.path().join("drugs.bin");
        std::fs::write(&source, CSV).unwrap();

        let store = CatalogStore::new(&source, &cache);
        let catalog = store.load();
        assert_eq!(catalog.len(), 2);
        assert!(cache.exists());
    }

    #[test]
    fn test_cache_used_when_source_gone() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("drugs.csv");
        let cache = dir.path().join("drugs.bin");
        std::fs::write(&source, CSV).unwrap();

        let store = CatalogStore::new(&source, &cache);
        let built = store.load();
        std::fs::remove_file(&source).unwrap();

        let reloaded = store.load();
        assert_eq!(reloaded, built);
    }

    #[test]
    fn test_corrupt_cache_rebuilt() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("drugs.csv");
        let cache = dir.path().join("drugs.bin");
        std::fs::write(&source, CSV).unwrap();
        std::fs::write(&cache, b"\x00\x01garbage").unwrap();

        let store = CatalogStore::new(&source, &cache);
        let catalog = store.load();
        assert_eq!(catalog.len(), 2);

        // the rewritten cache is valid now
        assert_eq!(load_snapshot(&cache).unwrap().unwrap(), catalog);
    }

    #[test]
    fn test_missing_source_gives_empty_catalog() {
        let dir = tempdir().unwrap();
        let store = CatalogStore::new(dir.path().join("absent.csv"), dir.path().join("c.bin"));
        let catalog = store.load();
        assert!(catalog.is_empty());
        assert!(!dir.path().join("c.bin").exists());
    }

    #[test]
    fn test_unwritable_cache_is_not_fatal() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("drugs.csv");
        std::fs::write(&source, CSV).unwrap();
        // the cache path is an existing directory, so the write fails
        let cache = dir.path().join("cache_dir");
        std::fs::create_dir(&cache).unwrap();

        let store = CatalogStore::new(&source, &cache);
        assert_eq!(store.load().len(), 2);
    }
}
