use rxlink_core::text::normalize_key;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

/// Structured information about one drug.
///
/// Every field is plain text; a value absent from the bulk source is stored
/// as an empty string, never as a null.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRecord {
    pub generic_name: String,
    pub drug_classes: String,
    pub activity: String,
    pub rx_otc: String,
    pub pregnancy_category: String,
    pub side_effects: String,
    pub related_drugs: String,
}

/// Normalized drug name -> record, plus the derived name set.
///
/// Immutable once built. Each construction gets a fresh `generation` so
/// caches derived from one catalog can tell when a rebuilt one replaced it.
#[derive(Debug, Clone)]
pub struct Catalog {
    records: BTreeMap<String, CatalogRecord>,
    names: BTreeSet<String>,
    generation: u64,
}

impl Catalog {
    /// Build a catalog from `(name, record)` pairs.
    ///
    /// Names are normalized; blank names are dropped and a later duplicate
    /// replaces an earlier one.
    pub fn from_records<I, S>(records: I) -> Self
    where
        I: IntoIterator<Item = (S, CatalogRecord)>,
        S: AsRef<str>,
    {
        let records: BTreeMap<String, CatalogRecord> = records
            .into_iter()
            .map(|(name, record)| (normalize_key(name.as_ref()), record))
            .filter(|(name, _)| !name.is_empty())
            .collect();
        Self::from_normalized(records)
    }

    pub(crate) fn from_normalized(records: BTreeMap<String, CatalogRecord>) -> Self {
        let names = records.keys().cloned().collect();
        Self {
            records,
            names,
            generation: NEXT_GENERATION.fetch_add(1, Ordering::Relaxed),
        }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::from_normalized(BTreeMap::new())
    }

    /// Look up a record; `name` is normalized first
    pub fn get(&self, name: &str) -> Option<&CatalogRecord> {
        self.records.get(&normalize_key(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.records.contains_key(&normalize_key(name))
    }

    pub fn names(&self) -> &BTreeSet<String> {
        &self.names
    }

    pub fn records(&self) -> &BTreeMap<String, CatalogRecord> {
        &self.records
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// Content equality; the generation is identity, not content.
impl PartialEq for Catalog {
    fn eq(&self, other: &Self) -> bool {
        self.records == other.records && self.names == other.names
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::empty()
    }
}
