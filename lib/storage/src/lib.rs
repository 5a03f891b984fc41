//! # rxlink Storage
//!
//! The catalog store: builds the drug catalog from a CSV bulk source and
//! keeps a bincode snapshot of it as a cache artifact.

pub mod catalog;
pub mod snapshot;
pub mod source;
pub mod store;

pub use catalog::{Catalog, CatalogRecord};
pub use snapshot::{load_snapshot, save_snapshot, CatalogSnapshot, SNAPSHOT_VERSION};
pub use source::{read_csv, read_csv_path};
pub use store::CatalogStore;
