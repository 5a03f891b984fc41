//! # rxlink
//!
//! Resolves free-text drug mentions against a drug catalog and finds the
//! parts of a drug's side-effect description relevant to a symptom.
//!
//! Resolution is tiered: a word-boundary lexical match over catalog names
//! (longest name wins), then embedding similarity when an embedding oracle
//! is available. Side-effect text is split into sentences and filtered the
//! same way, with keyword containment as the fallback. Without an oracle
//! everything keeps working lexically.
//!
//! ## Quick Start
//!
//! ### As a CLI
//!
//! ```bash
//! rxlink --source drugs.csv ask "what is metformin hcl" --symptom dizziness
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use rxlink::prelude::*;
//! use std::sync::Arc;
//!
//! let catalog = Catalog::from_records(vec![(
//!     "metformin",
//!     CatalogRecord {
//!         side_effects: "May cause nausea. Rarely, severe dizziness.".to_string(),
//!         ..Default::default()
//!     },
//! )]);
//! let answerer = DrugAnswerer::new(Arc::new(catalog), None);
//!
//! assert_eq!(answerer.resolve("Is METFORMIN safe?").as_deref(), Some("metformin"));
//! assert_eq!(
//!     answerer.relevant_segments("metformin", "dizziness"),
//!     vec!["Rarely, severe dizziness"]
//! );
//! ```
//!
//! ## Crate Structure
//!
//! - `rxlink-core` - errors, vectors, the [`Embedder`] oracle trait
//! - `rxlink-storage` - catalog store (CSV source, bincode cache)
//! - `rxlink-similarity` - lexical/semantic matchers, resolver, segment ranker

pub mod answer;
pub mod config;

pub use answer::{capitalize, truncate_chars, DrugAnswerer};
pub use config::EngineConfig;

// Re-export core types
pub use rxlink_core::{Embedder, Error, HashEmbedder, Result, Vector};

// Re-export storage
pub use rxlink_storage::{Catalog, CatalogRecord, CatalogStore};

// Re-export matching
pub use rxlink_similarity::{
    find_longest_match, EntityResolver, LexicalMatcher, MatchResult, MatchTier, Resolution,
    SegmentRanker, SemanticMatcher,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Catalog, CatalogRecord, CatalogStore, DrugAnswerer, Embedder, EngineConfig,
        EntityResolver, Error, HashEmbedder, Result, SegmentRanker, Vector,
    };
}
