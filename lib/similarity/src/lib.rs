//! # rxlink Similarity
//!
//! Matching over the drug catalog:
//!
//! - [`LexicalMatcher`] - longest catalog name on word boundaries
//! - [`SemanticMatcher`] - embedding similarity with a strict threshold
//! - [`EntityResolver`] - lexical first, semantic as fallback
//! - [`SegmentRanker`] - relevant sentences of a free-text field
//!
//! Every component accepts an optional embedding oracle. Without one, or when
//! it fails, matching continues lexically; "no match" is a normal return
//! value, never an error.
//!
//! ## Example
//!
//! ```rust
//! use rxlink_similarity::{EntityResolver, SegmentRanker};
//! use rxlink_storage::{Catalog, CatalogRecord};
//! use std::sync::Arc;
//!
//! let catalog = Arc::new(Catalog::from_records(vec![
//!     ("metformin", CatalogRecord::default()),
//!     ("metformin hcl", CatalogRecord::default()),
//! ]));
//! let resolver = EntityResolver::new(catalog, None);
//! assert_eq!(resolver.resolve("tell me about Metformin HCl").as_deref(), Some("metformin hcl"));
//!
//! let ranker = SegmentRanker::new(None);
//! let kept = ranker.rank("May cause nausea. Rarely, severe dizziness.", "dizziness");
//! assert_eq!(kept, vec!["Rarely, severe dizziness"]);
//! ```

pub mod lexical;
pub mod resolver;
pub mod segments;
pub mod semantic;

#[cfg(test)]
mod test_support;

pub use lexical::{find_longest_match, LexicalMatcher};
pub use resolver::{EntityResolver, MatchTier, Resolution, DEFAULT_ENTITY_THRESHOLD};
pub use segments::{
    is_missing, lexical_match, mentions_any_token, split_segments, SegmentRanker,
    DEFAULT_SEGMENT_THRESHOLD, MISSING_PLACEHOLDER,
};
pub use semantic::{MatchResult, SemanticMatcher};
