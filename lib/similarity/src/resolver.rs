//! Entity resolver
//!
//! Maps a free-text mention to one catalog key. Tiers run in a fixed order
//! and the first hit wins:
//!
//! 1. lexical: longest catalog name found on word boundaries in the query
//! 2. semantic: best embedding match over all names, above the threshold
//!
//! A lexical hit skips the semantic tier entirely.

use crate::lexical::LexicalMatcher;
use crate::semantic::SemanticMatcher;
use rxlink_core::Embedder;
use rxlink_storage::Catalog;
use std::sync::Arc;
use tracing::debug;

/// Similarity a semantic candidate must exceed to be accepted
pub const DEFAULT_ENTITY_THRESHOLD: f32 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTier {
    Lexical,
    Semantic,
}

/// A resolved catalog key with the tier that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub name: String,
    pub tier: MatchTier,
    /// 1.0 for lexical hits, the cosine similarity for semantic ones
    pub score: f32,
}

#[derive(Debug)]
pub struct EntityResolver {
    catalog: Arc<Catalog>,
    lexical: LexicalMatcher,
    semantic: SemanticMatcher,
    threshold: f32,
}

impl EntityResolver {
    pub fn new(catalog: Arc<Catalog>, embedder: Option<Arc<dyn Embedder>>) -> Self {
        let lexical = LexicalMatcher::new(catalog.names().iter().cloned());
        let semantic = SemanticMatcher::with_cache(embedder);
        semantic.sync_generation(catalog.generation());
        Self {
            catalog,
            lexical,
            semantic,
            threshold: DEFAULT_ENTITY_THRESHOLD,
        }
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn has_oracle(&self) -> bool {
        self.semantic.has_oracle()
    }

    /// Install a rebuilt catalog; cached name embeddings are dropped.
    pub fn replace_catalog(&mut self, catalog: Arc<Catalog>) {
        self.lexical = LexicalMatcher::new(catalog.names().iter().cloned());
        self.semantic.sync_generation(catalog.generation());
        self.catalog = catalog;
    }

    /// The catalog key `query` refers to, if any
    pub fn resolve(&self, query: &str) -> Option<String> {
        self.resolve_with_score(query).map(|r| r.name)
    }

    pub fn resolve_with_score(&self, query: &str) -> Option<Resolution> {
        if let Some(name) = self.lexical.find(query) {
            debug!("Direct match found: {}", name);
            return Some(Resolution {
                name: name.to_string(),
                tier: MatchTier::Lexical,
                score: 1.0,
            });
        }

        if !self.semantic.has_oracle() || self.catalog.is_empty() {
            return None;
        }

        debug!("No direct match, trying semantic similarity for {:?}", query);
        self.semantic.sync_generation(self.catalog.generation());
        let result = self
            .semantic
            .find_best(query, self.catalog.names(), self.threshold);
        result.name.map(|name| Resolution {
            name,
            tier: MatchTier::Semantic,
            score: result.score,
        })
    }
}
