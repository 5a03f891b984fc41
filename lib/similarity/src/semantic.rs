//! Semantic matcher
//!
//! Ranks candidates by cosine similarity between their embedding and the
//! query embedding. Without an embedding oracle, or when the oracle fails,
//! the matcher reports "no match" rather than an error.

use ahash::AHashMap;
use parking_lot::RwLock;
use rxlink_core::{Embedder, Result, Vector};
use std::sync::Arc;
use tracing::{debug, warn};

/// Outcome of a semantic match.
///
/// `name` is set only when the best score strictly exceeded the threshold.
/// A rejected best candidate still reports its score.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub name: Option<String>,
    pub score: f32,
}

impl MatchResult {
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        Self {
            name: None,
            score: 0.0,
        }
    }

    #[inline]
    pub fn is_match(&self) -> bool {
        self.name.is_some()
    }
}

/// Candidate embeddings keyed by normalized name, valid for one catalog
/// generation.
#[derive(Debug, Default)]
struct EmbeddingCache {
    generation: u64,
    vectors: AHashMap<String, Vector>,
}

pub struct SemanticMatcher {
    embedder: Option<Arc<dyn Embedder>>,
    cache: Option<RwLock<EmbeddingCache>>,
}

impl SemanticMatcher {
    /// Matcher that embeds every candidate on every call
    pub fn new(embedder: Option<Arc<dyn Embedder>>) -> Self {
        Self {
            embedder,
            cache: None,
        }
    }

    /// Matcher that remembers candidate embeddings between calls
    pub fn with_cache(embedder: Option<Arc<dyn Embedder>>) -> Self {
        Self {
            embedder,
            cache: Some(RwLock::new(EmbeddingCache::default())),
        }
    }

    pub fn has_oracle(&self) -> bool {
        self.embedder.is_some()
    }

    /// Drop cached embeddings if they were computed for another catalog
    /// generation.
    pub fn sync_generation(&self, generation: u64) {
        if let Some(cache) = &self.cache {
            if cache.read().generation == generation {
                return;
            }
            let mut cache = cache.write();
            if cache.generation != generation {
                cache.vectors.clear();
                cache.generation = generation;
            }
        }
    }

    /// Number of cached candidate embeddings
    pub fn cached_len(&self) -> usize {
        self.cache.as_ref().map_or(0, |c| c.read().vectors.len())
    }

    /// Best candidate for `query`, accepted only if its similarity is
    /// strictly greater than `threshold`.
    pub fn find_best<I, S>(&self, query: &str, candidates: I, threshold: f32) -> MatchResult
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let Some(embedder) = self.embedder.as_deref() else {
            return MatchResult::none();
        };

        match self.score_candidates(embedder, query, candidates) {
            Ok(Some((name, score))) if score > threshold => {
                debug!("Semantic match {:?} with score {:.3}", name, score);
                MatchResult {
                    name: Some(name),
                    score,
                }
            }
            Ok(Some((name, score))) => {
                debug!(
                    "No strong semantic match (best {:?}, score {:.3})",
                    name, score
                );
                MatchResult { name: None, score }
            }
            Ok(None) => MatchResult::none(),
            Err(e) => {
                warn!("Semantic matching unavailable for this query: {}", e);
                MatchResult::none()
            }
        }
    }

    fn score_candidates<I, S>(
        &self,
        embedder: &dyn Embedder,
        query: &str,
        candidates: I,
    ) -> Result<Option<(String, f32)>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let query_vector = embedder.embed(query)?;
        let mut best: Option<(String, f32)> = None;

        for candidate in candidates {
            let candidate = candidate.as_ref();
            let score = self.candidate_similarity(embedder, &query_vector, candidate)?;
            if best.as_ref().map_or(true, |(_, s)| score > *s) {
                best = Some((candidate.to_string(), score));
            }
        }

        Ok(best)
    }

    fn candidate_similarity(
        &self,
        embedder: &dyn Embedder,
        query_vector: &Vector,
        candidate: &str,
    ) -> Result<f32> {
        let Some(cache) = &self.cache else {
            return query_vector.try_cosine_similarity(&embedder.embed(candidate)?);
        };

        if let Some(vector) = cache.read().vectors.get(candidate) {
            return query_vector.try_cosine_similarity(vector);
        }

        let vector = embedder.embed(candidate)?;
        let score = query_vector.try_cosine_similarity(&vector)?;
        cache.write().vectors.insert(candidate.to_string(), vector);
        Ok(score)
    }
}

impl std::fmt::Debug for SemanticMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SemanticMatcher")
            .field("has_oracle", &self.has_oracle())
            .field("cached", &self.cached_len())
            .finish()
    }
}
