//! Segment relevance ranking
//!
//! Splits a free-text field (a drug's side-effect description) into
//! sentence-like segments and keeps the ones relevant to a query. Relevance
//! is embedding similarity when an oracle is available, and query-token
//! containment otherwise or whenever the oracle fails for a segment.

use regex::Regex;
use rxlink_core::text::query_tokens;
use rxlink_core::{Embedder, Vector};
use std::sync::{Arc, LazyLock};
use tracing::warn;

/// Similarity a segment must exceed to count as relevant
pub const DEFAULT_SEGMENT_THRESHOLD: f32 = 0.7;

/// Placeholder some sources write for an absent field
pub const MISSING_PLACEHOLDER: &str = "nan";

/// `.` or `;` followed by whitespace and an upper-case letter
static BOUNDARY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.;]\s+\p{Lu}").unwrap());

/// True for an empty field or the missing-value placeholder
pub fn is_missing(text: &str) -> bool {
    let text = text.trim();
    text.is_empty() || text == MISSING_PLACEHOLDER
}

/// Split text into segments.
///
/// A split happens only at `.`/`;` followed by whitespace and an upper-case
/// letter, so abbreviations and decimals stay intact. Segments are trimmed,
/// empty ones dropped, and a single trailing `.`/`;` removed.
pub fn split_segments(text: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut start = 0;

    for m in BOUNDARY_RE.find_iter(text) {
        segments.push(&text[start..m.start()]);
        // the upper-case letter opens the next segment
        let letter = m.as_str().chars().next_back().map_or(0, char::len_utf8);
        start = m.end() - letter;
    }
    segments.push(&text[start..]);

    segments
        .into_iter()
        .map(|s| {
            let s = s.trim();
            s.strip_suffix(['.', ';']).unwrap_or(s).trim_end()
        })
        .filter(|s| !s.is_empty())
        .collect()
}

/// Keep `segment` if it contains any of the query tokens, case-insensitively
pub fn lexical_match(segment: &str, tokens: &[String]) -> bool {
    let segment = segment.to_lowercase();
    tokens.iter().any(|t| segment.contains(t.as_str()))
}

/// True if `text` contains a query token longer than two characters.
///
/// Callers use this to decide whether an empty ranking still deserves an
/// excerpt of the full text.
pub fn mentions_any_token(text: &str, query: &str) -> bool {
    let text = text.to_lowercase();
    query_tokens(query)
        .iter()
        .filter(|t| t.chars().count() > 2)
        .any(|t| text.contains(t.as_str()))
}

pub struct SegmentRanker {
    embedder: Option<Arc<dyn Embedder>>,
    threshold: f32,
}

impl SegmentRanker {
    pub fn new(embedder: Option<Arc<dyn Embedder>>) -> Self {
        Self {
            embedder,
            threshold: DEFAULT_SEGMENT_THRESHOLD,
        }
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn has_oracle(&self) -> bool {
        self.embedder.is_some()
    }

    /// Segments of `source_text` relevant to `query`, in source order.
    ///
    /// Empty for a missing field; may also be empty when nothing is relevant.
    pub fn rank(&self, source_text: &str, query: &str) -> Vec<String> {
        if is_missing(source_text) {
            return Vec::new();
        }

        let segments = split_segments(source_text);
        let tokens = query_tokens(query);

        let query_vector = self.embed_query(query);
        let keep = |segment: &str| match (self.embedder.as_deref(), &query_vector) {
            (Some(embedder), Some(qv)) => self.semantic_match(embedder, qv, segment, &tokens),
            _ => lexical_match(segment, &tokens),
        };

        segments
            .into_iter()
            .filter(|s| keep(*s))
            .map(str::to_string)
            .collect()
    }

    // One query embedding per call; a failure sends every segment to the
    // lexical test.
    fn embed_query(&self, query: &str) -> Option<Vector> {
        let embedder = self.embedder.as_deref()?;
        match embedder.embed(query) {
            Ok(v) => Some(v),
            Err(e) => {
                warn!("Could not embed query {:?}, using keyword matching: {}", query, e);
                None
            }
        }
    }

    fn semantic_match(
        &self,
        embedder: &dyn Embedder,
        query_vector: &Vector,
        segment: &str,
        tokens: &[String],
    ) -> bool {
        let score = embedder
            .embed(segment)
            .and_then(|v| query_vector.try_cosine_similarity(&v));
        match score {
            Ok(score) => score > self.threshold,
            Err(e) => {
                warn!("Semantic scoring failed for a segment, using keyword matching: {}", e);
                lexical_match(segment, tokens)
            }
        }
    }
}

impl std::fmt::Debug for SegmentRanker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SegmentRanker")
            .field("has_oracle", &self.has_oracle())
            .field("threshold", &self.threshold)
            .finish()
    }
}
