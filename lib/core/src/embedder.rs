//! Embedding oracle
//!
//! The engine treats text embedding as an opaque capability. Anything that can
//! turn text into a fixed-length [`Vector`] implements [`Embedder`]; model
//! inference, remote services and the like live outside this workspace and are
//! injected as `Arc<dyn Embedder>`.
//!
//! [`HashEmbedder`] is a deterministic in-process implementation based on
//! character trigrams and word hashing. It needs no model files, which makes
//! it the default for offline runs and tests.

use crate::{Error, Result, Vector};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};

/// Default dimension for hashed text embeddings
pub const DEFAULT_EMBEDDING_DIM: usize = 64;

/// Produces an embedding for a piece of text.
///
/// Implementations must return the same vector for the same input within a
/// process lifetime. A failed call is reported as [`Error::Embedding`] and the
/// caller falls back to lexical matching.
pub trait Embedder: Send + Sync {
    fn embed(&self, text: &str) -> Result<Vector>;
}

/// Trigram/word hashing embedder
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dim: usize,
}

impl HashEmbedder {
    pub fn new(dim: usize) -> Result<Self> {
        if dim == 0 {
            return Err(Error::InvalidConfig(
                "embedding dimension must be greater than zero".to_string(),
            ));
        }
        Ok(Self { dim })
    }

    pub fn dim(&self) -> usize {
        self.dim
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self {
            dim: DEFAULT_EMBEDDING_DIM,
        }
    }
}

impl Embedder for HashEmbedder {
    fn embed(&self, text: &str) -> Result<Vector> {
        Ok(hash_text_to_vector(text, self.dim))
    }
}

/// Hash a string to a fixed-size unit vector.
///
/// Trigrams add 1.0 to their bucket, whole words add 2.0.
pub fn hash_text_to_vector(text: &str, dim: usize) -> Vector {
    let mut components = vec![0.0f32; dim];
    let normalized = text.to_lowercase();

    for trigram in generate_trigrams(&normalized) {
        components[bucket(&trigram, dim)] += 1.0;
    }

    for word in normalized.split_whitespace() {
        components[bucket(word, dim)] += 2.0;
    }

    let mut vector = Vector::new(components);
    vector.normalize();
    vector
}

fn bucket<T: Hash + ?Sized>(value: &T, dim: usize) -> usize {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    (hasher.finish() as usize) % dim
}

/// Generate character trigrams from a string, padded with two spaces each side
fn generate_trigrams(s: &str) -> HashSet<String> {
    let padded = format!("  {}  ", s);
    let chars: Vec<char> = padded.chars().collect();

    chars.windows(3).map(|w| w.iter().collect::<String>()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_text_to_vector() {
        let vec1 = hash_text_to_vector("hello world", 64);
        let vec2 = hash_text_to_vector("hello world", 64);
        let vec3 = hash_text_to_vector("goodbye moon", 64);

        assert_eq!(vec1.dim(), 64);
        assert_eq!(vec1, vec2);
        assert_ne!(vec1, vec3);
        assert!((vec1.norm() - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_case_insensitive() {
        let embedder = HashEmbedder::default();
        let a = embedder.embed("Metformin").unwrap();
        let b = embedder.embed("metformin").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_similar_text_scores_higher() {
        let embedder = HashEmbedder::new(256).unwrap();
        let query = embedder.embed("metformin").unwrap();
        let close = embedder.embed("metformin hcl").unwrap();
        let far = embedder.embed("lisinopril").unwrap();
        assert!(query.cosine_similarity(&close) > query.cosine_similarity(&far));
    }

    #[test]
    fn test_zero_dimension_rejected() {
        assert!(matches!(HashEmbedder::new(0), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_trigram_generation() {
        let trigrams = generate_trigrams("hello");
        assert!(trigrams.contains("hel"));
        assert!(trigrams.contains("ell"));
        assert!(trigrams.contains("llo"));
    }
}
