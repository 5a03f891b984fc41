use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// A fixed-dimension embedding produced by an [`Embedder`](crate::Embedder)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Vector {
    data: Vec<f32>,
}

impl Vector {
    #[inline]
    #[must_use]
    pub fn new(data: Vec<f32>) -> Self {
        Self { data }
    }

    #[inline]
    #[must_use]
    pub fn dim(&self) -> usize {
        self.data.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    #[inline]
    #[must_use]
    pub fn norm(&self) -> f32 {
        dot(&self.data, &self.data).sqrt()
    }

    /// Cosine similarity, i.e. `1 - cosine_distance`.
    /// Mismatched dimensions and zero vectors score 0.0.
    #[inline]
    pub fn cosine_similarity(&self, other: &Vector) -> f32 {
        self.try_cosine_similarity(other).unwrap_or(0.0)
    }

    /// Like [`cosine_similarity`](Self::cosine_similarity) but reports a
    /// dimension mismatch instead of scoring it as 0.0
    pub fn try_cosine_similarity(&self, other: &Vector) -> Result<f32> {
        if self.dim() != other.dim() {
            return Err(Error::InvalidDimension {
                expected: self.dim(),
                actual: other.dim(),
            });
        }

        let norm_a = self.norm();
        let norm_b = other.norm();
        if norm_a == 0.0 || norm_b == 0.0 {
            return Ok(0.0);
        }

        Ok(dot(&self.data, &other.data) / (norm_a * norm_b))
    }

    /// Normalize the vector to unit length
    #[inline]
    pub fn normalize(&mut self) {
        let norm = self.norm();
        if norm > f32::EPSILON {
            let inv_norm = 1.0 / norm;
            for x in &mut self.data {
                *x *= inv_norm;
            }
        }
    }

    /// Get normalized copy
    #[inline]
    #[must_use]
    pub fn normalized(&self) -> Self {
        let mut v = self.clone();
        v.normalize();
        v
    }
}

// Two accumulators keep the loop pipelined on long embeddings.
#[inline]
fn dot(a: &[f32], b: &[f32]) -> f32 {
    let mut even = 0.0f32;
    let mut odd = 0.0f32;
    let mut chunks_a = a.chunks_exact(2);
    let mut chunks_b = b.chunks_exact(2);
    for (x, y) in (&mut chunks_a).zip(&mut chunks_b) {
        even += x[0] * y[0];
        odd += x[1] * y[1];
    }
    let tail: f32 = chunks_a
        .remainder()
        .iter()
        .zip(chunks_b.remainder())
        .map(|(x, y)| x * y)
        .sum();
    even + odd + tail
}
