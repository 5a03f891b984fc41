//! # rxlink Core
//!
//! Core types shared by the rxlink crates:
//!
//! - [`Error`] / [`Result`] - error taxonomy for catalog I/O and the embedding oracle
//! - [`Vector`] - dense embedding with cosine similarity
//! - [`Embedder`] - the embedding oracle capability, plus [`HashEmbedder`]
//! - [`text`] - key normalization and word-boundary search
//!
//! ## Example
//!
//! ```rust
//! use rxlink_core::{Embedder, HashEmbedder};
//!
//! let embedder = HashEmbedder::default();
//! let a = embedder.embed("metformin").unwrap();
//! let b = embedder.embed("Metformin").unwrap();
//! assert!((a.cosine_similarity(&b) - 1.0).abs() < 1e-6);
//! ```

pub mod embedder;
pub mod error;
pub mod text;
pub mod vector;

pub use embedder::{hash_text_to_vector, Embedder, HashEmbedder, DEFAULT_EMBEDDING_DIM};
pub use error::{Error, Result};
pub use vector::Vector;
