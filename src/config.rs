use rxlink_core::{Embedder, Error, HashEmbedder, Result, DEFAULT_EMBEDDING_DIM};
use rxlink_similarity::{DEFAULT_ENTITY_THRESHOLD, DEFAULT_SEGMENT_THRESHOLD};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::warn;

/// Engine configuration. Every field has a default, so a JSON file only needs
/// the keys it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// CSV bulk source
    pub source_path: PathBuf,
    /// bincode cache artifact
    pub cache_path: PathBuf,
    pub entity_threshold: f32,
    pub segment_threshold: f32,
    /// Characters of the full side-effect text shown when nothing matched
    pub excerpt_chars: usize,
    pub embedding_dim: usize,
    pub use_embedder: bool,
    /// Also rank side-effect segments with the oracle. The hashing oracle
    /// scores a short symptom against a whole sentence below the segment
    /// threshold, hence off by default.
    pub semantic_segments: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            source_path: PathBuf::from("drugs_side_effects_drugs_com.csv"),
            cache_path: PathBuf::from("drug_data.bin"),
            entity_threshold: DEFAULT_ENTITY_THRESHOLD,
            segment_threshold: DEFAULT_SEGMENT_THRESHOLD,
            excerpt_chars: 300,
            embedding_dim: DEFAULT_EMBEDDING_DIM,
            use_embedder: true,
            semantic_segments: false,
        }
    }
}

impl EngineConfig {
    /// Read a JSON config file and validate it
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        let config: Self =
            serde_json::from_str(&data).map_err(|e| Error::Serialization(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("entity_threshold", self.entity_threshold),
            ("segment_threshold", self.segment_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::InvalidConfig(format!(
                    "{} must be within [0, 1], got {}",
                    name, value
                )));
            }
        }
        if self.embedding_dim == 0 {
            return Err(Error::InvalidConfig(
                "embedding_dim must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// The embedding oracle for this configuration.
    ///
    /// `None` when disabled or when it cannot be constructed; the engine then
    /// runs lexical-only.
    pub fn build_embedder(&self) -> Option<Arc<dyn Embedder>> {
        if !self.use_embedder {
            return None;
        }
        match HashEmbedder::new(self.embedding_dim) {
            Ok(embedder) => Some(Arc::new(embedder)),
            Err(e) => {
                warn!("Embedding oracle unavailable, using lexical matching only: {}", e);
                None
            }
        }
    }
}
