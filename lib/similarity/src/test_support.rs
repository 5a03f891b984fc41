// Deterministic embedders for unit tests
use rxlink_core::{Embedder, Error, Result, Vector};
use std::sync::atomic::{AtomicUsize, Ordering};

/// One dimension per keyword (1.0 when the lower-cased text contains it),
/// plus a last dimension set only when no keyword is present.
pub struct AxisEmbedder {
    keywords: Vec<String>,
}

impl AxisEmbedder {
    pub fn new(keywords: &[&str]) -> Self {
        Self {
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }
}

impl Embedder for AxisEmbedder {
    fn embed(&self, text: &str) -> Result<Vector> {
        let text = text.to_lowercase();
        let mut data: Vec<f32> = self
            .keywords
            .iter()
            .map(|k| if text.contains(k.as_str()) { 1.0 } else { 0.0 })
            .collect();
        let none = data.iter().all(|x| *x == 0.0);
        data.push(if none { 1.0 } else { 0.0 });
        Ok(Vector::new(data))
    }
}

pub struct FailingEmbedder;

impl Embedder for FailingEmbedder {
    fn embed(&self, _text: &str) -> Result<Vector> {
        Err(Error::Embedding("model not loaded".to_string()))
    }
}

/// Fails for any text containing `trigger`, delegates otherwise
pub struct FlakyEmbedder<E> {
    inner: E,
    trigger: String,
}

impl<E> FlakyEmbedder<E> {
    pub fn new(inner: E, trigger: &str) -> Self {
        Self {
            inner,
            trigger: trigger.to_lowercase(),
        }
    }
}

impl<E: Embedder> Embedder for FlakyEmbedder<E> {
    fn embed(&self, text: &str) -> Result<Vector> {
        if text.to_lowercase().contains(&self.trigger) {
            return Err(Error::Embedding(format!("inference failed on {:?}", text)));
        }
        self.inner.embed(text)
    }
}

pub struct CountingEmbedder<E> {
    inner: E,
    calls: AtomicUsize,
}

impl<E> CountingEmbedder<E> {
    pub fn new(inner: E) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl<E: Embedder> Embedder for CountingEmbedder<E> {
    fn embed(&self, text: &str) -> Result<Vector> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.embed(text)
    }
}
