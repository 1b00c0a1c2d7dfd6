use serde::{Deserialize, Serialize};

/// Fixed-length embedding produced by the embedding model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmbeddingVector(Vec<f32>);

impl EmbeddingVector {
    pub fn new(values: Vec<f32>) -> Self {
        Self(values)
    }

    pub fn dimension(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    /// A usable vector is non-empty and holds only finite values.
    pub fn is_valid(&self) -> bool {
        !self.0.is_empty() && self.0.iter().all(|v| v.is_finite())
    }

    pub fn cosine(&self, other: &EmbeddingVector) -> Option<f64> {
        cosine_similarity(&self.0, &other.0)
    }
}

impl From<Vec<f32>> for EmbeddingVector {
    fn from(values: Vec<f32>) -> Self {
        Self(values)
    }
}

/// Cosine similarity between two vectors.
///
/// Returns `None` when the vectors cannot be compared: lengths differ, either
/// vector is empty or has zero norm, or the result is not finite. Norms are
/// always computed, vectors are never assumed to be unit length.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Option<f64> {
    if a.len() != b.len() || a.is_empty() {
        return None;
    }
    let mut dot = 0.0_f64;
    let mut norm_a = 0.0_f64;
    let mut norm_b = 0.0_f64;
    for (x, y) in a.iter().zip(b.iter()) {
        let x = *x as f64;
        let y = *y as f64;
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 || !denom.is_finite() {
        return None;
    }
    let sim = dot / denom;
    if sim.is_finite() {
        Some(sim.clamp(-1.0, 1.0))
    } else {
        None
    }
}
