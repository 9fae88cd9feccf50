// Cosine similarity between TF-IDF vectors.
//
// Missing terms count as zero. A zero-length vector is similar to nothing,
// itself included, which avoids 0/0 on the diagonal for empty documents.

use serde::ser::{SerializeSeq, Serializer};
use serde::Serialize;

use super::models::round_to;
use super::tfidf::TfIdfVector;

/// Cosine similarity of two sparse vectors, in [0, 1].
///
/// Returns 0.0 when either vector has zero length.
pub fn cosine(a: &TfIdfVector, b: &TfIdfVector) -> f64 {
    let norm_a = a.norm();
    let norm_b = b.norm();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    // Walk the smaller vector
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let dot: f64 = small.iter().map(|(term, score)| score * large.get(term)).sum();

    (dot / (norm_a * norm_b)).clamp(0.0, 1.0)
}

/// Symmetric N×N similarity matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    values: Vec<Vec<f64>>,
}

impl SimilarityMatrix {
    /// Compute every unordered pair once and mirror it.
    pub fn compute(vectors: &[TfIdfVector]) -> Self {
        let n = vectors.len();
        let mut values = vec![vec![0.0; n]; n];

        for i in 0..n {
            values[i][i] = if vectors[i].has_signal() { 1.0 } else { 0.0 };
            for j in (i + 1)..n {
                let sim = cosine(&vectors[i], &vectors[j]);
                values[i][j] = sim;
                values[j][i] = sim;
            }
        }

        Self { values }
    }

    pub fn size(&self) -> usize {
        self.values.len()
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i][j]
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.values
    }
}

// Serialized as a plain nested array with values rounded for display.
impl Serialize for SimilarityMatrix {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.values.len()))?;
        for row in &self.values {
            let rounded: Vec<f64> = row.iter().map(|v| round_to(*v, 4)).collect();
            seq.serialize_element(&rounded)?;
        }
        seq.end()
    }
}
