//! Flat in-memory vector index with inner-product ranking.
//!
//! Vectors are stored unit-normalized and addressed by insertion position,
//! so the inner product of a normalized query with any entry is its cosine
//! similarity.

use rayon::prelude::*;

/// Flat, positional vector index.
///
/// Positions are dense (`0..len`) and never reused; there is no removal.
pub struct VectorIndex {
    /// Row-major storage, `dimensions` floats per entry.
    data: Vec<f32>,
    dimensions: usize,
}

/// A scored position from the vector index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchResult {
    /// Position in the corpus and the index
    pub position: usize,
    /// Cosine similarity score (-1.0 to 1.0)
    pub score: f32,
}

impl VectorIndex {
    /// Create a new empty vector index with specified dimensions.
    pub fn new(dimensions: usize) -> Self {
        Self {
            data: Vec::new(),
            dimensions,
        }
    }

    /// Create an index with pre-allocated capacity.
    pub fn with_capacity(dimensions: usize, capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(dimensions * capacity),
            dimensions,
        }
    }

    /// Get the expected embedding dimensions.
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Get the number of entries in the index.
    pub fn len(&self) -> usize {
        if self.dimensions == 0 {
            0
        } else {
            self.data.len() / self.dimensions
        }
    }

    /// Normalize and append an embedding, returning its position.
    pub fn push(&mut self, mut embedding: Vec<f32>) -> Result<usize, IndexError> {
        self.check_dimensions(&embedding)?;
        l2_normalize(&mut embedding)?;

        let position = self.len();
        self.data.extend_from_slice(&embedding);
        Ok(position)
    }

    /// Rank stored vectors against `query` by inner product.
    ///
    /// The query is normalized first. Returns the best `k` entries ordered by
    /// score descending, ties broken by ascending position. Pass `self.len()`
    /// as `k` for the full ranking.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<SearchResult>, IndexError> {
        self.check_dimensions(query)?;

        let mut query = query.to_vec();
        l2_normalize(&mut query)?;

        let mut results: Vec<SearchResult> = self
            .data
            .par_chunks_exact(self.dimensions)
            .enumerate()
            .map(|(position, vector)| SearchResult {
                position,
                score: dot(&query, vector),
            })
            .collect();

        results.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.position.cmp(&b.position))
        });
        results.truncate(k);

        Ok(results)
    }

    fn check_dimensions(&self, vector: &[f32]) -> Result<(), IndexError> {
        if vector.len() != self.dimensions || self.dimensions == 0 {
            return Err(IndexError::DimensionMismatch {
                expected: self.dimensions,
                got: vector.len(),
            });
        }
        Ok(())
    }
}

/// Scale a vector to unit length in place.
pub fn l2_normalize(v: &mut [f32]) -> Result<(), IndexError> {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if !norm.is_finite() || norm < f32::EPSILON {
        return Err(IndexError::ZeroNormVector);
    }
    v.iter_mut().for_each(|x| *x /= norm);
    Ok(())
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Errors that can occur during index operations.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("Cannot store or search with zero-norm vector")]
    ZeroNormVector,
}
