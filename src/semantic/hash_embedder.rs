//! Download-free embedder based on FNV-1a feature hashing.
//!
//! Lexical only: texts sharing tokens score high, synonyms do not. Useful
//! for development databases and tests where fetching an ONNX model is not
//! an option.

use super::embeddings::{Embedder, EmbeddingError};

pub const HASH_EMBEDDER: &str = "hash";

const DEFAULT_DIMENSION: usize = 384;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dimension: usize,
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSION)
    }
}

impl HashEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    fn fnv1a(bytes: &[u8]) -> u64 {
        bytes.iter().fold(FNV_OFFSET, |hash, byte| {
            (hash ^ u64::from(*byte)).wrapping_mul(FNV_PRIME)
        })
    }

    fn embed_one(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];
        let lowered = text.to_lowercase();

        for token in lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let hash = Self::fnv1a(token.as_bytes());
            let bucket = (hash % self.dimension as u64) as usize;
            // top bit picks the sign so collisions tend to cancel out
            let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
            vector[bucket] += sign;
        }

        vector
    }
}

impl Embedder for HashEmbedder {
    fn name(&self) -> &str {
        HASH_EMBEDDER
    }

    fn dimensions(&self) -> usize {
        self.dimension
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Ok(texts.iter().map(|text| self.embed_one(text)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cosine(a: &[f32], b: &[f32]) -> f32 {
        let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
        let na = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let nb = b.iter().map(|x| x * x).sum::<f32>().sqrt();
        dot / (na * nb)
    }

    #[test]
    fn test_dimensions() {
        let embedder = HashEmbedder::default();
        assert_eq!(embedder.dimensions(), 384);
        assert_eq!(embedder.embed("hola mundo").unwrap().len(), 384);
        assert_eq!(HashEmbedder::new(0).dimensions(), 1);
    }

    #[test]
    fn test_deterministic() {
        let embedder = HashEmbedder::default();
        let a = embedder.embed("ID: 1 Login: ops-team").unwrap();
        let b = embedder.embed("ID: 1 Login: ops-team").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_case_insensitive_tokens() {
        let embedder = HashEmbedder::default();
        assert_eq!(
            embedder.embed("Network Operations").unwrap(),
            embedder.embed("network operations").unwrap()
        );
    }

    #[test]
    fn test_self_similarity_is_one() {
        let embedder = HashEmbedder::default();
        let v = embedder.embed("soporte tecnico correo").unwrap();
        assert!((cosine(&v, &v) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_empty_text_is_zero_vector() {
        let embedder = HashEmbedder::default();
        let v = embedder.embed("   ").unwrap();
        assert!(v.iter().all(|x| *x == 0.0));
    }

    #[test]
    fn test_batch_preserves_order() {
        let embedder = HashEmbedder::default();
        let texts = vec!["alpha".to_string(), "beta".to_string()];
        let batch = embedder.embed_batch(&texts).unwrap();
        assert_eq!(batch[0], embedder.embed("alpha").unwrap());
        assert_eq!(batch[1], embedder.embed("beta").unwrap());
    }
}
