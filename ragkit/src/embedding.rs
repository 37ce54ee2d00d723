//! Embedding generator trait and the shipped placeholder fixture.

use async_trait::async_trait;

use crate::error::Result;

/// A capability that turns text into fixed-length embedding vectors.
///
/// Implementations wrap real embedding backends behind a unified async,
/// batch-first interface. The pipelines call [`embed`](EmbeddingGenerator::embed)
/// once per batch, never once per item.
///
/// # Example
///
/// ```rust,ignore
/// use ragkit::EmbeddingGenerator;
///
/// let embeddings = generator.embed(&["hello", "world"]).await?;
/// assert_eq!(embeddings.len(), 2);
/// assert_eq!(embeddings[0].len(), generator.dimensions());
/// ```
#[async_trait]
pub trait EmbeddingGenerator: Send + Sync {
    /// Generate one embedding per input text, in input order.
    ///
    /// Every returned vector must have [`dimensions`](EmbeddingGenerator::dimensions)
    /// elements.
    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f64>>>;

    /// Return the dimensionality of embeddings produced by this generator.
    fn dimensions(&self) -> usize;
}

/// A deterministic placeholder embedder for demos and tests.
///
/// Produces a content-hash-seeded direction vector, L2-normalized so cosine
/// similarity reduces to a dot product. Identical texts always map to
/// identical vectors; the vectors carry **no semantic meaning**. Not for
/// production use.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dimensions: usize,
}

impl HashEmbedder {
    /// Create a hash embedder producing vectors of the given dimensionality.
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }

    fn embed_one(&self, text: &str) -> Vec<f64> {
        let hash = text.bytes().fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64));
        // Reduce the hash well below 2^53 before the cast: at full u64 range
        // the f64 spacing exceeds the component index, every component would
        // round to the same value, and all texts would embed to the same
        // direction.
        let seed = hash % 1_000_003;
        let mut emb = vec![0.0f64; self.dimensions];
        for (i, v) in emb.iter_mut().enumerate() {
            *v = ((seed + i as u64) as f64).sin();
        }
        let norm: f64 = emb.iter().map(|x| x * x).sum::<f64>().sqrt();
        if norm > 0.0 {
            emb.iter_mut().for_each(|x| *x /= norm);
        }
        emb
    }
}

#[async_trait]
impl EmbeddingGenerator for HashEmbedder {
    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f64>>> {
        Ok(texts.iter().map(|t| self.embed_one(t)).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::similarity::cosine_similarity;

    #[tokio::test]
    async fn deterministic_and_normalized() {
        let embedder = HashEmbedder::new(32);
        let a = embedder.embed(&["hello"]).await.unwrap();
        let b = embedder.embed(&["hello", "world"]).await.unwrap();
        assert_eq!(a[0], b[0]);
        assert_eq!(b.len(), 2);
        assert_ne!(b[0], b[1]);

        let norm: f64 = a[0].iter().map(|x| x * x).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-9);
        assert_eq!(a[0].len(), embedder.dimensions());
    }

    #[tokio::test]
    async fn distinct_texts_embed_to_separable_directions() {
        // Large content hashes must not collapse every component to the same
        // f64: distinct texts have to land on distinct directions, otherwise
        // every pairwise cosine degenerates to ±1 and ranking is float noise.
        let embedder = HashEmbedder::new(32);
        let embeddings = embedder
            .embed(&[
                "rust is a systems programming language",
                "embeddings map text into vector space",
                "tokio provides an async runtime for rust",
            ])
            .await
            .unwrap();

        for i in 0..embeddings.len() {
            for j in (i + 1)..embeddings.len() {
                let cos = cosine_similarity(&embeddings[i], &embeddings[j]);
                assert!(cos.abs() < 0.9, "texts {i} and {j} are not separable: cos = {cos}");
            }
        }

        // An exact text match still scores a perfect self-similarity
        let again = embedder.embed(&["rust is a systems programming language"]).await.unwrap();
        assert!((cosine_similarity(&embeddings[0], &again[0]) - 1.0).abs() < 1e-12);
    }
}
