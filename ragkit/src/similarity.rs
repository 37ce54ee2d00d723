//! Similarity metrics over fixed-length vectors.
//!
//! Three metrics are supported: cosine, dot product, and Euclidean. Every
//! metric exposes both a *score* (higher is better, used for ranking) and a
//! metric-native *distance*; ranking by either agrees.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RagError;

/// The distance metric used to rank vectors in a store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
    /// Cosine similarity: angle between vectors, magnitude-invariant.
    #[default]
    Cosine,
    /// Raw dot product. Only meaningful when vectors share a scale.
    #[serde(rename = "dot")]
    DotProduct,
    /// Euclidean (L2) distance.
    Euclidean,
}

impl DistanceMetric {
    /// Canonical name, matching the serde encoding.
    pub fn as_str(&self) -> &'static str {
        match self {
            DistanceMetric::Cosine => "cosine",
            DistanceMetric::DotProduct => "dot",
            DistanceMetric::Euclidean => "euclidean",
        }
    }

    /// Ranking score for the pair (higher is more similar).
    pub fn score(&self, a: &[f64], b: &[f64]) -> f64 {
        self.score_with_distance(a, b).0
    }

    /// Metric-native distance for the pair (lower is more similar).
    pub fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        self.score_with_distance(a, b).1
    }

    /// Compute `(score, distance)` in one pass over the vectors.
    ///
    /// - cosine: `score = cos(a,b)`, `distance = 1 - score`
    /// - dot: `score = a·b`, `distance = -score`
    /// - euclidean: `distance = ‖a-b‖`, `score = 1 / (1 + distance)`
    pub fn score_with_distance(&self, a: &[f64], b: &[f64]) -> (f64, f64) {
        match self {
            DistanceMetric::Cosine => {
                let s = cosine_similarity(a, b);
                (s, 1.0 - s)
            }
            DistanceMetric::DotProduct => {
                let s = dot_product(a, b);
                (s, -s)
            }
            DistanceMetric::Euclidean => {
                let d = euclidean_distance(a, b);
                (1.0 / (1.0 + d), d)
            }
        }
    }
}

impl fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DistanceMetric {
    type Err = RagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cosine" => Ok(DistanceMetric::Cosine),
            "dot" => Ok(DistanceMetric::DotProduct),
            "euclidean" => Ok(DistanceMetric::Euclidean),
            other => Err(RagError::Config(format!("unknown distance metric '{other}'"))),
        }
    }
}

/// Compute cosine similarity between two equal-length vectors.
///
/// Returns 0.0 if either vector has zero magnitude (never NaN).
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let mut dot = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Compute the dot product of two equal-length vectors.
pub fn dot_product(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Compute the Euclidean (L2) distance between two equal-length vectors.
pub fn euclidean_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum::<f64>().sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cosine_self_similarity_is_one() {
        let v = vec![0.3, -1.2, 4.5, 0.01];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-10);
    }

    #[test]
    fn cosine_zero_vector_is_zero() {
        let zero = vec![0.0; 4];
        let v = vec![1.0, 2.0, 3.0, 4.0];
        assert_eq!(cosine_similarity(&zero, &v), 0.0);
        assert_eq!(cosine_similarity(&v, &zero), 0.0);
        assert_eq!(cosine_similarity(&zero, &zero), 0.0);
    }

    #[test]
    fn cosine_orthogonal_is_zero() {
        let a = vec![1.0, 0.0];
        let b = vec![0.0, 1.0];
        assert!(cosine_similarity(&a, &b).abs() < 1e-12);
    }

    #[test]
    fn dot_product_basic() {
        assert_eq!(dot_product(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]), 32.0);
    }

    #[test]
    fn euclidean_distance_basic() {
        assert_eq!(euclidean_distance(&[0.0, 0.0], &[3.0, 4.0]), 5.0);
        assert_eq!(euclidean_distance(&[1.0, 1.0], &[1.0, 1.0]), 0.0);
    }

    #[test]
    fn score_distance_duality() {
        let a = vec![1.0, 0.0];
        let b = vec![0.5, 0.5];

        let (s, d) = DistanceMetric::Cosine.score_with_distance(&a, &b);
        assert!((s + d - 1.0).abs() < 1e-12);

        let (s, d) = DistanceMetric::DotProduct.score_with_distance(&a, &b);
        assert_eq!(d, -s);

        let (s, d) = DistanceMetric::Euclidean.score_with_distance(&a, &b);
        assert!((s - 1.0 / (1.0 + d)).abs() < 1e-12);
        assert!(s > 0.0 && s <= 1.0);
    }

    #[test]
    fn metric_name_round_trip() {
        for metric in
            [DistanceMetric::Cosine, DistanceMetric::DotProduct, DistanceMetric::Euclidean]
        {
            assert_eq!(metric.as_str().parse::<DistanceMetric>().unwrap(), metric);
        }
        assert!("manhattan".parse::<DistanceMetric>().is_err());
    }
}
