//! Configuration for vector stores.

use serde::{Deserialize, Serialize};

use crate::error::{RagError, Result};
use crate::similarity::DistanceMetric;

/// Configuration fixed at store construction time.
///
/// All stored vectors must match `embedding_dimensions` exactly; the store
/// rejects mismatched inserts and queries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VectorStoreConfig {
    /// Logical name of the collection held by the store.
    pub collection_name: String,
    /// Dimensionality every stored and queried vector must have.
    pub embedding_dimensions: usize,
    /// The metric used to score and rank search results.
    pub distance_metric: DistanceMetric,
}

impl VectorStoreConfig {
    /// Create a new builder for constructing a [`VectorStoreConfig`].
    pub fn builder() -> VectorStoreConfigBuilder {
        VectorStoreConfigBuilder::default()
    }
}

/// Builder for constructing a validated [`VectorStoreConfig`].
#[derive(Debug, Clone)]
pub struct VectorStoreConfigBuilder {
    collection_name: String,
    embedding_dimensions: usize,
    distance_metric: DistanceMetric,
}

impl Default for VectorStoreConfigBuilder {
    fn default() -> Self {
        Self {
            collection_name: "default".to_string(),
            embedding_dimensions: 0,
            distance_metric: DistanceMetric::Cosine,
        }
    }
}

impl VectorStoreConfigBuilder {
    /// Set the collection name.
    pub fn collection_name(mut self, name: impl Into<String>) -> Self {
        self.collection_name = name.into();
        self
    }

    /// Set the required embedding dimensionality.
    pub fn embedding_dimensions(mut self, dimensions: usize) -> Self {
        self.embedding_dimensions = dimensions;
        self
    }

    /// Set the distance metric (defaults to cosine).
    pub fn distance_metric(mut self, metric: DistanceMetric) -> Self {
        self.distance_metric = metric;
        self
    }

    /// Build the [`VectorStoreConfig`], validating the parameters.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if:
    /// - `embedding_dimensions == 0`
    /// - `collection_name` is empty
    pub fn build(self) -> Result<VectorStoreConfig> {
        if self.embedding_dimensions == 0 {
            return Err(RagError::Config(
                "embedding_dimensions must be greater than zero".to_string(),
            ));
        }
        if self.collection_name.is_empty() {
            return Err(RagError::Config("collection_name must not be empty".to_string()));
        }
        Ok(VectorStoreConfig {
            collection_name: self.collection_name,
            embedding_dimensions: self.embedding_dimensions,
            distance_metric: self.distance_metric,
        })
    }
}
