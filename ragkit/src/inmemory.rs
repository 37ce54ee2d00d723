//! In-memory vector store with filtered linear-scan search.
//!
//! This module provides [`InMemoryVectorStore`], a vector store backed by a
//! `HashMap` protected by a `tokio::sync::RwLock`. Searches are full linear
//! scans — O(n·d) per query — which is the right trade-off for working sets
//! of thousands to low tens-of-thousands of vectors. It is suitable for
//! development, testing, and small-scale single-node use.

use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::config::VectorStoreConfig;
use crate::document::{DocumentChunk, SearchResult};
use crate::error::{RagError, Result};
use crate::filter::MetadataFilter;
use crate::vectorstore::{DocumentUpdate, MetadataUpdate, VectorStore};

/// An in-memory vector store with metadata filtering and configurable
/// distance metrics.
///
/// Chunks live in a `HashMap` keyed by chunk id behind a
/// `tokio::sync::RwLock`: writers are serialized, readers run concurrently
/// with each other but never with an in-flight write. Search results are
/// ordered by descending score with ascending chunk id as the tie-break, so
/// equal-score orderings are reproducible.
///
/// # Example
///
/// ```rust,ignore
/// use ragkit::{InMemoryVectorStore, VectorStore, VectorStoreConfig};
///
/// let config = VectorStoreConfig::builder()
///     .collection_name("docs")
///     .embedding_dimensions(384)
///     .build()?;
/// let store = InMemoryVectorStore::new(config);
/// ```
#[derive(Debug)]
pub struct InMemoryVectorStore {
    config: VectorStoreConfig,
    chunks: RwLock<HashMap<String, DocumentChunk>>,
}

impl InMemoryVectorStore {
    /// Create a new empty store with the given configuration.
    pub fn new(config: VectorStoreConfig) -> Self {
        Self { config, chunks: RwLock::new(HashMap::new()) }
    }

    fn check_dimensions(&self, chunk: &DocumentChunk) -> Result<()> {
        let embedding = chunk
            .embedding
            .as_ref()
            .ok_or_else(|| RagError::MissingEmbedding { id: chunk.id.clone() })?;
        if embedding.len() != self.config.embedding_dimensions {
            return Err(RagError::DimensionMismatch {
                id: chunk.id.clone(),
                expected: self.config.embedding_dimensions,
                actual: embedding.len(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    fn config(&self) -> &VectorStoreConfig {
        &self.config
    }

    async fn add_documents(&self, chunks: &[DocumentChunk]) -> Result<()> {
        // Validate every chunk before touching the map, so a bad batch
        // leaves the store untouched.
        for chunk in chunks {
            self.check_dimensions(chunk)?;
        }

        let mut store = self.chunks.write().await;
        for chunk in chunks {
            store.insert(chunk.id.clone(), chunk.clone());
        }
        debug!(
            collection = %self.config.collection_name,
            added = chunks.len(),
            total = store.len(),
            "added chunks"
        );
        Ok(())
    }

    async fn search(
        &self,
        query: &[f64],
        limit: usize,
        filter: Option<&MetadataFilter>,
    ) -> Result<Vec<SearchResult>> {
        if query.len() != self.config.embedding_dimensions {
            return Err(RagError::InvalidQuery(format!(
                "query vector has {} dimensions, store expects {}",
                query.len(),
                self.config.embedding_dimensions
            )));
        }

        let store = self.chunks.read().await;
        let metric = self.config.distance_metric;

        let mut scored: Vec<SearchResult> = store
            .values()
            .filter(|chunk| match filter {
                Some(f) => f.matches(&chunk.metadata),
                None => true,
            })
            .filter_map(|chunk| {
                let embedding = chunk.embedding.as_ref()?;
                let (score, distance) = metric.score_with_distance(embedding, query);
                Some(SearchResult { chunk: chunk.clone(), score, distance: Some(distance) })
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.chunk.id.cmp(&b.chunk.id))
        });
        scored.truncate(limit);

        debug!(
            collection = %self.config.collection_name,
            metric = %metric,
            results = scored.len(),
            "search completed"
        );
        Ok(scored)
    }

    async fn delete_documents(&self, ids: &[String]) -> Result<()> {
        let mut store = self.chunks.write().await;
        let mut removed = 0;
        for id in ids {
            if store.remove(id).is_some() {
                removed += 1;
            }
        }
        debug!(collection = %self.config.collection_name, removed, "deleted chunks");
        Ok(())
    }

    async fn update_document(&self, id: &str, update: DocumentUpdate) -> Result<()> {
        if let Some(embedding) = &update.embedding {
            if embedding.len() != self.config.embedding_dimensions {
                return Err(RagError::DimensionMismatch {
                    id: id.to_string(),
                    expected: self.config.embedding_dimensions,
                    actual: embedding.len(),
                });
            }
        }

        let mut store = self.chunks.write().await;
        let chunk =
            store.get_mut(id).ok_or_else(|| RagError::NotFound { id: id.to_string() })?;

        if let Some(content) = update.content {
            chunk.content = content;
        }
        if let Some(embedding) = update.embedding {
            chunk.embedding = Some(embedding);
        }
        match update.metadata {
            Some(MetadataUpdate::Merge(patch)) => chunk.metadata.apply(&patch),
            Some(MetadataUpdate::Replace(metadata)) => chunk.metadata = metadata,
            None => {}
        }

        debug!(collection = %self.config.collection_name, chunk.id = id, "updated chunk");
        Ok(())
    }

    async fn get_document(&self, id: &str) -> Result<Option<DocumentChunk>> {
        let store = self.chunks.read().await;
        Ok(store.get(id).cloned())
    }

    async fn clear(&self) -> Result<()> {
        let mut store = self.chunks.write().await;
        let dropped = store.len();
        store.clear();
        debug!(collection = %self.config.collection_name, dropped, "cleared store");
        Ok(())
    }

    async fn count(&self) -> Result<usize> {
        let store = self.chunks.read().await;
        Ok(store.len())
    }
}
