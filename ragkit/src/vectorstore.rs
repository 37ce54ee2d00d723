//! Vector store trait for storing and searching embedded chunks.

use async_trait::async_trait;

use crate::config::VectorStoreConfig;
use crate::document::{ChunkMetadata, DocumentChunk, Metadata, SearchResult};
use crate::error::Result;
use crate::filter::MetadataFilter;

/// How a metadata update is applied to a stored chunk.
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataUpdate {
    /// Merge the given fields key by key into the existing metadata.
    ///
    /// A `null` value deletes the key (or clears an optional bookkeeping
    /// field). Existing keys not named in the patch are preserved. This is
    /// the default mode.
    Merge(Metadata),
    /// Replace the chunk's entire metadata with the given value.
    ///
    /// Discards everything previously stored, including inherited document
    /// metadata. Use [`MetadataUpdate::Merge`] unless a full reset is
    /// intended.
    Replace(ChunkMetadata),
}

/// A partial update to a stored chunk. Fields left `None` are unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentUpdate {
    /// Replace the chunk's text content.
    pub content: Option<String>,
    /// Replace the chunk's embedding. Must match the store's configured
    /// dimensions.
    pub embedding: Option<Vec<f64>>,
    /// Update the chunk's metadata.
    pub metadata: Option<MetadataUpdate>,
}

impl DocumentUpdate {
    /// An update that replaces the chunk's content.
    pub fn content(content: impl Into<String>) -> Self {
        Self { content: Some(content.into()), ..Default::default() }
    }

    /// An update that replaces the chunk's embedding.
    pub fn embedding(embedding: Vec<f64>) -> Self {
        Self { embedding: Some(embedding), ..Default::default() }
    }

    /// An update that merges the given metadata fields.
    pub fn metadata_merge(patch: Metadata) -> Self {
        Self { metadata: Some(MetadataUpdate::Merge(patch)), ..Default::default() }
    }
}

/// A storage backend for embedded chunks with filtered similarity search.
///
/// Implementations own chunk lifetime after a successful
/// [`add_documents`](VectorStore::add_documents): chunks are mutated only
/// through [`update_document`](VectorStore::update_document) and removed
/// through [`delete_documents`](VectorStore::delete_documents) or
/// [`clear`](VectorStore::clear).
///
/// # Example
///
/// ```rust,ignore
/// use ragkit::{InMemoryVectorStore, VectorStore, VectorStoreConfig};
///
/// let store = InMemoryVectorStore::new(config);
/// store.add_documents(&chunks).await?;
/// let results = store.search(&query_embedding, 5, None).await?;
/// ```
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// The configuration the store was constructed with.
    fn config(&self) -> &VectorStoreConfig;

    /// Upsert chunks into the store.
    ///
    /// Every chunk is validated before anything is inserted: a chunk with no
    /// embedding fails with [`RagError::MissingEmbedding`], and a chunk whose
    /// embedding length differs from the configured dimensions fails with
    /// [`RagError::DimensionMismatch`]. On failure the store is unchanged.
    /// A chunk whose id is already present replaces the existing entry.
    ///
    /// [`RagError::MissingEmbedding`]: crate::error::RagError::MissingEmbedding
    /// [`RagError::DimensionMismatch`]: crate::error::RagError::DimensionMismatch
    async fn add_documents(&self, chunks: &[DocumentChunk]) -> Result<()>;

    /// Search for the `limit` most similar chunks to the query vector.
    ///
    /// Chunks failing the filter (when supplied) or lacking an embedding are
    /// skipped. Results are ordered by descending score, ties broken by
    /// ascending chunk id.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::InvalidQuery`](crate::error::RagError::InvalidQuery)
    /// if the query vector's length differs from the configured dimensions.
    async fn search(
        &self,
        query: &[f64],
        limit: usize,
        filter: Option<&MetadataFilter>,
    ) -> Result<Vec<SearchResult>>;

    /// Delete chunks by id. Unknown ids are silently ignored.
    async fn delete_documents(&self, ids: &[String]) -> Result<()>;

    /// Apply a partial update to a stored chunk.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::NotFound`](crate::error::RagError::NotFound) if
    /// the id is absent, and
    /// [`RagError::DimensionMismatch`](crate::error::RagError::DimensionMismatch)
    /// if a new embedding has the wrong length (the chunk is unchanged).
    async fn update_document(&self, id: &str, update: DocumentUpdate) -> Result<()>;

    /// Fetch a chunk by id. Returns `Ok(None)` on a miss, never an error.
    async fn get_document(&self, id: &str) -> Result<Option<DocumentChunk>>;

    /// Drop all chunks.
    async fn clear(&self) -> Result<()>;

    /// The number of chunks currently stored.
    async fn count(&self) -> Result<usize>;
}
