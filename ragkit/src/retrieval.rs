//! Retrieval pipeline: embed query → search → threshold → assemble context.
//!
//! Unlike ingestion, collaborator failures here propagate to the caller —
//! at query time a visible failure beats a silently degraded answer.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::document::{CHUNK_METADATA_PREFIX, SearchResult};
use crate::embedding::EmbeddingGenerator;
use crate::error::{RagError, Result};
use crate::filter::MetadataFilter;
use crate::vectorstore::VectorStore;

/// Options controlling a retrieval query.
#[derive(Debug, Clone)]
pub struct QueryOptions {
    /// Maximum number of results to return (default 10).
    pub limit: usize,
    /// Minimum score a result must reach, inclusive (default 0.0). Applied
    /// after the store search, so the threshold policy is independent of the
    /// storage engine.
    pub threshold: f64,
    /// Optional metadata filter applied inside the store search.
    pub filter: Option<MetadataFilter>,
    /// Whether to append user-facing metadata to each context block
    /// (default true).
    pub include_metadata: bool,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self { limit: 10, threshold: 0.0, filter: None, include_metadata: true }
    }
}

/// Timing and shape information about a completed query.
#[derive(Debug, Clone, Serialize)]
pub struct QueryMetadata {
    /// Number of results returned after thresholding.
    pub total_matches: usize,
    /// Wall-clock duration of the query in milliseconds.
    pub duration_ms: u128,
    /// The limit the query ran with.
    pub limit: usize,
    /// The threshold the query ran with.
    pub threshold: f64,
}

/// The outcome of a retrieval query: ranked results plus assembled context.
#[derive(Debug, Clone, Serialize)]
pub struct QueryResponse {
    /// The original query text.
    pub query: String,
    /// Matching chunks, ordered by descending score.
    pub results: Vec<SearchResult>,
    /// The results concatenated into a single context string, each block
    /// prefixed with its 1-based rank and score.
    pub context: String,
    /// Timing and shape information.
    pub metadata: QueryMetadata,
}

/// Orchestrates retrieval: embed the query, search the store, apply the
/// score threshold, and assemble a context string.
///
/// # Example
///
/// ```rust,ignore
/// use ragkit::{QueryOptions, RetrievalPipeline};
///
/// let pipeline = RetrievalPipeline::new(embedder, store);
/// let response = pipeline.query("what is chunking?", &QueryOptions::default()).await?;
/// println!("{}", response.context);
/// ```
pub struct RetrievalPipeline {
    embedder: Arc<dyn EmbeddingGenerator>,
    store: Arc<dyn VectorStore>,
}

impl RetrievalPipeline {
    /// Create a new retrieval pipeline over the given embedder and store.
    pub fn new(embedder: Arc<dyn EmbeddingGenerator>, store: Arc<dyn VectorStore>) -> Self {
        Self { embedder, store }
    }

    /// Run a query: embed → search → threshold → assemble context.
    ///
    /// # Errors
    ///
    /// Embedder and store failures propagate directly; there is no silent
    /// degradation at query time.
    pub async fn query(&self, text: &str, options: &QueryOptions) -> Result<QueryResponse> {
        let started = Instant::now();

        let mut embeddings = self.embedder.embed(&[text]).await?;
        let query_vector = embeddings.pop().ok_or_else(|| {
            RagError::Embedder {
                provider: "unknown".to_string(),
                message: "embedder returned no vector for the query".to_string(),
            }
        })?;

        let results = self
            .store
            .search(&query_vector, options.limit, options.filter.as_ref())
            .await?;

        let results: Vec<SearchResult> =
            results.into_iter().filter(|r| r.score >= options.threshold).collect();

        let context = assemble_context(&results, options.include_metadata);
        let metadata = QueryMetadata {
            total_matches: results.len(),
            duration_ms: started.elapsed().as_millis(),
            limit: options.limit,
            threshold: options.threshold,
        };

        info!(
            results = metadata.total_matches,
            duration_ms = metadata.duration_ms,
            "query completed"
        );

        Ok(QueryResponse { query: text.to_string(), results, context, metadata })
    }

    /// Find the chunks most similar to an already-stored chunk.
    ///
    /// Searches with `limit + 1` to compensate for the chunk matching
    /// itself, then drops the chunk's own id from the results. The score
    /// threshold in `options` is not applied here. If the store
    /// contains near-duplicates of the chunk, a true neighbor may still be
    /// displaced by the extra slot; no guard is applied.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::NotFound`] if the chunk does not exist or has no
    /// embedding.
    pub async fn find_similar(
        &self,
        chunk_id: &str,
        options: &QueryOptions,
    ) -> Result<Vec<SearchResult>> {
        let chunk = self
            .store
            .get_document(chunk_id)
            .await?
            .ok_or_else(|| RagError::NotFound { id: chunk_id.to_string() })?;
        let embedding =
            chunk.embedding.ok_or_else(|| RagError::NotFound { id: chunk_id.to_string() })?;

        let results = self
            .store
            .search(&embedding, options.limit + 1, options.filter.as_ref())
            .await?;

        let mut results: Vec<SearchResult> =
            results.into_iter().filter(|r| r.chunk.id != chunk_id).collect();
        results.truncate(options.limit);
        Ok(results)
    }
}

/// Concatenate results into a context string.
///
/// Each result becomes a block `[{rank}] (score: {score:.4})` followed by
/// the chunk content and, when requested, `key: value` lines for every
/// metadata field that does not carry the reserved chunk bookkeeping prefix.
/// Blocks are joined by blank lines.
fn assemble_context(results: &[SearchResult], include_metadata: bool) -> String {
    let blocks: Vec<String> = results
        .iter()
        .enumerate()
        .map(|(i, result)| {
            let mut block = format!("[{}] (score: {:.4})\n{}", i + 1, result.score, result.chunk.content);
            if include_metadata {
                for (key, value) in result.chunk.metadata.to_map() {
                    if key.starts_with(CHUNK_METADATA_PREFIX) {
                        continue;
                    }
                    block.push('\n');
                    block.push_str(&format!("{key}: {}", format_value(&value)));
                }
            }
            block
        })
        .collect();
    blocks.join("\n\n")
}

/// Render a metadata value for context output: bare strings, JSON otherwise.
fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
