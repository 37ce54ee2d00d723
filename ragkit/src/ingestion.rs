//! Ingestion pipeline: load → chunk → embed → store.
//!
//! The [`IngestionPipeline`] walks a list of source paths sequentially. A
//! failure on one path is recorded in the returned report and never aborts
//! the run; only construction-time configuration mistakes are fatal.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tracing::{info, warn};

use crate::chunking::Chunker;
use crate::document::DocumentChunk;
use crate::embedding::EmbeddingGenerator;
use crate::error::{RagError, Result};
use crate::loader::DocumentLoader;
use crate::vectorstore::VectorStore;

/// Observational progress hook, invoked after each embedding batch with
/// cumulative `(current, total, details)` counters. `current` is the number
/// of chunks embedded so far across the run, `total` the number of chunks
/// generated so far, `details` the path being processed.
pub type ProgressCallback = Arc<dyn Fn(usize, usize, Option<&str>) + Send + Sync>;

/// A single failed input path and what went wrong.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct IngestionFailure {
    /// The path that failed.
    pub file: String,
    /// A description of the failure.
    pub message: String,
}

/// The outcome of an ingestion run.
///
/// Always returned, even when some (or all) paths failed; per-path failures
/// are collected in `errors`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IngestionReport {
    /// Number of documents successfully loaded, chunked, and stored.
    pub documents_processed: usize,
    /// Number of chunks generated and stored.
    pub chunks_generated: usize,
    /// Paths that failed, with their error messages.
    pub errors: Vec<IngestionFailure>,
    /// Wall-clock duration of the run in milliseconds.
    pub duration_ms: u128,
}

/// Orchestrates document ingestion: load → chunk → batch-embed → store.
///
/// Paths are processed sequentially. For each path, all loaded documents are
/// chunked, the chunk texts are embedded in batches (one embedder call per
/// batch), and the embedded chunks are handed to the store in a single
/// `add_documents` call. An embedding batch must fully succeed before any of
/// its chunks reach the store; a failed batch fails the whole path.
///
/// # Example
///
/// ```rust,ignore
/// use ragkit::IngestionPipeline;
///
/// let pipeline = IngestionPipeline::builder()
///     .loader(Arc::new(TextFileLoader::new()))
///     .chunker(Arc::new(FixedSizeChunker::new(512, 100)))
///     .embedder(Arc::new(embedder))
///     .store(Arc::new(store))
///     .build()?;
///
/// let report = pipeline.ingest(&["a.txt", "b.txt"]).await?;
/// println!("{} chunks, {} errors", report.chunks_generated, report.errors.len());
/// ```
pub struct IngestionPipeline {
    loader: Arc<dyn DocumentLoader>,
    chunker: Arc<dyn Chunker>,
    embedder: Arc<dyn EmbeddingGenerator>,
    store: Arc<dyn VectorStore>,
    embedding_batch_size: usize,
    progress: Option<ProgressCallback>,
}

impl IngestionPipeline {
    /// Create a new [`IngestionPipelineBuilder`].
    pub fn builder() -> IngestionPipelineBuilder {
        IngestionPipelineBuilder::default()
    }

    /// Ingest the given paths, returning a report of what happened.
    ///
    /// A failure on one path is recorded in `errors` and processing
    /// continues with the next path; the call itself does not fail for
    /// per-path problems.
    pub async fn ingest<S: AsRef<str>>(&self, paths: &[S]) -> Result<IngestionReport> {
        let started = Instant::now();
        let mut report = IngestionReport::default();
        let mut embedded_total = 0;
        let mut generated_total = 0;

        for path in paths {
            let path = path.as_ref();
            match self.ingest_path(path, &mut embedded_total, &mut generated_total).await {
                Ok((documents, chunks)) => {
                    report.documents_processed += documents;
                    report.chunks_generated += chunks;
                }
                Err(e) => {
                    warn!(path, error = %e, "ingestion failed for path");
                    report
                        .errors
                        .push(IngestionFailure { file: path.to_string(), message: e.to_string() });
                }
            }
        }

        report.duration_ms = started.elapsed().as_millis();
        info!(
            documents = report.documents_processed,
            chunks = report.chunks_generated,
            errors = report.errors.len(),
            duration_ms = report.duration_ms,
            "ingestion run completed"
        );
        Ok(report)
    }

    /// Process one path end to end. Returns `(documents, chunks)` stored.
    async fn ingest_path(
        &self,
        path: &str,
        embedded_total: &mut usize,
        generated_total: &mut usize,
    ) -> Result<(usize, usize)> {
        let documents = self.loader.load(path).await?;

        let mut chunks: Vec<DocumentChunk> = Vec::new();
        for document in &documents {
            chunks.extend(self.chunker.chunk(document));
        }
        *generated_total += chunks.len();

        // One embedder call per batch. A failed batch fails the whole path;
        // nothing from this path reaches the store.
        for batch in chunks.chunks_mut(self.embedding_batch_size) {
            let texts: Vec<&str> = batch.iter().map(|c| c.content.as_str()).collect();
            let embeddings = self.embedder.embed(&texts).await?;
            if embeddings.len() != batch.len() {
                return Err(RagError::Embedder {
                    provider: "unknown".to_string(),
                    message: format!(
                        "embedder returned {} vectors for {} inputs",
                        embeddings.len(),
                        batch.len()
                    ),
                });
            }
            for (chunk, embedding) in batch.iter_mut().zip(embeddings) {
                chunk.embedding = Some(embedding);
            }
            *embedded_total += batch.len();
            if let Some(progress) = &self.progress {
                progress(*embedded_total, *generated_total, Some(path));
            }
        }

        if !chunks.is_empty() {
            self.store.add_documents(&chunks).await?;
        }

        info!(path, documents = documents.len(), chunks = chunks.len(), "ingested path");
        Ok((documents.len(), chunks.len()))
    }
}

/// Builder for constructing an [`IngestionPipeline`].
///
/// The loader, chunker, embedder, and store are required; batch size and
/// progress callback are optional.
#[derive(Default)]
pub struct IngestionPipelineBuilder {
    loader: Option<Arc<dyn DocumentLoader>>,
    chunker: Option<Arc<dyn Chunker>>,
    embedder: Option<Arc<dyn EmbeddingGenerator>>,
    store: Option<Arc<dyn VectorStore>>,
    embedding_batch_size: Option<usize>,
    progress: Option<ProgressCallback>,
}

impl IngestionPipelineBuilder {
    /// Set the document loader.
    pub fn loader(mut self, loader: Arc<dyn DocumentLoader>) -> Self {
        self.loader = Some(loader);
        self
    }

    /// Set the chunker.
    pub fn chunker(mut self, chunker: Arc<dyn Chunker>) -> Self {
        self.chunker = Some(chunker);
        self
    }

    /// Set the embedding generator.
    pub fn embedder(mut self, embedder: Arc<dyn EmbeddingGenerator>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Set the vector store.
    pub fn store(mut self, store: Arc<dyn VectorStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set the number of chunks embedded per embedder call (default 32).
    pub fn embedding_batch_size(mut self, size: usize) -> Self {
        self.embedding_batch_size = Some(size);
        self
    }

    /// Set an optional progress callback.
    pub fn progress(mut self, callback: ProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    /// Build the [`IngestionPipeline`], validating the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if a required component is missing or
    /// `embedding_batch_size` is zero.
    pub fn build(self) -> Result<IngestionPipeline> {
        let loader =
            self.loader.ok_or_else(|| RagError::Config("loader is required".to_string()))?;
        let chunker =
            self.chunker.ok_or_else(|| RagError::Config("chunker is required".to_string()))?;
        let embedder =
            self.embedder.ok_or_else(|| RagError::Config("embedder is required".to_string()))?;
        let store =
            self.store.ok_or_else(|| RagError::Config("store is required".to_string()))?;
        let embedding_batch_size = self.embedding_batch_size.unwrap_or(32);
        if embedding_batch_size == 0 {
            return Err(RagError::Config(
                "embedding_batch_size must be greater than zero".to_string(),
            ));
        }

        Ok(IngestionPipeline {
            loader,
            chunker,
            embedder,
            store,
            embedding_batch_size,
            progress: self.progress,
        })
    }
}
