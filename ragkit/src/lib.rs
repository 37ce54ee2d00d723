//! Minimal retrieval-augmented-generation toolkit.
//!
//! This crate provides the data engine at the center of a RAG system:
//!
//! - Overlapping, position-tracked document chunking ([`FixedSizeChunker`],
//!   [`SectionChunker`])
//! - Similarity metrics over embedding vectors ([`DistanceMetric`])
//! - Structured metadata filtering ([`MetadataFilter`])
//! - An in-memory vector store with filtered similarity search
//!   ([`InMemoryVectorStore`])
//! - Ingestion and retrieval pipelines ([`IngestionPipeline`],
//!   [`RetrievalPipeline`])
//!
//! Document loading and embedding generation are capability traits
//! ([`DocumentLoader`], [`EmbeddingGenerator`]) supplied by the caller; the
//! shipped [`TextFileLoader`] and [`HashEmbedder`] exist so the pipelines
//! run end to end without external services.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use ragkit::{
//!     FixedSizeChunker, HashEmbedder, IngestionPipeline, InMemoryVectorStore,
//!     QueryOptions, RetrievalPipeline, TextFileLoader, VectorStoreConfig,
//! };
//!
//! let config = VectorStoreConfig::builder()
//!     .collection_name("docs")
//!     .embedding_dimensions(64)
//!     .build()?;
//! let store = Arc::new(InMemoryVectorStore::new(config));
//! let embedder = Arc::new(HashEmbedder::new(64));
//!
//! let ingestion = IngestionPipeline::builder()
//!     .loader(Arc::new(TextFileLoader::new()))
//!     .chunker(Arc::new(FixedSizeChunker::new(512, 100)))
//!     .embedder(embedder.clone())
//!     .store(store.clone())
//!     .build()?;
//! let report = ingestion.ingest(&["notes.txt"]).await?;
//!
//! let retrieval = RetrievalPipeline::new(embedder, store);
//! let response = retrieval.query("what are embeddings?", &QueryOptions::default()).await?;
//! println!("{}", response.context);
//! ```

pub mod chunking;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod filter;
pub mod ingestion;
pub mod inmemory;
pub mod loader;
pub mod retrieval;
pub mod similarity;
pub mod vectorstore;

pub use chunking::{Chunker, FixedSizeChunker, SectionChunker};
pub use config::{VectorStoreConfig, VectorStoreConfigBuilder};
pub use document::{
    CHUNK_METADATA_PREFIX, ChunkMetadata, Document, DocumentChunk, Metadata, SearchResult,
};
pub use embedding::{EmbeddingGenerator, HashEmbedder};
pub use error::{RagError, Result};
pub use filter::{
    CompositeFilter, FilterCondition, FilterOperator, LogicalOperator, MetadataFilter,
};
pub use ingestion::{
    IngestionFailure, IngestionPipeline, IngestionPipelineBuilder, IngestionReport,
    ProgressCallback,
};
pub use inmemory::InMemoryVectorStore;
pub use loader::{DocumentLoader, TextFileLoader};
pub use retrieval::{QueryMetadata, QueryOptions, QueryResponse, RetrievalPipeline};
pub use similarity::{DistanceMetric, cosine_similarity, dot_product, euclidean_distance};
pub use vectorstore::{DocumentUpdate, MetadataUpdate, VectorStore};
