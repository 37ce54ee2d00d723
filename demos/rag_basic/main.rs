//! # RAG Basic Example
//!
//! Demonstrates the full ingest-and-query flow: write a small corpus to
//! disk, ingest it (load → chunk → embed → store), then run queries and
//! print the assembled context.
//!
//! Uses `InMemoryVectorStore`, `FixedSizeChunker`, `TextFileLoader`, and the
//! deterministic `HashEmbedder`, so it runs with **zero API keys**.
//!
//! Run: `cargo run --example rag_basic`

use std::io::Write;
use std::sync::Arc;

use ragkit::{
    FixedSizeChunker, HashEmbedder, IngestionPipeline, InMemoryVectorStore, QueryOptions,
    RetrievalPipeline, TextFileLoader, VectorStoreConfig,
};

const DIMENSIONS: usize = 64;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    // -- 1. Write a small corpus to disk ----------------------------------
    let dir = tempfile::tempdir()?;
    let corpus = [
        (
            "rust.txt",
            "Rust is a systems programming language focused on safety, speed, \
             and concurrency. It achieves memory safety without a garbage \
             collector through its ownership system.",
        ),
        (
            "python.txt",
            "Python is a high-level, interpreted programming language known \
             for its readability and versatility. It is widely used in data \
             science, web development, and automation.",
        ),
        (
            "rag.txt",
            "Retrieval-Augmented Generation combines a retrieval system with \
             a language model. Documents are chunked, embedded, and stored in \
             a vector store. At query time the most relevant chunks are \
             retrieved and fed to the model as context.",
        ),
    ];
    let mut paths = Vec::new();
    for (name, text) in corpus {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path)?;
        write!(file, "{text}")?;
        paths.push(path.to_string_lossy().into_owned());
    }

    // -- 2. Build the store and ingestion pipeline ------------------------
    // chunk_size=200 keeps chunks small for this demo; overlap=50 ensures
    // context is shared between adjacent chunks.
    let config = VectorStoreConfig::builder()
        .collection_name("knowledge_base")
        .embedding_dimensions(DIMENSIONS)
        .build()?;
    let store = Arc::new(InMemoryVectorStore::new(config));
    let embedder = Arc::new(HashEmbedder::new(DIMENSIONS));

    let ingestion = IngestionPipeline::builder()
        .loader(Arc::new(TextFileLoader::new()))
        .chunker(Arc::new(FixedSizeChunker::new(200, 50)))
        .embedder(embedder.clone())
        .store(store.clone())
        .progress(Arc::new(|current, total, details| {
            println!("  embedded {current}/{total} chunks ({})", details.unwrap_or("?"));
        }))
        .build()?;

    // -- 3. Ingest the corpus ---------------------------------------------
    println!("Ingesting {} files...", paths.len());
    let report = ingestion.ingest(&paths).await?;
    println!(
        "Done: {} documents, {} chunks, {} errors in {}ms\n",
        report.documents_processed,
        report.chunks_generated,
        report.errors.len(),
        report.duration_ms
    );

    // -- 4. Query ----------------------------------------------------------
    let retrieval = RetrievalPipeline::new(embedder, store);
    let options = QueryOptions { limit: 2, threshold: -1.0, ..Default::default() };

    for query in ["memory safety in programming", "vector store retrieval"] {
        println!("Query: \"{query}\"");
        let response = retrieval.query(query, &options).await?;
        println!("{}\n", response.context);
    }

    Ok(())
}
