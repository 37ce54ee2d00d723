//! # RAG Similar Example
//!
//! Demonstrates `find_similar`: look up a stored chunk by id and retrieve
//! its nearest neighbors, excluding the chunk itself.
//!
//! Run: `cargo run --example rag_similar`

use std::sync::Arc;

use ragkit::{
    ChunkMetadata, DocumentChunk, EmbeddingGenerator, HashEmbedder, InMemoryVectorStore,
    QueryOptions, RetrievalPipeline, VectorStore, VectorStoreConfig,
};

const DIMENSIONS: usize = 64;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = VectorStoreConfig::builder()
        .collection_name("notes")
        .embedding_dimensions(DIMENSIONS)
        .build()?;
    let store = Arc::new(InMemoryVectorStore::new(config));
    let embedder = Arc::new(HashEmbedder::new(DIMENSIONS));

    // -- 1. Store a handful of notes ---------------------------------------
    let notes = [
        ("n1", "the borrow checker enforces aliasing rules at compile time"),
        ("n2", "lifetimes describe how long references remain valid"),
        ("n3", "garbage collectors reclaim unused memory at runtime"),
        ("n4", "reference counting tracks ownership dynamically"),
        ("n5", "unit tests document expected behavior"),
    ];
    let mut chunks = Vec::new();
    for (id, text) in notes {
        let embedding = embedder.embed(&[text]).await?.pop().unwrap();
        chunks.push(DocumentChunk {
            id: id.to_string(),
            document_id: id.to_string(),
            content: text.to_string(),
            index: 0,
            metadata: ChunkMetadata { chunk_index: 0, chunk_count: 1, ..Default::default() },
            embedding: Some(embedding),
        });
    }
    store.add_documents(&chunks).await?;

    // -- 2. Find neighbors of one chunk -------------------------------------
    let retrieval = RetrievalPipeline::new(embedder, store);
    let options = QueryOptions { limit: 3, ..Default::default() };

    let source = "n1";
    println!("Chunks most similar to '{source}':");
    let results = retrieval.find_similar(source, &options).await?;
    for (i, result) in results.iter().enumerate() {
        println!("  {}. {} [score={:.4}] {}", i + 1, result.chunk.id, result.score, result.chunk.content);
    }

    // The source chunk never appears in its own neighbor list
    assert!(results.iter().all(|r| r.chunk.id != source));

    Ok(())
}
