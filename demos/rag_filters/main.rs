//! # RAG Filters Example
//!
//! Demonstrates metadata filtering at search time: simple field conditions
//! and composite `and`/`or` filters over a store of tagged chunks.
//!
//! Run: `cargo run --example rag_filters`

use std::sync::Arc;

use ragkit::{
    ChunkMetadata, DocumentChunk, EmbeddingGenerator, HashEmbedder, InMemoryVectorStore,
    MetadataFilter, VectorStore, VectorStoreConfig,
};
use serde_json::json;

const DIMENSIONS: usize = 64;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = VectorStoreConfig::builder()
        .collection_name("articles")
        .embedding_dimensions(DIMENSIONS)
        .build()?;
    let store = Arc::new(InMemoryVectorStore::new(config));
    let embedder = HashEmbedder::new(DIMENSIONS);

    // -- 1. Store chunks tagged with category and year ---------------------
    let entries = [
        ("a1", "ownership and borrowing in rust", "rust", 2021),
        ("a2", "async runtimes compared", "rust", 2024),
        ("a3", "pandas dataframes for analysis", "python", 2023),
        ("a4", "type hints in modern python", "python", 2024),
    ];
    let mut chunks = Vec::new();
    for (id, text, category, year) in entries {
        let embedding = embedder.embed(&[text]).await?.pop().unwrap();
        let mut metadata = ChunkMetadata { chunk_index: 0, chunk_count: 1, ..Default::default() };
        metadata.extra.insert("category".to_string(), json!(category));
        metadata.extra.insert("year".to_string(), json!(year));
        chunks.push(DocumentChunk {
            id: id.to_string(),
            document_id: id.to_string(),
            content: text.to_string(),
            index: 0,
            metadata,
            embedding: Some(embedding),
        });
    }
    store.add_documents(&chunks).await?;
    println!("Stored {} chunks\n", store.count().await?);

    let query = embedder.embed(&["programming languages"]).await?.pop().unwrap();

    // -- 2. Simple equality filter ------------------------------------------
    let rust_only = MetadataFilter::eq("category", "rust");
    print_results("category == rust", store.search(&query, 10, Some(&rust_only)).await?);

    // -- 3. Numeric comparison ---------------------------------------------
    let recent = MetadataFilter::gte("year", 2023);
    print_results("year >= 2023", store.search(&query, 10, Some(&recent)).await?);

    // -- 4. Composite filter: recent rust OR anything from 2023 -------------
    let combined = MetadataFilter::or(vec![
        MetadataFilter::and(vec![
            MetadataFilter::eq("category", "rust"),
            MetadataFilter::gte("year", 2024),
        ]),
        MetadataFilter::eq("year", 2023),
    ]);
    print_results("(rust AND year>=2024) OR year==2023", store.search(&query, 10, Some(&combined)).await?);

    // -- 5. Membership -------------------------------------------------------
    let excluded = MetadataFilter::not_in("category", vec![json!("python")]);
    print_results("category NOT IN [python]", store.search(&query, 10, Some(&excluded)).await?);

    Ok(())
}

fn print_results(label: &str, results: Vec<ragkit::SearchResult>) {
    println!("Filter: {label}");
    if results.is_empty() {
        println!("  (no results)");
    }
    for result in results {
        println!(
            "  {} [score={:.4}] {} ({}, {})",
            result.chunk.id,
            result.score,
            result.chunk.content,
            result.chunk.metadata.extra["category"],
            result.chunk.metadata.extra["year"],
        );
    }
    println!();
}
