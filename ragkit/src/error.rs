//! Error types for the `ragkit` crate.

use thiserror::Error;

/// Errors that can occur in RAG operations.
#[derive(Debug, Error)]
pub enum RagError {
    /// A chunk was submitted for storage without an embedding attached.
    #[error("Chunk '{id}' has no embedding attached")]
    MissingEmbedding {
        /// The id of the offending chunk.
        id: String,
    },

    /// An embedding's length does not match the configured dimensions.
    ///
    /// Raised before anything is inserted, so the store is never left in a
    /// partially updated state.
    #[error("Chunk '{id}' has a {actual}-dimensional embedding, store expects {expected}")]
    DimensionMismatch {
        /// The id of the offending chunk.
        id: String,
        /// The dimensionality the store was configured with.
        expected: usize,
        /// The dimensionality that was actually supplied.
        actual: usize,
    },

    /// An operation referenced a chunk id that is not in the store.
    #[error("Chunk '{id}' not found")]
    NotFound {
        /// The id that was looked up.
        id: String,
    },

    /// A query vector was malformed for the store it was sent to.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// A document loader failed.
    #[error("Loader error ({path}): {message}")]
    Loader {
        /// The source path the loader was given.
        path: String,
        /// A description of the failure.
        message: String,
    },

    /// An embedding generator failed.
    #[error("Embedding error ({provider}): {message}")]
    Embedder {
        /// The generator that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// A convenience result type for RAG operations.
pub type Result<T> = std::result::Result<T, RagError>;
