//! Document loader trait and a minimal text-file loader.

use std::path::Path;

use async_trait::async_trait;

use crate::document::Document;
use crate::error::{RagError, Result};

/// A capability that turns a source reference into plain-text documents.
///
/// The core only requires that returned `content` be plain text and that
/// `metadata.source` be populated; format-specific extraction (HTML tag
/// stripping, Markdown rendering) lives behind this trait, outside the core.
#[async_trait]
pub trait DocumentLoader: Send + Sync {
    /// Load all documents from the given source.
    async fn load(&self, source: &str) -> Result<Vec<Document>>;
}

/// Loads a single UTF-8 text file as one [`Document`].
///
/// The document id is derived from the file stem and the `source` metadata
/// key is set to the path as given.
#[derive(Debug, Clone, Default)]
pub struct TextFileLoader;

impl TextFileLoader {
    /// Create a new text file loader.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DocumentLoader for TextFileLoader {
    async fn load(&self, source: &str) -> Result<Vec<Document>> {
        let content = tokio::fs::read_to_string(source).await.map_err(|e| RagError::Loader {
            path: source.to_string(),
            message: e.to_string(),
        })?;

        let id = Path::new(source)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| source.to_string());

        let mut document = Document::new(id, content);
        document.metadata.insert("source".to_string(), source.into());
        Ok(vec![document])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[tokio::test]
    async fn loads_file_with_source_metadata() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "some plain text").unwrap();
        let path = file.path().to_string_lossy().into_owned();

        let docs = TextFileLoader::new().load(&path).await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].content, "some plain text");
        assert_eq!(docs[0].metadata.get("source"), Some(&json!(path)));
    }

    #[tokio::test]
    async fn missing_file_is_a_loader_error() {
        let err = TextFileLoader::new().load("/no/such/file.txt").await.unwrap_err();
        assert!(matches!(err, RagError::Loader { .. }));
    }
}
