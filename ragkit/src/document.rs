//! Data types for documents, chunks, and search results.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Open-ended metadata: a string-keyed ordered map of JSON values.
pub type Metadata = Map<String, Value>;

/// Reserved key prefix for chunk bookkeeping fields.
///
/// Serialized [`ChunkMetadata`] bookkeeping fields all carry this prefix so
/// they can be mechanically separated from user-supplied metadata (for
/// example when assembling query context).
pub const CHUNK_METADATA_PREFIX: &str = "chunk_";

/// A source document containing text content and metadata.
///
/// Documents are produced by a [`DocumentLoader`](crate::loader::DocumentLoader)
/// and consumed by a [`Chunker`](crate::chunking::Chunker); they are not
/// stored themselves.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// Unique identifier for the document.
    pub id: String,
    /// The plain-text content of the document.
    pub content: String,
    /// Key-value metadata associated with the document.
    #[serde(default)]
    pub metadata: Metadata,
    /// Optional document-level embedding.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f64>>,
}

impl Document {
    /// Create a document with empty metadata and no embedding.
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self { id: id.into(), content: content.into(), metadata: Metadata::new(), embedding: None }
    }
}

/// A segment of a [`Document`]: the unit stored and searched.
///
/// `document_id` is a weak back-reference to the originating document
/// (lookup only, no ownership). The embedding is attached after chunking;
/// the vector store rejects chunks submitted without one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentChunk {
    /// Unique identifier for the chunk (unique within a store).
    pub id: String,
    /// The ID of the parent [`Document`].
    pub document_id: String,
    /// The text content of the chunk.
    pub content: String,
    /// Position of this chunk within its document, starting at 0.
    pub index: usize,
    /// Chunk bookkeeping plus inherited document metadata.
    pub metadata: ChunkMetadata,
    /// The vector embedding for this chunk's text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f64>>,
}

/// Bookkeeping metadata stamped on every chunk, plus a flattened map of
/// inherited document metadata.
///
/// Typed fields serialize under `chunk_`-prefixed names so serialized
/// bookkeeping never collides with user metadata in `extra`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ChunkMetadata {
    /// Position of the chunk within its document, starting at 0.
    pub chunk_index: usize,
    /// Total number of chunks produced from the document.
    pub chunk_count: usize,
    /// Absolute character offset of the chunk start in the original content.
    #[serde(rename = "chunk_start_char", skip_serializing_if = "Option::is_none")]
    pub start_char: Option<usize>,
    /// Absolute character offset one past the chunk end in the original content.
    #[serde(rename = "chunk_end_char", skip_serializing_if = "Option::is_none")]
    pub end_char: Option<usize>,
    /// The ID of the document this chunk was produced from.
    #[serde(rename = "chunk_parent_document_id", skip_serializing_if = "Option::is_none")]
    pub parent_document_id: Option<String>,
    /// Section heading the chunk belongs to, when produced by a
    /// section-aware chunker.
    #[serde(rename = "chunk_section", skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    /// Approximate token count of the chunk content, if computed.
    #[serde(rename = "chunk_token_count", skip_serializing_if = "Option::is_none")]
    pub token_count: Option<usize>,
    /// Metadata inherited from the parent document plus any caller-supplied
    /// fields. Filterable alongside the typed fields.
    #[serde(flatten)]
    pub extra: Metadata,
}

impl ChunkMetadata {
    /// Resolve a filterable field by name.
    ///
    /// Reserved `chunk_`-prefixed names map to the typed bookkeeping fields;
    /// everything else is looked up in `extra`. Returns `None` for absent
    /// fields and unset optional fields.
    pub fn field(&self, name: &str) -> Option<Value> {
        match name {
            "chunk_index" => Some(Value::from(self.chunk_index)),
            "chunk_count" => Some(Value::from(self.chunk_count)),
            "chunk_start_char" => self.start_char.map(Value::from),
            "chunk_end_char" => self.end_char.map(Value::from),
            "chunk_parent_document_id" => {
                self.parent_document_id.as_deref().map(Value::from)
            }
            "chunk_section" => self.section.as_deref().map(Value::from),
            "chunk_token_count" => self.token_count.map(Value::from),
            _ => self.extra.get(name).cloned(),
        }
    }

    /// Merge a partial metadata map into this metadata, key by key.
    ///
    /// Reserved `chunk_`-prefixed keys update the corresponding typed field;
    /// all other keys are written into `extra`. A `null` value clears an
    /// optional typed field or removes an `extra` key (JSON merge-patch
    /// convention). Unparseable values for typed fields are ignored rather
    /// than corrupting the bookkeeping.
    pub fn apply(&mut self, patch: &Metadata) {
        for (key, value) in patch {
            match key.as_str() {
                "chunk_index" => {
                    if let Some(v) = value.as_u64() {
                        self.chunk_index = v as usize;
                    }
                }
                "chunk_count" => {
                    if let Some(v) = value.as_u64() {
                        self.chunk_count = v as usize;
                    }
                }
                "chunk_start_char" => {
                    self.start_char = value.as_u64().map(|v| v as usize);
                }
                "chunk_end_char" => {
                    self.end_char = value.as_u64().map(|v| v as usize);
                }
                "chunk_parent_document_id" => {
                    self.parent_document_id = value.as_str().map(str::to_string);
                }
                "chunk_section" => {
                    self.section = value.as_str().map(str::to_string);
                }
                "chunk_token_count" => {
                    self.token_count = value.as_u64().map(|v| v as usize);
                }
                _ => {
                    if value.is_null() {
                        self.extra.remove(key);
                    } else {
                        self.extra.insert(key.clone(), value.clone());
                    }
                }
            }
        }
    }

    /// Serialize to a flat map, bookkeeping fields under their reserved
    /// `chunk_`-prefixed names.
    pub fn to_map(&self) -> Metadata {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Metadata::new(),
        }
    }
}

/// A retrieved [`DocumentChunk`] paired with a relevance score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// The retrieved chunk.
    pub chunk: DocumentChunk,
    /// The similarity score (higher is more relevant, for every metric).
    pub score: f64,
    /// The metric-native distance, when the metric defines one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn field_resolves_typed_and_extra() {
        let mut meta = ChunkMetadata {
            chunk_index: 2,
            chunk_count: 5,
            start_char: Some(10),
            ..Default::default()
        };
        meta.extra.insert("category".to_string(), json!("news"));

        assert_eq!(meta.field("chunk_index"), Some(json!(2)));
        assert_eq!(meta.field("chunk_start_char"), Some(json!(10)));
        assert_eq!(meta.field("chunk_end_char"), None);
        assert_eq!(meta.field("category"), Some(json!("news")));
        assert_eq!(meta.field("missing"), None);
    }

    #[test]
    fn apply_merges_and_deletes() {
        let mut meta = ChunkMetadata::default();
        meta.extra.insert("category".to_string(), json!("news"));
        meta.extra.insert("author".to_string(), json!("jane"));

        let mut patch = Metadata::new();
        patch.insert("category".to_string(), json!("sports"));
        patch.insert("author".to_string(), Value::Null);
        patch.insert("chunk_section".to_string(), json!("Intro"));
        meta.apply(&patch);

        assert_eq!(meta.extra.get("category"), Some(&json!("sports")));
        assert!(!meta.extra.contains_key("author"));
        assert_eq!(meta.section.as_deref(), Some("Intro"));
    }

    #[test]
    fn to_map_uses_reserved_prefix() {
        let meta = ChunkMetadata {
            chunk_index: 0,
            chunk_count: 1,
            start_char: Some(0),
            end_char: Some(4),
            ..Default::default()
        };
        let map = meta.to_map();
        assert!(map.contains_key("chunk_start_char"));
        assert!(map.contains_key("chunk_end_char"));
        assert!(!map.contains_key("start_char"));
    }
}
