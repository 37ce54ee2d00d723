//! Document chunking strategies.
//!
//! This module provides the [`Chunker`] trait and two implementations:
//!
//! - [`FixedSizeChunker`] — sliding character window with configurable overlap
//! - [`SectionChunker`] — splits at heading boundaries first, then windows
//!   oversized sections
//!
//! Both track absolute character offsets (`start_char`/`end_char`) into the
//! original content, so every chunk is an exact slice of its document.

use crate::document::{ChunkMetadata, Document, DocumentChunk};

/// A strategy for splitting documents into chunks.
///
/// Implementations produce [`DocumentChunk`]s with content and metadata but
/// no embeddings. Embeddings are attached later by the pipeline.
pub trait Chunker: Send + Sync {
    /// Split a document into chunks, in document order.
    ///
    /// Returns an empty `Vec` if the document has empty content. Each chunk
    /// is stamped with its `chunk_index` and the final `chunk_count`, and
    /// records absolute character offsets into the original content.
    fn chunk(&self, document: &Document) -> Vec<DocumentChunk>;
}

/// Splits text into fixed-size chunks by character count with configurable
/// overlap.
///
/// The window covers `[start, min(start + chunk_size, len))` and advances by
/// `chunk_size - chunk_overlap`, so consecutive chunks share exactly
/// `chunk_overlap` characters and the union of all chunks covers the whole
/// document with no gaps. Offsets and sizes are measured in characters, not
/// bytes; slicing always lands on UTF-8 boundaries.
///
/// Chunk IDs are generated as `{document_id}_{chunk_index}`. Each chunk
/// inherits the parent document's metadata.
///
/// # Example
///
/// ```rust,ignore
/// use ragkit::FixedSizeChunker;
///
/// let chunker = FixedSizeChunker::new(256, 50);
/// let chunks = chunker.chunk(&document);
/// ```
#[derive(Debug, Clone)]
pub struct FixedSizeChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl FixedSizeChunker {
    /// Create a new `FixedSizeChunker`.
    ///
    /// A `chunk_size` of 0 is raised to 1, and a `chunk_overlap >=
    /// chunk_size` is clamped to `chunk_size - 1`, so the window always
    /// makes forward progress.
    ///
    /// # Arguments
    ///
    /// * `chunk_size` — maximum number of characters per chunk
    /// * `chunk_overlap` — number of overlapping characters between consecutive chunks
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        let chunk_overlap = chunk_overlap.min(chunk_size - 1);
        Self { chunk_size, chunk_overlap }
    }
}

impl Chunker for FixedSizeChunker {
    fn chunk(&self, document: &Document) -> Vec<DocumentChunk> {
        let text = CharIndexed::new(&document.content);
        let mut chunks = Vec::new();
        window_into(
            &text,
            0,
            text.len(),
            self.chunk_size,
            self.chunk_overlap,
            None,
            document,
            &mut chunks,
        );
        stamp_chunk_count(&mut chunks);
        chunks
    }
}

/// Splits text at heading boundaries, windowing only oversized sections.
///
/// A section starts at a Markdown-style heading line (`#` through `######`
/// followed by a space) and runs up to the next heading. Content before the
/// first heading forms an untitled preamble section. Sections no longer than
/// `chunk_size` become a single chunk; longer sections are windowed with the
/// same sliding-window algorithm as [`FixedSizeChunker`]. Chunk numbering is
/// global across all sections of a document, and every chunk records its
/// section's heading text in `metadata.section`.
#[derive(Debug, Clone)]
pub struct SectionChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl SectionChunker {
    /// Create a new `SectionChunker`.
    ///
    /// Applies the same `chunk_size`/`chunk_overlap` clamping as
    /// [`FixedSizeChunker::new`].
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        let chunk_overlap = chunk_overlap.min(chunk_size - 1);
        Self { chunk_size, chunk_overlap }
    }
}

impl Chunker for SectionChunker {
    fn chunk(&self, document: &Document) -> Vec<DocumentChunk> {
        let text = CharIndexed::new(&document.content);
        let mut chunks = Vec::new();
        for section in find_sections(&document.content, &text) {
            window_into(
                &text,
                section.start,
                section.end,
                self.chunk_size,
                self.chunk_overlap,
                section.title.as_deref(),
                document,
                &mut chunks,
            );
        }
        stamp_chunk_count(&mut chunks);
        chunks
    }
}

/// A document string with a precomputed char-boundary table, so slicing by
/// character offset is O(1) and always lands on UTF-8 boundaries.
struct CharIndexed<'a> {
    text: &'a str,
    // boundaries[i] is the byte offset of the i-th character; the final
    // entry is text.len().
    boundaries: Vec<usize>,
}

impl<'a> CharIndexed<'a> {
    fn new(text: &'a str) -> Self {
        let mut boundaries: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
        boundaries.push(text.len());
        Self { text, boundaries }
    }

    /// Length in characters.
    fn len(&self) -> usize {
        self.boundaries.len() - 1
    }

    /// Slice by character offsets.
    fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.text[self.boundaries[start]..self.boundaries[end]]
    }
}

/// A section of a document: a char range plus an optional heading title.
struct Section {
    start: usize,
    end: usize,
    title: Option<String>,
}

/// Split content at Markdown heading lines into char-offset sections.
///
/// The heading line itself belongs to its section. An empty preamble (the
/// document starts with a heading) produces no section.
fn find_sections(content: &str, text: &CharIndexed<'_>) -> Vec<Section> {
    // (char offset of line start, heading title)
    let mut headings: Vec<(usize, String)> = Vec::new();
    let mut char_pos = 0;
    let mut at_line_start = true;
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        if at_line_start && c == '#' {
            let mut level = 1;
            let mut lookahead = chars.clone();
            while lookahead.peek() == Some(&'#') {
                lookahead.next();
                level += 1;
            }
            if level <= 6 && lookahead.peek() == Some(&' ') {
                // Consume the rest of the line as the heading title.
                let heading_start = char_pos;
                let mut consumed = 1;
                let mut title = String::new();
                let mut past_marker = false;
                for c in chars.by_ref() {
                    consumed += 1;
                    if c == '\n' {
                        break;
                    }
                    if past_marker {
                        title.push(c);
                    } else if c != '#' && c != ' ' {
                        past_marker = true;
                        title.push(c);
                    } else if c == ' ' && !title.is_empty() {
                        past_marker = true;
                    }
                }
                headings.push((heading_start, title.trim().to_string()));
                char_pos += consumed;
                at_line_start = true;
                continue;
            }
        }
        at_line_start = c == '\n';
        char_pos += 1;
    }

    let mut sections = Vec::new();
    let first_heading = headings.first().map_or(text.len(), |(pos, _)| *pos);
    if first_heading > 0 {
        sections.push(Section { start: 0, end: first_heading, title: None });
    }
    for (i, (start, title)) in headings.iter().enumerate() {
        let end = headings.get(i + 1).map_or(text.len(), |(pos, _)| *pos);
        sections.push(Section { start: *start, end, title: Some(title.clone()) });
    }
    sections
}

/// Run the sliding window over `[start, end)` of a document, appending
/// chunks with global numbering. `chunk_count` is stamped later.
#[allow(clippy::too_many_arguments)]
fn window_into(
    text: &CharIndexed<'_>,
    start: usize,
    end: usize,
    chunk_size: usize,
    chunk_overlap: usize,
    section: Option<&str>,
    document: &Document,
    chunks: &mut Vec<DocumentChunk>,
) {
    if start >= end {
        return;
    }
    let step = chunk_size - chunk_overlap;
    let mut offset = start;
    while offset < end {
        let chunk_end = (offset + chunk_size).min(end);
        let chunk_index = chunks.len();
        let metadata = ChunkMetadata {
            chunk_index,
            chunk_count: 0,
            start_char: Some(offset),
            end_char: Some(chunk_end),
            parent_document_id: Some(document.id.clone()),
            section: section.map(str::to_string),
            token_count: None,
            extra: document.metadata.clone(),
        };
        chunks.push(DocumentChunk {
            id: format!("{}_{chunk_index}", document.id),
            document_id: document.id.clone(),
            content: text.slice(offset, chunk_end).to_string(),
            index: chunk_index,
            metadata,
            embedding: None,
        });
        // The range is fully covered; advancing further would only produce
        // windows contained in this one.
        if chunk_end == end {
            break;
        }
        offset += step;
    }
}

/// Second pass: back-fill `chunk_count` once the total is known.
fn stamp_chunk_count(chunks: &mut [DocumentChunk]) {
    let count = chunks.len();
    for chunk in chunks {
        chunk.metadata.chunk_count = count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(content: &str) -> Document {
        let mut d = Document::new("doc1", content);
        d.metadata.insert("source".to_string(), json!("test.txt"));
        d
    }

    #[test]
    fn empty_content_yields_no_chunks() {
        let chunker = FixedSizeChunker::new(100, 20);
        assert!(chunker.chunk(&doc("")).is_empty());
    }

    #[test]
    fn short_content_yields_single_chunk() {
        let chunker = FixedSizeChunker::new(100, 20);
        let chunks = chunker.chunk(&doc("hello world"));
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, "hello world");
        assert_eq!(chunks[0].metadata.start_char, Some(0));
        assert_eq!(chunks[0].metadata.end_char, Some(11));
        assert_eq!(chunks[0].metadata.chunk_index, 0);
        assert_eq!(chunks[0].metadata.chunk_count, 1);
        assert_eq!(chunks[0].id, "doc1_0");
    }

    #[test]
    fn chunks_inherit_document_metadata() {
        let chunker = FixedSizeChunker::new(4, 0);
        let chunks = chunker.chunk(&doc("abcdefgh"));
        assert_eq!(chunks.len(), 2);
        for chunk in &chunks {
            assert_eq!(chunk.metadata.extra.get("source"), Some(&json!("test.txt")));
            assert_eq!(chunk.metadata.parent_document_id.as_deref(), Some("doc1"));
        }
    }

    #[test]
    fn adjacent_chunks_share_overlap() {
        let content = "abcdefghijklmnopqrstuvwxyz";
        let chunker = FixedSizeChunker::new(10, 3);
        let chunks = chunker.chunk(&doc(content));
        for pair in chunks.windows(2) {
            let prev: Vec<char> = pair[0].content.chars().collect();
            let next: Vec<char> = pair[1].content.chars().collect();
            if prev.len() == 10 && next.len() >= 3 {
                assert_eq!(&prev[prev.len() - 3..], &next[..3]);
            }
        }
    }

    #[test]
    fn overlap_clamped_below_chunk_size() {
        // overlap >= size would never advance; the constructor clamps it
        let chunker = FixedSizeChunker::new(5, 5);
        let chunks = chunker.chunk(&doc("abcdefghij"));
        assert!(!chunks.is_empty());
        for pair in chunks.windows(2) {
            assert!(
                pair[1].metadata.start_char.unwrap() > pair[0].metadata.start_char.unwrap()
            );
        }
    }

    #[test]
    fn content_of_exactly_chunk_size_is_one_chunk() {
        let content = "a".repeat(32);
        let chunks = FixedSizeChunker::new(32, 8).chunk(&doc(&content));
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].metadata.end_char, Some(32));
    }

    #[test]
    fn no_window_is_contained_in_its_predecessor() {
        // 22 chars, size 10, overlap 4: the window covering [12, 22) ends the
        // document; no trailing window inside it may follow
        let content = "a".repeat(22);
        let chunks = FixedSizeChunker::new(10, 4).chunk(&doc(&content));
        assert_eq!(chunks.last().unwrap().metadata.end_char, Some(22));
        for pair in chunks.windows(2) {
            assert!(pair[1].metadata.end_char.unwrap() > pair[0].metadata.end_char.unwrap());
        }
    }

    #[test]
    fn offsets_are_char_based_for_multibyte_text() {
        let content = "héllo wörld ünïcode";
        let chunker = FixedSizeChunker::new(7, 2);
        let chunks = chunker.chunk(&doc(content));
        let all: Vec<char> = content.chars().collect();
        for chunk in &chunks {
            let start = chunk.metadata.start_char.unwrap();
            let end = chunk.metadata.end_char.unwrap();
            let expected: String = all[start..end].iter().collect();
            assert_eq!(chunk.content, expected);
        }
    }

    #[test]
    fn coverage_has_no_gaps() {
        let content = "the quick brown fox jumps over the lazy dog";
        let chunker = FixedSizeChunker::new(12, 4);
        let chunks = chunker.chunk(&doc(content));
        assert_eq!(chunks[0].metadata.start_char, Some(0));
        assert_eq!(chunks.last().unwrap().metadata.end_char, Some(content.chars().count()));
        for pair in chunks.windows(2) {
            // Next window starts inside or at the end of the previous one
            assert!(pair[1].metadata.start_char.unwrap() <= pair[0].metadata.end_char.unwrap());
        }
    }

    #[test]
    fn section_chunker_splits_at_headings() {
        let content = "preamble text\n# Alpha\nalpha body\n## Beta\nbeta body\n";
        let chunker = SectionChunker::new(1000, 0);
        let chunks = chunker.chunk(&doc(content));
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].metadata.section, None);
        assert_eq!(chunks[0].content, "preamble text\n");
        assert_eq!(chunks[1].metadata.section.as_deref(), Some("Alpha"));
        assert_eq!(chunks[1].content, "# Alpha\nalpha body\n");
        assert_eq!(chunks[2].metadata.section.as_deref(), Some("Beta"));
        // Numbering is global across sections
        assert_eq!(chunks[2].metadata.chunk_index, 2);
        assert_eq!(chunks[2].metadata.chunk_count, 3);
    }

    #[test]
    fn section_chunker_windows_long_sections() {
        let body = "x".repeat(50);
        let content = format!("# Long\n{body}");
        let chunker = SectionChunker::new(20, 5);
        let chunks = chunker.chunk(&doc(&content));
        assert!(chunks.len() > 1);
        let all: Vec<char> = content.chars().collect();
        for chunk in &chunks {
            assert_eq!(chunk.metadata.section.as_deref(), Some("Long"));
            let start = chunk.metadata.start_char.unwrap();
            let end = chunk.metadata.end_char.unwrap();
            let expected: String = all[start..end].iter().collect();
            assert_eq!(chunk.content, expected);
        }
        // Short sections elsewhere are untouched; long ones are windowed from
        // their own start
        assert_eq!(chunks[0].metadata.start_char, Some(0));
    }

    #[test]
    fn section_chunker_without_headings_matches_fixed() {
        let content = "plain text without any headings at all";
        let sectioned = SectionChunker::new(10, 2).chunk(&doc(content));
        let fixed = FixedSizeChunker::new(10, 2).chunk(&doc(content));
        assert_eq!(sectioned.len(), fixed.len());
        for (a, b) in sectioned.iter().zip(fixed.iter()) {
            assert_eq!(a.content, b.content);
            assert_eq!(a.metadata.start_char, b.metadata.start_char);
        }
    }

    #[test]
    fn hash_line_without_space_is_not_a_heading() {
        let content = "#hashtag line\nmore text";
        let chunks = SectionChunker::new(1000, 0).chunk(&doc(content));
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].metadata.section, None);
    }
}
