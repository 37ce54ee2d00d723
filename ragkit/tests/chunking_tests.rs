//! Property tests for chunker coverage and overlap guarantees.

use proptest::prelude::*;
use ragkit::chunking::{Chunker, FixedSizeChunker, SectionChunker};
use ragkit::document::Document;

fn doc(content: &str) -> Document {
    Document::new("doc", content)
}

/// For any content, chunk size, and overlap below the size, the produced
/// `[start_char, end_char)` ranges exactly cover `[0, len)` with no gaps,
/// and `chunk_count` equals the number of chunks produced.
mod prop_chunk_coverage {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn ranges_cover_content_without_gaps(
            content in "[a-zü ]{0,200}",
            chunk_size in 1usize..40,
            chunk_overlap in 0usize..40,
        ) {
            let chunker = FixedSizeChunker::new(chunk_size, chunk_overlap);
            let chunks = chunker.chunk(&doc(&content));
            let len = content.chars().count();

            if len == 0 {
                prop_assert!(chunks.is_empty());
                return Ok(());
            }

            prop_assert_eq!(chunks[0].metadata.start_char, Some(0));
            prop_assert_eq!(chunks.last().unwrap().metadata.end_char, Some(len));

            for (i, chunk) in chunks.iter().enumerate() {
                prop_assert_eq!(chunk.metadata.chunk_index, i);
                prop_assert_eq!(chunk.metadata.chunk_count, chunks.len());
                let start = chunk.metadata.start_char.unwrap();
                let end = chunk.metadata.end_char.unwrap();
                prop_assert!(start < end);
                prop_assert!(end <= len);
                prop_assert!(end - start <= chunk_size);
            }

            // No gaps, and every window extends coverage: each window starts
            // no later than the previous one ends and ends strictly after it
            for pair in chunks.windows(2) {
                let prev_end = pair[0].metadata.end_char.unwrap();
                let next_start = pair[1].metadata.start_char.unwrap();
                prop_assert!(next_start <= prev_end);
                prop_assert!(next_start > pair[0].metadata.start_char.unwrap());
                prop_assert!(pair[1].metadata.end_char.unwrap() > prev_end);
            }
        }

        #[test]
        fn adjacent_full_chunks_share_exactly_the_overlap(
            content in "[a-z]{50,150}",
            chunk_size in 5usize..30,
            chunk_overlap in 0usize..5,
        ) {
            prop_assume!(chunk_overlap < chunk_size);
            let chunker = FixedSizeChunker::new(chunk_size, chunk_overlap);
            let chunks = chunker.chunk(&doc(&content));

            for pair in chunks.windows(2) {
                let prev: Vec<char> = pair[0].content.chars().collect();
                let next: Vec<char> = pair[1].content.chars().collect();
                if prev.len() == chunk_size && next.len() >= chunk_overlap {
                    prop_assert_eq!(
                        &prev[chunk_size - chunk_overlap..],
                        &next[..chunk_overlap]
                    );
                }
            }
        }

        #[test]
        fn section_chunks_are_exact_slices(
            body in "[a-z \n]{0,120}",
            chunk_size in 5usize..40,
        ) {
            let content = format!("intro\n# One\n{body}\n## Two\ntail");
            let chunker = SectionChunker::new(chunk_size, 2);
            let chunks = chunker.chunk(&doc(&content));
            let all: Vec<char> = content.chars().collect();

            for (i, chunk) in chunks.iter().enumerate() {
                prop_assert_eq!(chunk.metadata.chunk_index, i);
                prop_assert_eq!(chunk.metadata.chunk_count, chunks.len());
                let start = chunk.metadata.start_char.unwrap();
                let end = chunk.metadata.end_char.unwrap();
                let expected: String = all[start..end].iter().collect();
                prop_assert_eq!(&chunk.content, &expected);
            }
        }
    }
}

#[test]
fn single_chunk_short_circuit() {
    let content = "short";
    let chunks = FixedSizeChunker::new(100, 10).chunk(&doc(content));
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].metadata.start_char, Some(0));
    assert_eq!(chunks[0].metadata.end_char, Some(content.len()));
    assert_eq!(chunks[0].metadata.chunk_index, 0);
    assert_eq!(chunks[0].metadata.chunk_count, 1);
}

#[test]
fn content_equal_to_chunk_size_is_one_chunk() {
    let content = "x".repeat(32);
    let chunks = FixedSizeChunker::new(32, 8).chunk(&doc(&content));
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].content, content);
}

#[test]
fn excessive_overlap_is_clamped() {
    // overlap >= chunk_size would never advance the window
    let content = "abcdefghijklmnop";
    let chunks = FixedSizeChunker::new(4, 9).chunk(&doc(content));
    assert!(!chunks.is_empty());
    // Clamped to size - 1, so the window advances one char at a time
    assert_eq!(chunks[1].metadata.start_char, Some(1));
    assert_eq!(chunks.last().unwrap().metadata.end_char, Some(content.len()));
}

#[test]
fn section_numbering_is_global() {
    let content = "# A\nfirst section\n# B\nsecond section\n# C\nthird";
    let chunks = SectionChunker::new(1000, 0).chunk(&doc(content));
    assert_eq!(chunks.len(), 3);
    let indices: Vec<usize> = chunks.iter().map(|c| c.metadata.chunk_index).collect();
    assert_eq!(indices, vec![0, 1, 2]);
    let sections: Vec<&str> =
        chunks.iter().map(|c| c.metadata.section.as_deref().unwrap()).collect();
    assert_eq!(sections, vec!["A", "B", "C"]);
}
