use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::ChunkingConfig;
use crate::error::Result;
use crate::structure::{build_section_tree, scan_markers, Section, SectionKind};
use crate::types::{estimate_tokens, Chunk, DocContext, Document};
use crate::window::WindowSplitter;

/// Separator between a parent path and a section title in breadcrumbs
const PATH_SEPARATOR: &str = " > ";

/// Blank-line paragraph boundary (one or more blank lines)
static PARAGRAPH_SPLIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n\s*\n").expect("paragraph pattern is a valid regex"));

/// Structure-aware chunker for Halachic texts
///
/// Splits a document along detected structural boundaries (perek, siman,
/// seif, halacha, siman katan), falling back to paragraph boundaries and a
/// token-based sliding window where structure is missing or a unit is too
/// large. Post passes merge under-sized neighbors and number chunks within
/// each structural path.
pub struct Chunker {
    config: ChunkingConfig,
}

impl Chunker {
    /// Create a chunker, rejecting invalid configuration
    pub fn new(config: ChunkingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Get configuration
    #[must_use]
    pub const fn config(&self) -> &ChunkingConfig {
        &self.config
    }

    /// Split a document into an ordered list of bounded chunks
    ///
    /// Total over any input text: empty or whitespace-only text yields an
    /// empty list. Chunks come out in document order; `chunk_index` and
    /// `total_chunks_in_group` are final.
    #[must_use]
    pub fn chunk(&self, document: &Document) -> Vec<Chunk> {
        let text = document.text.as_str();
        if text.trim().is_empty() {
            return Vec::new();
        }

        let doc = DocContext::for_document(document);

        let markers = scan_markers(text);
        let mut chunks = if markers.is_empty() {
            log::debug!(
                "no structural markers in '{}', falling back to paragraphs",
                document.title
            );
            self.chunk_paragraphs(text, "", 0, &doc)
        } else {
            log::debug!(
                "{} structural markers in '{}'",
                markers.len(),
                document.title
            );
            let sections = build_section_tree(&markers, text);
            self.chunk_sections(&sections, "", &doc)
        };

        chunks = self.merge_small_chunks(chunks);
        Self::assign_indices(&mut chunks);

        log::debug!("'{}' produced {} chunks", document.title, chunks.len());
        chunks
    }

    /// Get statistics over a chunk list
    #[must_use]
    pub fn stats(chunks: &[Chunk]) -> ChunkingStats {
        let total_tokens: usize = chunks.iter().map(|c| c.token_count).sum();
        ChunkingStats {
            total_chunks: chunks.len(),
            total_tokens,
            avg_tokens_per_chunk: if chunks.is_empty() {
                0
            } else {
                total_tokens / chunks.len()
            },
            min_tokens: chunks.iter().map(|c| c.token_count).min().unwrap_or(0),
            max_tokens: chunks.iter().map(|c| c.token_count).max().unwrap_or(0),
        }
    }

    /// Recursively walk a section forest, children before parent text
    ///
    /// A section with subsections contributes only its children; its own
    /// `text` field is a byproduct of the span calculation and is not
    /// re-emitted. Leaf text within `max_tokens` becomes one chunk,
    /// oversized leaf text goes through the sliding window.
    fn chunk_sections(
        &self,
        sections: &[Section],
        parent_path: &str,
        doc: &DocContext,
    ) -> Vec<Chunk> {
        let mut chunks = Vec::new();

        for section in sections {
            let path = join_path(parent_path, &section.title);

            if !section.subsections.is_empty() {
                chunks.extend(self.chunk_sections(&section.subsections, &path, doc));
                continue;
            }

            let token_count = estimate_tokens(&section.text);
            if token_count <= self.config.max_tokens {
                if !section.text.trim().is_empty() {
                    chunks.push(Chunk::part(
                        doc,
                        section.text.clone(),
                        &path,
                        section.kind,
                        section.char_start,
                        section.char_end,
                        token_count,
                    ));
                }
            } else {
                chunks.extend(WindowSplitter::new(&self.config).split(
                    &section.text,
                    section.char_start,
                    &path,
                    section.kind,
                    doc,
                ));
            }
        }

        chunks
    }

    /// Blank-line fallback used when no structure is detected
    ///
    /// Paragraph offsets come from locating each fragment at or after a
    /// scan cursor in the original text, so duplicate paragraph text
    /// resolves to the correct occurrence.
    fn chunk_paragraphs(
        &self,
        text: &str,
        structural_path: &str,
        base_offset: usize,
        doc: &DocContext,
    ) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        let mut cursor = 0usize;

        for para in PARAGRAPH_SPLIT.split(text) {
            let trimmed = para.trim();
            if trimmed.is_empty() {
                cursor = advance_to_boundary(text, cursor + para.len() + 1);
                continue;
            }

            let para_start = text[cursor..]
                .find(para)
                .map_or(cursor, |found| cursor + found);
            let para_end = para_start + para.len();
            cursor = para_end;

            let token_count = estimate_tokens(trimmed);
            if token_count >= self.config.max_tokens {
                chunks.extend(WindowSplitter::new(&self.config).split(
                    trimmed,
                    base_offset + para_start,
                    structural_path,
                    SectionKind::Paragraph,
                    doc,
                ));
            } else {
                chunks.push(Chunk::part(
                    doc,
                    trimmed.to_string(),
                    structural_path,
                    SectionKind::Paragraph,
                    base_offset + para_start,
                    base_offset + para_end,
                    token_count,
                ));
            }
        }

        chunks
    }

    /// Coalesce adjacent under-sized chunks sharing a structural path
    ///
    /// Single left-to-right pass: when the accumulated chunk is below
    /// `min_tokens`, the next chunk has the same structural path, and the
    /// combined size stays within `max_tokens`, the two are merged. A
    /// merged chunk becomes the next candidate, but there is no lookahead
    /// beyond the immediate neighbor.
    fn merge_small_chunks(&self, chunks: Vec<Chunk>) -> Vec<Chunk> {
        let mut merged: Vec<Chunk> = Vec::with_capacity(chunks.len());

        for chunk in chunks {
            if let Some(prev) = merged.last_mut() {
                let combined = prev.token_count + chunk.token_count;
                if prev.token_count < self.config.min_tokens
                    && combined <= self.config.max_tokens
                    && prev.structural_path == chunk.structural_path
                {
                    prev.text.push_str("\n\n");
                    prev.text.push_str(&chunk.text);
                    prev.char_end = chunk.char_end;
                    prev.token_count = combined;
                    continue;
                }
            }
            merged.push(chunk);
        }

        merged
    }

    /// Number chunks within each structural-path group, in document order
    ///
    /// Mutates in place and never reorders the list.
    fn assign_indices(chunks: &mut [Chunk]) {
        let mut counts: HashMap<String, usize> = HashMap::new();

        for chunk in chunks.iter_mut() {
            let count = counts.entry(chunk.structural_path.clone()).or_insert(0);
            chunk.chunk_index = *count;
            *count += 1;
        }

        for chunk in chunks.iter_mut() {
            if let Some(total) = counts.get(&chunk.structural_path) {
                chunk.total_chunks_in_group = *total;
            }
        }
    }
}

/// Append a section title to a breadcrumb path
fn join_path(parent: &str, title: &str) -> String {
    if parent.is_empty() {
        title.to_string()
    } else {
        format!("{parent}{PATH_SEPARATOR}{title}")
    }
}

/// Clamp a cursor into the text and bump it onto a char boundary
fn advance_to_boundary(text: &str, cursor: usize) -> usize {
    let mut cursor = cursor.min(text.len());
    while !text.is_char_boundary(cursor) {
        cursor += 1;
    }
    cursor
}

/// Statistics about chunking results
#[derive(Debug, Clone)]
pub struct ChunkingStats {
    pub total_chunks: usize,
    pub total_tokens: usize,
    pub avg_tokens_per_chunk: usize,
    pub min_tokens: usize,
    pub max_tokens: usize,
}

impl std::fmt::Display for ChunkingStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Chunks: {} | Tokens: {} | Avg: {} | Range: {}-{}",
            self.total_chunks,
            self.total_tokens,
            self.avg_tokens_per_chunk,
            self.min_tokens,
            self.max_tokens
        )
    }
}
