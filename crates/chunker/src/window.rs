use crate::config::ChunkingConfig;
use crate::structure::SectionKind;
use crate::types::{Chunk, DocContext};

/// Token-windowed splitter for text that exceeds the hard chunk ceiling
pub(crate) struct WindowSplitter<'a> {
    config: &'a ChunkingConfig,
}

impl<'a> WindowSplitter<'a> {
    pub(crate) fn new(config: &'a ChunkingConfig) -> Self {
        Self { config }
    }

    /// Split `text` into overlapping windows of up to `target_tokens` words
    ///
    /// The window start advances by `target_tokens - overlap_tokens` words
    /// (at least one), so consecutive windows share `overlap_tokens` words
    /// and the loop always terminates. A blob that already fits under
    /// `max_tokens` words is emitted as a single chunk.
    ///
    /// Character offsets per window are estimated proportionally from word
    /// positions: `base_offset + word_index / word_count * text_len`. This
    /// keeps them cheap and monotonic but approximate; downstream consumers
    /// use them as citation context, not exact byte addressing.
    pub(crate) fn split(
        &self,
        text: &str,
        base_offset: usize,
        structural_path: &str,
        structural_kind: SectionKind,
        doc: &DocContext,
    ) -> Vec<Chunk> {
        let words: Vec<&str> = text.split_whitespace().collect();
        if words.is_empty() {
            return Vec::new();
        }

        if words.len() <= self.config.max_tokens {
            return vec![Chunk::part(
                doc,
                text.trim().to_string(),
                structural_path,
                structural_kind,
                base_offset,
                base_offset + text.len(),
                words.len(),
            )];
        }

        let target = self.config.target_tokens;
        let step = target.saturating_sub(self.config.overlap_tokens).max(1);
        let mut chunks = Vec::new();
        let mut pos = 0;

        loop {
            let end = (pos + target).min(words.len());

            let char_start = base_offset + pos * text.len() / words.len();
            let char_end = base_offset + end * text.len() / words.len();

            chunks.push(Chunk::part(
                doc,
                words[pos..end].join(" "),
                structural_path,
                structural_kind,
                char_start,
                char_end,
                end - pos,
            ));

            if end >= words.len() {
                break;
            }
            pos += step;
        }

        chunks
    }
}
