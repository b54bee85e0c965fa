use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::structure::SectionKind;

/// Estimate token count for a text string
///
/// Word-splitting proxy: whitespace-delimited word count. For Hebrew text
/// this is roughly one token per word. It is not a subword tokenizer count;
/// emission and any downstream re-validation must use the same
/// approximation.
#[must_use]
pub fn estimate_tokens(text: &str) -> usize {
    text.split_whitespace().count()
}

/// A decoded source document handed to the chunker
///
/// Produced by an upstream loader. The metadata strings are opaque to the
/// chunker and pass through to chunk metadata untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Caller-supplied identifier; a UUID is generated per run when absent
    pub id: Option<String>,

    /// Document title
    pub title: String,

    /// Document author
    pub author: String,

    /// Language tag ("he", "arc", "en", "mixed")
    pub language: String,

    /// Full decoded text
    pub text: String,
}

impl Document {
    /// Create a document with title and text; other metadata defaults
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            author: String::new(),
            language: "he".to_string(),
            text: text.into(),
        }
    }

    /// Builder: set a caller-supplied identifier
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Builder: set author
    #[must_use]
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    /// Builder: set language tag
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }
}

/// A single chunk of text cut from a source document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Unique chunk identifier
    pub id: Uuid,

    /// The chunk text content
    pub text: String,

    /// Identifier of the source document
    pub document_id: String,

    /// Title of the source document
    pub document_title: String,

    /// Author of the source document
    pub document_author: String,

    /// Breadcrumb of ancestor section titles, joined by " > "
    pub structural_path: String,

    /// Kind of the structural unit this chunk was cut from
    pub structural_kind: SectionKind,

    /// Language tag, passed through from the document
    pub language: String,

    /// Byte offset of the chunk start in the document text
    pub char_start: usize,

    /// Byte offset of the chunk end in the document text
    ///
    /// Offsets from the sliding-window path are proportional estimates and
    /// may not land on UTF-8 boundaries; they are citation context, never
    /// used to slice the document.
    pub char_end: usize,

    /// Whitespace-word token count of `text` at emission time
    pub token_count: usize,

    /// 0-based position among chunks sharing this structural path
    pub chunk_index: usize,

    /// Number of chunks sharing this structural path
    pub total_chunks_in_group: usize,
}

/// Document metadata stamped onto every chunk of a single run
#[derive(Debug, Clone)]
pub(crate) struct DocContext {
    pub document_id: String,
    pub document_title: String,
    pub document_author: String,
    pub language: String,
}

impl DocContext {
    pub(crate) fn for_document(document: &Document) -> Self {
        Self {
            document_id: document
                .id
                .clone()
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            document_title: document.title.clone(),
            document_author: document.author.clone(),
            language: document.language.clone(),
        }
    }
}

impl Chunk {
    /// Build a chunk for one unit of text; group indices are assigned later
    pub(crate) fn part(
        doc: &DocContext,
        text: String,
        structural_path: &str,
        structural_kind: SectionKind,
        char_start: usize,
        char_end: usize,
        token_count: usize,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            text,
            document_id: doc.document_id.clone(),
            document_title: doc.document_title.clone(),
            document_author: doc.document_author.clone(),
            structural_path: structural_path.to_string(),
            structural_kind,
            language: doc.language.clone(),
            char_start,
            char_end,
            token_count,
            chunk_index: 0,
            total_chunks_in_group: 1,
        }
    }
}
