//! # Otzar Chunker
//!
//! Structure-aware chunking of Halachic texts for embedding and retrieval.
//!
//! ## Philosophy
//!
//! The chunker cuts a long, semi-structured text into bounded fragments
//! that:
//! - Preserve the document outline (perek, siman, seif, halacha, siman katan)
//! - Carry their position in that outline as a breadcrumb path
//! - Stay within a hard token ceiling while avoiding fragment dust
//!
//! ## Pipeline
//!
//! ```text
//! Raw text
//!     │
//!     ├──> Marker Scanner (line-anchored heading patterns)
//!     │
//!     ├──> Section Tree Builder (level stack → nested sections)
//!     │
//!     ├──> Chunk Assembler
//!     │    ├─> leaf section within bounds → one chunk
//!     │    ├─> oversized leaf → sliding window with overlap
//!     │    └─> no structure at all → paragraph fallback
//!     │
//!     └──> Post passes
//!          ├─> merge under-sized neighbors on the same path
//!          └─> assign per-path chunk indices
//! ```
//!
//! ## Example
//!
//! ```rust
//! use otzar_chunker::{Chunker, ChunkingConfig, Document};
//!
//! let chunker = Chunker::new(ChunkingConfig::default())?;
//!
//! let document = Document::new(
//!     "שולחן ערוך",
//!     "סימן א\nסעיף א\nיתגבר כארי לעמוד בבוקר לעבודת בוראו",
//! );
//!
//! for chunk in chunker.chunk(&document) {
//!     println!("{} [{} tokens]", chunk.structural_path, chunk.token_count);
//! }
//! # Ok::<(), otzar_chunker::ChunkerError>(())
//! ```

mod chunker;
mod config;
mod error;
mod structure;
mod types;
mod window;

pub use chunker::{Chunker, ChunkingStats};
pub use config::ChunkingConfig;
pub use error::{ChunkerError, Result};
pub use structure::SectionKind;
pub use types::{estimate_tokens, Chunk, Document};
