//! nanofts — an embeddable full-text search engine.
//!
//! Given a stream of documents (an opaque `u64` ID plus a UTF-8 text blob), `nanofts`
//! builds a persistent inverted index and answers ranked keyword queries against it.
//! The engineering core is the indexing pipeline: raw text is tokenized, passed
//! through a language-tagged filter pipeline (normalization, stop-word removal,
//! stemming), resolved against an in-memory term dictionary, and committed to a
//! memory-mapped, append-only persistent term store shared by concurrent readers and
//! a single appending writer.
//!
//! ## Quick start
//!
//! ```no_run
//! use nanofts::Engine;
//!
//! let engine = Engine::open("/tmp/nanofts-demo")?;
//! let idx = engine.open_index("articles", "en")?;
//!
//! idx.add_document(1, "The quick brown fox jumped over the lazy dog")?;
//! idx.add_document(2, "Once upon a time there were three little foxes")?;
//!
//! let hits = idx.search("fox")?;
//! assert_eq!(hits.len(), 2);
//! # Ok::<(), nanofts::SearchError>(())
//! ```
//!
//! ## Layout
//!
//! - [`engine`] / [`index`]: the embedding surface — `Engine` owns the filter
//!   registry and stop-word dictionary shared by every `Index` opened under it;
//!   `Index` owns one index's pipeline, dictionary, term store and document registry.
//! - [`filter`]: the named filter registry, the immutable per-language pipeline, and
//!   the three built-in filters (normalizer, stop-words, stemmer).
//! - [`token`] / [`tokenizer`]: the mutable token stream consumed by the pipeline, and
//!   the concrete tokenizer that produces one from raw text.
//! - [`dictionary`]: the in-memory term dictionary (`term_map`/`td_map`/`term_list`)
//!   and each term's Roaring-bitmap posting list.
//! - [`store`]: the memory-mapped, append-only persistent term store.
//! - [`doc_registry`]: per-document bookkeeping (live/deleted, token count).
//! - [`config`]: typed engine/index configuration with documented defaults.

pub mod config;
pub mod dictionary;
pub mod doc_registry;
pub mod engine;
pub mod filter;
pub mod index;
pub mod storage;
pub mod store;
pub mod token;
pub mod tokenizer;

mod error;

pub use config::{EngineConfig, IndexConfig, PipelineConfig};
pub use dictionary::{DocId, TermId};
pub use engine::Engine;
pub use error::{Result, SearchError};
pub use index::Index;
