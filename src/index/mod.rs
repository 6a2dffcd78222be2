//! Index: owns one index's filter pipeline, in-memory dictionary, persistent term
//! store and document registry, and exposes `add_document`/`search`.
//!
//! Indexing sequences tokenize -> filter -> resolve -> stage unseen terms -> append +
//! assign IDs -> commit bitmap/counter updates, so that the persistent blob's term
//! order is a pure function of document content and add order.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use roaring::RoaringBitmap;
use serde::{Deserialize, Serialize};

use crate::config::IndexConfig;
use crate::dictionary::{Dictionary, DocId, TermId};
use crate::doc_registry::DocRegistry;
use crate::error::{Result, SearchError};
use crate::filter::{FilterRegistry, Pipeline};
use crate::store::TermStore;
use crate::tokenizer::{Tokenizer, WordTokenizer};

const POSTINGS_FILE: &str = "postings.bin";

#[derive(Serialize, Deserialize, Default)]
struct PostingsSnapshot {
    doc_registry: Vec<u8>,
    bitmaps: Vec<(TermId, Vec<u8>)>,
}

pub struct Index {
    dir: PathBuf,
    config: IndexConfig,
    pipeline: Mutex<Pipeline>,
    dictionary: Dictionary,
    store: Mutex<TermStore>,
    doc_registry: DocRegistry,
    tokenizer: Box<dyn Tokenizer>,
}

impl Index {
    pub fn open(dir: impl Into<PathBuf>, lang: &str, registry: Arc<FilterRegistry>) -> Result<Self> {
        let config = IndexConfig::new(lang);
        Self::open_inner(dir.into(), config, &registry)
    }

    pub fn open_with_pipeline(
        dir: impl Into<PathBuf>,
        lang: &str,
        pipeline_names: Vec<String>,
        registry: Arc<FilterRegistry>,
    ) -> Result<Self> {
        let config = IndexConfig::new(lang).with_pipeline(pipeline_names);
        Self::open_inner(dir.into(), config, &registry)
    }

    fn open_inner(dir: PathBuf, config: IndexConfig, registry: &FilterRegistry) -> Result<Self> {
        std::fs::create_dir_all(&dir)?;
        let names: Vec<&str> = config.pipeline.0.iter().map(String::as_str).collect();
        let pipeline = Pipeline::create(&config.lang, &names, registry)?;

        let store = TermStore::open(&dir)?;
        let loaded_terms = store.load_terms()?;
        let dictionary = Dictionary::new();
        for term in &loaded_terms {
            dictionary.load_term(&term.value, term.term_id, term.offset)?;
        }

        let doc_registry = Self::load_postings(&dir, &dictionary)?;

        log::debug!(
            "index opened at {} ({} terms, lang={})",
            dir.display(),
            loaded_terms.len(),
            config.lang
        );

        Ok(Index {
            dir,
            config,
            pipeline: Mutex::new(pipeline),
            dictionary,
            store: Mutex::new(store),
            doc_registry,
            tokenizer: Box::new(WordTokenizer::default()),
        })
    }

    fn load_postings(dir: &Path, dictionary: &Dictionary) -> Result<DocRegistry> {
        let path = dir.join(POSTINGS_FILE);
        if !path.exists() {
            return Ok(DocRegistry::new());
        }
        let bytes = std::fs::read(path)?;
        let snapshot: PostingsSnapshot = bincode::deserialize(&bytes)?;
        for (term_id, bitmap_bytes) in &snapshot.bitmaps {
            let bitmap = RoaringBitmap::deserialize_from(&bitmap_bytes[..])
                .map_err(|e| SearchError::Corrupt(format!("posting bitmap for term {term_id}: {e}")))?;
            for doc_id in bitmap.iter() {
                dictionary.add_doc_by_id(*term_id, doc_id as DocId)?;
            }
        }
        DocRegistry::load(&snapshot.doc_registry)
    }

    /// Persists the posting-list bitmaps and document registry to `postings.bin`.
    /// Does not touch the term store, which is already durable via its own mmap.
    pub fn flush(&self) -> Result<()> {
        let bitmaps = self
            .dictionary
            .snapshot_bitmaps()
            .into_iter()
            .map(|(term_id, bitmap)| {
                let mut buf = Vec::new();
                bitmap.serialize_into(&mut buf).map_err(|e| {
                    SearchError::Io(std::io::Error::new(std::io::ErrorKind::Other, e))
                })?;
                Ok((term_id, buf))
            })
            .collect::<Result<Vec<_>>>()?;

        let snapshot = PostingsSnapshot {
            doc_registry: self.doc_registry.save()?,
            bitmaps,
        };
        let bytes = bincode::serialize(&snapshot)?;

        let tmp_path = self.dir.join(format!("{POSTINGS_FILE}.tmp"));
        std::fs::write(&tmp_path, bytes)?;
        std::fs::rename(&tmp_path, self.dir.join(POSTINGS_FILE))?;
        log::debug!("index {} flushed ({} terms)", self.dir.display(), snapshot.bitmaps.len());
        Ok(())
    }

    /// Flushes and releases the term store's memory mapping.
    pub fn close(self) -> Result<()> {
        self.flush()?;
        self.store.into_inner().close()
    }

    /// Adds a document: tokenize, filter, resolve, stage+append unseen terms, then
    /// commit the bitmap/counter updates.
    pub fn add_document(&self, doc_id: DocId, text: &str) -> Result<()> {
        self.doc_registry.register(doc_id, 0)?;

        let mut stream = self.tokenizer.tokenize(text);
        if let Err(e) = stream.apply_pipeline(&mut self.pipeline.lock()) {
            self.doc_registry.unregister(doc_id);
            return Err(e);
        }

        stream.resolve_with(true, |text| self.dictionary.lookup(text));

        let staged = stream.staging().count();
        if staged > self.config.staging_warn_threshold {
            log::warn!(
                "doc {doc_id} staged {staged} new terms, above the warn threshold of {}",
                self.config.staging_warn_threshold
            );
        }

        for token in stream.staging_mut() {
            if let Some(term_id) = self.dictionary.lookup(&token.text) {
                token.term_id = Some(term_id);
                continue;
            }
            let append_result = self.store.lock().append(&token.text);
            match append_result {
                Ok((term_id, offset)) => {
                    if let Err(e) = self.dictionary.insert_new_term(&token.text, term_id, offset) {
                        self.doc_registry.unregister(doc_id);
                        return Err(e);
                    }
                    token.term_id = Some(term_id);
                }
                Err(e) => {
                    self.doc_registry.unregister(doc_id);
                    return Err(e);
                }
            }
        }

        let mut term_count = 0u32;
        for (_, term_id) in stream.resolved() {
            self.dictionary.add_doc_by_id(term_id, doc_id)?;
            if let Some(offset) = self.dictionary.offset_of(term_id) {
                self.store.lock().incr_counter(offset, 1);
            }
            term_count += 1;
        }
        self.doc_registry.set_term_count(doc_id, term_count);

        log::debug!("indexed doc {doc_id} ({term_count} resolved terms)");
        Ok(())
    }

    /// Tokenizes and filters `text` with this index's pipeline, intersects the
    /// resolved terms' posting lists, and scores candidates by tf·idf.
    pub fn search(&self, text: &str) -> Result<Vec<(DocId, f32)>> {
        let mut stream = self.tokenizer.tokenize(text);
        stream.apply_pipeline(&mut self.pipeline.lock())?;
        stream.resolve_with(false, |text| self.dictionary.lookup(text));

        let term_ids: HashSet<TermId> = stream.resolved().map(|(_, id)| id).collect();
        if term_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut candidates: Option<RoaringBitmap> = None;
        for &term_id in &term_ids {
            let bitmap = self
                .dictionary
                .bitmap_clone(term_id)
                .ok_or(SearchError::UnknownTerm(term_id))?;
            candidates = Some(match candidates {
                Some(acc) => acc & bitmap,
                None => bitmap,
            });
        }
        let candidates = candidates.unwrap_or_default();

        let live = self.doc_registry.live_count();
        if live == 0 {
            return Ok(Vec::new());
        }
        let n = live as f32;

        let idf: Vec<(TermId, f32)> = term_ids
            .iter()
            .map(|&term_id| {
                let df = self.dictionary.doc_freq(term_id).max(1) as f32;
                (term_id, (n / df).ln())
            })
            .collect();

        let mut results: Vec<(DocId, f32)> = candidates
            .iter()
            .map(|doc_id| {
                let score: f32 = idf.iter().map(|(_, weight)| weight).sum();
                (doc_id as DocId, score)
            })
            .collect();

        results.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });

        log::debug!("query {:?} -> {} hits", text, results.len());
        Ok(results)
    }

    pub fn lang(&self) -> &str {
        &self.config.lang
    }

    pub fn term_count(&self) -> u64 {
        self.dictionary.len() as u64
    }

    pub fn doc_count(&self) -> u64 {
        self.doc_registry.live_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{FilterFactory, Normalizer, Stemmer, StopWordDictionary, StopWords};

    fn test_registry() -> Arc<FilterRegistry> {
        let registry = Arc::new(FilterRegistry::new(16));
        let stopwords = Arc::new(StopWordDictionary::empty());
        registry
            .register(
                "normalizer",
                Arc::new(|lang: &str| Ok(Box::new(Normalizer::create(lang)) as Box<dyn crate::filter::Filter>))
                    as Arc<dyn FilterFactory>,
            )
            .unwrap();
        registry
            .register("stopwords", {
                let stopwords = Arc::clone(&stopwords);
                Arc::new(move |lang: &str| {
                    Ok(Box::new(StopWords::create(stopwords.for_lang(lang))) as Box<dyn crate::filter::Filter>)
                }) as Arc<dyn FilterFactory>
            })
            .unwrap();
        registry
            .register(
                "stemmer",
                Arc::new(|lang: &str| {
                    Stemmer::create(lang).map(|s| Box::new(s) as Box<dyn crate::filter::Filter>)
                }) as Arc<dyn FilterFactory>,
            )
            .unwrap();
        registry
    }

    #[test]
    fn fox_and_dog_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let registry = test_registry();
        let idx = Index::open(dir.path(), "en", registry).unwrap();

        idx.add_document(1, "The quick brown fox jumped over the lazy dog").unwrap();
        idx.add_document(2, "Once upon a time there were three little foxes").unwrap();

        let dog_hits: Vec<DocId> = idx.search("dog").unwrap().into_iter().map(|(id, _)| id).collect();
        assert_eq!(dog_hits, vec![1]);

        let mut fox_hits: Vec<DocId> = idx.search("fox").unwrap().into_iter().map(|(id, _)| id).collect();
        fox_hits.sort();
        assert_eq!(fox_hits, vec![1, 2]);
    }

    #[test]
    fn pure_stopword_query_is_empty_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let registry = test_registry();
        let idx = Index::open(dir.path(), "en", registry).unwrap();
        idx.add_document(1, "the dog ran").unwrap();
        assert!(idx.search("the").unwrap().is_empty());
    }

    #[test]
    fn case_insensitive_query() {
        let dir = tempfile::tempdir().unwrap();
        let registry = test_registry();
        let idx = Index::open(dir.path(), "en", registry).unwrap();
        idx.add_document(1, "a quick Dog").unwrap();
        assert_eq!(idx.search("Dog").unwrap().into_iter().map(|(id, _)| id).collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn duplicate_doc_id_rejected_and_state_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let registry = test_registry();
        let idx = Index::open(dir.path(), "en", registry).unwrap();
        idx.add_document(1, "a fox").unwrap();
        let err = idx.add_document(1, "a different fox").unwrap_err();
        assert!(matches!(err, SearchError::DuplicateDoc(1)));
        assert_eq!(idx.search("different").unwrap(), Vec::new());
    }

    #[test]
    fn empty_text_registers_doc_with_no_terms() {
        let dir = tempfile::tempdir().unwrap();
        let registry = test_registry();
        let idx = Index::open(dir.path(), "en", registry).unwrap();
        idx.add_document(1, "").unwrap();
        assert_eq!(idx.doc_count(), 1);
        assert_eq!(idx.term_count(), 0);
    }

    #[test]
    fn reopen_after_close_preserves_dictionary_and_postings() {
        let dir = tempfile::tempdir().unwrap();
        {
            let registry = test_registry();
            let idx = Index::open(dir.path(), "en", registry).unwrap();
            idx.add_document(1, "The quick brown fox jumped over the lazy dog").unwrap();
            idx.add_document(2, "Once upon a time there were three little foxes").unwrap();
            idx.close().unwrap();
        }
        let registry = test_registry();
        let idx = Index::open(dir.path(), "en", registry).unwrap();
        let mut fox_hits: Vec<DocId> = idx.search("fox").unwrap().into_iter().map(|(id, _)| id).collect();
        fox_hits.sort();
        assert_eq!(fox_hits, vec![1, 2]);
    }
}
