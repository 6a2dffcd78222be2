//! End-to-end indexing/search scenarios against the public `Engine`/`Index` surface.
//!
//! The two-document "fox"/"dog" corpus is the same one the codebase this design is
//! adapted from uses for its own indexing smoke test.

use nanofts::{Engine, SearchError};

fn doc_ids(hits: Vec<(u64, f32)>) -> Vec<u64> {
    hits.into_iter().map(|(id, _)| id).collect()
}

#[test]
fn fox_and_dog_corpus() {
    let dir = tempfile::tempdir().unwrap();
    let engine = Engine::open(dir.path()).unwrap();
    let idx = engine.open_index("articles", "en").unwrap();

    idx.add_document(1, "The quick brown fox jumped over the lazy dog").unwrap();
    idx.add_document(2, "Once upon a time there were three little foxes").unwrap();

    assert_eq!(doc_ids(idx.search("dog").unwrap()), vec![1]);

    let mut fox_hits = doc_ids(idx.search("fox").unwrap());
    fox_hits.sort();
    assert_eq!(fox_hits, vec![1, 2]);

    // Pure stop-word query: empty result, not an error.
    assert!(idx.search("the").unwrap().is_empty());

    // Case-folded by the normalizer.
    assert_eq!(doc_ids(idx.search("Dog").unwrap()), vec![1]);
}

#[test]
fn reopen_after_close_preserves_index_state() {
    let dir = tempfile::tempdir().unwrap();
    {
        let engine = Engine::open(dir.path()).unwrap();
        let idx = engine.open_index("articles", "en").unwrap();
        idx.add_document(1, "The quick brown fox jumped over the lazy dog").unwrap();
        idx.add_document(2, "Once upon a time there were three little foxes").unwrap();
        idx.close().unwrap();
    }

    let engine = Engine::open(dir.path()).unwrap();
    let idx = engine.open_index("articles", "en").unwrap();
    let mut fox_hits = doc_ids(idx.search("fox").unwrap());
    fox_hits.sort();
    assert_eq!(fox_hits, vec![1, 2]);
    assert_eq!(doc_ids(idx.search("dog").unwrap()), vec![1]);
}

#[test]
fn registering_a_builtin_filter_name_twice_fails_but_leaves_pipelines_working() {
    let dir = tempfile::tempdir().unwrap();
    let engine = Engine::open(dir.path()).unwrap();

    let idx = engine.open_index("articles", "en").unwrap();
    idx.add_document(1, "a quick fox").unwrap();
    assert_eq!(doc_ids(idx.search("fox").unwrap()), vec![1]);

    let err = engine
        .register_filter(
            "stemmer",
            std::sync::Arc::new(|lang: &str| {
                nanofts::filter::Stemmer::create(lang)
                    .map(|s| Box::new(s) as Box<dyn nanofts::filter::Filter>)
            }) as std::sync::Arc<dyn nanofts::filter::FilterFactory>,
        )
        .unwrap_err();
    assert!(matches!(err, SearchError::Exists(_)));

    // Existing pipeline is unaffected by the failed registration attempt.
    assert_eq!(doc_ids(idx.search("fox").unwrap()), vec![1]);
}

#[test]
fn duplicate_doc_id_leaves_index_state_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let engine = Engine::open(dir.path()).unwrap();
    let idx = engine.open_index("articles", "en").unwrap();

    idx.add_document(1, "The quick brown fox jumped over the lazy dog").unwrap();
    let err = idx.add_document(1, "a completely different document").unwrap_err();
    assert!(matches!(err, SearchError::DuplicateDoc(1)));

    // The second, failed add never touched the dictionary or postings.
    assert!(idx.search("completely").unwrap().is_empty());
    assert_eq!(doc_ids(idx.search("dog").unwrap()), vec![1]);
}
