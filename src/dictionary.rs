//! In-memory term dictionary: `term_map` (value -> term), `td_map` (id -> term) and an
//! insertion-ordered `term_list`, plus the per-term posting-list bitmap.

use ahash::AHashMap;
use parking_lot::RwLock;
use roaring::RoaringBitmap;

use crate::error::{Result, SearchError};

pub type TermId = u32;
pub type DocId = u64;

/// One term: its canonical value, assigned ID, offset into the persistent counter
/// array, and the set of documents it occurs in.
pub struct Term {
    pub value: String,
    pub id: TermId,
    pub offset: u64,
    pub bitmap: RoaringBitmap,
}

struct Inner {
    term_list: Vec<Term>,
    term_map: AHashMap<String, usize>,
    td_map: AHashMap<TermId, usize>,
}

/// `term_map`/`td_map`/`term_list` triad, guarded by a single reader-writer lock: the
/// writer role (indexing) takes the write guard, the reader role (search) the read
/// guard. There is no finer-grained per-term locking.
pub struct Dictionary {
    inner: RwLock<Inner>,
}

impl Dictionary {
    pub fn new() -> Self {
        Dictionary {
            inner: RwLock::new(Inner {
                term_list: Vec::new(),
                term_map: AHashMap::new(),
                td_map: AHashMap::new(),
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.read().term_list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Looks up a term by value, returning its ID if resolved.
    pub fn lookup(&self, value: &str) -> Option<TermId> {
        let inner = self.inner.read();
        inner
            .term_map
            .get(value)
            .map(|&idx| inner.term_list[idx].id)
    }

    /// Creates a new term and assigns it `term_id` in a single step. Used by the
    /// indexing protocol immediately after the persistent store hands out a fresh ID
    /// and offset for a previously-unseen value.
    ///
    /// The original design splits this into `idxterm_create` (value -> unassigned
    /// term) followed by `idxterm_assign` (term -> id); both always happen together
    /// here (the store only ever allocates an ID alongside the append), so they are
    /// combined under one write-lock acquisition.
    pub fn insert_new_term(&self, value: &str, term_id: TermId, offset: u64) -> Result<()> {
        let mut inner = self.inner.write();
        if inner.term_map.contains_key(value) {
            return Err(SearchError::Duplicate(value.to_string()));
        }
        if inner.td_map.contains_key(&term_id) {
            return Err(SearchError::Duplicate(format!("term id {term_id}")));
        }
        let idx = inner.term_list.len();
        inner.term_list.push(Term {
            value: value.to_string(),
            id: term_id,
            offset,
            bitmap: RoaringBitmap::new(),
        });
        inner.term_map.insert(value.to_string(), idx);
        inner.td_map.insert(term_id, idx);
        Ok(())
    }

    /// Replays a term reconstructed from the persistent store at open time; `term_id`
    /// must not already be present.
    pub fn load_term(&self, value: &str, term_id: TermId, offset: u64) -> Result<()> {
        self.insert_new_term(value, term_id, offset)
    }

    pub fn add_doc_by_id(&self, term_id: TermId, doc_id: DocId) -> Result<()> {
        let mut inner = self.inner.write();
        let idx = *inner
            .td_map
            .get(&term_id)
            .ok_or(SearchError::UnknownTerm(term_id))?;
        inner.term_list[idx].bitmap.insert(doc_id as u32);
        Ok(())
    }

    pub fn remove_doc_by_id(&self, term_id: TermId, doc_id: DocId) -> Result<()> {
        let mut inner = self.inner.write();
        let idx = *inner
            .td_map
            .get(&term_id)
            .ok_or(SearchError::UnknownTerm(term_id))?;
        inner.term_list[idx].bitmap.remove(doc_id as u32);
        Ok(())
    }

    /// Document frequency: the number of documents containing this term.
    pub fn doc_freq(&self, term_id: TermId) -> u64 {
        let inner = self.inner.read();
        inner
            .td_map
            .get(&term_id)
            .map(|&idx| inner.term_list[idx].bitmap.len())
            .unwrap_or(0)
    }

    pub fn bitmap_clone(&self, term_id: TermId) -> Option<RoaringBitmap> {
        let inner = self.inner.read();
        inner
            .td_map
            .get(&term_id)
            .map(|&idx| inner.term_list[idx].bitmap.clone())
    }

    pub fn offset_of(&self, term_id: TermId) -> Option<u64> {
        let inner = self.inner.read();
        inner.td_map.get(&term_id).map(|&idx| inner.term_list[idx].offset)
    }

    /// Snapshots every term's ID and posting-list bitmap, for persistence. Order
    /// matches `term_list` (insertion order).
    pub fn snapshot_bitmaps(&self) -> Vec<(TermId, RoaringBitmap)> {
        let inner = self.inner.read();
        inner
            .term_list
            .iter()
            .map(|t| (t.id, t.bitmap.clone()))
            .collect()
    }
}

impl Default for Dictionary {
    fn default() -> Self {
        Self::new()
    }
}
