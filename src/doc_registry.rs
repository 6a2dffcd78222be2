//! Minimal per-index document registry: tracks which document IDs have been indexed,
//! so `add_document` can reject a repeated ID without touching posting-list bitmaps.

use std::collections::HashMap;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::dictionary::DocId;
use crate::error::{Result, SearchError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocMeta {
    pub term_count: u32,
}

#[derive(Default, Serialize, Deserialize)]
struct Snapshot {
    docs: HashMap<DocId, DocMeta>,
}

pub struct DocRegistry {
    inner: RwLock<HashMap<DocId, DocMeta>>,
}

impl DocRegistry {
    pub fn new() -> Self {
        DocRegistry {
            inner: RwLock::new(HashMap::new()),
        }
    }

    pub fn register(&self, doc_id: DocId, term_count: u32) -> Result<()> {
        let mut inner = self.inner.write();
        if inner.contains_key(&doc_id) {
            return Err(SearchError::DuplicateDoc(doc_id));
        }
        inner.insert(doc_id, DocMeta { term_count });
        Ok(())
    }

    pub fn unregister(&self, doc_id: DocId) {
        self.inner.write().remove(&doc_id);
    }

    /// Updates the token count recorded for an already-registered document.
    pub fn set_term_count(&self, doc_id: DocId, term_count: u32) {
        if let Some(meta) = self.inner.write().get_mut(&doc_id) {
            meta.term_count = term_count;
        }
    }

    pub fn live_count(&self) -> u64 {
        self.inner.read().len() as u64
    }

    pub fn save(&self) -> Result<Vec<u8>> {
        let docs = self.inner.read().clone();
        Ok(bincode::serialize(&Snapshot { docs })?)
    }

    pub fn load(bytes: &[u8]) -> Result<Self> {
        let snapshot: Snapshot = bincode::deserialize(bytes)?;
        Ok(DocRegistry {
            inner: RwLock::new(snapshot.docs),
        })
    }
}

impl Default for DocRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_add_rejected() {
        let reg = DocRegistry::new();
        reg.register(1, 5).unwrap();
        let err = reg.register(1, 5).unwrap_err();
        assert!(matches!(err, SearchError::DuplicateDoc(1)));
    }

    #[test]
    fn unregister_allows_re_adding_the_same_id() {
        let reg = DocRegistry::new();
        reg.register(1, 5).unwrap();
        reg.unregister(1);
        reg.register(1, 7).unwrap();
        assert_eq!(reg.live_count(), 1);
    }

    #[test]
    fn roundtrip_snapshot() {
        let reg = DocRegistry::new();
        reg.register(1, 3).unwrap();
        reg.register(2, 4).unwrap();
        let bytes = reg.save().unwrap();
        let reloaded = DocRegistry::load(&bytes).unwrap();
        assert_eq!(reloaded.live_count(), 2);
    }
}
