use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{Result, SearchError};

use super::Filter;

/// Constructs a filter bound to a language tag. Built-in filters and caller-supplied
/// ones implement this the same way; the registry only ever sees the trait object.
pub trait FilterFactory: Send + Sync {
    fn create(&self, lang: &str) -> Result<Box<dyn Filter>>;
}

impl<F> FilterFactory for F
where
    F: Fn(&str) -> Result<Box<dyn Filter>> + Send + Sync,
{
    fn create(&self, lang: &str) -> Result<Box<dyn Filter>> {
        self(lang)
    }
}

struct Inner {
    factories: HashMap<String, Arc<dyn FilterFactory>>,
    capacity: usize,
}

/// Process-wide (engine-scoped) mapping from filter name to constructor. Append-only:
/// there is no unregister, matching the fixed-size table this registry generalizes.
pub struct FilterRegistry {
    inner: RwLock<Inner>,
}

impl FilterRegistry {
    pub fn new(capacity: usize) -> Self {
        FilterRegistry {
            inner: RwLock::new(Inner {
                factories: HashMap::new(),
                capacity,
            }),
        }
    }

    pub fn register(
        &self,
        name: impl Into<String>,
        factory: Arc<dyn FilterFactory>,
    ) -> Result<()> {
        let name = name.into();
        let mut inner = self.inner.write();
        if inner.factories.len() >= inner.capacity {
            return Err(SearchError::Capacity(format!(
                "filter registry full ({} entries)",
                inner.capacity
            )));
        }
        if inner.factories.contains_key(&name) {
            return Err(SearchError::Exists(name));
        }
        inner.factories.insert(name, factory);
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<Arc<dyn FilterFactory>> {
        self.inner.read().factories.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterAction;

    struct NoopFilter;
    impl Filter for NoopFilter {
        fn apply(&mut self, _buf: &mut String) -> FilterAction {
            FilterAction::Mutation
        }
    }

    fn noop_factory() -> Arc<dyn FilterFactory> {
        Arc::new(|_lang: &str| -> Result<Box<dyn Filter>> { Ok(Box::new(NoopFilter)) })
    }

    #[test]
    fn register_and_lookup() {
        let reg = FilterRegistry::new(4);
        reg.register("noop", noop_factory()).unwrap();
        assert!(reg.lookup("noop").is_some());
        assert!(reg.lookup("missing").is_none());
    }

    #[test]
    fn duplicate_name_rejected() {
        let reg = FilterRegistry::new(4);
        reg.register("noop", noop_factory()).unwrap();
        let err = reg.register("noop", noop_factory()).unwrap_err();
        assert!(matches!(err, SearchError::Exists(_)));
    }

    #[test]
    fn capacity_enforced() {
        let reg = FilterRegistry::new(1);
        reg.register("a", noop_factory()).unwrap();
        let err = reg.register("b", noop_factory()).unwrap_err();
        assert!(matches!(err, SearchError::Capacity(_)));
    }
}
