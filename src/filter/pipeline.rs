use crate::error::{Result, SearchError};

use super::{Filter, FilterAction, FilterRegistry};

/// An immutable, ordered, language-bound chain of filters.
///
/// Construction either fully succeeds or fails outright: there is no way to observe a
/// partially built pipeline, because the `Vec` of already-constructed filters is simply
/// dropped when `create` returns `Err`.
pub struct Pipeline {
    lang: String,
    filters: Vec<Box<dyn Filter>>,
}

impl Pipeline {
    pub fn create(lang: &str, names: &[&str], registry: &FilterRegistry) -> Result<Self> {
        let mut filters = Vec::with_capacity(names.len());
        for name in names {
            let factory = registry
                .lookup(name)
                .ok_or_else(|| SearchError::UnknownFilter((*name).to_string()))?;
            let filter = factory
                .create(lang)
                .map_err(|e| SearchError::FilterInit(format!("{name}: {e}")))?;
            filters.push(filter);
        }
        Ok(Pipeline {
            lang: lang.to_string(),
            filters,
        })
    }

    pub fn lang(&self) -> &str {
        &self.lang
    }

    /// Runs every filter over `buf` in order, short-circuiting on the first
    /// non-`Mutation` action.
    pub fn run(&mut self, buf: &mut String) -> FilterAction {
        for filter in self.filters.iter_mut() {
            let action = filter.apply(buf);
            if action != FilterAction::Mutation {
                return action;
            }
        }
        FilterAction::Mutation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    struct UpperFilter;
    impl Filter for UpperFilter {
        fn apply(&mut self, buf: &mut String) -> FilterAction {
            *buf = buf.to_uppercase();
            FilterAction::Mutation
        }
    }

    struct DropFilter;
    impl Filter for DropFilter {
        fn apply(&mut self, _buf: &mut String) -> FilterAction {
            FilterAction::Drop
        }
    }

    fn registry_with(name: &str, make: impl Fn() -> Box<dyn Filter> + Send + Sync + 'static) -> FilterRegistry {
        let reg = FilterRegistry::new(8);
        reg.register(
            name,
            Arc::new(move |_lang: &str| Ok(make())) as Arc<dyn crate::filter::FilterFactory>,
        )
        .unwrap();
        reg
    }

    #[test]
    fn empty_pipeline_is_identity() {
        let reg = FilterRegistry::new(8);
        let mut pipeline = Pipeline::create("en", &[], &reg).unwrap();
        let mut buf = "hello".to_string();
        assert_eq!(pipeline.run(&mut buf), FilterAction::Mutation);
        assert_eq!(buf, "hello");
    }

    #[test]
    fn short_circuits_on_drop() {
        let reg = registry_with("drop", || Box::new(DropFilter));
        let mut pipeline = Pipeline::create("en", &["drop"], &reg).unwrap();
        let mut buf = "hello".to_string();
        assert_eq!(pipeline.run(&mut buf), FilterAction::Drop);
    }

    #[test]
    fn runs_filters_in_order() {
        let reg = registry_with("upper", || Box::new(UpperFilter));
        let mut pipeline = Pipeline::create("en", &["upper"], &reg).unwrap();
        let mut buf = "hello".to_string();
        pipeline.run(&mut buf);
        assert_eq!(buf, "HELLO");
    }

    #[test]
    fn unknown_filter_name_fails() {
        let reg = FilterRegistry::new(8);
        let err = Pipeline::create("en", &["nope"], &reg).unwrap_err();
        assert!(matches!(err, SearchError::UnknownFilter(_)));
    }
}
