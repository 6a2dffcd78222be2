//! Engine handle: owns the process-scoped state shared by every index opened under one
//! base directory — the filter registry and the stop-word dictionary — plus the
//! built-in filter factories every engine registers at open time.
//!
//! This state is owned by the handle rather than kept as a process global, so multiple
//! engines can coexist in one process; the stop-word dictionary is loaded once at open
//! time and shared immutably with every index opened underneath.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::EngineConfig;
use crate::error::Result;
use crate::filter::{FilterFactory, FilterRegistry, Normalizer, Stemmer, StopWordDictionary, StopWords};
use crate::index::Index;

/// Owns the filter registry and the stop-word dictionary shared by every [`Index`]
/// opened under this engine. Multiple `Engine`s may coexist in one process; none of
/// this state is global.
pub struct Engine {
    config: EngineConfig,
    registry: Arc<FilterRegistry>,
    stopwords: Arc<StopWordDictionary>,
}

impl Engine {
    /// Opens (creating if necessary) an engine rooted at `basedir`, loading the
    /// stop-word dictionary from `<basedir>/filters/stopwords/<lang>` and registering
    /// the three built-in filters.
    pub fn open(basedir: impl Into<PathBuf>) -> Result<Self> {
        let config = EngineConfig::new(basedir);
        Self::open_with_config(config)
    }

    pub fn open_with_config(config: EngineConfig) -> Result<Self> {
        std::fs::create_dir_all(&config.basedir)?;
        let stopwords = Arc::new(StopWordDictionary::load(&config.basedir)?);
        let registry = Arc::new(FilterRegistry::new(config.filter_capacity));
        register_builtin_filters(&registry, Arc::clone(&stopwords))?;
        log::debug!("engine opened at {}", config.basedir.display());
        Ok(Engine {
            config,
            registry,
            stopwords,
        })
    }

    pub fn basedir(&self) -> &Path {
        &self.config.basedir
    }

    /// Registers a caller-supplied filter factory under `name`. Fails with `Exists` if
    /// the name is already registered (including the three built-ins), or `Capacity`
    /// if the registry's fixed upper bound has been reached.
    pub fn register_filter(&self, name: impl Into<String>, factory: Arc<dyn FilterFactory>) -> Result<()> {
        self.registry.register(name, factory)
    }

    /// Opens (creating if necessary) an index named `name` under this engine's
    /// base directory, using `lang` to select the stop-word set and stemmer for the
    /// standard pipeline.
    pub fn open_index(&self, name: &str, lang: &str) -> Result<Index> {
        let dir = self.config.basedir.join(name);
        Index::open(dir, lang, Arc::clone(&self.registry))
    }

    /// Like [`Engine::open_index`] but with an explicit, non-default filter pipeline.
    pub fn open_index_with_pipeline(&self, name: &str, lang: &str, pipeline: Vec<String>) -> Result<Index> {
        let dir = self.config.basedir.join(name);
        Index::open_with_pipeline(dir, lang, pipeline, Arc::clone(&self.registry))
    }
}

fn register_builtin_filters(registry: &FilterRegistry, stopwords: Arc<StopWordDictionary>) -> Result<()> {
    registry.register(
        "normalizer",
        Arc::new(|lang: &str| Ok(Box::new(Normalizer::create(lang)) as Box<dyn crate::filter::Filter>))
            as Arc<dyn FilterFactory>,
    )?;
    registry.register("stopwords", {
        let stopwords = Arc::clone(&stopwords);
        Arc::new(move |lang: &str| {
            let set = stopwords.for_lang(lang);
            Ok(Box::new(StopWords::create(set)) as Box<dyn crate::filter::Filter>)
        }) as Arc<dyn FilterFactory>
    })?;
    registry.register(
        "stemmer",
        Arc::new(|lang: &str| {
            Stemmer::create(lang).map(|s| Box::new(s) as Box<dyn crate::filter::Filter>)
        }) as Arc<dyn FilterFactory>,
    )?;
    Ok(())
}
