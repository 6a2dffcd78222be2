//! Engine and index configuration.

use serde::{Deserialize, Serialize};

/// Names of the filters making up a pipeline, applied in order.
///
/// The standard English pipeline is `["normalizer", "stopwords", "stemmer"]`; callers
/// that registered their own filters may substitute a different list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig(pub Vec<String>);

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig(vec![
            "normalizer".to_string(),
            "stopwords".to_string(),
            "stemmer".to_string(),
        ])
    }
}

/// Per-index configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Two-letter language tag, e.g. `"en"`. Selects the stop-word set and stemmer.
    pub lang: String,

    /// Filter names making up this index's pipeline.
    pub pipeline: PipelineConfig,

    /// If a single `add_document` call stages more than this many distinct new terms,
    /// a warning is logged once for that call (the add still proceeds normally).
    pub staging_warn_threshold: usize,
}

impl IndexConfig {
    pub fn new(lang: impl Into<String>) -> Self {
        IndexConfig {
            lang: lang.into(),
            pipeline: PipelineConfig::default(),
            staging_warn_threshold: 10_000,
        }
    }

    pub fn with_pipeline(mut self, names: Vec<String>) -> Self {
        self.pipeline = PipelineConfig(names);
        self
    }
}

/// Engine-wide configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Base directory holding `filters/stopwords/<lang>` and one subdirectory per index.
    pub basedir: std::path::PathBuf,

    /// Registry capacity: the maximum number of distinct filter names the engine accepts.
    /// Matches the fixed-size filter table of the design this engine is modeled on.
    pub filter_capacity: usize,
}

impl EngineConfig {
    pub fn new(basedir: impl Into<std::path::PathBuf>) -> Self {
        EngineConfig {
            basedir: basedir.into(),
            filter_capacity: 64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_pipeline_is_normalizer_stopwords_stemmer() {
        let cfg = IndexConfig::new("en");
        assert_eq!(
            cfg.pipeline.0,
            vec!["normalizer".to_string(), "stopwords".to_string(), "stemmer".to_string()]
        );
    }

    #[test]
    fn custom_pipeline_overrides_default() {
        let cfg = IndexConfig::new("en").with_pipeline(vec!["normalizer".to_string()]);
        assert_eq!(cfg.pipeline.0, vec!["normalizer".to_string()]);
    }
}
