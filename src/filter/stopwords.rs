use std::collections::HashMap;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;

use ahash::AHashSet;

use crate::error::Result;

use super::{Filter, FilterAction};

/// Engine-wide, immutable-after-load stop-word sets, one per language.
///
/// Loaded once from `<basedir>/filters/stopwords/<lang>` (one word per line) at engine
/// open time. A language with no matching file simply has no entries; that is not an
/// error.
pub struct StopWordDictionary {
    by_lang: HashMap<String, Arc<AHashSet<String>>>,
}

impl StopWordDictionary {
    pub fn load(basedir: &Path) -> Result<Self> {
        let mut by_lang = HashMap::new();
        let dir = basedir.join("filters").join("stopwords");
        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(_) => return Ok(StopWordDictionary { by_lang }),
        };
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let lang = entry.file_name().to_string_lossy().into_owned();
            let words = Self::load_file(&entry.path())?;
            by_lang.insert(lang, Arc::new(words));
        }
        Ok(StopWordDictionary { by_lang })
    }

    fn load_file(path: &Path) -> Result<AHashSet<String>> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let mut words = AHashSet::default();
        for line in reader.lines() {
            let line = line?;
            if !line.is_empty() {
                words.insert(line);
            }
        }
        Ok(words)
    }

    /// A dictionary with no loaded languages, useful for tests and embedders that
    /// supply their own stop-word filter instead.
    pub fn empty() -> Self {
        StopWordDictionary {
            by_lang: HashMap::new(),
        }
    }

    pub fn for_lang(&self, lang: &str) -> Arc<AHashSet<String>> {
        self.by_lang
            .get(lang)
            .cloned()
            .unwrap_or_else(|| Arc::new(AHashSet::default()))
    }
}

/// Drops a token whose normalized bytes exactly match an entry in the shared set for
/// this pipeline's language; passes everything else through unchanged.
pub struct StopWords {
    words: Arc<AHashSet<String>>,
}

impl StopWords {
    pub fn create(words: Arc<AHashSet<String>>) -> Self {
        StopWords { words }
    }
}

impl Filter for StopWords {
    fn apply(&mut self, buf: &mut String) -> FilterAction {
        if self.words.contains(buf.as_str()) {
            FilterAction::Drop
        } else {
            FilterAction::Mutation
        }
    }
}
