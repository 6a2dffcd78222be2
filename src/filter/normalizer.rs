use unicode_normalization::UnicodeNormalization;

use super::{Filter, FilterAction};

/// Lowercase folding followed by NFKC composition.
///
/// Stateless per call; the only thing carried across calls is the language tag, kept
/// for symmetry with the other built-in filters even though normalization doesn't
/// currently vary by language.
pub struct Normalizer {
    #[allow(dead_code)]
    lang: String,
}

impl Normalizer {
    pub fn create(lang: &str) -> Self {
        Normalizer {
            lang: lang.to_string(),
        }
    }
}

impl Filter for Normalizer {
    fn apply(&mut self, buf: &mut String) -> FilterAction {
        let folded = buf.to_lowercase();
        let composed: String = folded.nfkc().collect();
        *buf = composed;
        FilterAction::Mutation
    }
}
