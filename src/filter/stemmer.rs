use rust_stemmers::{Algorithm, Stemmer as SnowballStemmer};

use crate::error::{Result, SearchError};

use super::{Filter, FilterAction};

fn algorithm_for_lang(lang: &str) -> Option<Algorithm> {
    Some(match lang {
        "ar" => Algorithm::Arabic,
        "da" => Algorithm::Danish,
        "nl" => Algorithm::Dutch,
        "en" => Algorithm::English,
        "fi" => Algorithm::Finnish,
        "fr" => Algorithm::French,
        "de" => Algorithm::German,
        "el" => Algorithm::Greek,
        "hu" => Algorithm::Hungarian,
        "it" => Algorithm::Italian,
        "no" => Algorithm::Norwegian,
        "pt" => Algorithm::Portuguese,
        "ro" => Algorithm::Romanian,
        "ru" => Algorithm::Russian,
        "es" => Algorithm::Spanish,
        "sv" => Algorithm::Swedish,
        "ta" => Algorithm::Tamil,
        "tr" => Algorithm::Turkish,
        _ => return None,
    })
}

/// Snowball-style stemming, bound to the pipeline's language at construction.
pub struct Stemmer {
    inner: SnowballStemmer,
}

impl Stemmer {
    pub fn create(lang: &str) -> Result<Self> {
        let algorithm = algorithm_for_lang(lang)
            .ok_or_else(|| SearchError::FilterInit(format!("unsupported stemmer language: {lang}")))?;
        Ok(Stemmer {
            inner: SnowballStemmer::create(algorithm),
        })
    }
}

impl Filter for Stemmer {
    fn apply(&mut self, buf: &mut String) -> FilterAction {
        // The stemmed form borrows from `buf` in the common case; copy it into a fresh
        // owned string before replacing `buf` in place, mirroring the discipline of
        // treating the stemmer's output as transient.
        let stemmed = self.inner.stem(buf.as_str()).into_owned();
        *buf = stemmed;
        FilterAction::Mutation
    }
}
