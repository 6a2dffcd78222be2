//! The raw tokenizer: splits input text into token spans. Case-folding, stop-word
//! removal and stemming are downstream filter-pipeline concerns, not the tokenizer's.

use crate::token::TokenStream;

/// Produces a [`TokenStream`] from raw text. Implementations are bound once per index
/// and invoked for both document indexing and query parsing.
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> TokenStream;
    fn name(&self) -> &str;
}

/// Splits on any byte that is not alphanumeric or `_`, matching the corpus's default
/// whitespace tokenizer but without the case-folding step (the normalizer filter owns
/// that).
#[derive(Debug, Clone)]
pub struct WordTokenizer {
    pub min_len: usize,
    pub max_len: usize,
}

impl Default for WordTokenizer {
    fn default() -> Self {
        WordTokenizer {
            min_len: 1,
            max_len: 64,
        }
    }
}

impl Tokenizer for WordTokenizer {
    fn tokenize(&self, text: &str) -> TokenStream {
        let mut stream = TokenStream::new();
        for span in text.split(|c: char| !c.is_alphanumeric() && c != '_') {
            if span.len() >= self.min_len && span.len() <= self.max_len {
                stream.push(span.to_string());
            }
        }
        stream
    }

    fn name(&self) -> &str {
        "word"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_punctuation_and_whitespace() {
        let tok = WordTokenizer::default();
        let stream = tok.tokenize("The quick, brown fox!");
        let words: Vec<&str> = stream.active().map(|t| t.text.as_str()).collect();
        assert_eq!(words, vec!["The", "quick", "brown", "fox"]);
    }

    #[test]
    fn preserves_case_for_downstream_filters() {
        let tok = WordTokenizer::default();
        let stream = tok.tokenize("Dog");
        assert_eq!(stream.active().next().unwrap().text, "Dog");
    }
}
