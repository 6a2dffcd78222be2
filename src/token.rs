//! A token stream produced by a [`crate::tokenizer::Tokenizer`] and consumed by a
//! filter pipeline and the term dictionary.

use std::collections::VecDeque;

use crate::dictionary::TermId;
use crate::error::{Result, SearchError};
use crate::filter::{FilterAction, Pipeline};

/// One token: a mutable text buffer plus a back-pointer to the term it resolves to,
/// filled in by the dictionary during resolution.
pub struct Token {
    pub text: String,
    pub term_id: Option<TermId>,
}

impl Token {
    pub fn new(text: String) -> Self {
        Token { text, term_id: None }
    }
}

/// Owns an active, ordered list of tokens and a staging list for tokens whose terms
/// do not yet exist in the dictionary. Order is preserved within each list.
#[derive(Default)]
pub struct TokenStream {
    active: VecDeque<Token>,
    staging: VecDeque<Token>,
}

impl TokenStream {
    pub fn new() -> Self {
        TokenStream::default()
    }

    pub fn push(&mut self, text: String) {
        self.active.push_back(Token::new(text));
    }

    pub fn active(&self) -> impl Iterator<Item = &Token> {
        self.active.iter()
    }

    pub fn active_mut(&mut self) -> impl Iterator<Item = &mut Token> {
        self.active.iter_mut()
    }

    pub fn staging(&self) -> impl Iterator<Item = &Token> {
        self.staging.iter()
    }

    pub fn staging_mut(&mut self) -> impl Iterator<Item = &mut Token> {
        self.staging.iter_mut()
    }

    pub fn is_staging_empty(&self) -> bool {
        self.staging.is_empty()
    }

    /// Keeps only the tokens for which `keep` returns true; order-preserving.
    pub fn retain_active(&mut self, mut keep: impl FnMut(&Token) -> bool) {
        self.active.retain(|t| keep(t));
    }

    /// Moves the active token at `index` to the tail of the staging list.
    fn stage_index(&mut self, index: usize) {
        if let Some(token) = self.active.remove(index) {
            self.staging.push_back(token);
        }
    }

    /// Resolves every active token against `lookup`. Tokens with no match are moved to
    /// the staging list, preserving original order, when `stage` is true.
    pub fn resolve_with(&mut self, stage: bool, mut lookup: impl FnMut(&str) -> Option<TermId>) {
        let mut i = 0;
        while i < self.active.len() {
            let resolved = lookup(&self.active[i].text);
            match resolved {
                Some(term_id) => {
                    self.active[i].term_id = Some(term_id);
                    i += 1;
                }
                None if stage => {
                    self.stage_index(i);
                    // Do not advance `i`: the next element shifted into this slot.
                }
                None => {
                    i += 1;
                }
            }
        }
    }

    /// Iterates every resolved token (active first, then staging), in original
    /// relative order within each partition. Used once staging has been resolved too.
    pub fn resolved(&self) -> impl Iterator<Item = (&str, TermId)> {
        self.active
            .iter()
            .chain(self.staging.iter())
            .filter_map(|t| t.term_id.map(|id| (t.text.as_str(), id)))
    }

    /// Runs `pipeline` over every active token's buffer, dropping tokens the pipeline
    /// drops and failing outright on the first filter error.
    pub fn apply_pipeline(&mut self, pipeline: &mut Pipeline) -> Result<()> {
        let mut i = 0;
        while i < self.active.len() {
            match pipeline.run(&mut self.active[i].text) {
                FilterAction::Mutation => i += 1,
                FilterAction::Drop => {
                    self.active.remove(i);
                }
                FilterAction::Error => {
                    return Err(SearchError::FilterRuntime(format!(
                        "filter pipeline failed on token {:?}",
                        self.active[i].text
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn take_staging(&mut self) -> VecDeque<Token> {
        std::mem::take(&mut self.staging)
    }

    pub fn extend_staging_back(&mut self, tokens: VecDeque<Token>) {
        self.staging.extend(tokens);
    }
}
