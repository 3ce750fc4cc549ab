use crate::symbol::{sym, Interner, Symbol};
use std::collections::HashSet;
use std::iter::FromIterator;

const STANDARD: &[Symbol] = &[
    sym::VAR,
    sym::FUNCTION,
    sym::IF,
    sym::ELSE,
    sym::DO,
    sym::WHILE,
    sym::FOR,
    sym::BREAK,
    sym::CONTINUE,
    sym::RETURN,
    sym::SWITCH,
    sym::CASE,
    sym::DEFAULT,
    sym::THROW,
    sym::TRY,
    sym::CATCH,
    sym::FINALLY,
    sym::TRUE,
    sym::FALSE,
    sym::NULL,
    sym::NEW,
];

/// Words that classify as keywords rather than identifiers.
///
/// The set is built up front and handed to the parser; it is never modified
/// while parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordSet {
    symbols: HashSet<Symbol>,
}

impl KeywordSet {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Reserved words of the JavaScript-like source language.
    pub fn standard() -> Self {
        STANDARD.iter().copied().collect()
    }

    pub fn from_words<I, W>(interner: &mut Interner, words: I) -> Self
    where
        I: IntoIterator<Item = W>,
        W: AsRef<[u8]>,
    {
        Self::empty().with_words(interner, words)
    }

    pub fn with_words<I, W>(mut self, interner: &mut Interner, words: I) -> Self
    where
        I: IntoIterator<Item = W>,
        W: AsRef<[u8]>,
    {
        self.symbols
            .extend(words.into_iter().map(|word| interner.intern(word.as_ref())));
        self
    }

    pub fn contains(&self, symbol: Symbol) -> bool {
        self.symbols.contains(&symbol)
    }

    /// Keyword test on raw text. Text the interner has never seen cannot be a
    /// keyword, so nothing gets interned here.
    pub fn contains_text(&self, interner: &Interner, text: &[u8]) -> bool {
        interner
            .get(text)
            .map_or(false, |symbol| self.contains(symbol))
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.symbols.iter().copied()
    }
}

impl FromIterator<Symbol> for KeywordSet {
    fn from_iter<T: IntoIterator<Item = Symbol>>(iter: T) -> Self {
        KeywordSet {
            symbols: iter.into_iter().collect(),
        }
    }
}
