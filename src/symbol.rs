use bstr::{BStr, BString, ByteSlice};
use std::collections::HashMap;

/// Handle to a string stored in an [`Interner`].
///
/// Symbols are only meaningful together with the interner that produced them.
/// Comparing two symbols compares the underlying text in O(1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(u32);

impl Symbol {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

macro_rules! symbols {
    ($($name:ident: $index:literal => $text:literal,)*) => {
        /// Symbols every [`Interner`] holds from construction, at fixed indices.
        pub mod sym {
            use super::Symbol;

            $(pub const $name: Symbol = Symbol($index);)*
        }

        const PREDEFINED: &[&str] = &[$($text,)*];
    };
}

symbols! {
    // node kinds
    TOPLEVEL: 0 => "toplevel",
    BLOCK: 1 => "block",
    NAME: 2 => "name",
    CALL: 3 => "call",
    LIST: 4 => "list",

    // keywords
    VAR: 5 => "var",
    FUNCTION: 6 => "function",
    IF: 7 => "if",
    ELSE: 8 => "else",
    DO: 9 => "do",
    WHILE: 10 => "while",
    FOR: 11 => "for",
    BREAK: 12 => "break",
    CONTINUE: 13 => "continue",
    RETURN: 14 => "return",
    SWITCH: 15 => "switch",
    CASE: 16 => "case",
    DEFAULT: 17 => "default",
    THROW: 18 => "throw",
    TRY: 19 => "try",
    CATCH: 20 => "catch",
    FINALLY: 21 => "finally",
    TRUE: 22 => "true",
    FALSE: 23 => "false",
    NULL: 24 => "null",
    NEW: 25 => "new",
}

/// Table of interned byte strings.
///
/// Each distinct text is stored once; [`Interner::intern`] hands out the same
/// [`Symbol`] for every occurrence of it.
#[derive(Debug, Clone)]
pub struct Interner {
    symbols: HashMap<BString, Symbol>,
    strings: Vec<BString>,
}

impl Interner {
    pub fn new() -> Self {
        let mut interner = Interner {
            symbols: HashMap::new(),
            strings: Vec::new(),
        };
        for (index, text) in PREDEFINED.iter().enumerate() {
            let symbol = interner.intern(text.as_bytes());
            debug_assert_eq!(symbol.index(), index, "duplicate predefined symbol {}", text);
        }
        interner
    }

    pub fn intern(&mut self, text: &[u8]) -> Symbol {
        if let Some(&symbol) = self.symbols.get(text.as_bstr()) {
            return symbol;
        }
        let symbol = Symbol(self.strings.len() as u32);
        let text = BString::from(text);
        self.strings.push(text.clone());
        self.symbols.insert(text, symbol);
        symbol
    }

    /// Looks `text` up without interning it.
    pub fn get(&self, text: &[u8]) -> Option<Symbol> {
        self.symbols.get(text.as_bstr()).copied()
    }

    pub fn resolve(&self, symbol: Symbol) -> &BStr {
        self.strings[symbol.index()].as_bstr()
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predefined_symbols() {
        let interner = Interner::new();
        assert_eq!(interner.len(), PREDEFINED.len());
        for (index, text) in PREDEFINED.iter().enumerate() {
            assert_eq!(interner.get(text.as_bytes()).map(Symbol::index), Some(index));
        }
        assert_eq!(interner.resolve(sym::CALL), "call");
        assert_eq!(interner.resolve(sym::VAR), "var");
        assert_eq!(interner.resolve(sym::NEW), "new");
    }

    #[test]
    fn test_intern() {
        let mut interner = Interner::new();
        let foo = interner.intern(b"foo");
        let bar = interner.intern(b"bar");
        assert_ne!(foo, bar);
        assert_eq!(interner.intern(b"foo"), foo);
        assert_eq!(interner.intern(b"while"), sym::WHILE);
        assert_eq!(interner.resolve(bar), "bar");
        assert_eq!(interner.get(b"baz"), None);
        assert_eq!(interner.len(), PREDEFINED.len() + 2);
    }
}
