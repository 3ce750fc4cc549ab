use std::fmt;

use bitflags::bitflags;
use bstr::{BStr, ByteSlice};
use once_cell::sync::Lazy;

use crate::keywords::KeywordSet;
use crate::parser_diagnostics::{LexemeProblem, ParseError};
use crate::pos::Range;
use crate::symbol::Interner;

/// Operators and punctuators, matched longest first.
const OPERATORS: &[&str] = &[
    "+", "-", "*", "/", "%", "=", "<", ">", "!", "~", "&", "|", "^", "?", ":", ".", ",", ";", "(",
    ")", "[", "]", "{", "}", //
    "==", "!=", "<=", ">=", "&&", "||", "??", "?.", "=>", "++", "--", "+=", "-=", "*=", "/=", "%=",
    "&=", "|=", "^=", "<<", ">>", "**", //
    "===", "!==", ">>>", "<<=", ">>=", "**=", "...", "&&=", "||=", "??=", //
    ">>>=",
];

static OPERATORS_BY_LENGTH: Lazy<Vec<&'static [u8]>> = Lazy::new(|| {
    let mut operators = OPERATORS
        .iter()
        .map(|op| op.as_bytes())
        .collect::<Vec<_>>();
    operators.sort_by(|a, b| b.len().cmp(&a.len()));
    operators
});

bitflags! {
    struct CharClass: u8 {
        const SPACE = 1 << 0;
        const IDENT_START = 1 << 1;
        const IDENT_PART = 1 << 2;
        const QUOTE = 1 << 3;
        const OPERATOR_START = 1 << 4;
    }
}

static CHAR_CLASSES: Lazy<[CharClass; 256]> = Lazy::new(|| {
    let mut table = [CharClass::empty(); 256];
    for ch in [b' ', b'\t', b'\n', b'\r'] {
        table[ch as usize] |= CharClass::SPACE;
    }
    for ch in (b'a'..=b'z').chain(b'A'..=b'Z').chain([b'_', b'$']) {
        table[ch as usize] |= CharClass::IDENT_START | CharClass::IDENT_PART;
    }
    for ch in b'0'..=b'9' {
        table[ch as usize] |= CharClass::IDENT_PART;
    }
    for ch in [b'\'', b'"'] {
        table[ch as usize] |= CharClass::QUOTE;
    }
    for op in OPERATORS {
        table[op.as_bytes()[0] as usize] |= CharClass::OPERATOR_START;
    }
    table
});

fn char_class(ch: u8) -> CharClass {
    CHAR_CLASSES[ch as usize]
}

pub fn is_space(ch: u8) -> bool {
    char_class(ch).contains(CharClass::SPACE)
}

pub fn is_ident_start(ch: u8) -> bool {
    char_class(ch).contains(CharClass::IDENT_START)
}

pub fn is_ident_part(ch: u8) -> bool {
    char_class(ch).contains(CharClass::IDENT_PART)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FragmentKind {
    Keyword,
    Operator,
    Identifier,
    /// Quoted string; the fragment text excludes the quotes
    QuotedString,
}

impl fmt::Display for FragmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FragmentKind::Keyword => "keyword",
            FragmentKind::Operator => "operator",
            FragmentKind::Identifier => "identifier",
            FragmentKind::QuotedString => "string",
        })
    }
}

/// One lexical unit, borrowed from the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fragment<'s> {
    pub text: &'s BStr,
    pub kind: FragmentKind,
    pub range: Range,
}

impl<'s> Fragment<'s> {
    /// Number of source bytes the fragment occupies, quotes included.
    pub fn source_len(&self) -> usize {
        self.range.len()
    }

    pub(crate) fn is_closing_punct(&self) -> bool {
        self.kind == FragmentKind::Operator
            && matches!(self.text.as_bytes(), b";" | b"," | b")" | b"]" | b"}")
    }
}

/// Read position over an immutable source buffer.
#[derive(Debug, Clone)]
pub struct Cursor<'s> {
    source: &'s BStr,
    pos: usize,
}

impl<'s> Cursor<'s> {
    pub fn new(source: &'s [u8]) -> Self {
        Cursor {
            source: source.as_bstr(),
            pos: 0,
        }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn peek(&self) -> Option<u8> {
        self.source.get(self.pos).copied()
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.source.len()
    }

    pub(crate) fn bump(&mut self) {
        self.pos += 1;
    }

    pub fn skip_whitespace(&mut self) {
        while self.peek().map_or(false, is_space) {
            self.pos += 1;
        }
    }

    /// Consumes the fragment starting at the cursor.
    ///
    /// The cursor must not be on whitespace; skipping it is the caller's job.
    pub fn next_fragment(
        &mut self,
        interner: &Interner,
        keywords: &KeywordSet,
    ) -> Result<Fragment<'s>, ParseError> {
        let source = self.source;
        let start = self.pos;
        let first = match self.peek() {
            Some(ch) => ch,
            None => {
                return Err(ParseError::UnexpectedEof {
                    range: Range::empty_at(start),
                })
            }
        };
        debug_assert!(!is_space(first), "fragment at whitespace (offset {})", start);
        if is_ident_start(first) {
            self.pos += 1;
            while self.peek().map_or(false, is_ident_part) {
                self.pos += 1;
            }
            let text = source[start..self.pos].as_bstr();
            let kind = if keywords.contains_text(interner, text) {
                FragmentKind::Keyword
            } else {
                FragmentKind::Identifier
            };
            Ok(Fragment {
                text,
                kind,
                range: Range(start, self.pos),
            })
        } else if char_class(first).contains(CharClass::QUOTE) {
            self.lex_quoted(first)
        } else if let Some(op) = self.match_operator() {
            self.pos += op.len();
            Ok(Fragment {
                text: op.as_bstr(),
                kind: FragmentKind::Operator,
                range: Range(start, self.pos),
            })
        } else {
            Err(ParseError::MalformedLexeme {
                problem: LexemeProblem::UnexpectedByte(first),
                range: Range(start, start + 1),
            })
        }
    }

    fn lex_quoted(&mut self, quote: u8) -> Result<Fragment<'s>, ParseError> {
        let source = self.source;
        let start = self.pos;
        self.pos += 1;
        loop {
            match self.peek() {
                None => {
                    return Err(ParseError::MalformedLexeme {
                        problem: LexemeProblem::UnterminatedString,
                        range: Range(start, self.pos),
                    })
                }
                Some(b'\\') => {
                    self.pos = (self.pos + 2).min(source.len());
                }
                Some(ch) if ch == quote => break,
                Some(_) => self.pos += 1,
            }
        }
        let text = source[start + 1..self.pos].as_bstr();
        self.pos += 1;
        Ok(Fragment {
            text,
            kind: FragmentKind::QuotedString,
            range: Range(start, self.pos),
        })
    }

    fn match_operator(&self) -> Option<&'static [u8]> {
        let rest = &self.source[self.pos..];
        let first = *rest.first()?;
        if !char_class(first).contains(CharClass::OPERATOR_START) {
            return None;
        }
        OPERATORS_BY_LENGTH
            .iter()
            .copied()
            .find(|op| rest.starts_with(op))
    }
}
