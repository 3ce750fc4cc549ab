use std::fmt;

use bstr::BString;
use thiserror::Error;

use crate::inspect::js_str_inspect;
use crate::lexing::FragmentKind;
use crate::pos::Range;

/// Fatal parse failure. Parsing stops at the first error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("malformed lexeme: {problem}")]
    MalformedLexeme { problem: LexemeProblem, range: Range },
    #[error("unexpected {kind} {}", js_str_inspect(.text))]
    UnexpectedFragment {
        kind: FragmentKind,
        text: BString,
        range: Range,
    },
    #[error("unexpected end of input")]
    UnexpectedEof { range: Range },
    #[error("{construct} is not supported yet")]
    UnimplementedConstruct { construct: Construct, range: Range },
}

impl ParseError {
    pub fn range(&self) -> Range {
        use ParseError::*;
        match self {
            MalformedLexeme { range, .. } => *range,
            UnexpectedFragment { range, .. } => *range,
            UnexpectedEof { range } => *range,
            UnimplementedConstruct { range, .. } => *range,
        }
    }

    /// `true` when the input is valid as far as the grammar goes but uses a
    /// construct the parser does not handle.
    pub fn is_unimplemented(&self) -> bool {
        matches!(self, ParseError::UnimplementedConstruct { .. })
    }
}

/// Why a fragment could not be read at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexemeProblem {
    UnterminatedString,
    UnexpectedByte(u8),
}

impl fmt::Display for LexemeProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            LexemeProblem::UnterminatedString => f.write_str("unterminated string literal"),
            LexemeProblem::UnexpectedByte(byte) if byte.is_ascii_graphic() => {
                write!(f, "unexpected character `{}`", byte as char)
            }
            LexemeProblem::UnexpectedByte(byte) => write!(f, "unexpected byte 0x{:02X}", byte),
        }
    }
}

/// Grammar the parser recognizes but does not parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Construct {
    /// Statement or expression introduced by a keyword
    Keyword(BString),
    /// Expression introduced by an operator or punctuator
    OperatorExpression(BString),
    StringLiteral,
    /// Anything following a complete operand: binary operators, member
    /// access, assignment, ...
    Continuation(BString),
}

impl fmt::Display for Construct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Construct::Keyword(text) => {
                write!(f, "keyword-led construct {}", js_str_inspect(text))
            }
            Construct::OperatorExpression(text) => {
                write!(f, "expression starting with {}", js_str_inspect(text))
            }
            Construct::StringLiteral => f.write_str("string literal expression"),
            Construct::Continuation(text) => {
                write!(f, "{} following an operand", js_str_inspect(text))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let testcases = vec![
            (
                ParseError::MalformedLexeme {
                    problem: LexemeProblem::UnexpectedByte(b'#'),
                    range: Range(0, 1),
                },
                "malformed lexeme: unexpected character `#`",
            ),
            (
                ParseError::MalformedLexeme {
                    problem: LexemeProblem::UnexpectedByte(0xE3),
                    range: Range(0, 1),
                },
                "malformed lexeme: unexpected byte 0xE3",
            ),
            (
                ParseError::UnexpectedFragment {
                    kind: FragmentKind::Operator,
                    text: BString::from(")"),
                    range: Range(1, 2),
                },
                "unexpected operator \")\"",
            ),
            (
                ParseError::UnimplementedConstruct {
                    construct: Construct::Keyword(BString::from("while")),
                    range: Range(0, 5),
                },
                "keyword-led construct \"while\" is not supported yet",
            ),
            (
                ParseError::UnexpectedEof {
                    range: Range(4, 4),
                },
                "unexpected end of input",
            ),
        ];
        for (error, expected) in &testcases {
            assert_eq!(error.to_string(), *expected);
        }
    }
}
